//! Logger that prints messages like `[WARN] Lorem ipsum` to stderr.

use atty;
use log::{self, Log, Level, Metadata, Record};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

struct Logger {
    level: Level,
    use_color: bool,
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug | Level::Trace => Color::Cyan,
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let color_choice = match self.use_color {
            true => ColorChoice::Auto,
            false => ColorChoice::Never,
        };
        let mut stderr = StandardStream::stderr(color_choice);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(level_color(record.level()))));
        let _ = write!(&mut stderr, "[{}]", record.level());
        let _ = stderr.reset();
        let _ = writeln!(&mut stderr, " {}", record.args());
    }

    fn flush(&self) { }
}

/// Picks the log level from the number of `-v` flags, or `Error` when
/// `-q` was given.
pub fn level_for(verbosity: u64, quiet: bool) -> Level {
    if quiet {
        return Level::Error;
    }
    match verbosity {
        0 => Level::Info,
        1 => Level::Debug,
        _ => Level::Trace,
    }
}

pub fn init(level: Level) {
    let use_color = atty::is(atty::Stream::Stderr);
    let logger = Logger { level, use_color };
    let _ = log::set_boxed_logger(Box::new(logger));
    log::set_max_level(level.to_level_filter());
}

#[test]
fn test_level_for() {
    assert_eq!(level_for(0, false), Level::Info);
    assert_eq!(level_for(1, false), Level::Debug);
    assert_eq!(level_for(5, false), Level::Trace);
    assert_eq!(level_for(2, true), Level::Error);
}
