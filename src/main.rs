#![recursion_limit = "1024"] // for error_chain

extern crate atty;
extern crate cgmath;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate json;
#[macro_use]
extern crate log;
extern crate termcolor;

#[macro_use]
mod errors;
#[macro_use]
mod util;
mod anim;
mod bvh;
mod convert;
mod exporter;
mod files;
mod info;
mod logger;
mod rotation;
mod skeleton;

use clap::{App, ArgMatches};
use std::process::exit;

fn app() -> App<'static, 'static> {
    clap_app!(animbvh =>
        (@setting SubcommandRequiredElseHelp)
        (@setting VersionlessSubcommands)
        (version: crate_version!())
        (about: "Converts avatar keyframe animations (.anim) to BVH")
        (@arg VERBOSE: -v --verbose +multiple +global "Log more (repeat for even more)")
        (@arg QUIET: -q --quiet +global "Only log errors")
        (@subcommand convert =>
            (about: "Convert an .anim file to .bvh")
            (alias: "c")
            (@arg INPUT: +required "Animation file")
            (@arg OUTPUT: -o --output +takes_value "Output file (defaults to INPUT with a .bvh extension)")
            (@arg OFFSET: --offset +takes_value +multiple number_of_values(1)
                "Offset rotation for a joint, as JOINT=X,Y,Z in degrees (repeatable)")
        )
        (@subcommand info =>
            (about: "Print a JSON summary of an .anim file")
            (alias: "i")
            (@arg INPUT: +required "Animation file")
        )
    )
}

fn run(subcmd: &str, matches: &ArgMatches) -> errors::Result<()> {
    match subcmd {
        "convert" => convert::main(matches),
        "info" => info::main(matches),
        _ => bail!("unknown subcommand {}", subcmd),
    }
}

fn main() {
    let matches = app().get_matches();
    let (subcmd, sub_matches) = matches.subcommand();
    let sub_matches = sub_matches.unwrap();

    // Global flags can come before or after the subcommand.
    let verbosity = matches.occurrences_of("VERBOSE").max(sub_matches.occurrences_of("VERBOSE"));
    let quiet = matches.is_present("QUIET") || sub_matches.is_present("QUIET");
    let level = logger::level_for(verbosity, quiet);
    logger::init(level);

    if let Err(e) = run(subcmd, sub_matches) {
        error!("{}", e);
        for cause in e.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        exit(1);
    }
}

#[test]
fn test_cli_args() {
    let m = app().get_matches_from(vec!["animbvh", "-vv", "convert", "walk.anim", "-o", "out.bvh"]);
    let (subcmd, sub) = m.subcommand();
    let sub = sub.unwrap();
    assert_eq!(subcmd, "convert");
    assert_eq!(sub.value_of("INPUT"), Some("walk.anim"));
    assert_eq!(sub.value_of("OUTPUT"), Some("out.bvh"));
    assert_eq!(m.occurrences_of("VERBOSE"), 2);

    let m = app().get_matches_from(vec![
        "animbvh", "convert", "--offset", "mTorso=0,20,0", "walk.anim", "--offset", "mHead=5,0,0",
    ]);
    let sub = m.subcommand_matches("convert").unwrap();
    let offsets: Vec<&str> = sub.values_of("OFFSET").unwrap().collect();
    assert_eq!(offsets, vec!["mTorso=0,20,0", "mHead=5,0,0"]);
    assert_eq!(sub.value_of("INPUT"), Some("walk.anim"));

    let m = app().get_matches_from(vec!["animbvh", "info", "-q", "walk.anim"]);
    let sub = m.subcommand_matches("info").unwrap();
    assert!(sub.is_present("QUIET"));
    assert!(app().get_matches_from_safe(vec!["animbvh", "convert"]).is_err());
}
