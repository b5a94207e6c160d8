error_chain! {
    foreign_links {
        Fmt(::std::fmt::Error);
        Io(::std::io::Error);
    }

    errors {
        UnsupportedVersion(version: u16, sub_version: u16) {
            description("unsupported animation version")
            display("unsupported animation version {}.{} (only 1.0 is supported)",
                version, sub_version)
        }
    }
}

macro_rules! check {
    ($b:expr) => {
        if !$b {
            use errors::Error;
            use errors::ErrorKind;
            Err(Error::from_kind(ErrorKind::Msg(format!(
                "expected: {}",
                stringify!($b)
            ))))
        } else {
            Ok(())
        }
    };
}
