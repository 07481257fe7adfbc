use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};

pub struct LsBuiltin;

impl Builtin for LsBuiltin {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn run(&self, argv: &[String], io: &mut BuiltinIo, _env: &BuiltinEnv) -> i32 {
        let dir = resolve_dir(argv);

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => {
                let _ = write_line(io.stderr, &format!("ls: {}: No such file or directory", dir));
                return 1;
            }
        };

        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                let _ = write_line(io.stdout, name);
            }
        }
        0
    }
}

/// §9: `ls` has an ad-hoc `-1` handling that isn't a real flag parser — if
/// `argv[0] == "-1"`, skip it and read the next argument as the directory.
/// Retained exactly as observed, not upgraded into real option parsing.
fn resolve_dir(argv: &[String]) -> &str {
    match argv.first().map(String::as_str) {
        Some("-1") => argv.get(1).map(String::as_str).unwrap_or("."),
        Some(dir) => dir,
        None => ".",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_current_directory() {
        assert_eq!(resolve_dir(&[]), ".");
    }

    #[test]
    fn plain_argument_is_the_directory() {
        let argv = vec!["/tmp".to_string()];
        assert_eq!(resolve_dir(&argv), "/tmp");
    }

    #[test]
    fn dash_one_is_skipped_and_next_arg_is_the_directory() {
        let argv = vec!["-1".to_string(), "/tmp".to_string()];
        assert_eq!(resolve_dir(&argv), "/tmp");
    }

    #[test]
    fn dash_one_alone_falls_back_to_current_directory() {
        let argv = vec!["-1".to_string()];
        assert_eq!(resolve_dir(&argv), ".");
    }
}
