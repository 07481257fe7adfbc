use std::path::PathBuf;

use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};

pub struct CdBuiltin;

impl Builtin for CdBuiltin {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, argv: &[String], io: &mut BuiltinIo, env: &BuiltinEnv) -> i32 {
        let Some(target) = argv.first() else {
            let _ = write_line(io.stderr, "cd: missing argument");
            return 1;
        };

        let path = expand_tilde(target, env.home);

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => match std::env::set_current_dir(&path) {
                Ok(()) => 0,
                Err(e) => {
                    let _ = write_line(io.stderr, &format!("cd: {e}"));
                    1
                }
            },
            Ok(_) => {
                let _ = write_line(io.stderr, &format!("cd: {}: Not a directory", target));
                1
            }
            Err(_) => {
                let _ =
                    write_line(io.stderr, &format!("cd: {}: No such file or directory", target));
                1
            }
        }
    }
}

fn expand_tilde(target: &str, home: Option<&PathBuf>) -> PathBuf {
    match (target.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => {
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            if rest.is_empty() {
                home.clone()
            } else {
                home.join(rest)
            }
        }
        _ => PathBuf::from(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_alone_expands_to_home() {
        let home = PathBuf::from("/home/alice");
        assert_eq!(expand_tilde("~", Some(&home)), home);
    }

    #[test]
    fn tilde_slash_path_expands_under_home() {
        let home = PathBuf::from("/home/alice");
        assert_eq!(expand_tilde("~/projects", Some(&home)), PathBuf::from("/home/alice/projects"));
    }

    #[test]
    fn no_leading_tilde_is_untouched() {
        let home = PathBuf::from("/home/alice");
        assert_eq!(expand_tilde("/tmp", Some(&home)), PathBuf::from("/tmp"));
    }

    #[test]
    fn tilde_without_home_is_untouched() {
        assert_eq!(expand_tilde("~", None), PathBuf::from("~"));
    }
}
