use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};

pub struct PwdBuiltin;

impl Builtin for PwdBuiltin {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(&self, _argv: &[String], io: &mut BuiltinIo, _env: &BuiltinEnv) -> i32 {
        match std::env::current_dir() {
            Ok(dir) => {
                let _ = write_line(io.stdout, &dir.display().to_string());
                0
            }
            Err(e) => {
                let _ = write_line(io.stderr, &format!("pwd: {e}"));
                1
            }
        }
    }
}
