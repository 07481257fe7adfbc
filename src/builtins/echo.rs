use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};

pub struct EchoBuiltin;

impl Builtin for EchoBuiltin {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run(&self, argv: &[String], io: &mut BuiltinIo, _env: &BuiltinEnv) -> i32 {
        let _ = write_line(io.stdout, &argv.join(" "));
        0
    }
}
