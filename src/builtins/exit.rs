use super::{Builtin, BuiltinEnv, BuiltinIo};

pub struct ExitBuiltin;

impl Builtin for ExitBuiltin {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(&self, _argv: &[String], _io: &mut BuiltinIo, env: &BuiltinEnv) -> i32 {
        env.exit.request();
        0
    }
}
