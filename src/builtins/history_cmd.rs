use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};

pub struct HistoryBuiltin;

impl Builtin for HistoryBuiltin {
    fn name(&self) -> &'static str {
        "history"
    }

    fn run(&self, argv: &[String], io: &mut BuiltinIo, env: &BuiltinEnv) -> i32 {
        let n = match argv.first() {
            Some(arg) => match arg.parse::<usize>() {
                Ok(n) => Some(n),
                Err(_) => {
                    let _ = write_line(io.stderr, "history: numeric argument required");
                    return 1;
                }
            },
            None => None,
        };

        if env.history.read_out(n, io.stdout).is_err() {
            let _ = write_line(io.stderr, "history: error writing output");
            return 1;
        }
        0
    }
}
