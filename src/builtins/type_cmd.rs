use super::{write_line, Builtin, BuiltinEnv, BuiltinIo};
use crate::pathsearch;

pub struct TypeBuiltin;

impl Builtin for TypeBuiltin {
    fn name(&self) -> &'static str {
        "type"
    }

    fn run(&self, argv: &[String], io: &mut BuiltinIo, env: &BuiltinEnv) -> i32 {
        let Some(name) = argv.first() else {
            let _ = write_line(io.stderr, "type: missing operand");
            return 1;
        };

        if env.builtin_names.contains(&name.as_str()) {
            let _ = write_line(io.stdout, &format!("{name} is a shell builtin"));
            return 0;
        }

        match pathsearch::lookup(env.config, name) {
            Some(path) => {
                let _ = write_line(io.stdout, &format!("{name} is {}", path.display()));
                0
            }
            None => {
                let _ = write_line(io.stderr, &format!("{name}: not found"));
                1
            }
        }
    }
}
