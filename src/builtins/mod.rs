//! Built-in registry (§4.3).
//!
//! A name → callable mapping. Each callable is an opaque [`Builtin`]
//! implementation; the registry fixes only the calling convention and the
//! `exit_requested` signal, never the individual builtins' argument
//! grammars.

mod cd;
mod echo;
mod exit;
mod history_cmd;
mod ls;
mod pwd;
mod type_cmd;

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ShellConfig;
use crate::history::HistoryStore;

/// The stdin/stdout/stderr endpoints a builtin is given, already unwrapped
/// into boxed trait objects by the executor.
pub struct BuiltinIo<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// The process-wide `exit_requested` flag (§4.3, §5): written by the
/// `exit` builtin, polled by the top-level loop. Single-writer (the `exit`
/// builtin), single-reader (the loop), so an atomic bool suffices — no
/// locking needed. The shell's own process exit status is always 0 on a
/// clean shutdown (§6), so no exit code is stored here.
#[derive(Default)]
pub struct ExitState {
    requested: AtomicBool,
}

impl ExitState {
    pub fn request(&self) {
        self.requested.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Relaxed)
    }
}

/// Ambient resources a builtin may need beyond its argv and I/O endpoints.
pub struct BuiltinEnv<'a> {
    pub home: Option<&'a PathBuf>,
    pub exit: &'a ExitState,
    pub history: &'a HistoryStore,
    pub config: &'a ShellConfig,
    /// Builtin names, so `type` can report "shell builtin" without the
    /// builtin module depending on the executor's registry type.
    pub builtin_names: &'a [&'static str],
}

/// A single built-in command.
pub trait Builtin: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, argv: &[String], io: &mut BuiltinIo, env: &BuiltinEnv) -> i32;
}

/// Name → callable mapping, plus the shared `exit_requested` flag.
pub struct Registry {
    builtins: HashMap<&'static str, Arc<dyn Builtin>>,
    pub exit: ExitState,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Build the registry with the seven builtins fixed by §4.3.
    pub fn new() -> Self {
        let mut registry = Self { builtins: HashMap::new(), exit: ExitState::default() };
        registry.register(echo::EchoBuiltin);
        registry.register(pwd::PwdBuiltin);
        registry.register(cd::CdBuiltin);
        registry.register(ls::LsBuiltin);
        registry.register(type_cmd::TypeBuiltin);
        registry.register(exit::ExitBuiltin);
        registry.register(history_cmd::HistoryBuiltin);
        registry
    }

    fn register(&mut self, builtin: impl Builtin + 'static) {
        self.builtins.insert(builtin.name(), Arc::new(builtin));
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Builtin>> {
        self.builtins.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Names of every registered builtin, for seeding the completion index.
    pub fn names(&self) -> Vec<&'static str> {
        self.builtins.keys().copied().collect()
    }
}

/// Write `line` followed by a newline. Builtins write plain `\n`
/// regardless of where their stdout/stderr endpoint actually lands; the
/// executor's terminal endpoint is responsible for translating that into
/// CRLF when raw mode has disabled output post-processing (§4.4).
pub(crate) fn write_line(w: &mut dyn Write, line: &str) -> std::io::Result<()> {
    w.write_all(line.as_bytes())?;
    w.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_all_seven_builtins() {
        let registry = Registry::new();
        for name in ["echo", "pwd", "cd", "ls", "type", "exit", "history"] {
            assert!(registry.contains(name), "missing builtin: {name}");
        }
        assert_eq!(registry.names().len(), 7);
    }
}
