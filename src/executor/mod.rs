//! AST executor (§4.4).
//!
//! Maps the command AST to a dynamic dataflow graph of concurrent stages
//! joined by anonymous byte pipes, rewiring file descriptors per
//! redirection and propagating exit status up through the logical
//! operators.

mod io;

use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::process::Command as ProcessCommand;

pub use io::{Input, Output};

use crate::ast::{BinaryOp, Node, RedirectKind};
use crate::builtins::{BuiltinEnv, BuiltinIo, Registry};
use crate::config::ShellConfig;
use crate::pathsearch;

/// A command's exit status; 0 is success.
pub type ExitStatus = i32;

const BUILTIN_NAMES: [&str; 7] = ["echo", "pwd", "cd", "ls", "type", "exit", "history"];

/// Everything `execute` needs besides the AST node and its I/O endpoints.
pub struct ExecContext<'a> {
    pub registry: &'a Registry,
    pub config: &'a ShellConfig,
    pub history: &'a crate::history::HistoryStore,
    pub home: Option<std::path::PathBuf>,
}

/// Walk `node`, running it to completion against `(stdin, stdout, stderr)`.
pub fn execute(node: &Node, stdin: Input, stdout: Output, stderr: Output, ctx: &ExecContext) -> ExitStatus {
    match node {
        Node::Block(statements) => execute_block(statements, stdin, stdout, stderr, ctx),
        Node::Binary(left, op, right) => {
            // `&&`/`||` always wire their left side to the terminal: only
            // the command actually named in a pipe or redirect gets those
            // endpoints, matching how a shell only touches descriptors of
            // the command they're written against.
            let left_status = execute(left, Input::Terminal, Output::TerminalOut, Output::TerminalErr, ctx);
            match op {
                BinaryOp::And if left_status == 0 => execute(right, stdin, stdout, stderr, ctx),
                BinaryOp::And => left_status,
                BinaryOp::Or if left_status != 0 => execute(right, stdin, stdout, stderr, ctx),
                BinaryOp::Or => 0,
            }
        }
        Node::If { condition, then_branch, else_branch } => {
            let cond_status = execute(condition, Input::Terminal, Output::TerminalOut, Output::TerminalErr, ctx);
            if cond_status == 0 {
                execute(then_branch, stdin, stdout, stderr, ctx)
            } else if let Some(else_branch) = else_branch {
                execute(else_branch, stdin, stdout, stderr, ctx)
            } else {
                0
            }
        }
        Node::Redirect { child, file, kind, fd } => {
            execute_redirect(child, &RedirectSpec { file, kind: *kind, fd: *fd }, stdin, stdout, stderr, ctx)
        }
        Node::Pipe(left, right) => execute_pipe(left, right, stdin, stdout, stderr, ctx),
        Node::Command(argv) => execute_command(argv, stdin, stdout, stderr, ctx),
    }
}

fn execute_block(statements: &[Node], stdin: Input, stdout: Output, stderr: Output, ctx: &ExecContext) -> ExitStatus {
    let mut stdin = Some(stdin);
    let mut stdout = Some(stdout);
    let mut stderr = Some(stderr);
    let mut status = 0;
    let last = statements.len().saturating_sub(1);
    for (i, stmt) in statements.iter().enumerate() {
        if i == last {
            status = execute(
                stmt,
                stdin.take().unwrap(),
                stdout.take().unwrap(),
                stderr.take().unwrap(),
                ctx,
            );
        } else {
            status = execute(stmt, Input::Terminal, Output::TerminalOut, Output::TerminalErr, ctx);
        }
    }
    status
}

/// A redirection's target, decoupled from `Node::Redirect` so
/// `execute_redirect` doesn't need a separate parameter per field.
struct RedirectSpec<'a> {
    file: &'a str,
    kind: RedirectKind,
    fd: i32,
}

fn execute_redirect(child: &Node, spec: &RedirectSpec, stdin: Input, stdout: Output, stderr: Output, ctx: &ExecContext) -> ExitStatus {
    let mut opts = OpenOptions::new();
    match spec.kind {
        RedirectKind::Input => {
            opts.read(true);
        }
        RedirectKind::Truncate => {
            opts.write(true).create(true).truncate(true);
        }
        RedirectKind::Append => {
            opts.write(true).create(true).append(true);
        }
    }
    opts.mode(0o644);

    let opened = match opts.open(spec.file) {
        Ok(f) => f,
        Err(e) => {
            let err = crate::ShellError::Redirect { path: spec.file.into(), source: e };
            eprintln!("{err}");
            return 1;
        }
    };

    if matches!(spec.kind, RedirectKind::Input) {
        execute(child, Input::File(opened), stdout, stderr, ctx)
    } else if spec.fd == 2 {
        execute(child, stdin, stdout, Output::File(opened), ctx)
    } else {
        execute(child, stdin, Output::File(opened), stderr, ctx)
    }
}

fn execute_pipe(left: &Node, right: &Node, stdin: Input, stdout: Output, stderr: Output, ctx: &ExecContext) -> ExitStatus {
    let (reader, writer) = match os_pipe::pipe() {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("pipe: {e}");
            return 1;
        }
    };

    // stderr is duplicated rather than pipe-wired so both stages can write
    // to it independently; stdout/stdin are the only pipe-wired ends.
    let left_stderr = match stderr.try_clone_for_stage() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error duplicating stderr: {e}");
            return 1;
        }
    };

    std::thread::scope(|scope| {
        let handle = scope.spawn(move || execute(left, stdin, Output::Pipe(writer), left_stderr, ctx));
        let right_status = execute(right, Input::Pipe(reader), stdout, stderr, ctx);
        let _ = handle.join();
        right_status
    })
}

fn execute_command(argv: &[String], stdin: Input, stdout: Output, stderr: Output, ctx: &ExecContext) -> ExitStatus {
    let Some(name) = argv.first() else { return 0 };
    let args = &argv[1..];

    if let Some(builtin) = ctx.registry.lookup(name) {
        let mut reader = stdin.into_reader();
        let mut writer = stdout.into_writer();
        let mut err_writer = stderr.into_writer();
        let mut io = BuiltinIo { stdin: &mut reader, stdout: &mut writer, stderr: &mut err_writer };
        let env = BuiltinEnv {
            home: ctx.home.as_ref(),
            exit: &ctx.registry.exit,
            history: ctx.history,
            config: ctx.config,
            builtin_names: &BUILTIN_NAMES,
        };
        return builtin.run(args, &mut io, &env);
    }

    match pathsearch::lookup(ctx.config, name) {
        Some(path) => {
            let status = ProcessCommand::new(path)
                .args(args)
                .stdin(stdin.into_stdio())
                .stdout(stdout.into_stdio())
                .stderr(stderr.into_stdio())
                .status();
            match status {
                Ok(status) => status.code().unwrap_or(1),
                Err(e) => {
                    eprintln!("{name}: {e}");
                    127
                }
            }
        }
        None => {
            eprintln!("{name}: command not found");
            127
        }
    }
}

impl Output {
    fn try_clone_for_stage(&self) -> std::io::Result<Output> {
        match self {
            Output::TerminalOut => Ok(Output::TerminalOut),
            Output::TerminalErr => Ok(Output::TerminalErr),
            Output::File(f) => Ok(Output::File(f.try_clone()?)),
            Output::Pipe(_) => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "stderr endpoint cannot be a pipe writer",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::Registry;
    use crate::history::HistoryStore;
    use std::io::Read;
    use tempfile::tempdir;

    fn ctx<'a>(registry: &'a Registry, config: &'a ShellConfig, history: &'a HistoryStore) -> ExecContext<'a> {
        ExecContext { registry, config, history, home: None }
    }

    fn run(node: &Node) -> (ExitStatus, String) {
        let registry = Registry::new();
        let config = ShellConfig { path: std::env::var("PATH").unwrap_or_default(), histfile: None, home: None };
        let history = HistoryStore::new();
        let ctx = ctx(&registry, &config, &history);
        let (mut reader, writer) = os_pipe::pipe().unwrap();
        let status = execute(node, Input::Terminal, Output::Pipe(writer), Output::TerminalErr, &ctx);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        (status, out)
    }

    #[test]
    fn true_and_false_external_commands() {
        let (status, _) = run(&Node::Command(vec!["true".into()]));
        assert_eq!(status, 0);
        let (status, _) = run(&Node::Command(vec!["false".into()]));
        assert_eq!(status, 1);
    }

    #[test]
    fn command_not_found_is_127() {
        let (status, _) = run(&Node::Command(vec!["definitely-not-a-real-binary".into()]));
        assert_eq!(status, 127);
    }

    #[test]
    fn pipe_wires_stdout_to_stdin() {
        let node = Node::Pipe(
            Box::new(Node::Command(vec!["echo".into(), "hello".into()])),
            Box::new(Node::Command(vec!["cat".into()])),
        );
        let (status, out) = run(&node);
        assert_eq!(status, 0);
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn and_short_circuits_on_failure() {
        let node = Node::Binary(
            Box::new(Node::Command(vec!["false".into()])),
            BinaryOp::And,
            Box::new(Node::Command(vec!["echo".into(), "nope".into()])),
        );
        let (status, out) = run(&node);
        assert_eq!(status, 1);
        assert_eq!(out, "");
    }

    #[test]
    fn or_runs_rhs_on_failure() {
        let node = Node::Binary(
            Box::new(Node::Command(vec!["false".into()])),
            BinaryOp::Or,
            Box::new(Node::Command(vec!["echo".into(), "fallback".into()])),
        );
        let (status, out) = run(&node);
        assert_eq!(status, 0);
        assert_eq!(out, "fallback\n");
    }

    #[test]
    fn redirect_truncate_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let node = Node::Command(vec!["echo".into(), "hi".into()]).redirect(
            path.to_str().unwrap().to_string(),
            RedirectKind::Truncate,
            1,
        );
        let (status, _) = run(&node);
        assert_eq!(status, 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hi\n");
    }

    #[test]
    fn if_then_else_picks_branch() {
        let node = Node::If {
            condition: Box::new(Node::Command(vec!["false".into()])),
            then_branch: Box::new(Node::Command(vec!["echo".into(), "then".into()])),
            else_branch: Some(Box::new(Node::Command(vec!["echo".into(), "else".into()]))),
        };
        let (status, out) = run(&node);
        assert_eq!(status, 0);
        assert_eq!(out, "else\n");
    }
}
