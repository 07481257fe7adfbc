//! Thin front door: wires the library's pieces together into the
//! interactive startup/shutdown loop (§10.4).

use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::sync::{Arc, Mutex};

use linesh::completion::CompletionIndex;
use linesh::editor::{Editor, Line};
use linesh::executor::{execute, ExecContext};
use linesh::history::HistoryStore;
use linesh::terminal::{enable_raw_mode, RawModeGuard};
use linesh::{parse, ShellConfig};

fn main() {
    let config = ShellConfig::from_env();

    let registry = linesh::builtins::Registry::new();
    let completion = CompletionIndex::build(&config, &registry.names());

    let history = Arc::new(HistoryStore::new());
    if let Some(histfile) = &config.histfile {
        if let Err(e) = history.load(histfile) {
            eprintln!("linesh: {}", linesh::ShellError::History(e));
        }
    }

    let stdin_fd = io::stdin().as_raw_fd();
    let guard = match enable_raw_mode(stdin_fd) {
        Ok(guard) => Arc::new(Mutex::new(guard)),
        Err(e) => {
            eprintln!("linesh: failed to enable raw mode: {e}");
            std::process::exit(1);
        }
    };

    install_shutdown_hook(Arc::clone(&guard), Arc::clone(&history), config.histfile.clone());

    run_loop(&config, &registry, &completion, &history);

    shutdown(&guard, &history, config.histfile.as_deref());
    std::process::exit(0);
}

fn install_shutdown_hook(
    guard: Arc<Mutex<RawModeGuard>>,
    history: Arc<HistoryStore>,
    histfile: Option<std::path::PathBuf>,
) {
    let result = ctrlc::set_handler(move || {
        shutdown(&guard, &history, histfile.as_deref());
        std::process::exit(0);
    });
    if let Err(e) = result {
        eprintln!("linesh: failed to install shutdown hook: {e}");
    }
}

fn shutdown(guard: &Arc<Mutex<RawModeGuard>>, history: &HistoryStore, histfile: Option<&std::path::Path>) {
    if let Ok(mut guard) = guard.lock() {
        guard.restore();
    }
    if let Some(path) = histfile {
        let _ = history.write(path);
    }
}

fn run_loop(
    config: &ShellConfig,
    registry: &linesh::builtins::Registry,
    completion: &CompletionIndex,
    history: &HistoryStore,
) {
    let mut stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut editor = Editor::new(&mut stdin, &mut stdout, completion, history);

    loop {
        let line = match editor.read_line() {
            Ok(line) => line,
            Err(e) => {
                eprintln!("linesh: read error: {e}\r");
                break;
            }
        };

        let line = match line {
            Line::Eof => break,
            Line::Empty => continue,
            Line::Command(line) => line,
        };

        let node = match parse(&line) {
            Ok(node) => node,
            Err(e) => {
                eprint!("{e}\r\n");
                let _ = io::stdout().flush();
                continue;
            }
        };

        let ctx = ExecContext {
            registry,
            config,
            history,
            home: config.home.clone(),
        };
        let stdout_ep = linesh::executor::Output::TerminalOut;
        let stderr_ep = linesh::executor::Output::TerminalErr;
        let stdin_ep = linesh::executor::Input::Terminal;
        execute(&node, stdin_ep, stdout_ep, stderr_ep, &ctx);

        if registry.exit.is_requested() {
            break;
        }
    }
}
