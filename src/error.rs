//! Shell error type
//!
//! Covers the handful of fatal / I/O-boundary failures the shell surfaces
//! as a typed error rather than an exit status. Per-command failures
//! (unknown command, non-zero exit, builtin usage errors) are exit-status
//! values, not `ShellError` — see the executor's dispatch rules.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal or I/O-boundary errors. Per-line syntax errors are
/// [`crate::ParseError`], not a `ShellError` variant, since they never
/// abort anything beyond the one line that produced them (§7.1).
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("error opening file '{path}': {source}")]
    Redirect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("history error: {0}")]
    History(#[source] std::io::Error),
}
