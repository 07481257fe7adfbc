//! Endpoint types: the abstract byte sinks/sources handed to builtins and
//! external processes (§4.3's "endpoints are abstract byte sinks/sources —
//! files, pipe ends, or the process's own streams").
//!
//! Each endpoint is consumed exactly once, either by converting it into a
//! [`std::process::Stdio`] for an external child or into a boxed
//! `Read`/`Write` for a builtin. That move-only ownership is what gives us
//! the file-descriptor discipline of §5 for free: once an endpoint is
//! handed to a stage, nothing else holds a copy of it.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process::Stdio;

use os_pipe::{PipeReader, PipeWriter};

/// Where a command's stdin comes from.
pub enum Input {
    /// The shell's own terminal stdin (only ever used at the top level).
    Terminal,
    File(File),
    Pipe(PipeReader),
}

/// Where a command's stdout or stderr goes.
pub enum Output {
    /// The shell's own terminal stdout.
    TerminalOut,
    /// The shell's own terminal stderr.
    TerminalErr,
    File(File),
    Pipe(PipeWriter),
}

impl Input {
    pub fn into_stdio(self) -> Stdio {
        match self {
            Input::Terminal => Stdio::inherit(),
            Input::File(f) => f.into(),
            Input::Pipe(r) => r.into(),
        }
    }

    pub fn into_reader(self) -> Box<dyn Read> {
        match self {
            Input::Terminal => Box::new(io::stdin()),
            Input::File(f) => Box::new(f),
            Input::Pipe(r) => Box::new(r),
        }
    }
}

impl Output {
    pub fn into_stdio(self) -> Stdio {
        match self {
            Output::TerminalOut | Output::TerminalErr => Stdio::inherit(),
            Output::File(f) => f.into(),
            Output::Pipe(w) => w.into(),
        }
    }

    pub fn into_writer(self) -> Box<dyn Write> {
        match self {
            Output::TerminalOut => Box::new(CrlfWriter(io::stdout())),
            Output::TerminalErr => Box::new(CrlfWriter(io::stderr())),
            Output::File(f) => Box::new(f),
            Output::Pipe(w) => Box::new(w),
        }
    }
}

/// Translates outgoing `\n` into `\r\n`, matching what a cooked terminal's
/// output post-processing would otherwise do — raw mode (§4.8) turns that
/// off, so the shell has to do it itself for anything it prints on the tty.
/// Only wraps the terminal endpoints; files and pipes get builtins' output
/// byte for byte.
struct CrlfWriter<W: Write>(W);

impl<W: Write> Write for CrlfWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for chunk in buf.split_inclusive(|&b| b == b'\n') {
            match chunk.split_last() {
                Some((b'\n', rest)) => {
                    self.0.write_all(rest)?;
                    self.0.write_all(b"\r\n")?;
                }
                _ => self.0.write_all(chunk)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}
