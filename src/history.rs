//! Persistent command history (§4.7).
//!
//! An ordered, append-only log of accepted command lines with a
//! navigation cursor for the line editor's up/down recall and a
//! last-saved cursor for incremental persistence.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::RwLock;

/// Shared, concurrency-safe history log.
///
/// Reads (`read_out`) may run concurrently with each other; mutations
/// (`add`, `load`, `append_new`) take the writer lock, matching the
/// reader/writer discipline of §5.
pub struct HistoryStore {
    inner: RwLock<Inner>,
}

struct Inner {
    entries: Vec<String>,
    /// Navigation cursor for up/down recall, always in `[0, entries.len()]`.
    nav: usize,
    /// First index not yet flushed to persistent storage.
    saved: usize,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { entries: Vec::new(), nav: 0, saved: 0 }) }
    }

    /// Append `line` if its trimmed form is non-empty, resetting the
    /// navigation cursor to one past the end.
    pub fn add(&self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        let mut inner = self.inner.write().unwrap();
        inner.entries.push(trimmed.to_string());
        inner.nav = inner.entries.len();
    }

    /// Move the navigation cursor up (toward older entries).
    ///
    /// Returns `(entry, present)`. `present` is `false` only when the
    /// cursor was already at the top (§8 "history navigation past the
    /// top: bell, no state change").
    pub fn get_up(&self) -> (String, bool) {
        let mut inner = self.inner.write().unwrap();
        if inner.nav == 0 {
            return (String::new(), false);
        }
        inner.nav -= 1;
        (inner.entries[inner.nav].clone(), true)
    }

    /// Move the navigation cursor down (toward newer entries, and then
    /// to the empty prompt past the last entry).
    pub fn get_down(&self) -> (String, bool) {
        let mut inner = self.inner.write().unwrap();
        if inner.nav >= inner.entries.len() {
            return (String::new(), false);
        }
        inner.nav += 1;
        if inner.nav == inner.entries.len() {
            return (String::new(), true);
        }
        (inner.entries[inner.nav].clone(), true)
    }

    /// Replace the in-memory log with `path`'s non-empty lines.
    pub fn load(&self, path: &Path) -> std::io::Result<()> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        let entries: Vec<String> =
            content.lines().map(str::to_string).filter(|l| !l.is_empty()).collect();
        let mut inner = self.inner.write().unwrap();
        inner.nav = entries.len();
        inner.saved = entries.len();
        inner.entries = entries;
        Ok(())
    }

    /// Truncate `path` and write every entry, one per line.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        let mut file = fs::File::create(path)?;
        for line in &inner.entries {
            writeln!(file, "{line}")?;
        }
        inner.saved = inner.entries.len();
        Ok(())
    }

    /// Append entries added since the last save/load to `path`.
    pub fn append_new(&self, path: &Path) -> std::io::Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.saved >= inner.entries.len() {
            return Ok(());
        }
        let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        for line in &inner.entries[inner.saved..] {
            writeln!(file, "{line}")?;
        }
        inner.saved = inner.entries.len();
        Ok(())
    }

    /// Render the last `n` entries (or all, if `n` is `None`) as
    /// `"\t{i+1}  {line}\n"` to `sink`.
    pub fn read_out(&self, n: Option<usize>, sink: &mut dyn Write) -> std::io::Result<()> {
        let inner = self.inner.read().unwrap();
        let total = inner.entries.len();
        let start = match n {
            Some(n) if n < total => total - n,
            _ => 0,
        };
        for (i, line) in inner.entries.iter().enumerate().skip(start) {
            writeln!(sink, "\t{}  {}", i + 1, line)?;
        }
        Ok(())
    }
}
