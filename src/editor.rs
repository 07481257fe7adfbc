//! Interactive line editor (§4.5).
//!
//! A single loop over bytes read from the terminal: echoes printable
//! bytes, handles backspace, drives history recall on the arrow keys, and
//! completion on Tab. Reads one line, hands it to the caller, and repeats.

use std::io::{Read, Write};

use crate::completion::{longest_common_prefix, CompletionIndex};
use crate::history::HistoryStore;

const BEL: u8 = 0x07;
const BACKSPACE: u8 = 0x7f;
const ESC: u8 = 0x1b;

/// What the editor produced for one line of input.
pub enum Line {
    /// A non-empty, trimmed command line ready to be parsed.
    Command(String),
    /// An empty line: skip without adding to history.
    Empty,
    /// End of input (Ctrl-D at an empty buffer, or a read returning 0 bytes).
    Eof,
}

/// Reads and edits a single line from `input`, echoing to `output`.
///
/// `input` and `output` are taken as trait objects so the editor can be
/// driven by a real raw-mode terminal in production and by an in-memory
/// byte source in tests.
pub struct Editor<'a> {
    input: &'a mut dyn Read,
    output: &'a mut dyn Write,
    completion: &'a CompletionIndex,
    history: &'a HistoryStore,
    buffer: Vec<u8>,
    tab_presses: u32,
}

impl<'a> Editor<'a> {
    pub fn new(
        input: &'a mut dyn Read,
        output: &'a mut dyn Write,
        completion: &'a CompletionIndex,
        history: &'a HistoryStore,
    ) -> Self {
        Self { input, output, completion, history, buffer: Vec::new(), tab_presses: 0 }
    }

    /// Print the prompt and read one line, returning its parsed disposition.
    pub fn read_line(&mut self) -> std::io::Result<Line> {
        self.buffer.clear();
        self.tab_presses = 0;
        self.output.write_all(b"$ ")?;
        self.output.flush()?;

        loop {
            let mut byte = [0u8; 1];
            let n = self.input.read(&mut byte)?;
            if n == 0 {
                return Ok(Line::Eof);
            }
            let byte = byte[0];

            match byte {
                b'\n' | b'\r' => {
                    self.output.write_all(b"\r\n")?;
                    self.output.flush()?;
                    let line = String::from_utf8_lossy(&self.buffer).trim().to_string();
                    if line.is_empty() {
                        return Ok(Line::Empty);
                    }
                    self.history.add(&line);
                    return Ok(Line::Command(line));
                }
                BACKSPACE => {
                    self.tab_presses = 0;
                    if self.buffer.pop().is_some() {
                        self.output.write_all(b"\x08 \x08")?;
                        self.output.flush()?;
                    }
                }
                b'\t' => {
                    self.handle_tab()?;
                }
                ESC => {
                    self.handle_escape()?;
                }
                0x20..=0x7e => {
                    self.tab_presses = 0;
                    self.buffer.push(byte);
                    self.output.write_all(&[byte])?;
                    self.output.flush()?;
                }
                _ if byte >= 0x80 => {
                    // UTF-8 continuation/leading byte: echo through verbatim.
                    self.tab_presses = 0;
                    self.buffer.push(byte);
                    self.output.write_all(&[byte])?;
                    self.output.flush()?;
                }
                _ => {
                    self.tab_presses = 0;
                    self.output.write_all(&[BEL])?;
                    self.output.flush()?;
                }
            }
        }
    }

    fn handle_escape(&mut self) -> std::io::Result<()> {
        let mut seq = [0u8; 2];
        if self.input.read(&mut seq[..1])? == 0 || seq[0] != b'[' {
            return Ok(());
        }
        if self.input.read(&mut seq[1..2])? == 0 {
            return Ok(());
        }
        self.tab_presses = 0;
        let (entry, present) = match seq[1] {
            b'A' => self.history.get_up(),
            b'B' => self.history.get_down(),
            _ => return Ok(()),
        };
        if !present {
            self.output.write_all(&[BEL])?;
            self.output.flush()?;
            return Ok(());
        }
        self.buffer = entry.clone().into_bytes();
        self.output.write_all(b"\x1b[2K\r$ ")?;
        self.output.write_all(entry.as_bytes())?;
        self.output.flush()
    }

    fn handle_tab(&mut self) -> std::io::Result<()> {
        let current = String::from_utf8_lossy(&self.buffer).into_owned();
        let word = current.rsplit(' ').next().unwrap_or("");
        if word.is_empty() {
            self.tab_presses = 0;
            return self.bell();
        }

        let candidates = self.completion.candidates_with_prefix(word);
        match candidates.len() {
            0 => {
                self.tab_presses = 0;
                self.bell()
            }
            1 => {
                self.tab_presses = 0;
                let suffix = &candidates[0][word.len()..];
                self.buffer.extend_from_slice(suffix.as_bytes());
                self.buffer.push(b' ');
                self.output.write_all(suffix.as_bytes())?;
                self.output.write_all(b" ")?;
                self.output.flush()
            }
            _ => {
                let lcp = longest_common_prefix(&candidates);
                if lcp.len() > word.len() {
                    self.tab_presses = 0;
                    let suffix = &lcp[word.len()..];
                    self.buffer.extend_from_slice(suffix.as_bytes());
                    self.output.write_all(suffix.as_bytes())?;
                    self.output.flush()
                } else {
                    self.tab_presses += 1;
                    if self.tab_presses < 2 {
                        self.bell()
                    } else {
                        self.tab_presses = 0;
                        self.output.write_all(b"\r\n")?;
                        self.output.write_all(candidates.join("  ").as_bytes())?;
                        self.output.write_all(b"\r\n$ ")?;
                        self.output.write_all(&self.buffer)?;
                        self.output.flush()
                    }
                }
            }
        }
    }

    fn bell(&mut self) -> std::io::Result<()> {
        self.output.write_all(&[BEL])?;
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(words: &[&str]) -> CompletionIndex {
        let mut index = CompletionIndex::new();
        for w in words {
            index.insert(w);
        }
        index
    }

    #[test]
    fn simple_command_is_echoed_and_returned() {
        let completion = index_with(&[]);
        let history = HistoryStore::new();
        let mut input: &[u8] = b"echo hi\n";
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        match editor.read_line().unwrap() {
            Line::Command(line) => assert_eq!(line, "echo hi"),
            _ => panic!("expected a command line"),
        }
        assert_eq!(String::from_utf8(output).unwrap(), "$ echo hi\r\n");
    }

    #[test]
    fn empty_line_is_not_added_to_history() {
        let completion = index_with(&[]);
        let history = HistoryStore::new();
        let mut input: &[u8] = b"\n";
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        assert!(matches!(editor.read_line().unwrap(), Line::Empty));
        let mut out = Vec::new();
        history.read_out(None, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn eof_on_empty_read() {
        let completion = index_with(&[]);
        let history = HistoryStore::new();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        assert!(matches!(editor.read_line().unwrap(), Line::Eof));
    }

    #[test]
    fn backspace_deletes_last_byte() {
        let completion = index_with(&[]);
        let history = HistoryStore::new();
        let mut input: &[u8] = &[b'h', b'i', BACKSPACE, b'\n'];
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        match editor.read_line().unwrap() {
            Line::Command(line) => assert_eq!(line, "h"),
            _ => panic!("expected a command line"),
        }
    }

    #[test]
    fn single_candidate_completes_with_trailing_space() {
        let completion = index_with(&["echo"]);
        let history = HistoryStore::new();
        let mut input: &[u8] = b"ech\t\n";
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        match editor.read_line().unwrap() {
            Line::Command(line) => assert_eq!(line, "echo"),
            _ => panic!("expected a command line"),
        }
    }

    #[test]
    fn empty_candidate_set_rings_bell() {
        let completion = index_with(&["echo"]);
        let history = HistoryStore::new();
        let mut input: &[u8] = b"zz\t\n";
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        let _ = editor.read_line().unwrap();
        assert!(output.contains(&BEL));
    }

    #[test]
    fn history_up_replaces_buffer() {
        let completion = index_with(&[]);
        let history = HistoryStore::new();
        history.add("first command");
        let mut input: &[u8] = &[ESC, b'[', b'A', b'\n'];
        let mut output = Vec::new();
        let mut editor = Editor::new(&mut input, &mut output, &completion, &history);
        match editor.read_line().unwrap() {
            Line::Command(line) => assert_eq!(line, "first command"),
            _ => panic!("expected a command line"),
        }
    }
}
