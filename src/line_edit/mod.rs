//! Modal single-line edit state machine
//!
//! Entered on Enter for the current line. Owns a transient byte buffer and
//! a byte-offset cursor; commits through the command layer on Enter and
//! discards on Escape.

use crate::constants::limits::LINE_CAPACITY;
use crate::key::Key;

/// What a key did to the edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Nothing observable happened
    Ignored,
    /// The buffer or cursor changed; the new cursor should be broadcast
    CursorMoved,
    /// Enter: commit these bytes as the new line content
    Commit(Vec<u8>),
    /// Escape: drop all changes
    Cancel,
}

/// An in-progress edit of a single line
#[derive(Debug, Clone)]
pub struct LineEdit {
    /// 1-indexed line being edited
    line: usize,
    /// Working copy of the line's bytes
    bytes: Vec<u8>,
    /// Byte-offset cursor within `bytes`
    cursor: usize,
}

impl LineEdit {
    /// Begin editing `line` with its current content; cursor starts at the end
    #[must_use]
    pub fn begin(line: usize, content: &[u8]) -> Self {
        let bytes = content[..content.len().min(LINE_CAPACITY)].to_vec();
        let cursor = bytes.len();
        LineEdit {
            line,
            bytes,
            cursor,
        }
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Apply one key to the edit session
    pub fn apply_key(&mut self, key: Key) -> EditOutcome {
        match key {
            Key::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                EditOutcome::CursorMoved
            }
            Key::Right => {
                if self.cursor < self.bytes.len() {
                    self.cursor += 1;
                }
                EditOutcome::CursorMoved
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    self.bytes.remove(self.cursor - 1);
                    self.cursor -= 1;
                    EditOutcome::CursorMoved
                } else {
                    EditOutcome::Ignored
                }
            }
            Key::Enter => EditOutcome::Commit(self.bytes.clone()),
            Key::Escape => EditOutcome::Cancel,
            other => {
                if let Some(b) = other.printable() {
                    if self.bytes.len() < LINE_CAPACITY {
                        self.bytes.insert(self.cursor, b);
                        self.cursor += 1;
                        return EditOutcome::CursorMoved;
                    }
                }
                EditOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
