//! Line buffer and the silent edit primitives
//!
//! The buffer stores the file as an ordered sequence of newline-free line
//! byte strings plus a flag recording whether the final line is terminated.
//! The four silent mutators are the single ground truth for what an edit
//! means: the local command layer wraps them with undo pushes and network
//! broadcasts, and the remote applier calls them directly.

/// ## buffer/ Invariants
///
/// - Lines never contain 0x0A; the newline structure lives in the sequence.
/// - Payloads are truncated so the serialized form stays within
///   `BUFFER_CAPACITY` (plus at most one structural newline).
/// - `insert_after` grows the line count by exactly one.
/// - `delete_line` shrinks the line count by exactly one and is never
///   applied to a one-line buffer (callers enforce this).
/// - `replace_line` leaves the line count unchanged.
use crate::constants::limits::BUFFER_CAPACITY;

/// In-memory file contents as a sequence of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    /// Lines without their newline terminators, in file order
    lines: Vec<Vec<u8>>,
    /// Whether the final line is followed by a newline in the serialized form
    trailing_newline: bool,
}

impl LineBuffer {
    /// Create an empty buffer (zero lines)
    #[must_use]
    pub fn new() -> Self {
        LineBuffer {
            lines: Vec::new(),
            trailing_newline: false,
        }
    }

    /// Build a buffer from raw file bytes, truncated to capacity
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = &bytes[..bytes.len().min(BUFFER_CAPACITY)];
        if bytes.is_empty() {
            return Self::new();
        }

        let trailing_newline = bytes.last() == Some(&b'\n');
        let mut lines: Vec<Vec<u8>> = bytes.split(|&b| b == b'\n').map(<[u8]>::to_vec).collect();
        if trailing_newline {
            // split() yields a final empty slice after the last newline
            lines.pop();
        }

        LineBuffer {
            lines,
            trailing_newline,
        }
    }

    /// Serialize the buffer back into file bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        for (i, line) in self.lines.iter().enumerate() {
            out.extend_from_slice(line);
            if i + 1 < self.lines.len() || self.trailing_newline {
                out.push(b'\n');
            }
        }
        out
    }

    /// Length of the serialized form in bytes
    #[must_use]
    pub fn byte_len(&self) -> usize {
        let content: usize = self.lines.iter().map(Vec::len).sum();
        let mut newlines = self.lines.len().saturating_sub(1);
        if self.trailing_newline && !self.lines.is_empty() {
            newlines += 1;
        }
        content + newlines
    }

    /// Logical line count: zero only for an empty buffer
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the buffer holds no bytes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bytes of a 1-indexed line, excluding its newline
    #[must_use]
    pub fn line(&self, line_no: usize) -> Option<&[u8]> {
        if line_no == 0 {
            return None;
        }
        self.lines.get(line_no - 1).map(Vec::as_slice)
    }

    /// Insert a new line containing `payload` immediately after 1-indexed
    /// `after_line`; 0 prepends at the start, values past the end append.
    /// Appending to an unterminated final line terminates it first.
    pub fn insert_after(&mut self, after_line: usize, payload: &[u8]) {
        let idx = after_line.min(self.lines.len());

        // One newline accompanies the inserted line
        let available = BUFFER_CAPACITY.saturating_sub(self.byte_len() + 1);
        let payload = &payload[..payload.len().min(available)];

        if idx == self.lines.len() {
            self.trailing_newline = true;
        }
        self.lines.insert(idx, payload.to_vec());
    }

    /// Remove a 1-indexed line together with its newline
    /// No-op on out-of-range lines and on one-line buffers (caller-enforced)
    pub fn delete_line(&mut self, line_no: usize) {
        if line_no == 0 || line_no > self.lines.len() || self.lines.len() == 1 {
            return;
        }
        self.lines.remove(line_no - 1);
    }

    /// Replace the bytes of a 1-indexed line, preserving its newline
    pub fn replace_line(&mut self, line_no: usize, new_content: &[u8]) {
        if line_no == 0 || line_no > self.lines.len() {
            return;
        }
        let old_len = self.lines[line_no - 1].len();
        let available = BUFFER_CAPACITY.saturating_sub(self.byte_len() - old_len);
        let new_content = &new_content[..new_content.len().min(available)];
        self.lines[line_no - 1] = new_content.to_vec();
    }

    /// Overwrite the whole buffer with a snapshot, truncating to capacity
    pub fn apply_snapshot(&mut self, bytes: &[u8]) {
        *self = Self::from_bytes(bytes);
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
