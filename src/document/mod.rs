//! Per-file editor state
//! Encapsulates buffer + viewport + search + undo + peer cursors for one file

/// ## document/ Invariants
///
/// - `1 <= row_offset <= current_line <= max(1, total_lines)`.
/// - `current_line < row_offset + VISIBLE_LINES`.
/// - `total_lines` equals the buffer's line count after every mutation.
/// - Local mutations push exactly one inverse entry unless `suppress_undo`
///   is set; replayed inverses are applied with `suppress_undo` held.
use crate::buffer::LineBuffer;
use crate::constants::limits::{BUFFER_CAPACITY, LINE_CAPACITY, MAX_PEERS, VISIBLE_LINES};
use crate::constants::ui;
use crate::error::{DuetError, Result};
use crate::search::SearchState;
use crate::undo::{UndoEntry, UndoKind, UndoLog};
use std::io::Read;
use std::path::{Path, PathBuf};

/// A remote peer's last known cursor position; (0, 0) means unknown
pub type PeerCursor = (usize, usize);

/// Editor state for one open file
#[derive(Debug)]
pub struct Document {
    /// File path this document reads from and writes to
    path: PathBuf,
    /// Line contents
    pub buffer: LineBuffer,
    /// 1-indexed line under the local cursor
    pub current_line: usize,
    /// 1-indexed line at the top of the viewport
    pub row_offset: usize,
    /// Cached line count, kept equal to `buffer.line_count()`
    pub total_lines: usize,
    /// Search mode state
    pub search: SearchState,
    /// Inverse-operation log
    pub undo: UndoLog,
    /// Set while replaying an undo so the inverse is not itself logged
    pub suppress_undo: bool,
    /// Cursor positions by peer id (index 0 unused)
    pub peer_cursors: [PeerCursor; MAX_PEERS + 1],
}

impl Document {
    /// Load a document from disk
    /// Rejects empty files; reads at most the buffer capacity
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_err = |source| DuetError::Load {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(load_err)?;

        let mut bytes = Vec::new();
        file.take(BUFFER_CAPACITY as u64)
            .read_to_end(&mut bytes)
            .map_err(load_err)?;

        if bytes.is_empty() {
            return Err(DuetError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        let buffer = LineBuffer::from_bytes(&bytes);
        let total_lines = buffer.line_count();
        Ok(Document {
            path: path.to_path_buf(),
            buffer,
            current_line: 1,
            row_offset: 1,
            total_lines,
            search: SearchState::default(),
            undo: UndoLog::new(),
            suppress_undo: false,
            peer_cursors: [(0, 0); MAX_PEERS + 1],
        })
    }

    /// Build a document around in-memory bytes (tests and snapshots)
    #[must_use]
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let buffer = LineBuffer::from_bytes(bytes);
        let total_lines = buffer.line_count();
        Document {
            path: path.into(),
            buffer,
            current_line: 1,
            row_offset: 1,
            total_lines,
            search: SearchState::default(),
            undo: UndoLog::new(),
            suppress_undo: false,
            peer_cursors: [(0, 0); MAX_PEERS + 1],
        }
    }

    /// Overwrite the file with the current buffer
    /// Writes a temp file in the same directory, then renames over the target
    pub fn save(&self) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp_path = parent.join(format!(
            ".{}.tmp",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("file")
        ));

        let write = || -> std::io::Result<()> {
            use std::io::Write;
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(&self.buffer.to_bytes())?;
            file.sync_all()?;
            std::fs::rename(&temp_path, &self.path)?;
            Ok(())
        };

        write().map_err(|source| DuetError::Save {
            path: self.path.clone(),
            source,
        })
    }

    /// File name for the header line
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("[No Name]")
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes of the current line, excluding the newline
    #[must_use]
    pub fn current_line_bytes(&self) -> Vec<u8> {
        self.buffer
            .line(self.current_line)
            .map(<[u8]>::to_vec)
            .unwrap_or_default()
    }

    /// Refresh the cached line count from the buffer
    pub fn recount(&mut self) {
        self.total_lines = self.buffer.line_count();
    }

    /// Pull `current_line` back into `[1, total_lines]` and rescroll
    pub fn clamp_cursor(&mut self) {
        let max = self.total_lines.max(1);
        self.current_line = self.current_line.clamp(1, max);
        self.scroll_to_cursor();
    }

    /// Re-establish the viewport invariants around `current_line`
    pub fn scroll_to_cursor(&mut self) {
        if self.row_offset == 0 {
            self.row_offset = 1;
        }
        if self.current_line < self.row_offset {
            self.row_offset = self.current_line;
        }
        if self.current_line >= self.row_offset + VISIBLE_LINES {
            self.row_offset = self.current_line - VISIBLE_LINES + 1;
        }
    }

    /// Move the cursor one line up
    pub fn move_up(&mut self) {
        if self.current_line > 1 {
            self.current_line -= 1;
            self.scroll_to_cursor();
        }
    }

    /// Move the cursor one line down
    pub fn move_down(&mut self) {
        if self.current_line < self.total_lines {
            self.current_line += 1;
            self.scroll_to_cursor();
        }
    }

    // ------------------------------------------------------------------
    // Local mutations: silent mutator + inverse entry
    // ------------------------------------------------------------------

    /// Replace a line's content, logging the old content for undo
    pub fn edit_line(&mut self, line: usize, new_content: &[u8]) {
        let new_content = &new_content[..new_content.len().min(LINE_CAPACITY)];
        let old = self
            .buffer
            .line(line)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        self.buffer.replace_line(line, new_content);
        if !self.suppress_undo {
            self.undo.push(UndoEntry::set_line(line, old));
        }
        self.recount();
    }

    /// Insert a line after `line`, logging its deletion for undo
    pub fn insert_after(&mut self, line: usize, payload: &[u8]) {
        let payload = &payload[..payload.len().min(LINE_CAPACITY)];
        self.buffer.insert_after(line, payload);
        if !self.suppress_undo {
            self.undo.push(UndoEntry::delete_line(line + 1));
        }
        self.recount();
    }

    /// Delete a line, logging its re-insertion for undo
    /// Fails when the buffer holds a single line
    pub fn delete_line(&mut self, line: usize) -> Result<()> {
        if self.total_lines <= 1 {
            return Err(DuetError::EditRejected(ui::MSG_LAST_LINE));
        }
        let old = self
            .buffer
            .line(line)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        self.buffer.delete_line(line);
        if !self.suppress_undo {
            self.undo
                .push(UndoEntry::insert_after_with_content(line - 1, old));
        }
        self.recount();
        self.clamp_cursor();
        Ok(())
    }

    /// Paste clipboard content after `line`, logging its deletion for undo
    pub fn paste_after(&mut self, line: usize, content: &[u8]) {
        self.insert_after(line, content);
    }

    /// Replay the most recent inverse entry
    /// Returns the replayed entry so the caller can broadcast it
    pub fn undo_last(&mut self) -> Result<UndoEntry> {
        let entry = self.undo.pop().ok_or(DuetError::NothingToUndo)?;

        self.suppress_undo = true;
        match entry.kind {
            UndoKind::SetLine => self.buffer.replace_line(entry.line, &entry.content),
            UndoKind::DeleteLine => self.buffer.delete_line(entry.line),
            UndoKind::InsertAfterWithContent => {
                self.buffer.insert_after(entry.line, &entry.content);
            }
        }
        self.suppress_undo = false;

        self.recount();
        self.clamp_cursor();
        Ok(entry)
    }

    /// Record a peer's cursor; out-of-range ids are dropped
    pub fn set_peer_cursor(&mut self, id: usize, line: usize, col: usize) {
        if (1..=MAX_PEERS).contains(&id) {
            self.peer_cursors[id] = (line, col);
        }
    }

    /// Forget a departed peer's cursor
    pub fn clear_peer_cursor(&mut self, id: usize) {
        if (1..=MAX_PEERS).contains(&id) {
            self.peer_cursors[id] = (0, 0);
        }
    }
}
