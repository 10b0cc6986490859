//! Editor core
//! Top-level controller that ties keys, documents, rendering, and Live
//! Share together

/// ## editor/ Invariants
///
/// - Every structural mutation happens under the document mutex, pushes
///   exactly one undo entry, persists the file, and is broadcast after the
///   mutex is released.
/// - Only slot 0 is replicated; slot switches never touch the network.
/// - The clipboard and the undo log are touched only by this thread.
/// - Inline errors never leave the UI out of sync: they are gated behind a
///   keypress and followed by a repaint.
use crate::command::{translate_key, Command};
use crate::constants::limits::SEARCH_TERM_MAX;
use crate::constants::ui::{MSG_CLIPBOARD_EMPTY, PRESS_ANY_KEY};
use crate::document::Document;
use crate::error::{DuetError, Result};
use crate::key::Key;
use crate::line_edit::{EditOutcome, LineEdit};
use crate::live::protocol::RemoteOp;
use crate::live::{LiveConfig, LiveHandle};
use crate::render::{render, RenderContext};
use crate::search::{count_matches, search_forward};
use crate::term::{ColorTerminal, TerminalBackend};
use crate::undo::{UndoEntry, UndoKind};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Poll interval: how quickly remote edits repaint between keystrokes
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Replicated slot: only the first file takes part in Live Share
const LIVE_SLOT: usize = 0;

/// Main editor struct
pub struct Editor<T: TerminalBackend + ColorTerminal> {
    term: T,
    /// One or two open files
    docs: Vec<Arc<Mutex<Document>>>,
    /// Index of the slot receiving keys
    active: usize,
    /// Session-internal clipboard, shared between the slots
    clipboard: Vec<u8>,
    clipboard_has_content: bool,
    live: Option<LiveHandle>,
    message: Option<String>,
    should_quit: bool,
}

impl<T: TerminalBackend + ColorTerminal> Editor<T> {
    /// Create an editor over already-loaded documents
    /// A failed Live Share start degrades to local-only editing
    pub fn new(term: T, docs: Vec<Arc<Mutex<Document>>>, live_config: LiveConfig) -> Self {
        let mut message = None;
        let live = match live_config {
            LiveConfig::Off => None,
            LiveConfig::Host(port) => match LiveHandle::host(port, Arc::clone(&docs[LIVE_SLOT])) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(target: "editor", error = %e, "live share host failed");
                    message = Some(format!("live share unavailable: {e}"));
                    None
                }
            },
            LiveConfig::Join(addr) => {
                match LiveHandle::join(&addr, Arc::clone(&docs[LIVE_SLOT])) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        warn!(target: "editor", error = %e, "live share join failed");
                        message = Some(format!("live share unavailable: {e}"));
                        None
                    }
                }
            }
        };

        Editor {
            term,
            docs,
            active: 0,
            clipboard: Vec::new(),
            clipboard_has_content: false,
            live,
            message,
            should_quit: false,
        }
    }

    /// Run until quit; restores the terminal on every exit path
    pub fn run(&mut self) -> Result<()> {
        self.term.init().map_err(term_err)?;
        let result = self.main_loop();
        self.finish();
        result
    }

    fn main_loop(&mut self) -> Result<()> {
        self.paint(None)?;
        while !self.should_quit {
            if self.term.poll(INPUT_POLL).map_err(term_err)? {
                if let Some(key) = self.term.read_key().map_err(term_err)? {
                    self.handle_key(key)?;
                    self.paint(None)?;
                }
            } else if self.take_dirty() {
                self.paint(None)?;
            }
        }
        Ok(())
    }

    /// Final file write, session teardown, terminal restore
    fn finish(&mut self) {
        for doc in &self.docs {
            if let Ok(doc) = doc.lock() {
                if let Err(e) = doc.save() {
                    warn!(target: "editor", error = %e, "final save failed");
                }
            }
        }
        if let Some(mut live) = self.live.take() {
            live.shutdown();
        }
        self.term.deinit();
    }

    fn handle_key(&mut self, key: Key) -> Result<()> {
        self.message = None;
        let in_search = self.with_active(|doc| doc.search.active);

        match translate_key(key, in_search) {
            Command::MoveUp => {
                let line = self.with_active(|doc| {
                    doc.move_up();
                    doc.current_line
                });
                self.broadcast_cursor(line, 0);
            }
            Command::MoveDown => {
                let line = self.with_active(|doc| {
                    doc.move_down();
                    doc.current_line
                });
                self.broadcast_cursor(line, 0);
            }
            Command::EditLine => self.edit_current_line()?,
            Command::InsertAfter => self.insert_after_current(),
            Command::DeleteLine => self.delete_current_line()?,
            Command::CopyLine => {
                self.clipboard = self.with_active(|doc| doc.current_line_bytes());
                self.clipboard_has_content = true;
            }
            Command::PasteLine => self.paste_after_current(),
            Command::Undo => self.undo_last()?,
            Command::EnterSearch => self.enter_search()?,
            Command::NextMatch => self.next_match(),
            Command::LeaveSearch => {
                self.with_active(|doc| doc.search.clear());
            }
            Command::SwitchEditor => {
                self.active = (self.active + 1) % self.docs.len();
            }
            Command::Quit => self.should_quit = true,
            Command::Redraw | Command::Noop => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structural commands
    // ------------------------------------------------------------------

    fn insert_after_current(&mut self) {
        let (line, cursor_line) = self.with_active(|doc| {
            let line = doc.current_line;
            doc.insert_after(line, b"");
            doc.current_line = line + 1;
            doc.scroll_to_cursor();
            (line, doc.current_line)
        });
        self.save_active();
        self.broadcast(RemoteOp::InsertAfter {
            line,
            content: Vec::new(),
        });
        self.broadcast_cursor(cursor_line, 0);
    }

    fn delete_current_line(&mut self) -> Result<()> {
        let outcome = self.with_active(|doc| {
            let line = doc.current_line;
            doc.delete_line(line).map(|()| (line, doc.current_line))
        });
        match outcome {
            Ok((line, cursor_line)) => {
                self.save_active();
                self.broadcast(RemoteOp::DeleteLine { line });
                self.broadcast_cursor(cursor_line, 0);
                Ok(())
            }
            Err(e) => self.prompt_error(&e.to_string()),
        }
    }

    fn paste_after_current(&mut self) {
        if !self.clipboard_has_content {
            self.message = Some(MSG_CLIPBOARD_EMPTY.to_string());
            return;
        }
        let content = self.clipboard.clone();
        let (line, cursor_line) = self.with_active(|doc| {
            let line = doc.current_line;
            doc.paste_after(line, &content);
            doc.current_line = line + 1;
            doc.scroll_to_cursor();
            (line, doc.current_line)
        });
        self.save_active();
        self.broadcast(RemoteOp::PasteAfter { line, content });
        self.broadcast_cursor(cursor_line, 0);
    }

    fn undo_last(&mut self) -> Result<()> {
        let outcome = self.with_active(|doc| {
            doc.undo_last().map(|entry| (entry, doc.current_line))
        });
        match outcome {
            Ok((entry, cursor_line)) => {
                self.save_active();
                self.broadcast(replay_op(&entry));
                self.broadcast_cursor(cursor_line, 0);
                Ok(())
            }
            Err(e) => self.prompt_error(&e.to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Line editing
    // ------------------------------------------------------------------

    fn edit_current_line(&mut self) -> Result<()> {
        let (line, content) = self.with_active(|doc| (doc.current_line, doc.current_line_bytes()));
        let mut edit = LineEdit::begin(line, &content);
        self.broadcast_cursor(line, edit.cursor());

        loop {
            self.paint(Some(&edit))?;
            if !self.term.poll(INPUT_POLL).map_err(term_err)? {
                let _ = self.take_dirty();
                continue;
            }
            let Some(key) = self.term.read_key().map_err(term_err)? else {
                continue;
            };

            match edit.apply_key(key) {
                EditOutcome::Ignored => {}
                EditOutcome::CursorMoved => {
                    self.broadcast_cursor(line, edit.cursor());
                }
                EditOutcome::Commit(bytes) => {
                    let cursor_line = self.with_active(|doc| {
                        doc.edit_line(line, &bytes);
                        doc.scroll_to_cursor();
                        doc.current_line
                    });
                    self.save_active();
                    self.broadcast(RemoteOp::EditLine {
                        line,
                        content: bytes,
                    });
                    self.broadcast_cursor(cursor_line, 0);
                    break;
                }
                EditOutcome::Cancel => break,
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    fn enter_search(&mut self) -> Result<()> {
        let mut term_bytes: Vec<u8> = Vec::new();
        let committed = loop {
            self.message = Some(format!(
                "search: {}",
                String::from_utf8_lossy(&term_bytes)
            ));
            self.paint(None)?;
            match self.wait_key()? {
                Key::Enter => break true,
                Key::Escape => break false,
                Key::Backspace => {
                    term_bytes.pop();
                }
                key => {
                    if let Some(b) = key.printable() {
                        if term_bytes.len() < SEARCH_TERM_MAX {
                            term_bytes.push(b);
                        }
                    }
                }
            }
        };
        self.message = None;
        if !committed || term_bytes.is_empty() {
            return Ok(());
        }

        let cursor_line = self.with_active(|doc| {
            doc.search.set_term(&term_bytes);
            doc.search.active = true;
            doc.search.total_matches = count_matches(&doc.buffer, &doc.search.term);
            let start = doc.current_line;
            if let Some((line, offset)) =
                search_forward(&doc.buffer, &doc.search.term, start, 0)
            {
                doc.search.result_line = line;
                doc.search.result_offset = offset;
                doc.search.current_match = 1;
                doc.current_line = line;
                doc.scroll_to_cursor();
            }
            doc.current_line
        });
        self.broadcast_cursor(cursor_line, 0);
        Ok(())
    }

    fn next_match(&mut self) {
        let cursor_line = self.with_active(|doc| {
            if !doc.search.active || doc.search.term.is_empty() || doc.search.total_matches == 0 {
                return doc.current_line;
            }
            let from_line = doc.search.result_line;
            let from_offset = doc.search.result_offset + doc.search.term.len();
            if let Some((line, offset)) =
                search_forward(&doc.buffer, &doc.search.term, from_line, from_offset)
            {
                doc.search.result_line = line;
                doc.search.result_offset = offset;
                doc.search.advance_match();
                doc.current_line = line;
                doc.scroll_to_cursor();
            }
            doc.current_line
        });
        self.broadcast_cursor(cursor_line, 0);
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Run a closure under the active document's mutex
    fn with_active<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut doc = self.docs[self.active]
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut doc)
    }

    /// Persist the active document, demoting failures to a message
    fn save_active(&mut self) {
        let result = self.with_active(|doc| doc.save());
        if let Err(e) = result {
            warn!(target: "editor", error = %e, "autosave failed");
            self.message = Some(format!("save failed: {e}"));
        }
    }

    /// Send an op for the active slot; only slot 0 is replicated
    fn broadcast(&self, op: RemoteOp) {
        if self.active != LIVE_SLOT {
            return;
        }
        if let Some(live) = &self.live {
            debug!(target: "editor", ?op, "broadcast");
            live.broadcast(&op);
        }
    }

    /// Record and send our own cursor position
    fn broadcast_cursor(&self, line: usize, col: usize) {
        if self.active != LIVE_SLOT {
            return;
        }
        let Some(live) = &self.live else {
            return;
        };
        let id = live.self_id();
        if id == 0 {
            // A joiner that has not seen HELLO yet
            return;
        }
        self.with_active(|doc| doc.set_peer_cursor(id, line, col));
        live.broadcast(&RemoteOp::Cursor { id, line, col });
    }

    fn take_dirty(&self) -> bool {
        self.live.as_ref().is_some_and(LiveHandle::take_dirty)
    }

    /// Inline error gated behind a keypress, then repaint
    fn prompt_error(&mut self, message: &str) -> Result<()> {
        self.message = Some(format!("{message}  {PRESS_ANY_KEY}"));
        self.paint(None)?;
        let _ = self.wait_key()?;
        self.message = None;
        Ok(())
    }

    /// Block for the next key, repainting when remote edits arrive
    fn wait_key(&mut self) -> Result<Key> {
        loop {
            if self.term.poll(INPUT_POLL).map_err(term_err)? {
                if let Some(key) = self.term.read_key().map_err(term_err)? {
                    return Ok(key);
                }
            } else if self.take_dirty() {
                self.paint(None)?;
            }
        }
    }

    fn paint(&mut self, edit: Option<&LineEdit>) -> Result<()> {
        let live = self.live.as_ref().map(|l| (l.role(), l.self_id()));
        let doc = self.docs[self.active]
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let ctx = RenderContext {
            live,
            slot: self.active,
            slots: self.docs.len(),
            message: self.message.as_deref(),
            edit,
        };
        render(&mut self.term, &doc, &ctx).map_err(term_err)
    }
}

/// The wire op that matches a replayed undo entry
fn replay_op(entry: &UndoEntry) -> RemoteOp {
    match entry.kind {
        UndoKind::SetLine => RemoteOp::EditLine {
            line: entry.line,
            content: entry.content.clone(),
        },
        UndoKind::DeleteLine => RemoteOp::DeleteLine { line: entry.line },
        UndoKind::InsertAfterWithContent => RemoteOp::InsertAfter {
            line: entry.line,
            content: entry.content.clone(),
        },
    }
}

fn term_err(message: String) -> DuetError {
    DuetError::Terminal(message)
}
