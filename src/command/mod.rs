//! Command dispatch and keybindings
//! Translates keys into editor commands

/// ## command/ Invariants
///
/// - `Command` represents editor-level intent, not key-level input.
/// - Commands contain no terminal- or platform-specific concepts.
/// - `n` and `Escape` change meaning with search mode; nothing else does.
use crate::key::Key;

/// Editor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Movement
    MoveUp,
    MoveDown,

    // Editing
    EditLine,
    InsertAfter,
    DeleteLine,
    CopyLine,
    PasteLine,
    Undo,

    // Search
    EnterSearch,
    NextMatch,
    LeaveSearch,

    // Control
    SwitchEditor,
    Redraw,
    Quit,
    Noop,
}

/// Translate a key into a command
/// `in_search` selects the search-mode meaning of `n` and `Escape`
#[must_use]
pub fn translate_key(key: Key, in_search: bool) -> Command {
    match key {
        Key::Up => Command::MoveUp,
        Key::Down => Command::MoveDown,
        Key::Enter => Command::EditLine,
        Key::CtrlLeft | Key::CtrlRight => Command::SwitchEditor,
        Key::Escape => {
            if in_search {
                Command::LeaveSearch
            } else {
                Command::Noop
            }
        }
        Key::Resize(..) => Command::Redraw,
        Key::Char(b'n') => {
            if in_search {
                Command::NextMatch
            } else {
                Command::InsertAfter
            }
        }
        Key::Char(b'f') => Command::EnterSearch,
        Key::Char(b'd') => Command::DeleteLine,
        Key::Char(b'c') => Command::CopyLine,
        Key::Char(b'p') => Command::PasteLine,
        Key::Char(b'u') => Command::Undo,
        Key::Char(b'q') => Command::Quit,
        _ => Command::Noop,
    }
}
