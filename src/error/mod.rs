//! Error types for duet
//!
//! One variant per way the editor can actually fail. Startup errors carry
//! the offending path so `main` can print something actionable before the
//! terminal enters raw mode; edit rejections carry the inline message the
//! prompt line shows; wire errors describe the frame so the log is useful
//! after a peer is dropped.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DuetError {
    /// The file could not be read at startup
    #[error("cannot read {path}: {source}")]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Zero-byte files are refused at load time
    #[error("{path}: file is empty")]
    EmptyFile { path: PathBuf },

    /// An autosave or the final write failed
    #[error("cannot write {path}: {source}")]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The buffer cannot honor this edit; shown on the prompt line
    #[error("{0}")]
    EditRejected(&'static str),

    /// Undo was requested with nothing on the log
    #[error("nothing to undo")]
    NothingToUndo,

    /// The terminal backend failed mid-session
    #[error("terminal: {0}")]
    Terminal(String),

    /// Live Share could not be brought up (bind or connect)
    #[error("{0}")]
    LiveSetup(String),

    /// A peer sent a frame that does not parse
    #[error("bad frame: {0}")]
    BadFrame(String),

    /// A frame announced more payload than a buffer can hold
    #[error("payload of {0} bytes exceeds capacity")]
    OversizePayload(usize),

    /// Every peer id is taken
    #[error("session already has {0} peers")]
    SessionFull(usize),

    /// Stream or file descriptor error outside load/save
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A broken invariant, such as a poisoned lock
    #[error("internal: {0}")]
    Internal(&'static str),
}

/// Result alias for duet operations
pub type Result<T> = std::result::Result<T, DuetError>;
