//! Global constants for the duet editor

pub mod limits {
    /// Number of buffer lines shown at once
    pub const VISIBLE_LINES: usize = 15;

    /// Capacity of the serialized line buffer in bytes
    pub const BUFFER_CAPACITY: usize = 65536;

    /// Maximum bytes in a single line (excluding the newline)
    pub const LINE_CAPACITY: usize = 510;

    /// Maximum bytes in a search term
    pub const SEARCH_TERM_MAX: usize = 128;

    /// Maximum entries on the undo stack; the oldest entry is evicted first
    pub const UNDO_CAPACITY: usize = 100;

    /// Maximum participants in a Live Share session, host included
    pub const MAX_PEERS: usize = 20;

    /// Peer id reserved for the session host
    pub const HOST_PEER_ID: usize = 1;
}

pub mod ui {
    /// Suffix appended to inline error prompts
    pub const PRESS_ANY_KEY: &str = "-- press any key --";

    // Inline messages
    pub const MSG_LAST_LINE: &str = "cannot delete the only line";
    pub const MSG_CLIPBOARD_EMPTY: &str = "clipboard is empty";

    /// Footer keymap reminder outside of search mode
    pub const KEYMAP_NORMAL: &str =
        "enter:edit  n:insert  d:delete  c:copy  p:paste  u:undo  f:find  q:quit";

    /// Footer keymap reminder while a line edit is active
    pub const KEYMAP_EDIT: &str = "enter:commit  esc:cancel";
}

pub mod net {
    /// Longest accepted frame header line, including the trailing newline
    pub const MAX_HEADER_LEN: usize = 64;

    /// Poll interval for the accept loop while checking the running flag
    pub const ACCEPT_POLL_MS: u64 = 100;
}
