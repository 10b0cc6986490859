//! Live Share wire format
//!
//! One frame per operation: an ASCII header `OP <type> <line> <payload_len>\n`
//! followed by exactly `payload_len` opaque payload bytes. All header
//! integers are ASCII decimal. A malformed or oversize frame is a protocol
//! error; callers close the connection without applying it.

use crate::constants::limits::{BUFFER_CAPACITY, MAX_PEERS};
use crate::constants::net::MAX_HEADER_LEN;
use crate::error::{DuetError, Result};
use std::io::Read;

const OP_SYNC_FULL: u8 = 1;
const OP_EDIT_LINE: u8 = 2;
const OP_INSERT_AFTER: u8 = 3;
const OP_DELETE_LINE: u8 = 4;
const OP_PASTE_AFTER: u8 = 5;
const OP_CURSOR: u8 = 6;
const OP_HELLO: u8 = 7;

/// One replicated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    /// Full buffer snapshot; replaces the receiver's buffer
    SyncFull(Vec<u8>),
    /// New content for one line
    EditLine { line: usize, content: Vec<u8> },
    /// Insert a line (possibly empty) after `line`
    InsertAfter { line: usize, content: Vec<u8> },
    /// Delete one line
    DeleteLine { line: usize },
    /// Paste content after `line`
    PasteAfter { line: usize, content: Vec<u8> },
    /// A peer's cursor moved
    Cursor { id: usize, line: usize, col: usize },
    /// Host-assigned peer id, sent once on accept
    Hello { id: usize },
}

impl RemoteOp {
    /// Whether this op is cursor telemetry rather than a buffer mutation
    #[must_use]
    pub fn is_cursor(&self) -> bool {
        matches!(self, RemoteOp::Cursor { .. })
    }

    fn type_code(&self) -> u8 {
        match self {
            RemoteOp::SyncFull(_) => OP_SYNC_FULL,
            RemoteOp::EditLine { .. } => OP_EDIT_LINE,
            RemoteOp::InsertAfter { .. } => OP_INSERT_AFTER,
            RemoteOp::DeleteLine { .. } => OP_DELETE_LINE,
            RemoteOp::PasteAfter { .. } => OP_PASTE_AFTER,
            RemoteOp::Cursor { .. } => OP_CURSOR,
            RemoteOp::Hello { .. } => OP_HELLO,
        }
    }

    /// Serialize into a single frame
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let (line, payload): (usize, Vec<u8>) = match self {
            RemoteOp::SyncFull(bytes) => (0, bytes.clone()),
            RemoteOp::EditLine { line, content }
            | RemoteOp::InsertAfter { line, content }
            | RemoteOp::PasteAfter { line, content } => (*line, content.clone()),
            RemoteOp::DeleteLine { line } => (*line, Vec::new()),
            RemoteOp::Cursor { id, line, col } => {
                (0, format!("{id} {line} {col}").into_bytes())
            }
            RemoteOp::Hello { id } => (0, id.to_string().into_bytes()),
        };

        let mut frame =
            format!("OP {} {} {}\n", self.type_code(), line, payload.len()).into_bytes();
        frame.extend_from_slice(&payload);
        frame
    }

    /// Read and decode one frame from a stream
    /// Blocks until a full frame arrives; any malformed input is an error
    pub fn read_from(reader: &mut impl Read) -> Result<RemoteOp> {
        let header = read_header_line(reader)?;
        let mut fields = header.split_ascii_whitespace();

        if fields.next() != Some("OP") {
            return Err(bad_frame("missing OP tag"));
        }
        let type_code: u8 = parse_field(fields.next())?;
        let line: usize = parse_field(fields.next())?;
        let payload_len: usize = parse_field(fields.next())?;
        if fields.next().is_some() {
            return Err(bad_frame("trailing header fields"));
        }

        if payload_len > BUFFER_CAPACITY {
            return Err(DuetError::OversizePayload(payload_len));
        }

        let mut payload = vec![0u8; payload_len];
        reader.read_exact(&mut payload)?;

        match type_code {
            OP_SYNC_FULL => Ok(RemoteOp::SyncFull(payload)),
            OP_EDIT_LINE => Ok(RemoteOp::EditLine {
                line,
                content: payload,
            }),
            OP_INSERT_AFTER => Ok(RemoteOp::InsertAfter {
                line,
                content: payload,
            }),
            OP_DELETE_LINE => Ok(RemoteOp::DeleteLine { line }),
            OP_PASTE_AFTER => Ok(RemoteOp::PasteAfter {
                line,
                content: payload,
            }),
            OP_CURSOR => decode_cursor(&payload),
            OP_HELLO => decode_hello(&payload),
            other => Err(bad_frame(format!("unknown op type {other}"))),
        }
    }
}

/// Read bytes up to and including a newline, bounded by `MAX_HEADER_LEN`
fn read_header_line(reader: &mut impl Read) -> Result<String> {
    let mut header = Vec::with_capacity(MAX_HEADER_LEN);
    let mut byte = [0u8; 1];
    loop {
        reader.read_exact(&mut byte)?;
        if byte[0] == b'\n' {
            break;
        }
        header.push(byte[0]);
        if header.len() >= MAX_HEADER_LEN {
            return Err(bad_frame("header too long"));
        }
    }
    String::from_utf8(header).map_err(|_| bad_frame("header is not ASCII"))
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>) -> Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| bad_frame("short or non-numeric header"))
}

fn decode_cursor(payload: &[u8]) -> Result<RemoteOp> {
    let text =
        std::str::from_utf8(payload).map_err(|_| bad_frame("cursor payload is not ASCII"))?;
    let mut fields = text.split_ascii_whitespace();
    let id: usize = parse_field(fields.next())?;
    let line: usize = parse_field(fields.next())?;
    let col: usize = parse_field(fields.next())?;
    if !(1..=MAX_PEERS).contains(&id) {
        return Err(bad_frame(format!("cursor peer id {id} out of range")));
    }
    Ok(RemoteOp::Cursor { id, line, col })
}

fn decode_hello(payload: &[u8]) -> Result<RemoteOp> {
    let text =
        std::str::from_utf8(payload).map_err(|_| bad_frame("hello payload is not ASCII"))?;
    let id: usize = parse_field(Some(text.trim()))?;
    if !(1..=MAX_PEERS).contains(&id) {
        return Err(bad_frame(format!("hello peer id {id} out of range")));
    }
    Ok(RemoteOp::Hello { id })
}

fn bad_frame(message: impl Into<String>) -> DuetError {
    DuetError::BadFrame(message.into())
}
