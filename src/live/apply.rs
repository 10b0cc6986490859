//! Remote operation applier
//!
//! Identical on host and joiner: lock the document, apply the silent
//! mutator, recount, clamp the viewport, mark the screen dirty. Remote ops
//! are never pushed to the undo log, and they never move `current_line`
//! beyond the range clamp.

use crate::document::Document;
use crate::live::LiveShared;
use crate::live::protocol::RemoteOp;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use tracing::trace;

pub fn apply_remote(op: RemoteOp, doc: &Mutex<Document>, shared: &LiveShared) {
    trace!(target: "live.apply", ?op, "apply remote op");

    match op {
        RemoteOp::Hello { id } => {
            // Only a joiner ever receives this; it fixes our own peer id
            shared.self_id.store(id, Ordering::SeqCst);
        }
        other => {
            let mut doc = doc
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            match other {
                RemoteOp::SyncFull(bytes) => doc.buffer.apply_snapshot(&bytes),
                RemoteOp::EditLine { line, content } => {
                    doc.buffer.replace_line(line, &content);
                }
                RemoteOp::InsertAfter { line, content }
                | RemoteOp::PasteAfter { line, content } => {
                    doc.buffer.insert_after(line, &content);
                }
                RemoteOp::DeleteLine { line } => doc.buffer.delete_line(line),
                RemoteOp::Cursor { id, line, col } => doc.set_peer_cursor(id, line, col),
                RemoteOp::Hello { .. } => unreachable!("handled above"),
            }
            doc.recount();
            doc.clamp_cursor();
        }
    }

    shared.dirty.store(true, Ordering::SeqCst);
}
