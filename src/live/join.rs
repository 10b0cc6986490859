//! Joiner side of a Live Share session
//!
//! A single reader thread applies everything the host sends. When the
//! connection drops the reader stops and the editor continues in its
//! current local state; there is no automatic reconnect.

use crate::document::Document;
use crate::error::DuetError;
use crate::live::apply::apply_remote;
use crate::live::protocol::RemoteOp;
use crate::live::LiveShared;
use std::io::BufReader;
use std::net::TcpStream;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

pub(super) fn spawn_reader(
    stream: TcpStream,
    doc: Arc<Mutex<Document>>,
    shared: Arc<LiveShared>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut reader = BufReader::new(stream);
        while shared.running.load(Ordering::SeqCst) {
            match RemoteOp::read_from(&mut reader) {
                Ok(op) => apply_remote(op, &doc, &shared),
                Err(e) if matches!(e, DuetError::Io(_)) => {
                    info!(target: "live.join", error = %e, "host stream closed");
                    break;
                }
                Err(e) => {
                    warn!(target: "live.join", error = %e, "leaving session on bad frame");
                    break;
                }
            }
        }
        shared.dirty.store(true, Ordering::SeqCst);
    })
}
