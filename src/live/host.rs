//! Host side of a Live Share session
//!
//! One accept thread and one reader thread per joiner. A freshly accepted
//! joiner receives HELLO with its id, a SYNC_FULL snapshot, and one CURSOR
//! per known peer (the host's own included). Each reader applies incoming
//! ops locally and relays non-cursor ops to every other joiner.

use crate::constants::limits::MAX_PEERS;
use crate::constants::net::ACCEPT_POLL_MS;
use crate::document::Document;
use crate::error::{DuetError, Result};
use crate::live::apply::apply_remote;
use crate::live::protocol::RemoteOp;
use crate::live::{Client, ClientTable, LiveShared};
use std::io::{BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bind the listen socket for a hosting session
pub(super) fn bind(port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .map_err(|e| DuetError::LiveSetup(format!("bind port {port}: {e}")))?;
    // Polled accept so the loop can observe the running flag
    listener.set_nonblocking(true).map_err(DuetError::from)?;
    Ok(listener)
}

/// Start the accept loop on a bound listener
pub(super) fn spawn_accept_loop(
    listener: TcpListener,
    doc: Arc<Mutex<Document>>,
    shared: Arc<LiveShared>,
    clients: Arc<Mutex<ClientTable>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        accept_loop(&listener, &doc, &shared, &clients);
        debug!(target: "live.host", "accept loop stopped");
    })
}

fn accept_loop(
    listener: &TcpListener,
    doc: &Arc<Mutex<Document>>,
    shared: &Arc<LiveShared>,
    clients: &Arc<Mutex<ClientTable>>,
) {
    while shared.running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                if let Err(e) = admit_joiner(stream, doc, shared, clients) {
                    warn!(target: "live.host", %addr, error = %e, "joiner rejected");
                } else {
                    info!(target: "live.host", %addr, "joiner connected");
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(ACCEPT_POLL_MS));
            }
            Err(e) => {
                warn!(target: "live.host", error = %e, "accept failed");
                break;
            }
        }
    }
}

/// Register a joiner, run the handshake, and start its reader thread
fn admit_joiner(
    stream: TcpStream,
    doc: &Arc<Mutex<Document>>,
    shared: &Arc<LiveShared>,
    clients: &Arc<Mutex<ClientTable>>,
) -> Result<()> {
    stream.set_nonblocking(false).map_err(DuetError::from)?;
    let mut write_half = stream.try_clone().map_err(DuetError::from)?;

    let id = {
        let table = clients.lock().map_err(|_| table_poisoned())?;
        table
            .next_free_id()
            .ok_or(DuetError::SessionFull(MAX_PEERS))?
    };

    // Handshake: identity, snapshot, then everyone's cursor
    let (snapshot, cursors) = {
        let doc = doc.lock().map_err(|_| table_poisoned())?;
        let cursors: Vec<RemoteOp> = (1..=MAX_PEERS)
            .filter(|&peer| doc.peer_cursors[peer] != (0, 0))
            .map(|peer| {
                let (line, col) = doc.peer_cursors[peer];
                RemoteOp::Cursor {
                    id: peer,
                    line,
                    col,
                }
            })
            .collect();
        (doc.buffer.to_bytes(), cursors)
    };

    write_half
        .write_all(&RemoteOp::Hello { id }.encode())
        .map_err(DuetError::from)?;
    write_half
        .write_all(&RemoteOp::SyncFull(snapshot).encode())
        .map_err(DuetError::from)?;
    for cursor in cursors {
        write_half
            .write_all(&cursor.encode())
            .map_err(DuetError::from)?;
    }

    // Register before spawning the reader so its self-removal always finds
    // the slot; the handle is attached afterwards
    clients
        .lock()
        .map_err(|_| table_poisoned())?
        .insert(Client {
            id,
            stream: write_half,
            thread: None,
        });

    let reader_thread = {
        let doc = Arc::clone(doc);
        let shared = Arc::clone(shared);
        let clients = Arc::clone(clients);
        thread::spawn(move || client_reader(stream, id, &doc, &shared, &clients))
    };

    if let Ok(mut table) = clients.lock() {
        if let Some(client) = table.iter_mut().find(|c| c.id == id) {
            client.thread = Some(reader_thread);
        }
    }
    Ok(())
}

/// Per-joiner reader: apply everything locally, relay non-cursor ops
fn client_reader(
    stream: TcpStream,
    id: usize,
    doc: &Arc<Mutex<Document>>,
    shared: &Arc<LiveShared>,
    clients: &Arc<Mutex<ClientTable>>,
) {
    let mut reader = BufReader::new(stream);
    while shared.running.load(Ordering::SeqCst) {
        match RemoteOp::read_from(&mut reader) {
            Ok(op) => {
                let relayed = if op.is_cursor() { None } else { Some(op.encode()) };
                apply_remote(op, doc, shared);
                if let Some(frame) = relayed {
                    relay_to_others(clients, id, &frame);
                }
            }
            Err(e) => {
                if matches!(e, DuetError::Io(_)) {
                    debug!(target: "live.host", id, error = %e, "joiner stream closed");
                } else {
                    warn!(target: "live.host", id, error = %e, "dropping joiner on bad frame");
                }
                break;
            }
        }
    }

    // Release the slot and forget the departed peer's cursor
    if let Ok(mut table) = clients.lock() {
        table.remove(id);
    }
    if let Ok(mut doc) = doc.lock() {
        doc.clear_peer_cursor(id);
    }
    shared.dirty.store(true, Ordering::SeqCst);
    info!(target: "live.host", id, "joiner disconnected");
}

/// Forward a frame to every joiner except the origin, in slot order
fn relay_to_others(clients: &Arc<Mutex<ClientTable>>, origin: usize, frame: &[u8]) {
    let Ok(mut table) = clients.lock() else {
        return;
    };
    for client in table.iter_mut() {
        if client.id == origin {
            continue;
        }
        if let Err(e) = client.stream.write_all(frame) {
            warn!(target: "live.host", id = client.id, error = %e, "relay failed");
        }
    }
}

fn table_poisoned() -> DuetError {
    DuetError::Internal("lock poisoned")
}
