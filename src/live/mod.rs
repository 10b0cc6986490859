//! Live Share session over TCP
//!
//! Star topology: joiners connect to the host; the host relays every
//! non-cursor operation from a joiner to all other joiners, never echoing
//! to the origin. Each side applies incoming ops through the same applier
//! the local command layer's silent mutators feed.

/// ## live/ Invariants
///
/// - A document mutex is never held across a blocking send.
/// - The client table has its own mutex, never acquired under a document
///   mutex.
/// - Per-source FIFO: ops from one peer reach every destination in order.
/// - Remote ops are never logged for undo.
/// - Shutdown clears `running`, shuts sockets down to unblock readers, and
///   joins the accept thread before the per-client readers.
use crate::constants::limits::{HOST_PEER_ID, MAX_PEERS};
use crate::document::Document;
use crate::error::{DuetError, Result};
use crate::live::protocol::RemoteOp;
use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{info, warn};

pub mod apply;
pub mod host;
pub mod join;
pub mod protocol;

/// Which end of the session this process is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveRole {
    Host,
    Joiner,
}

/// How Live Share was requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveConfig {
    /// Local-only editing
    Off,
    /// Listen for joiners on this port
    Host(u16),
    /// Connect to a host at "host:port"
    Join(String),
}

/// State shared between the UI thread and the network threads
pub struct LiveShared {
    /// Our peer id: host is 1, a joiner learns its id from HELLO
    pub self_id: AtomicUsize,
    /// Cleared on shutdown; readers and the accept loop poll it
    pub running: AtomicBool,
    /// Set by appliers when the viewport should repaint
    pub dirty: AtomicBool,
}

impl LiveShared {
    fn new(self_id: usize) -> Self {
        LiveShared {
            self_id: AtomicUsize::new(self_id),
            running: AtomicBool::new(true),
            dirty: AtomicBool::new(false),
        }
    }
}

/// One connected joiner as the host sees it
pub struct Client {
    pub id: usize,
    pub stream: TcpStream,
    /// Reader thread handle; taken on shutdown, dropped on self-removal
    pub thread: Option<JoinHandle<()>>,
}

/// Host-side table of connected joiners
#[derive(Default)]
pub struct ClientTable {
    clients: Vec<Client>,
}

impl ClientTable {
    /// Lowest free peer id in [2, MAX_PEERS], if the session has room
    #[must_use]
    pub fn next_free_id(&self) -> Option<usize> {
        (HOST_PEER_ID + 1..=MAX_PEERS).find(|id| self.clients.iter().all(|c| c.id != *id))
    }

    pub fn insert(&mut self, client: Client) {
        self.clients.push(client);
    }

    /// Release a slot, returning the entry so its thread handle can be dropped
    pub fn remove(&mut self, id: usize) -> Option<Client> {
        let idx = self.clients.iter().position(|c| c.id == id)?;
        Some(self.clients.remove(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Client> {
        self.clients.iter_mut()
    }
}

/// A running Live Share session
pub struct LiveHandle {
    role: LiveRole,
    shared: Arc<LiveShared>,
    clients: Arc<Mutex<ClientTable>>,
    /// Joiner's write half toward the host
    host_stream: Option<TcpStream>,
    /// Bound listen address (host only)
    local_addr: Option<std::net::SocketAddr>,
    /// Accept thread (host) or reader thread (joiner)
    threads: Vec<JoinHandle<()>>,
}

impl LiveHandle {
    /// Start hosting on `port`, replicating `doc`
    pub fn host(port: u16, doc: Arc<Mutex<Document>>) -> Result<Self> {
        let shared = Arc::new(LiveShared::new(HOST_PEER_ID));
        let clients = Arc::new(Mutex::new(ClientTable::default()));

        if let Ok(mut doc) = doc.lock() {
            let line = doc.current_line;
            doc.set_peer_cursor(HOST_PEER_ID, line, 0);
        }

        let listener = host::bind(port)?;
        let local_addr = listener.local_addr().ok();
        let accept_thread =
            host::spawn_accept_loop(listener, doc, Arc::clone(&shared), Arc::clone(&clients));
        info!(target: "live", port, "hosting live share session");

        Ok(LiveHandle {
            role: LiveRole::Host,
            shared,
            clients,
            host_stream: None,
            local_addr,
            threads: vec![accept_thread],
        })
    }

    /// Join a session at `addr` ("host:port"), replicating `doc`
    pub fn join(addr: &str, doc: Arc<Mutex<Document>>) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| DuetError::LiveSetup(format!("connect {addr}: {e}")))?;
        let write_half = stream.try_clone().map_err(DuetError::from)?;

        // Unknown until the host's HELLO arrives
        let shared = Arc::new(LiveShared::new(0));
        let reader = join::spawn_reader(stream, doc, Arc::clone(&shared));
        info!(target: "live", addr, "joined live share session");

        Ok(LiveHandle {
            role: LiveRole::Joiner,
            shared,
            clients: Arc::new(Mutex::new(ClientTable::default())),
            host_stream: Some(write_half),
            local_addr: None,
            threads: vec![reader],
        })
    }

    /// Bound listen address; present on the hosting side
    #[must_use]
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.local_addr
    }

    #[must_use]
    pub fn role(&self) -> LiveRole {
        self.role
    }

    #[must_use]
    pub fn self_id(&self) -> usize {
        self.shared.self_id.load(Ordering::SeqCst)
    }

    /// Number of currently connected joiners (host side)
    #[must_use]
    pub fn peer_count(&self) -> usize {
        self.clients.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// Drain the repaint flag set by remote appliers
    #[must_use]
    pub fn take_dirty(&self) -> bool {
        self.shared.dirty.swap(false, Ordering::SeqCst)
    }

    /// Send an operation to every connected peer
    /// Host: fan out to all joiners. Joiner: send to the host only.
    /// Called without any document mutex held.
    pub fn broadcast(&self, op: &RemoteOp) {
        let frame = op.encode();
        match self.role {
            LiveRole::Host => {
                let Ok(mut table) = self.clients.lock() else {
                    return;
                };
                for client in table.iter_mut() {
                    if let Err(e) = client.stream.write_all(&frame) {
                        warn!(target: "live", id = client.id, error = %e, "broadcast failed");
                    }
                }
            }
            LiveRole::Joiner => {
                if let Some(stream) = &self.host_stream {
                    let mut writer: &TcpStream = stream;
                    if let Err(e) = writer.write_all(&frame) {
                        warn!(target: "live", error = %e, "send to host failed");
                    }
                }
            }
        }
    }

    /// Stop all network activity and join every thread
    pub fn shutdown(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);

        if let Some(stream) = &self.host_stream {
            let _ = stream.shutdown(Shutdown::Both);
        }

        let mut reader_threads = Vec::new();
        if let Ok(mut table) = self.clients.lock() {
            for client in table.iter_mut() {
                let _ = client.stream.shutdown(Shutdown::Both);
                if let Some(handle) = client.thread.take() {
                    reader_threads.push(handle);
                }
            }
        }

        // Accept thread (or joiner reader) first, then per-client readers
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        for handle in reader_threads {
            let _ = handle.join();
        }
        info!(target: "live", "live share session closed");
    }
}
