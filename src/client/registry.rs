//! Client registry
//!
//! The shared live set of connected clients and the broadcast fan-out.
//! Keyed by socket address, so membership is by connection identity, never
//! by nickname (nicknames are neither unique nor validated).

use log::debug;
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// The registry-side view of one connected client: the sending end of that
/// connection's outbound line queue. Sends never block; a send to a client
/// whose writer task has ended simply fails and is skipped.
#[derive(Clone)]
pub struct ClientHandle {
    sender: UnboundedSender<String>,
}

impl ClientHandle {
    pub fn new(sender: UnboundedSender<String>) -> Self {
        Self { sender }
    }

    /// Queues one line for delivery. Returns whether the client's writer
    /// was still accepting lines.
    pub fn send(&self, line: &str) -> bool {
        self.sender.send(line.to_string()).is_ok()
    }
}

/// Registry for tracking active clients
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<HashMap<SocketAddr, ClientHandle>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client to the live set. From this point on it is a broadcast
    /// target, its own announcements included.
    pub async fn register(&self, addr: SocketAddr, handle: ClientHandle) {
        self.clients.lock().await.insert(addr, handle);
    }

    /// Removes a client from the live set. Removing an absent client is a
    /// no-op, so teardown can run more than once.
    pub async fn unregister(&self, addr: SocketAddr) {
        self.clients.lock().await.remove(&addr);
    }

    /// Delivers `line` to every currently registered client. The target
    /// list is snapshotted under the lock and the lock released before any
    /// send, so a client unregistering mid-broadcast is either delivered to
    /// or skipped, never hit twice, and the fan-out never holds the lock
    /// against register/unregister.
    pub async fn broadcast(&self, line: &str) {
        let targets: Vec<ClientHandle> = {
            let clients = self.clients.lock().await;
            clients.values().cloned().collect()
        };
        debug!("Broadcasting to {} client(s): {}", targets.len(), line);
        for handle in targets {
            // A dead peer must never prevent delivery to live peers.
            if !handle.send(line) {
                debug!("Skipped a client already torn down");
            }
        }
    }

    /// Drops every handle. Used as the final sweep during shutdown; each
    /// connection's writer task drains its queue and exits once its last
    /// sender is gone.
    pub async fn clear(&self) {
        self.clients.lock().await.clear();
    }

    /// Number of currently registered clients.
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }
}
