//! Best-effort fan-out of change events.
//!
//! Each attached listener owns a bounded queue. `broadcast` serializes the
//! event once and offers it to a snapshot of the current listeners without
//! waiting; a listener whose queue is closed or full is detached. There is
//! no replay: listeners only see events broadcast after they attach.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use uuid::Uuid;

pub type ListenerId = Uuid;

/// Wire shape of a notification: `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub event: String,
    pub data: serde_json::Value,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(event: &str, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self { event: event.to_string(), data: serde_json::to_value(data)? })
    }
}

/// Receiving half handed to a listener on attach.
pub struct Subscription {
    pub id: ListenerId,
    pub receiver: mpsc::Receiver<Arc<str>>,
}

pub struct ChangeNotifier {
    listeners: DashMap<ListenerId, mpsc::Sender<Arc<str>>>,
    buffer: usize,
}

impl Default for ChangeNotifier {
    fn default() -> Self { Self::new(64) }
}

impl ChangeNotifier {
    /// `buffer` is the per-listener queue depth (at least 1).
    pub fn new(buffer: usize) -> Self {
        Self { listeners: DashMap::new(), buffer: buffer.max(1) }
    }

    pub fn attach(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.listeners.insert(id, tx);
        debug!(listener = %id, listeners = self.listeners.len(), "listener attached");
        Subscription { id, receiver: rx }
    }

    /// Remove a listener. Returns whether it was attached; detaching twice is a no-op.
    pub fn detach(&self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            debug!(listener = %id, listeners = self.listeners.len(), "listener detached");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Offer `event` to every listener attached right now.
    /// Returns how many listeners accepted it.
    pub fn broadcast(&self, event: &ChangeEvent) -> usize {
        let payload: Arc<str> = match serde_json::to_string(event) {
            Ok(s) => s.into(),
            Err(e) => {
                warn!(event = %event.event, error = %e, "cannot serialize event; dropped");
                return 0;
            }
        };

        // Snapshot first so detaching below never touches a shard we are iterating.
        let targets: Vec<(ListenerId, mpsc::Sender<Arc<str>>)> =
            self.listeners.iter().map(|e| (*e.key(), e.value().clone())).collect();

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.try_send(Arc::clone(&payload)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Closed(_)) => {
                    debug!(listener = %id, "listener gone");
                    self.detach(id);
                }
                Err(TrySendError::Full(_)) => {
                    warn!(listener = %id, "listener queue full; detaching");
                    self.detach(id);
                }
            }
        }
        debug!(event = %event.event, delivered, "broadcast done");
        delivered
    }
}
