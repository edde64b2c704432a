//! In-process connection hub and the registry-backed push transport.
//!
//! The hub maps live connection IDs to the sender half of each socket's
//! outbound channel. It is purely in-memory; the durable session mapping
//! lives in the registry, and the two are reconciled lazily: a registry
//! record whose hub entry is gone is reaped the first time a push targets
//! it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use crossline_core::ConnectionId;
use crossline_events::{Push, PushError, PushMessage};
use crossline_registry::Registry;
use parking_lot::RwLock;
use tokio::sync::mpsc;

/// Sender half of a connection's outbound message channel.
pub type PushSender = mpsc::UnboundedSender<PushMessage>;

/// Tracks the outbound channel of every connection on this process.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    senders: RwLock<HashMap<ConnectionId, PushSender>>,
}

impl ConnectionHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's outbound sender.
    pub fn insert(&self, connection_id: ConnectionId, sender: PushSender) {
        self.senders.write().insert(connection_id, sender);
    }

    /// Drop a connection's outbound sender. Idempotent.
    pub fn remove(&self, connection_id: &ConnectionId) {
        self.senders.write().remove(connection_id);
    }

    /// Get a connection's outbound sender, if it is still live.
    #[must_use]
    pub fn sender(&self, connection_id: &ConnectionId) -> Option<PushSender> {
        self.senders.read().get(connection_id).cloned()
    }

    /// Number of live connections on this process.
    #[must_use]
    pub fn len(&self) -> usize {
        self.senders.read().len()
    }

    /// Whether the hub has no live connections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.senders.read().is_empty()
    }
}

/// Push transport backed by the hub, reaping registry records of
/// connections that have vanished.
pub struct RegistryPush<R: Registry> {
    hub: Arc<ConnectionHub>,
    registry: Arc<R>,
}

impl<R: Registry> RegistryPush<R> {
    /// Create a new push transport.
    #[must_use]
    pub fn new(hub: Arc<ConnectionHub>, registry: Arc<R>) -> Self {
        Self { hub, registry }
    }

    fn reap(&self, connection_id: &ConnectionId) {
        self.hub.remove(connection_id);
        if let Err(e) = self.registry.remove_connection(connection_id) {
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to reap stale connection record"
            );
        }
    }
}

#[async_trait]
impl<R: Registry> Push for RegistryPush<R> {
    async fn push(
        &self,
        connection_id: &ConnectionId,
        message: &PushMessage,
    ) -> Result<(), PushError> {
        let Some(sender) = self.hub.sender(connection_id) else {
            self.reap(connection_id);
            return Err(PushError::Gone);
        };

        if sender.send(message.clone()).is_err() {
            // Receiver dropped between lookup and send
            self.reap(connection_id);
            return Err(PushError::Gone);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use crossline_registry::RocksRegistry;
    use tempfile::TempDir;

    fn setup() -> (Arc<ConnectionHub>, Arc<RocksRegistry>, TempDir) {
        let dir = TempDir::new().unwrap();
        let registry = Arc::new(RocksRegistry::open(dir.path()).unwrap());
        (Arc::new(ConnectionHub::new()), registry, dir)
    }

    #[tokio::test]
    async fn push_delivers_to_live_connection() {
        let (hub, registry, _dir) = setup();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.insert(connection_id.clone(), tx);

        let push = RegistryPush::new(Arc::clone(&hub), registry);
        push.push(&connection_id, &PushMessage::Pong).await.unwrap();

        assert_eq!(rx.recv().await, Some(PushMessage::Pong));
    }

    #[tokio::test]
    async fn push_to_unknown_connection_reaps_record() {
        let (hub, registry, _dir) = setup();
        let connection_id = ConnectionId::generate();
        registry
            .put_connection(&connection_id, Utc::now() + Duration::hours(2))
            .unwrap();

        let push = RegistryPush::new(hub, Arc::clone(&registry));
        let result = push.push(&connection_id, &PushMessage::Pong).await;

        assert!(matches!(result, Err(PushError::Gone)));
        assert!(registry.get_connection(&connection_id).unwrap().is_none());
    }

    #[tokio::test]
    async fn push_to_dropped_receiver_reaps_record() {
        let (hub, registry, _dir) = setup();
        let connection_id = ConnectionId::generate();
        registry
            .put_connection(&connection_id, Utc::now() + Duration::hours(2))
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        hub.insert(connection_id.clone(), tx);
        drop(rx);

        let push = RegistryPush::new(Arc::clone(&hub), Arc::clone(&registry));
        let result = push.push(&connection_id, &PushMessage::Pong).await;

        assert!(matches!(result, Err(PushError::Gone)));
        assert!(hub.sender(&connection_id).is_none());
        assert!(registry.get_connection(&connection_id).unwrap().is_none());
    }
}
