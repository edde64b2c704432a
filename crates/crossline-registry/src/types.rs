//! Domain types stored in the registry.

use chrono::{DateTime, Utc};
use crossline_core::{ConnectionId, SessionId};
use serde::{Deserialize, Serialize};

/// One live realtime transport connection.
///
/// Created bare on transport connect, mutated once when the client sends its
/// register message, and deleted on disconnect, on a push reporting the peer
/// gone, or on expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Transport-assigned connection identifier (primary key).
    pub connection_id: ConnectionId,
    /// Client session identifier; absent until registration completes.
    pub session_id: Option<SessionId>,
    /// When the transport accepted the connection.
    pub connected_at: DateTime<Utc>,
    /// When the client registered its session; absent for bare records.
    pub registered_at: Option<DateTime<Utc>>,
    /// Absolute expiry after which the record is eligible for removal.
    pub expires_at: DateTime<Utc>,
}

impl ConnectionRecord {
    /// Whether this record has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
