//! `RocksDB` connection registry for crossline.
//!
//! This crate persists the mapping between live realtime connections and the
//! client session identifiers they registered, using `RocksDB` with column
//! families for the secondary index.
//!
//! # Architecture
//!
//! The registry uses the following column families:
//!
//! - `connections`: primary connection records, keyed by `connection_id`
//! - `connections_by_session`: index for resolving a session to its live
//!   connection, keyed by `session_id || connection_id`
//!
//! # Example
//!
//! ```no_run
//! use crossline_registry::{Registry, RocksRegistry};
//! use crossline_core::{ConnectionId, SessionId};
//! use chrono::{Duration, Utc};
//!
//! let registry = RocksRegistry::open("/tmp/crossline-db").unwrap();
//!
//! let connection_id = ConnectionId::generate();
//! registry
//!     .put_connection(&connection_id, Utc::now() + Duration::hours(2))
//!     .unwrap();
//!
//! let session_id = SessionId::generate();
//! registry.attach_session(&connection_id, &session_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{RegistryError, Result};
pub use rocks::RocksRegistry;
pub use types::ConnectionRecord;

use chrono::{DateTime, Utc};
use crossline_core::{ConnectionId, SessionId};

/// The registry trait defining all connection-record operations.
///
/// This trait abstracts the durable store so the gateway and event router
/// can be tested against alternative implementations.
pub trait Registry: Send + Sync {
    /// Create a bare connection record at transport-connect time.
    ///
    /// Overwrites any prior record sharing the connection ID (should not
    /// occur in practice since the transport assigns unique IDs per socket),
    /// clearing a stale session-index entry if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_connection(&self, connection_id: &ConnectionId, expires_at: DateTime<Utc>)
        -> Result<()>;

    /// Attach a session identifier to an existing connection record.
    ///
    /// Sets `session_id` and `registered_at`, and maintains the session
    /// index. Re-registration with a different session moves the index entry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the record was already deleted;
    /// callers must treat this as a benign race with a stale connection.
    fn attach_session(&self, connection_id: &ConnectionId, session_id: &SessionId) -> Result<()>;

    /// Get a connection record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_connection(&self, connection_id: &ConnectionId) -> Result<Option<ConnectionRecord>>;

    /// Resolve a session identifier to its live connection record.
    ///
    /// Expired records are skipped. When several non-expired records share
    /// the session (possible after a rapid reconnect before the old record
    /// expires), the one with the most recent `registered_at` wins, with the
    /// connection ID as the final deterministic tie-break.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_session(&self, session_id: &SessionId) -> Result<Option<ConnectionRecord>>;

    /// Delete a connection record.
    ///
    /// Idempotent: removing an absent record succeeds. Used on transport
    /// disconnect and when a push reports the peer gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn remove_connection(&self, connection_id: &ConnectionId) -> Result<()>;

    /// Remove all records whose expiry has passed, returning the count.
    ///
    /// This is the TTL reaping hook for connections abandoned without a
    /// clean disconnect; it is not scheduled by the registry itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
