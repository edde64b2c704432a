//! Key encoding utilities for `RocksDB`.
//!
//! Session IDs are fixed 16-byte UUIDs, so the session index key
//! `session_id || connection_id` supports prefix scans without a separator.

use crossline_core::{ConnectionId, SessionId};

use crate::error::{RegistryError, Result};

/// Encode a connection key (the UTF-8 bytes of the connection ID).
#[must_use]
pub fn connection_key(connection_id: &ConnectionId) -> Vec<u8> {
    connection_id.as_str().as_bytes().to_vec()
}

/// Encode a session-connection index key: `session_id || connection_id`.
#[must_use]
pub fn session_connection_key(session_id: &SessionId, connection_id: &ConnectionId) -> Vec<u8> {
    let id_bytes = connection_id.as_str().as_bytes();
    let mut key = Vec::with_capacity(16 + id_bytes.len());
    key.extend_from_slice(session_id.as_bytes());
    key.extend_from_slice(id_bytes);
    key
}

/// Encode a session prefix for scanning all connections by session.
#[must_use]
pub fn session_prefix(session_id: &SessionId) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}

/// Extract the connection ID from a session-connection key.
///
/// # Errors
///
/// Returns `RegistryError::Serialization` if the key is shorter than 17
/// bytes, the suffix is not valid UTF-8, or the suffix is empty; all
/// indicate a key this module never wrote (a damaged column family).
pub fn extract_connection_id_from_session_key(key: &[u8]) -> Result<ConnectionId> {
    let suffix = key.get(16..).filter(|s| !s.is_empty()).ok_or_else(|| {
        RegistryError::Serialization("session index key is too short".to_string())
    })?;

    let raw = std::str::from_utf8(suffix).map_err(|e| {
        RegistryError::Serialization(format!("session index key suffix is not UTF-8: {e}"))
    })?;

    ConnectionId::new(raw).map_err(|_| {
        RegistryError::Serialization("session index key has a blank connection id".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_connection_key_roundtrip() {
        let session_id = SessionId::generate();
        let connection_id = ConnectionId::generate();

        let key = session_connection_key(&session_id, &connection_id);
        assert_eq!(key.len(), 16 + connection_id.as_str().len());

        let extracted = extract_connection_id_from_session_key(&key).unwrap();
        assert_eq!(extracted, connection_id);
    }

    #[test]
    fn malformed_session_keys_are_rejected() {
        // Too short: prefix only, no connection id suffix
        let prefix = session_prefix(&SessionId::generate());
        assert!(matches!(
            extract_connection_id_from_session_key(&prefix),
            Err(RegistryError::Serialization(_))
        ));

        // Suffix is not UTF-8
        let mut bad = prefix.clone();
        bad.extend_from_slice(&[0xff, 0xfe]);
        assert!(matches!(
            extract_connection_id_from_session_key(&bad),
            Err(RegistryError::Serialization(_))
        ));

        // Suffix is whitespace only
        let mut blank = prefix;
        blank.extend_from_slice(b"   ");
        assert!(matches!(
            extract_connection_id_from_session_key(&blank),
            Err(RegistryError::Serialization(_))
        ));
    }

    #[test]
    fn prefix_scan_simulation() {
        let session_id = SessionId::generate();
        let conn1 = ConnectionId::generate();
        let conn2 = ConnectionId::generate();

        let key1 = session_connection_key(&session_id, &conn1);
        let key2 = session_connection_key(&session_id, &conn2);
        let prefix = session_prefix(&session_id);

        assert!(key1.starts_with(&prefix));
        assert!(key2.starts_with(&prefix));

        let other_prefix = session_prefix(&SessionId::generate());
        assert!(!key1.starts_with(&other_prefix));
    }
}
