//! Core identifier types for crossline.
//!
//! This module provides strongly-typed identifiers for sessions, realtime
//! connections, contacts, and contact-center agents. Session IDs are
//! client-generated UUIDs; the remaining IDs are opaque strings assigned by
//! the transport layer or the contact-center service.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A session identifier based on UUID v4.
///
/// Session IDs are generated once per browser session, flow into every
/// contact's attribute set, and key the connection registry's secondary
/// index. They are stable across reconnects and channel transitions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Create a new `SessionId` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `SessionId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for SessionId {
    type Err = IdError;

    /// Parse a `SessionId` from a UUID string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0.to_string()
    }
}

impl AsRef<[u8]> for SessionId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Declares an opaque, non-empty string identifier newtype.
macro_rules! opaque_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the string is empty or whitespace.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(value))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id! {
    /// Identifier for one live realtime transport connection.
    ///
    /// Connection IDs are assigned by the realtime gateway when a socket is
    /// accepted and are unique per socket.
    ConnectionId
}

opaque_id! {
    /// Identifier for one interaction contact (chat or voice).
    ///
    /// Contact IDs are assigned by the external contact-center service and
    /// are opaque beyond equality.
    ContactId
}

opaque_id! {
    /// Identifier for a human agent assigned by the contact-center service.
    AgentId
}

impl ConnectionId {
    /// Generate a fresh connection identifier for a newly accepted socket.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input string is empty or whitespace-only.
    #[error("identifier is empty")]
    Empty,

    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_roundtrip() {
        let id = SessionId::generate();
        let str_repr = id.to_string();
        let parsed = SessionId::from_str(&str_repr).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_invalid_uuid() {
        let result = SessionId::from_str("not-a-uuid");
        assert!(matches!(result, Err(IdError::InvalidUuid)));
    }

    #[test]
    fn session_id_serde_json() {
        let id = SessionId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_ids_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn connection_id_generate_nonempty() {
        let id = ConnectionId::generate();
        assert!(!id.as_str().is_empty());
        assert_ne!(id, ConnectionId::generate());
    }

    #[test]
    fn contact_id_rejects_empty() {
        assert!(matches!(ContactId::new(""), Err(IdError::Empty)));
        assert!(matches!(ContactId::new("   "), Err(IdError::Empty)));
    }

    #[test]
    fn contact_id_roundtrip() {
        let id = ContactId::new("c-12345").unwrap();
        assert_eq!(id.as_str(), "c-12345");
        assert_eq!(id.to_string(), "c-12345");

        let parsed: ContactId = "c-12345".parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn contact_id_serde_json() {
        let id = ContactId::new("c-abc").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"c-abc\"");
        let parsed: ContactId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn contact_id_serde_rejects_empty() {
        let result: Result<ContactId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn agent_id_roundtrip() {
        let id: AgentId = "agent-a1".parse().unwrap();
        assert_eq!(id.as_str(), "agent-a1");
    }
}
