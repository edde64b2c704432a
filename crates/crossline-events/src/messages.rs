//! Outbound push messages and the delivery trait.

use async_trait::async_trait;
use crossline_core::{ConnectionId, ContactId, SessionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A server-to-client push message, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushMessage {
    /// A companion chat contact was created for an agent-connected voice
    /// contact.
    #[serde(rename_all = "camelCase")]
    ChatContactCreated {
        /// The freshly created chat contact.
        chat_contact_id: ContactId,
        /// Customer-side participant identifier.
        participant_id: String,
        /// Customer-side participant token.
        participant_token: String,
        /// The originating voice contact.
        voice_contact_id: ContactId,
        /// Session the contacts belong to.
        session_id: SessionId,
    },

    /// An agent connected to a chat contact.
    #[serde(rename_all = "camelCase")]
    ChatAgentConnected {
        /// The chat contact the agent connected to.
        chat_contact_id: ContactId,
        /// Session the contact belongs to.
        session_id: SessionId,
    },

    /// The client may now offer chat-to-voice escalation.
    #[serde(rename_all = "camelCase")]
    EnableEscalation {
        /// The first-generation chat contact that may escalate.
        chat_contact_id: ContactId,
    },

    /// Reply to a client liveness probe.
    #[serde(rename = "pong")]
    Pong,

    /// Synchronous rejection of a malformed or unknown client message.
    #[serde(rename = "error", rename_all = "camelCase")]
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl PushMessage {
    /// Build a client-error reply.
    #[must_use]
    pub fn client_error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur delivering a push message.
#[derive(Debug, Error)]
pub enum PushError {
    /// The target connection no longer exists; implementors reap the
    /// corresponding registry record before reporting this.
    #[error("connection gone")]
    Gone,

    /// Any other transport failure; propagated, never retried here.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivery of push messages to a specific realtime connection.
#[async_trait]
pub trait Push: Send + Sync {
    /// Deliver a message to the given connection.
    ///
    /// # Errors
    ///
    /// Returns `PushError::Gone` when the peer has vanished, or
    /// `PushError::Transport` for any other delivery failure.
    async fn push(
        &self,
        connection_id: &ConnectionId,
        message: &PushMessage,
    ) -> Result<(), PushError>;
}
