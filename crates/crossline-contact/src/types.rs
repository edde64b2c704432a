//! Contact-center domain types.
//!
//! Contacts are opaque beyond their identifier and attributes; everything
//! here mirrors what the contact-center service exposes over its API.

use crossline_core::{AgentId, ContactId, SessionId};
use serde::{Deserialize, Serialize};

/// Interaction channel of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Text chat contact.
    Chat,
    /// Voice call contact.
    Voice,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Chat => write!(f, "chat"),
            Self::Voice => write!(f, "voice"),
        }
    }
}

/// Coarse contact state as reported by the contact-center service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// Queued or connected; the interaction is still in progress.
    Active,
    /// The interaction has ended.
    Ended,
}

/// Attributes tagged onto a contact at creation time.
///
/// `session_id` is set on every contact created through crossline;
/// `related_contact_id` is set only on escalation-created contacts and
/// back-references the originating contact (one hop, never chained).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactAttributes {
    /// Client session identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Back-reference to the originating contact of an escalation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_contact_id: Option<ContactId>,
}

impl ContactAttributes {
    /// Attributes for a first-generation contact.
    #[must_use]
    pub const fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            related_contact_id: None,
        }
    }

    /// Attributes for an escalation-created contact.
    #[must_use]
    pub const fn for_escalation(session_id: SessionId, related_contact_id: ContactId) -> Self {
        Self {
            session_id: Some(session_id),
            related_contact_id: Some(related_contact_id),
        }
    }
}

/// Agent assignment as reported by describe-contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Identifier of the assigned agent.
    pub id: AgentId,
}

/// Snapshot of a contact returned by describe-contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSnapshot {
    /// Contact identifier.
    pub contact_id: ContactId,
    /// Interaction channel.
    pub channel: Channel,
    /// Coarse contact state.
    pub status: ContactStatus,
    /// Assigned agent, once routing has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentInfo>,
    /// Attributes set at creation time.
    #[serde(default)]
    pub attributes: ContactAttributes,
}

/// A freshly created chat contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContact {
    /// Contact identifier.
    pub contact_id: ContactId,
    /// Customer-side participant identifier.
    pub participant_id: String,
    /// Customer-side participant token for the messaging session.
    pub participant_token: String,
}

/// A freshly created voice contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceContact {
    /// Contact identifier.
    pub contact_id: ContactId,
    /// Customer-side participant identifier.
    pub participant_id: String,
    /// Customer-side participant token for the media session.
    pub participant_token: String,
    /// Opaque media connection data passed through to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_data: Option<serde_json::Value>,
}
