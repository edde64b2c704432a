//! Lifecycle event types.
//!
//! Contact-center events arrive as loose JSON with fields that vary by
//! channel; they are decoded once at this boundary into a strict type
//! before any branching happens.

use crossline_contact::{Channel, ContactAttributes};
use crossline_core::ContactId;
use serde::{Deserialize, Serialize};

/// Lifecycle event kind.
///
/// Only agent-connected events are acted on; everything else is decoded to
/// `Other` and ignored by the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// An agent accepted the contact.
    AgentConnected,
    /// Any other lifecycle event.
    #[serde(other)]
    Other,
}

/// A contact-center lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    /// Event kind.
    pub event_type: EventType,
    /// Contact the event refers to.
    pub contact_id: ContactId,
    /// Channel of the contact.
    pub channel: Channel,
    /// Contact attributes, when the event source includes them.
    ///
    /// Event payload attributes may lag the contact's real attributes; the
    /// router falls back to describe-contact when the session identifier is
    /// missing here.
    #[serde(default)]
    pub attributes: Option<ContactAttributes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_agent_connected_event() {
        let json = r#"{
            "eventType": "agent-connected",
            "contactId": "c-1",
            "channel": "voice",
            "attributes": { "sessionId": "0192f8a0-1111-7000-8000-000000000000" }
        }"#;

        let event: LifecycleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::AgentConnected);
        assert_eq!(event.channel, Channel::Voice);
        assert!(event.attributes.unwrap().session_id.is_some());
    }

    #[test]
    fn unknown_event_type_decodes_to_other() {
        let json = r#"{"eventType": "contact-ended", "contactId": "c-1", "channel": "chat"}"#;
        let event: LifecycleEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Other);
        assert!(event.attributes.is_none());
    }
}
