//! Escalation queue routing.
//!
//! The contact-center service calls back synchronously while queueing a
//! contact to ask which queue it belongs in. For escalation-created contacts
//! the answer is the personal queue of the agent already handling the
//! related contact, so the same person picks up both halves of the
//! conversation. Every other contact, and every failure along the way,
//! resolves to the configured default queue: this callback sits on the
//! customer's queueing path and must always produce a selector.

use std::sync::Arc;

use crossline_contact::{Channel, ContactAttributes, ContactCenter};
use crossline_core::{AgentId, ContactId};
use serde::{Deserialize, Serialize};

/// An opaque queue selector returned to the contact-center service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueSelector(String);

impl QueueSelector {
    /// Create a selector from a raw queue name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Selector for a specific agent's personal queue.
    #[must_use]
    pub fn for_agent(agent_id: &AgentId) -> Self {
        Self(format!("agent:{}", agent_id.as_str()))
    }

    /// The raw selector string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The queueing-time callback payload for a contact about to be queued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRouteRequest {
    /// Contact being queued.
    pub contact_id: ContactId,
    /// Channel of the contact.
    pub channel: Channel,
    /// Attributes set at creation time, when the callback includes them.
    #[serde(default)]
    pub attributes: Option<ContactAttributes>,
}

/// Resolves the target queue for a contact about to be queued.
pub struct QueueRouter<C: ContactCenter> {
    client: Arc<C>,
    default_queue: QueueSelector,
}

impl<C: ContactCenter> QueueRouter<C> {
    /// Create a new queue router with the given fallback queue.
    #[must_use]
    pub fn new(client: Arc<C>, default_queue: QueueSelector) -> Self {
        Self {
            client,
            default_queue,
        }
    }

    /// Resolve the queue for a contact. Infallible: any lookup failure
    /// falls back to the default queue rather than blocking queueing.
    pub async fn route(&self, request: &QueueRouteRequest) -> QueueSelector {
        let related = request
            .attributes
            .as_ref()
            .and_then(|a| a.related_contact_id.as_ref());

        let Some(related_contact_id) = related else {
            tracing::debug!(
                contact_id = %request.contact_id,
                "Contact is not an escalation, routing to default queue"
            );
            return self.default_queue.clone();
        };

        let snapshot = match self.client.describe_contact(related_contact_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    contact_id = %request.contact_id,
                    related_contact_id = %related_contact_id,
                    error = %e,
                    "Failed to describe related contact, routing to default queue"
                );
                return self.default_queue.clone();
            }
        };

        match snapshot.agent {
            Some(agent) => {
                tracing::info!(
                    contact_id = %request.contact_id,
                    related_contact_id = %related_contact_id,
                    agent_id = %agent.id,
                    "Routing escalation to the related contact's agent"
                );
                QueueSelector::for_agent(&agent.id)
            }
            None => {
                tracing::info!(
                    contact_id = %request.contact_id,
                    related_contact_id = %related_contact_id,
                    "Related contact has no agent yet, routing to default queue"
                );
                self.default_queue.clone()
            }
        }
    }
}
