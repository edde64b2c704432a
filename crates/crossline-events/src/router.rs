//! Event router.
//!
//! Consumes contact-center lifecycle events, resolves the contact's session
//! identifier to a live realtime connection, and pushes the follow-up action
//! to the client. Events are delivered at-least-once by the source; the
//! router keeps no dedup state, so repeating an event reproduces the same
//! pushes and the client must tolerate duplicates.

use std::sync::Arc;

use crossline_contact::{Channel, ContactAttributes, ContactCenter, ContactCenterError};
use crossline_core::{ConnectionId, ContactId, SessionId};
use crossline_registry::Registry;
use thiserror::Error;

use crate::messages::{Push, PushError, PushMessage};
use crate::types::{EventType, LifecycleEvent};

/// Errors that can occur while routing an event.
///
/// Only upstream failures surface here; missing sessions, missing
/// connections, and vanished push targets are benign outcomes, not errors.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Contact-center failure during attribute fallback or chat creation.
    #[error(transparent)]
    Orchestrator(#[from] crossline_contact::OrchestratorError),

    /// Contact-center failure during the describe fallback.
    #[error(transparent)]
    ContactCenter(#[from] ContactCenterError),

    /// Registry failure during session resolution.
    #[error(transparent)]
    Registry(#[from] crossline_registry::RegistryError),

    /// Non-gone push transport failure.
    #[error("push failed: {0}")]
    Push(String),
}

/// Terminal outcome of routing one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The event type is not handled; nothing to do.
    Ignored,
    /// No session identifier could be resolved for the contact.
    NoSession,
    /// No live connection is registered for the session.
    NoConnection,
    /// The resolved connection vanished before delivery completed.
    ConnectionGone,
    /// A companion chat was created and announced to the client.
    CompanionChatCreated {
        /// The created chat contact.
        chat_contact_id: ContactId,
    },
    /// The agent-connected notification was delivered to the client.
    AgentConnectedDelivered,
}

impl RouteOutcome {
    /// Stable string form for logs and API responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::NoSession => "no_session",
            Self::NoConnection => "no_connection",
            Self::ConnectionGone => "connection_gone",
            Self::CompanionChatCreated { .. } => "companion_chat_created",
            Self::AgentConnectedDelivered => "agent_connected_delivered",
        }
    }
}

/// Routes agent-connected lifecycle events to the client's live connection.
pub struct EventRouter<C, R, P>
where
    C: ContactCenter,
    R: Registry,
    P: Push,
{
    orchestrator: Arc<crossline_contact::Orchestrator<C>>,
    registry: Arc<R>,
    push: P,
}

impl<C, R, P> EventRouter<C, R, P>
where
    C: ContactCenter,
    R: Registry,
    P: Push,
{
    /// Create a new event router.
    #[must_use]
    pub fn new(
        orchestrator: Arc<crossline_contact::Orchestrator<C>>,
        registry: Arc<R>,
        push: P,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            push,
        }
    }

    /// Route one lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns an error only for upstream contact-center, registry, or
    /// transport failures. Unhandled event types, unresolvable sessions,
    /// and vanished connections are `Ok` outcomes.
    pub async fn handle(&self, event: LifecycleEvent) -> Result<RouteOutcome, RouterError> {
        if event.event_type != EventType::AgentConnected {
            tracing::debug!(contact_id = %event.contact_id, "Ignoring unhandled event type");
            return Ok(RouteOutcome::Ignored);
        }

        let Some(attributes) = self.resolve_attributes(&event).await? else {
            return Ok(RouteOutcome::NoSession);
        };

        let Some(session_id) = attributes.session_id else {
            tracing::info!(
                contact_id = %event.contact_id,
                "Contact has no session identifier, nothing to route"
            );
            return Ok(RouteOutcome::NoSession);
        };

        let Some(connection) = self.registry.find_by_session(&session_id)? else {
            tracing::info!(
                contact_id = %event.contact_id,
                session_id = %session_id,
                "No live connection for session, client likely disconnected"
            );
            return Ok(RouteOutcome::NoConnection);
        };

        match event.channel {
            Channel::Voice => {
                self.handle_voice_connected(&event.contact_id, &session_id, &connection.connection_id)
                    .await
            }
            Channel::Chat => {
                self.handle_chat_connected(
                    &event.contact_id,
                    &session_id,
                    &attributes,
                    &connection.connection_id,
                )
                .await
            }
        }
    }

    /// Resolve the contact attributes: event payload first, describe-contact
    /// fallback when the payload lacks a session identifier.
    ///
    /// Returns `None` when the contact itself is gone, which is treated the
    /// same as a contact without a session.
    async fn resolve_attributes(
        &self,
        event: &LifecycleEvent,
    ) -> Result<Option<ContactAttributes>, RouterError> {
        if let Some(attributes) = &event.attributes {
            if attributes.session_id.is_some() {
                return Ok(Some(attributes.clone()));
            }
        }

        match self
            .orchestrator
            .client()
            .describe_contact(&event.contact_id)
            .await
        {
            Ok(snapshot) => Ok(Some(snapshot.attributes)),
            Err(ContactCenterError::NotFound(_)) => {
                tracing::info!(
                    contact_id = %event.contact_id,
                    "Contact vanished before attribute fallback, nothing to route"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// An agent connected to a direct voice contact: create the companion
    /// chat and announce it to the client.
    async fn handle_voice_connected(
        &self,
        voice_contact_id: &ContactId,
        session_id: &SessionId,
        connection_id: &ConnectionId,
    ) -> Result<RouteOutcome, RouterError> {
        let chat = self
            .orchestrator
            .create_companion_chat(session_id, voice_contact_id)
            .await?;

        let message = PushMessage::ChatContactCreated {
            chat_contact_id: chat.contact_id.clone(),
            participant_id: chat.participant_id,
            participant_token: chat.participant_token,
            voice_contact_id: voice_contact_id.clone(),
            session_id: *session_id,
        };

        if self.deliver(connection_id, &message).await? {
            Ok(RouteOutcome::CompanionChatCreated {
                chat_contact_id: chat.contact_id,
            })
        } else {
            Ok(RouteOutcome::ConnectionGone)
        }
    }

    /// An agent connected to a chat contact: notify the client, and enable
    /// escalation for first-generation chats only (an escalation-created
    /// chat carries a related-contact back-reference and must not offer to
    /// escalate again).
    async fn handle_chat_connected(
        &self,
        chat_contact_id: &ContactId,
        session_id: &SessionId,
        attributes: &ContactAttributes,
        connection_id: &ConnectionId,
    ) -> Result<RouteOutcome, RouterError> {
        let connected = PushMessage::ChatAgentConnected {
            chat_contact_id: chat_contact_id.clone(),
            session_id: *session_id,
        };

        if !self.deliver(connection_id, &connected).await? {
            return Ok(RouteOutcome::ConnectionGone);
        }

        if attributes.related_contact_id.is_none() {
            let enable = PushMessage::EnableEscalation {
                chat_contact_id: chat_contact_id.clone(),
            };
            if !self.deliver(connection_id, &enable).await? {
                return Ok(RouteOutcome::ConnectionGone);
            }
        }

        Ok(RouteOutcome::AgentConnectedDelivered)
    }

    /// Deliver one message; `Ok(false)` means the connection is gone.
    async fn deliver(
        &self,
        connection_id: &ConnectionId,
        message: &PushMessage,
    ) -> Result<bool, RouterError> {
        match self.push.push(connection_id, message).await {
            Ok(()) => Ok(true),
            Err(PushError::Gone) => {
                tracing::info!(
                    connection_id = %connection_id,
                    "Push target gone, stale record reaped by transport"
                );
                Ok(false)
            }
            Err(PushError::Transport(e)) => Err(RouterError::Push(e)),
        }
    }
}
