//! Contact orchestration.
//!
//! The orchestrator creates chat and voice contacts against the
//! contact-center service, tagging each with the client session identifier
//! and, for escalations, a back-reference to the originating contact. The
//! escalation preconditions are enforced here, before any create call is
//! made.

use std::sync::Arc;

use crossline_core::{ContactId, SessionId};

use crate::client::{ContactCenter, ContactCenterError};
use crate::error::{OrchestratorError, Result};
use crate::types::{Channel, ChatContact, ContactAttributes, ContactStatus, VoiceContact};

/// Contact orchestrator over a contact-center client.
pub struct Orchestrator<C: ContactCenter> {
    client: Arc<C>,
}

impl<C: ContactCenter> Orchestrator<C> {
    /// Create a new orchestrator.
    #[must_use]
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying contact-center client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Create a first-generation chat contact for the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact-center call fails.
    pub async fn create_chat(
        &self,
        session_id: &SessionId,
        display_name: &str,
    ) -> Result<ChatContact> {
        let attributes = ContactAttributes::for_session(*session_id);
        let chat = self.client.create_chat(display_name, &attributes).await?;

        tracing::info!(
            contact_id = %chat.contact_id,
            session_id = %session_id,
            "Created chat contact"
        );

        Ok(chat)
    }

    /// Create a voice contact, optionally escalating from an existing chat.
    ///
    /// When `related_contact_id` is given, the referenced contact is
    /// validated before anything is created: it must exist, be a chat
    /// contact, and still be active. On any validation failure the voice
    /// contact is never created.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unusable related contact, or an
    /// upstream error if a contact-center call fails.
    pub async fn create_voice(
        &self,
        session_id: &SessionId,
        display_name: &str,
        related_contact_id: Option<&ContactId>,
    ) -> Result<VoiceContact> {
        let attributes = match related_contact_id {
            Some(related) => {
                self.validate_related_chat(related).await?;
                ContactAttributes::for_escalation(*session_id, related.clone())
            }
            None => ContactAttributes::for_session(*session_id),
        };

        let voice = self.client.create_voice(display_name, &attributes).await?;

        tracing::info!(
            contact_id = %voice.contact_id,
            session_id = %session_id,
            related_contact_id = ?related_contact_id,
            "Created voice contact"
        );

        Ok(voice)
    }

    /// Create a companion chat contact back-referencing a voice contact.
    ///
    /// This is the event-driven path taken when an agent connects to a
    /// direct voice contact: the voice contact is known valid (freshly
    /// agent-connected), so the escalation validation is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact-center call fails.
    pub async fn create_companion_chat(
        &self,
        session_id: &SessionId,
        voice_contact_id: &ContactId,
    ) -> Result<ChatContact> {
        let attributes =
            ContactAttributes::for_escalation(*session_id, voice_contact_id.clone());
        let chat = self.client.create_chat("Customer", &attributes).await?;

        tracing::info!(
            contact_id = %chat.contact_id,
            voice_contact_id = %voice_contact_id,
            session_id = %session_id,
            "Created companion chat contact"
        );

        Ok(chat)
    }

    /// Stop a contact.
    ///
    /// Idempotent from the caller's perspective: a contact that has already
    /// ended is treated as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact-center call fails for any other
    /// reason.
    pub async fn stop(&self, contact_id: &ContactId) -> Result<()> {
        match self.client.stop_contact(contact_id).await {
            Ok(()) => Ok(()),
            Err(ContactCenterError::AlreadyEnded(_)) => {
                tracing::debug!(contact_id = %contact_id, "Contact already ended");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the escalation preconditions on a related chat contact.
    async fn validate_related_chat(&self, related: &ContactId) -> Result<()> {
        let snapshot = match self.client.describe_contact(related).await {
            Ok(snapshot) => snapshot,
            Err(ContactCenterError::NotFound(_)) => {
                return Err(OrchestratorError::RelatedContactNotFound(related.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        if snapshot.channel != Channel::Chat {
            return Err(OrchestratorError::InvalidRelatedContactType(
                related.clone(),
            ));
        }

        if snapshot.status != ContactStatus::Active {
            return Err(OrchestratorError::InactiveRelatedContact(related.clone()));
        }

        Ok(())
    }
}
