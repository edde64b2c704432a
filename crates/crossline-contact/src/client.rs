//! Contact-center service client.
//!
//! This module provides the `ContactCenter` trait consumed by the
//! orchestrator and the event router, plus the HTTP implementation used in
//! production. The trait abstracts the four operations crossline needs from
//! the managed service: create-chat, create-voice, describe-contact, and
//! stop-contact.

use std::time::Duration;

use async_trait::async_trait;
use crossline_core::ContactId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ChatContact, ContactAttributes, ContactSnapshot, VoiceContact};

/// A result type using `ContactCenterError`.
pub type Result<T> = std::result::Result<T, ContactCenterError>;

/// Errors reported by the contact-center service.
#[derive(Debug, Error)]
pub enum ContactCenterError {
    /// The service reports no such contact.
    #[error("contact not found: {0}")]
    NotFound(ContactId),

    /// The caller is not allowed to read or mutate the contact.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The contact has already ended (stop-contact on an ended contact).
    #[error("contact already ended: {0}")]
    AlreadyEnded(ContactId),

    /// Any other upstream failure (service or transport).
    #[error("contact-center error: {0}")]
    Upstream(String),
}

/// Trait for contact-center communication.
///
/// This trait abstracts the contact-center client interface, allowing for
/// fake implementations in tests.
#[async_trait]
pub trait ContactCenter: Send + Sync {
    /// Create a chat contact tagged with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn create_chat(
        &self,
        display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<ChatContact>;

    /// Create a voice contact tagged with the given attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    async fn create_voice(
        &self,
        display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<VoiceContact>;

    /// Describe a contact: channel, state, agent assignment, attributes.
    ///
    /// # Errors
    ///
    /// Returns `ContactCenterError::NotFound` if the contact does not exist.
    async fn describe_contact(&self, contact_id: &ContactId) -> Result<ContactSnapshot>;

    /// Stop an in-progress contact.
    ///
    /// # Errors
    ///
    /// Returns `ContactCenterError::AlreadyEnded` if the contact has ended.
    async fn stop_contact(&self, contact_id: &ContactId) -> Result<()>;
}

/// HTTP client for the contact-center service.
#[derive(Debug, Clone)]
pub struct HttpContactCenter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContactCenter {
    /// Create a new contact-center client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the contact-center service
    ///   (e.g., "http://contact-center:9090")
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Create a new contact-center client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Get the base URL of the contact-center service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to a `ContactCenterError`.
    async fn map_error(response: reqwest::Response, contact_id: Option<&ContactId>) -> ContactCenterError {
        let status = response.status();
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("contact-center returned status {status}"));

        match (status, contact_id) {
            (reqwest::StatusCode::NOT_FOUND, Some(id)) => {
                ContactCenterError::NotFound(id.clone())
            }
            (reqwest::StatusCode::FORBIDDEN, _) => ContactCenterError::AccessDenied(message),
            (reqwest::StatusCode::CONFLICT, Some(id)) => {
                ContactCenterError::AlreadyEnded(id.clone())
            }
            _ => ContactCenterError::Upstream(message),
        }
    }
}

/// Request body for creating a contact.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContactRequest<'a> {
    participant_display_name: &'a str,
    attributes: &'a ContactAttributes,
}

/// Error response from the contact-center service.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[async_trait]
impl ContactCenter for HttpContactCenter {
    async fn create_chat(
        &self,
        display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<ChatContact> {
        let url = format!("{}/v1/contacts/chat", self.base_url);
        let request = CreateContactRequest {
            participant_display_name: display_name,
            attributes,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ContactCenterError::Upstream(format!("request failed: {e}")))?;

        if response.status().is_success() {
            response
                .json::<ChatContact>()
                .await
                .map_err(|e| ContactCenterError::Upstream(format!("failed to parse response: {e}")))
        } else {
            Err(Self::map_error(response, None).await)
        }
    }

    async fn create_voice(
        &self,
        display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<VoiceContact> {
        let url = format!("{}/v1/contacts/voice", self.base_url);
        let request = CreateContactRequest {
            participant_display_name: display_name,
            attributes,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ContactCenterError::Upstream(format!("request failed: {e}")))?;

        if response.status().is_success() {
            response
                .json::<VoiceContact>()
                .await
                .map_err(|e| ContactCenterError::Upstream(format!("failed to parse response: {e}")))
        } else {
            Err(Self::map_error(response, None).await)
        }
    }

    async fn describe_contact(&self, contact_id: &ContactId) -> Result<ContactSnapshot> {
        let url = format!("{}/v1/contacts/{contact_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ContactCenterError::Upstream(format!("request failed: {e}")))?;

        if response.status().is_success() {
            response
                .json::<ContactSnapshot>()
                .await
                .map_err(|e| ContactCenterError::Upstream(format!("failed to parse response: {e}")))
        } else {
            Err(Self::map_error(response, Some(contact_id)).await)
        }
    }

    async fn stop_contact(&self, contact_id: &ContactId) -> Result<()> {
        let url = format!("{}/v1/contacts/{contact_id}:stop", self.base_url);

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| ContactCenterError::Upstream(format!("request failed: {e}")))?;

        if response.status().is_success() {
            tracing::debug!(contact_id = %contact_id, "Stopped contact");
            Ok(())
        } else {
            Err(Self::map_error(response, Some(contact_id)).await)
        }
    }
}
