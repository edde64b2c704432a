//! Error types for the orchestrator.

use crossline_core::ContactId;
use thiserror::Error;

use crate::client::ContactCenterError;

/// A result type using `OrchestratorError`.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Errors that can occur during contact orchestration.
///
/// The three validation variants carry machine-readable kinds so the UI
/// layer can render a distinct, actionable message per failure.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The referenced contact does not exist.
    #[error("related contact not found: {0}")]
    RelatedContactNotFound(ContactId),

    /// The referenced contact is not a chat contact.
    #[error("related contact {0} is not a chat contact")]
    InvalidRelatedContactType(ContactId),

    /// The referenced contact has already ended.
    #[error("related contact {0} is no longer active")]
    InactiveRelatedContact(ContactId),

    /// Upstream contact-center failure.
    #[error(transparent)]
    ContactCenter(#[from] ContactCenterError),
}

impl OrchestratorError {
    /// Machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RelatedContactNotFound(_) => "related_contact_not_found",
            Self::InvalidRelatedContactType(_) => "invalid_related_contact_type",
            Self::InactiveRelatedContact(_) => "inactive_related_contact",
            Self::ContactCenter(_) => "contact_center_error",
        }
    }

    /// Whether this is an escalation precondition failure (never retried).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::RelatedContactNotFound(_)
                | Self::InvalidRelatedContactType(_)
                | Self::InactiveRelatedContact(_)
        )
    }
}
