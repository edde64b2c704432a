//! API error types and responses.
//!
//! This module defines the standard error format for all API responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crossline_contact::{ContactCenterError, OrchestratorError};
use crossline_events::RouterError;
use crossline_registry::RegistryError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The related contact of an escalation does not exist.
    #[error("related contact not found")]
    RelatedContactNotFound,

    /// The related contact of an escalation has the wrong channel.
    #[error("related contact is not a chat contact")]
    InvalidRelatedContactType,

    /// The related contact of an escalation has already ended.
    #[error("related contact is no longer active")]
    InactiveRelatedContact,

    /// The request conflicts with the current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller is not allowed to touch this resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The contact-center service failed.
    #[error("contact-center error: {0}")]
    Upstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RelatedContactNotFound => StatusCode::NOT_FOUND,
            Self::InvalidRelatedContactType | Self::InactiveRelatedContact | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::RelatedContactNotFound => "related_contact_not_found",
            Self::InvalidRelatedContactType => "invalid_related_contact_type",
            Self::InactiveRelatedContact => "inactive_related_contact",
            Self::Conflict(_) => "conflict",
            Self::Forbidden(_) => "forbidden",
            Self::Upstream(_) => "contact_center_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::RelatedContactNotFound(_) => Self::RelatedContactNotFound,
            OrchestratorError::InvalidRelatedContactType(_) => Self::InvalidRelatedContactType,
            OrchestratorError::InactiveRelatedContact(_) => Self::InactiveRelatedContact,
            OrchestratorError::ContactCenter(e) => Self::from(e),
        }
    }
}

impl From<ContactCenterError> for ApiError {
    fn from(err: ContactCenterError) -> Self {
        match err {
            ContactCenterError::NotFound(id) => Self::NotFound(format!("contact {id}")),
            ContactCenterError::AccessDenied(msg) => Self::Forbidden(msg),
            ContactCenterError::AlreadyEnded(id) => {
                Self::Conflict(format!("contact {id} has already ended"))
            }
            ContactCenterError::Upstream(msg) => {
                tracing::error!(error = %msg, "Contact-center failure");
                Self::Upstream(msg)
            }
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound => Self::NotFound("connection".to_string()),
            RegistryError::Database(msg) | RegistryError::Serialization(msg) => {
                tracing::error!(error = %msg, "Registry failure");
                Self::Internal("storage error".to_string())
            }
        }
    }
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::Orchestrator(e) => Self::from(e),
            RouterError::ContactCenter(e) => Self::from(e),
            RouterError::Registry(e) => Self::from(e),
            RouterError::Push(msg) => {
                tracing::error!(error = %msg, "Push transport failure");
                Self::Internal("push transport error".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RelatedContactNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidRelatedContactType.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::InactiveRelatedContact.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Upstream("test".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_codes_match_orchestrator_kinds() {
        let id = crossline_core::ContactId::new("c-1").unwrap();
        let cases = [
            OrchestratorError::RelatedContactNotFound(id.clone()),
            OrchestratorError::InvalidRelatedContactType(id.clone()),
            OrchestratorError::InactiveRelatedContact(id),
        ];

        for err in cases {
            let kind = err.kind();
            assert_eq!(ApiError::from(err).code(), kind);
        }
    }
}
