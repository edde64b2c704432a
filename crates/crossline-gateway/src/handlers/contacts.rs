//! Contact creation and teardown endpoints.
//!
//! These are the customer-facing entry points: start a chat, start a voice
//! call (optionally escalating an in-progress chat), and end a contact.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crossline_contact::ContactCenter;
use crossline_core::{ContactId, SessionId};
use crossline_registry::Registry;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Request body for creating a chat contact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    /// Client session identifier.
    pub session_id: SessionId,
    /// Display name shown to the agent.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

/// Request body for creating a voice contact.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVoiceRequest {
    /// Client session identifier.
    pub session_id: SessionId,
    /// Display name shown to the agent.
    #[serde(default = "default_display_name")]
    pub display_name: String,
    /// Chat contact being escalated, when this call is an escalation.
    #[serde(default)]
    pub related_contact_id: Option<ContactId>,
}

fn default_display_name() -> String {
    "Customer".to_string()
}

/// Create a chat contact.
///
/// # Errors
///
/// Returns an error if the contact-center service rejects the request.
pub async fn create_chat<C, R>(
    State(state): State<Arc<GatewayState<C, R>>>,
    Json(request): Json<CreateChatRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let chat = state
        .orchestrator
        .create_chat(&request.session_id, &request.display_name)
        .await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

/// Create a voice contact, optionally escalating an in-progress chat.
///
/// When `relatedContactId` is present, the referenced contact must be an
/// active chat contact; the request is rejected before any contact is
/// created otherwise.
///
/// # Errors
///
/// Returns `related_contact_not_found`, `invalid_related_contact_type`, or
/// `inactive_related_contact` when escalation validation fails, and an
/// upstream error if the contact-center service rejects the request.
pub async fn create_voice<C, R>(
    State(state): State<Arc<GatewayState<C, R>>>,
    Json(request): Json<CreateVoiceRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let voice = state
        .orchestrator
        .create_voice(
            &request.session_id,
            &request.display_name,
            request.related_contact_id.as_ref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(voice)))
}

/// Stop an in-progress contact.
///
/// Stopping a contact that has already ended succeeds.
///
/// # Errors
///
/// Returns an error if the contact does not exist or the contact-center
/// service fails.
pub async fn stop_contact<C, R>(
    State(state): State<Arc<GatewayState<C, R>>>,
    Path(contact_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let contact_id = parse_contact_id(&contact_id)?;
    state.orchestrator.stop(&contact_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Parse a contact ID from a path segment.
fn parse_contact_id(s: &str) -> Result<ContactId, ApiError> {
    s.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid contact ID: {s}")))
}
