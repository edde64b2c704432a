//! Contact-center callback endpoints.
//!
//! Two callbacks arrive from the contact-center service: asynchronous
//! lifecycle events, and the synchronous queue-route request issued while a
//! contact is being queued.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crossline_contact::ContactCenter;
use crossline_events::{LifecycleEvent, QueueRouteRequest, QueueSelector};
use crossline_registry::Registry;

use crate::error::ApiError;
use crate::state::GatewayState;

/// Response for a routed lifecycle event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Terminal outcome of routing the event.
    pub outcome: &'static str,
}

/// Response for a queue-route request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRouteResponse {
    /// Queue the contact should be placed in.
    pub queue_selector: QueueSelector,
}

/// Handle a lifecycle event callback.
///
/// Benign no-ops (unhandled event types, contacts without a session, and
/// sessions without a live connection) return 200 with their outcome so the
/// event source does not retry them.
///
/// # Errors
///
/// Returns an error only when an upstream dependency fails; the event source
/// is expected to redeliver in that case.
pub async fn handle_event<C, R>(
    State(state): State<Arc<GatewayState<C, R>>>,
    Json(event): Json<LifecycleEvent>,
) -> Result<impl IntoResponse, ApiError>
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let outcome = state.events.handle(event).await?;

    Ok(Json(EventResponse {
        outcome: outcome.as_str(),
    }))
}

/// Handle a queue-route callback.
///
/// Always returns a selector; routing failures fall back to the default
/// queue rather than blocking the contact from queueing.
pub async fn queue_route<C, R>(
    State(state): State<Arc<GatewayState<C, R>>>,
    Json(request): Json<QueueRouteRequest>,
) -> impl IntoResponse
where
    C: ContactCenter + 'static,
    R: Registry + 'static,
{
    let queue_selector = state.queue.route(&request).await;

    Json(QueueRouteResponse { queue_selector })
}
