//! Health check endpoint.
//!
//! Liveness only: answering proves the gateway process is serving requests.
//! It deliberately touches neither the registry nor the contact-center
//! service, so a degraded dependency never flaps deployment probes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

/// Gateway liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process can serve requests.
    pub status: &'static str,
    /// Version of the running gateway binary.
    pub version: &'static str,
}

/// Health check handler. Public, no dependencies consulted.
pub async fn health() -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    };

    (StatusCode::OK, Json(response))
}
