//! HTTP and WebSocket gateway for the crossline escalation platform.
//!
//! This crate provides the public-facing API for the session-to-connection
//! routing subsystem. It handles:
//!
//! - REST endpoints for creating and stopping contacts
//! - the realtime WebSocket customers hold open for server pushes
//! - callback endpoints the contact-center service delivers lifecycle
//!   events and queue-route requests to
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Customer clients                         │
//! │                   (HTTP / WebSocket)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    crossline-gateway                         │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Contacts   │ │  Callbacks  │ │   Realtime hub      │    │
//! │  │  Handlers   │ │  Handlers   │ │   + registry        │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┼──────────────┐
//!               ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │ Contact  │   │  Event   │   │ RocksDB  │
//!        │ center   │   │  router  │   │ registry │
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crossline_gateway::{create_router, GatewayConfig, GatewayState};
//! use crossline_contact::HttpContactCenter;
//! use crossline_registry::RocksRegistry;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(RocksRegistry::open("/tmp/crossline")?);
//! let client = Arc::new(HttpContactCenter::new("http://contact-center:9090"));
//!
//! let config = GatewayConfig::default();
//! let state = GatewayState::new(client, registry, config);
//!
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod hub;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use hub::{ConnectionHub, RegistryPush};
pub use routes::create_router;
pub use state::GatewayState;
