//! Core types for the crossline support platform.
//!
//! This crate provides the foundational types used throughout crossline:
//!
//! - **Identifiers**: strongly-typed IDs for sessions, realtime connections,
//!   contacts, and agents
//! - **Session identity**: generation and persistence of the client-side
//!   session identifier that ties every contact and connection together
//!
//! # Example
//!
//! ```
//! use crossline_core::{SessionId, ContactId};
//!
//! // Generate a fresh session identifier
//! let session_id = SessionId::generate();
//!
//! // Parse a contact ID assigned by the contact-center service
//! let contact_id: ContactId = "c-12345".parse().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod identity;
pub mod ids;

pub use identity::{MemorySessionStore, SessionStore};
pub use ids::{AgentId, ConnectionId, ContactId, IdError, SessionId};
