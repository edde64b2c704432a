//! Contact-center client and escalation orchestrator for crossline.
//!
//! The contact-center service owns the full lifecycle of interaction
//! contacts (queued, connected, ended); this crate only creates contacts,
//! reads their attributes, and stops them. The orchestrator layers the
//! escalation preconditions on top: a voice contact that back-references a
//! chat contact is only created after the referenced contact is verified to
//! be an active chat.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use crossline_contact::{HttpContactCenter, Orchestrator};
//! use crossline_core::SessionId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpContactCenter::new("http://contact-center:9090"));
//! let orchestrator = Orchestrator::new(client);
//!
//! let session_id = SessionId::generate();
//! let chat = orchestrator.create_chat(&session_id, "Visitor").await?;
//! println!("chat contact {}", chat.contact_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod orchestrator;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::{ContactCenter, ContactCenterError, HttpContactCenter};
pub use error::{OrchestratorError, Result};
pub use orchestrator::Orchestrator;
pub use types::{
    AgentInfo, Channel, ChatContact, ContactAttributes, ContactSnapshot, ContactStatus,
    VoiceContact,
};
