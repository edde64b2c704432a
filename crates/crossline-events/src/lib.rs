//! Lifecycle event routing and escalation queue routing for crossline.
//!
//! Two consumers of contact-center callbacks live here:
//!
//! - the **event router** reacts to agent-connected lifecycle events,
//!   resolves the contact's session to a live realtime connection, and
//!   pushes follow-up actions to the client (enable the escalation button,
//!   or auto-create a companion chat for a direct voice contact);
//! - the **queue router** is the synchronous queueing-time callback that
//!   redirects an escalation-created contact to the personal queue of the
//!   agent already handling the related contact. It fails open: every
//!   internal error resolves to the default queue, because failing to
//!   return a selector would block customer queueing entirely.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod messages;
pub mod queue;
pub mod router;
pub mod types;

pub use messages::{Push, PushError, PushMessage};
pub use queue::{QueueRouteRequest, QueueRouter, QueueSelector};
pub use router::{EventRouter, RouteOutcome, RouterError};
pub use types::{EventType, LifecycleEvent};
