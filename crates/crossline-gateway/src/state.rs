//! Gateway application state.
//!
//! This module defines the shared state that is available to all request handlers.

use std::sync::Arc;

use crossline_contact::{ContactCenter, Orchestrator};
use crossline_events::{EventRouter, QueueRouter, QueueSelector};
use crossline_registry::Registry;

use crate::config::GatewayConfig;
use crate::hub::{ConnectionHub, RegistryPush};

/// Shared application state for the gateway.
///
/// This struct holds references to all services needed by the HTTP handlers.
pub struct GatewayState<C, R>
where
    C: ContactCenter,
    R: Registry,
{
    /// Contact creation, validation, and teardown.
    pub orchestrator: Arc<Orchestrator<C>>,
    /// Lifecycle event routing to live connections.
    pub events: Arc<EventRouter<C, R, RegistryPush<R>>>,
    /// Queueing-time escalation routing.
    pub queue: Arc<QueueRouter<C>>,
    /// Durable connection registry.
    pub registry: Arc<R>,
    /// Live connection channels on this process.
    pub hub: Arc<ConnectionHub>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl<C, R> GatewayState<C, R>
where
    C: ContactCenter,
    R: Registry,
{
    /// Create a new gateway state, wiring the routers to the given
    /// contact-center client and registry.
    #[must_use]
    pub fn new(client: Arc<C>, registry: Arc<R>, config: GatewayConfig) -> Self {
        let hub = Arc::new(ConnectionHub::new());
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&client)));
        let push = RegistryPush::new(Arc::clone(&hub), Arc::clone(&registry));
        let events = Arc::new(EventRouter::new(
            Arc::clone(&orchestrator),
            Arc::clone(&registry),
            push,
        ));
        let queue = Arc::new(QueueRouter::new(
            client,
            QueueSelector::new(config.default_queue.clone()),
        ));

        Self {
            orchestrator,
            events,
            queue,
            registry,
            hub,
            config,
        }
    }
}

impl<C, R> Clone for GatewayState<C, R>
where
    C: ContactCenter,
    R: Registry,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            events: Arc::clone(&self.events),
            queue: Arc::clone(&self.queue),
            registry: Arc::clone(&self.registry),
            hub: Arc::clone(&self.hub),
            config: self.config.clone(),
        }
    }
}
