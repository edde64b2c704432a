//! End-to-end escalation flows over the in-process hub, the RocksDB
//! registry, and a fake contact-center service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc;

use crossline_contact::testing::{FailureMode, FakeContactCenter};
use crossline_contact::{Channel, ContactAttributes, OrchestratorError};
use crossline_core::{AgentId, ConnectionId, ContactId, SessionId};
use crossline_events::{
    EventType, LifecycleEvent, Push, PushError, PushMessage, QueueRouteRequest, RouteOutcome,
};
use crossline_gateway::{GatewayConfig, GatewayState, RegistryPush};
use crossline_registry::{Registry, RocksRegistry};
use tempfile::TempDir;

struct Harness {
    state: GatewayState<FakeContactCenter, RocksRegistry>,
    fake: Arc<FakeContactCenter>,
    _dir: TempDir,
}

fn setup() -> Harness {
    let dir = TempDir::new().unwrap();
    let fake = Arc::new(FakeContactCenter::new());
    let registry = Arc::new(RocksRegistry::open(dir.path()).unwrap());
    let state = GatewayState::new(Arc::clone(&fake), registry, GatewayConfig::default());

    Harness {
        state,
        fake,
        _dir: dir,
    }
}

impl Harness {
    /// Simulate a client connecting and registering its session.
    fn connect(&self, session_id: &SessionId) -> (ConnectionId, mpsc::UnboundedReceiver<PushMessage>) {
        let connection_id = ConnectionId::generate();
        self.state
            .registry
            .put_connection(&connection_id, Utc::now() + Duration::hours(2))
            .unwrap();
        self.state
            .registry
            .attach_session(&connection_id, session_id)
            .unwrap();

        let (tx, rx) = mpsc::unbounded_channel();
        self.state.hub.insert(connection_id.clone(), tx);
        (connection_id, rx)
    }

    fn agent_connected(&self, contact_id: &ContactId) -> LifecycleEvent {
        let snapshot = self.fake.contact(contact_id).expect("contact seeded");
        LifecycleEvent {
            event_type: EventType::AgentConnected,
            contact_id: contact_id.clone(),
            channel: snapshot.channel,
            attributes: Some(snapshot.attributes),
        }
    }
}

// Scenario: a chat session escalates to voice, attributes carrying both the
// session and the back-reference.
#[tokio::test]
async fn chat_escalates_to_voice_with_continuity_attributes() {
    let h = setup();
    let session_id = SessionId::generate();

    let chat = h
        .state
        .orchestrator
        .create_chat(&session_id, "Visitor")
        .await
        .unwrap();

    let stored = h.fake.contact(&chat.contact_id).unwrap();
    assert_eq!(stored.attributes.session_id, Some(session_id));

    let voice = h
        .state
        .orchestrator
        .create_voice(&session_id, "Visitor", Some(&chat.contact_id))
        .await
        .unwrap();

    let stored = h.fake.contact(&voice.contact_id).unwrap();
    assert_eq!(stored.attributes.session_id, Some(session_id));
    assert_eq!(stored.attributes.related_contact_id, Some(chat.contact_id));
}

// Scenario: escalating off a voice contact is rejected before any contact
// is created.
#[tokio::test]
async fn escalation_off_a_voice_contact_is_rejected() {
    let h = setup();
    let session_id = SessionId::generate();

    let voice = h
        .state
        .orchestrator
        .create_voice(&session_id, "Visitor", None)
        .await
        .unwrap();
    let creates_before = h.fake.calls().create_voice;

    let result = h
        .state
        .orchestrator
        .create_voice(&session_id, "Visitor", Some(&voice.contact_id))
        .await;

    assert!(matches!(
        result,
        Err(OrchestratorError::InvalidRelatedContactType(_))
    ));
    assert_eq!(h.fake.calls().create_voice, creates_before);
}

// Scenario: a direct voice contact reaching an agent spawns a companion
// chat, announced only on the session's own connection.
#[tokio::test]
async fn voice_agent_connect_spawns_companion_chat_on_the_right_connection() {
    let h = setup();
    let session_id = SessionId::generate();
    let other_session = SessionId::generate();

    let (_, mut rx) = h.connect(&session_id);
    let (_, mut other_rx) = h.connect(&other_session);

    let voice = h
        .state
        .orchestrator
        .create_voice(&session_id, "Visitor", None)
        .await
        .unwrap();

    let outcome = h
        .state
        .events
        .handle(h.agent_connected(&voice.contact_id))
        .await
        .unwrap();

    let RouteOutcome::CompanionChatCreated { chat_contact_id } = outcome else {
        panic!("expected companion chat, got {outcome:?}");
    };

    let pushed = rx.try_recv().unwrap();
    match pushed {
        PushMessage::ChatContactCreated {
            chat_contact_id: pushed_chat,
            voice_contact_id,
            session_id: pushed_session,
            ..
        } => {
            assert_eq!(pushed_chat, chat_contact_id);
            assert_eq!(voice_contact_id, voice.contact_id);
            assert_eq!(pushed_session, session_id);
        }
        other => panic!("unexpected push: {other:?}"),
    }

    assert!(rx.try_recv().is_err());
    assert!(other_rx.try_recv().is_err());
}

// Scenario: the queueing-time callback routes an escalated contact to the
// personal queue of the agent on the related contact.
#[tokio::test]
async fn escalated_contact_queues_to_the_related_agent() {
    let h = setup();
    let session_id = SessionId::generate();

    let chat = h
        .state
        .orchestrator
        .create_chat(&session_id, "Visitor")
        .await
        .unwrap();
    h.fake
        .assign_agent(&chat.contact_id, AgentId::new("A1").unwrap());

    let voice = h
        .state
        .orchestrator
        .create_voice(&session_id, "Visitor", Some(&chat.contact_id))
        .await
        .unwrap();
    let stored = h.fake.contact(&voice.contact_id).unwrap();

    let request = QueueRouteRequest {
        contact_id: voice.contact_id,
        channel: Channel::Voice,
        attributes: Some(stored.attributes),
    };

    let selector = h.state.queue.route(&request).await;
    assert_eq!(selector.as_str(), "agent:A1");
}

// Scenario: a describe failure during queue routing falls back to the
// default queue instead of failing the callback.
#[tokio::test]
async fn queue_routing_fails_open_on_describe_failure() {
    let h = setup();
    let session_id = SessionId::generate();

    let request = QueueRouteRequest {
        contact_id: ContactId::new("escalated-1").unwrap(),
        channel: Channel::Voice,
        attributes: Some(ContactAttributes::for_escalation(
            session_id,
            ContactId::new("chat-1").unwrap(),
        )),
    };

    h.fake.fail_describe(FailureMode::Upstream);
    let selector = h.state.queue.route(&request).await;
    assert_eq!(selector.as_str(), "default");
}

// Scenario: pushing to a vanished connection reaps its registry record;
// the redundant second push is also benign.
#[tokio::test]
async fn pushing_to_a_gone_connection_reaps_the_record_once() {
    let h = setup();
    let session_id = SessionId::generate();
    let (connection_id, rx) = h.connect(&session_id);
    drop(rx);

    let push = RegistryPush::new(Arc::clone(&h.state.hub), Arc::clone(&h.state.registry));

    let first = push.push(&connection_id, &PushMessage::Pong).await;
    assert!(matches!(first, Err(PushError::Gone)));
    assert!(h
        .state
        .registry
        .get_connection(&connection_id)
        .unwrap()
        .is_none());

    let second = push.push(&connection_id, &PushMessage::Pong).await;
    assert!(matches!(second, Err(PushError::Gone)));
    assert!(h.state.registry.find_by_session(&session_id).unwrap().is_none());
}

// A reconnecting client re-registers the same session on a new connection;
// events route to the latest connection.
#[tokio::test]
async fn reconnect_routes_events_to_the_new_connection() {
    let h = setup();
    let session_id = SessionId::generate();

    let (old_connection, mut old_rx) = h.connect(&session_id);
    // Clean disconnect of the first socket
    h.state.hub.remove(&old_connection);
    h.state.registry.remove_connection(&old_connection).unwrap();

    let (_, mut new_rx) = h.connect(&session_id);

    let chat = h
        .state
        .orchestrator
        .create_chat(&session_id, "Visitor")
        .await
        .unwrap();

    let outcome = h
        .state
        .events
        .handle(h.agent_connected(&chat.contact_id))
        .await
        .unwrap();
    assert_eq!(outcome, RouteOutcome::AgentConnectedDelivered);

    assert!(matches!(
        new_rx.try_recv().unwrap(),
        PushMessage::ChatAgentConnected { .. }
    ));
    assert!(matches!(
        new_rx.try_recv().unwrap(),
        PushMessage::EnableEscalation { .. }
    ));
    assert!(old_rx.try_recv().is_err());
}
