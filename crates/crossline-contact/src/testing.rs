//! In-memory contact-center fake for tests.
//!
//! Tracks per-operation call counts so tests can assert that validation
//! failures never reach the create APIs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use crossline_core::{AgentId, ContactId};
use serde_json::json;

use crate::client::{ContactCenter, ContactCenterError, Result};
use crate::types::{
    AgentInfo, Channel, ChatContact, ContactAttributes, ContactSnapshot, ContactStatus,
    VoiceContact,
};

/// Injectable failure for `describe_contact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Report the contact as missing.
    NotFound,
    /// Report access denied.
    AccessDenied,
    /// Report a generic upstream failure.
    Upstream,
}

/// Per-operation call counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallCounts {
    /// Number of `create_chat` calls.
    pub create_chat: usize,
    /// Number of `create_voice` calls.
    pub create_voice: usize,
    /// Number of `describe_contact` calls.
    pub describe: usize,
    /// Number of `stop_contact` calls.
    pub stop: usize,
}

#[derive(Debug, Default)]
struct Inner {
    contacts: HashMap<ContactId, ContactSnapshot>,
    next_id: u64,
    describe_failure: Option<FailureMode>,
    calls: CallCounts,
}

/// In-memory fake contact-center service.
#[derive(Debug, Default)]
pub struct FakeContactCenter {
    inner: Mutex<Inner>,
}

impl FakeContactCenter {
    /// Create an empty fake.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored contact snapshot.
    #[must_use]
    pub fn contact(&self, contact_id: &ContactId) -> Option<ContactSnapshot> {
        self.lock().contacts.get(contact_id).cloned()
    }

    /// Assign an agent to a contact, as the routing engine would.
    ///
    /// # Panics
    ///
    /// Panics if the contact does not exist.
    pub fn assign_agent(&self, contact_id: &ContactId, agent_id: AgentId) {
        let mut inner = self.lock();
        let contact = inner
            .contacts
            .get_mut(contact_id)
            .expect("contact not seeded");
        contact.agent = Some(AgentInfo { id: agent_id });
    }

    /// Mark a contact as ended.
    ///
    /// # Panics
    ///
    /// Panics if the contact does not exist.
    pub fn end_contact(&self, contact_id: &ContactId) {
        let mut inner = self.lock();
        let contact = inner
            .contacts
            .get_mut(contact_id)
            .expect("contact not seeded");
        contact.status = ContactStatus::Ended;
    }

    /// Make every subsequent `describe_contact` fail with the given mode.
    pub fn fail_describe(&self, mode: FailureMode) {
        self.lock().describe_failure = Some(mode);
    }

    /// Clear an injected describe failure.
    pub fn restore_describe(&self) {
        self.lock().describe_failure = None;
    }

    /// Current per-operation call counts.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.lock().calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("fake contact-center lock poisoned")
    }

    fn store_contact(
        inner: &mut Inner,
        prefix: &str,
        channel: Channel,
        attributes: &ContactAttributes,
    ) -> (ContactId, u64) {
        inner.next_id += 1;
        let n = inner.next_id;
        let contact_id = ContactId::new(format!("{prefix}-{n}")).expect("generated id");

        inner.contacts.insert(
            contact_id.clone(),
            ContactSnapshot {
                contact_id: contact_id.clone(),
                channel,
                status: ContactStatus::Active,
                agent: None,
                attributes: attributes.clone(),
            },
        );

        (contact_id, n)
    }
}

#[async_trait]
impl ContactCenter for FakeContactCenter {
    async fn create_chat(
        &self,
        _display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<ChatContact> {
        let mut inner = self.lock();
        inner.calls.create_chat += 1;
        let (contact_id, n) = Self::store_contact(&mut inner, "chat", Channel::Chat, attributes);

        Ok(ChatContact {
            contact_id,
            participant_id: format!("p-{n}"),
            participant_token: format!("tok-{n}"),
        })
    }

    async fn create_voice(
        &self,
        _display_name: &str,
        attributes: &ContactAttributes,
    ) -> Result<VoiceContact> {
        let mut inner = self.lock();
        inner.calls.create_voice += 1;
        let (contact_id, n) = Self::store_contact(&mut inner, "voice", Channel::Voice, attributes);

        Ok(VoiceContact {
            contact_id,
            participant_id: format!("p-{n}"),
            participant_token: format!("tok-{n}"),
            connection_data: Some(json!({ "mediaEndpoint": format!("wss://media.test/{n}") })),
        })
    }

    async fn describe_contact(&self, contact_id: &ContactId) -> Result<ContactSnapshot> {
        let mut inner = self.lock();
        inner.calls.describe += 1;

        match inner.describe_failure {
            Some(FailureMode::NotFound) => {
                return Err(ContactCenterError::NotFound(contact_id.clone()))
            }
            Some(FailureMode::AccessDenied) => {
                return Err(ContactCenterError::AccessDenied("denied".to_string()))
            }
            Some(FailureMode::Upstream) => {
                return Err(ContactCenterError::Upstream("boom".to_string()))
            }
            None => {}
        }

        inner
            .contacts
            .get(contact_id)
            .cloned()
            .ok_or_else(|| ContactCenterError::NotFound(contact_id.clone()))
    }

    async fn stop_contact(&self, contact_id: &ContactId) -> Result<()> {
        let mut inner = self.lock();
        inner.calls.stop += 1;

        let contact = inner
            .contacts
            .get_mut(contact_id)
            .ok_or_else(|| ContactCenterError::NotFound(contact_id.clone()))?;

        if contact.status == ContactStatus::Ended {
            return Err(ContactCenterError::AlreadyEnded(contact_id.clone()));
        }

        contact.status = ContactStatus::Ended;
        Ok(())
    }
}
