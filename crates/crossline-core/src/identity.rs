//! Client-side session identity.
//!
//! A session identifier is generated once per client session and reused for
//! every contact and connection registration until the storage backing it is
//! cleared. Persistence is best-effort: if the store cannot be written, the
//! identifier is still usable for the in-memory lifetime of the client.

use std::sync::Mutex;

use crate::ids::SessionId;

/// Client storage for the persisted session identifier.
///
/// Implementations are expected to be scoped to one client session (e.g. a
/// file in a per-session directory, or browser session storage behind a
/// bridge).
pub trait SessionStore {
    /// Load the persisted identifier, if any.
    fn load(&self) -> Option<String>;

    /// Persist the identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage is unavailable.
    fn save(&self, value: &str) -> std::io::Result<()>;
}

/// Return the persisted session identifier, creating one if absent.
///
/// Idempotent within a session: repeated calls against the same store return
/// the same identifier. A fresh identifier is produced only when the store is
/// empty or holds an unparseable value. Save failures are logged and the
/// generated identifier is returned anyway (soft-fail).
pub fn get_or_create<S: SessionStore>(store: &S) -> SessionId {
    if let Some(raw) = store.load() {
        match raw.parse::<SessionId>() {
            Ok(id) => return id,
            Err(_) => {
                tracing::warn!(value = %raw, "Persisted session identifier is invalid, regenerating");
            }
        }
    }

    let id = SessionId::generate();
    if let Err(e) = store.save(&id.to_string()) {
        tracing::warn!(error = %e, "Failed to persist session identifier, continuing in-memory");
    }
    id
}

/// In-memory session store, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the persisted identifier, forcing regeneration on next use.
    pub fn clear(&self) {
        self.value.lock().expect("session store lock poisoned").take();
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<String> {
        self.value.lock().expect("session store lock poisoned").clone()
    }

    fn save(&self, value: &str) -> std::io::Result<()> {
        *self.value.lock().expect("session store lock poisoned") = Some(value.to_string());
        Ok(())
    }
}
