//! Live session table, SenderCompID → session handle.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::handle::{SessionError, SessionHandle};
use crate::fix::message::FixMessage;
use crate::fix::tags;

/// Reader-many, writer-few table of logged-in sessions.
///
/// Registration happens at logon, removal at teardown. The execution
/// dispatcher resolves owning sessions here.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session under its SenderCompID.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateCompId` if another live session
    /// already holds the comp id.
    pub fn register(&self, comp_id: &str, handle: Arc<SessionHandle>) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(comp_id) {
            return Err(SessionError::DuplicateCompId {
                comp_id: comp_id.to_string(),
            });
        }
        sessions.insert(comp_id.to_string(), handle);
        Ok(())
    }

    /// Remove a session, but only if the entry still points at `handle`.
    ///
    /// A session that lost its comp id to a reconnect must not evict the
    /// newer registration on its own teardown.
    pub fn unregister(&self, comp_id: &str, handle: &Arc<SessionHandle>) {
        let mut sessions = self.sessions.write();
        if let Some(current) = sessions.get(comp_id) {
            if Arc::ptr_eq(current, handle) {
                sessions.remove(comp_id);
            }
        }
    }

    /// Look up the live session for a SenderCompID.
    #[must_use]
    pub fn get(&self, comp_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.read().get(comp_id).cloned()
    }

    /// Number of logged-in sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no session is logged in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Ask every live session to log out (shutdown grace).
    pub fn logout_all(&self, text: &str) {
        let handles: Vec<Arc<SessionHandle>> = self.sessions.read().values().cloned().collect();
        for handle in handles {
            let mut logout = FixMessage::new(tags::msg_type::LOGOUT);
            logout.push(tags::TAG_TEXT, text);
            if handle.send(logout).is_err() {
                tracing::debug!(session = handle.id(), "logout not delivered, session closing");
            }
        }
    }

    /// Cancel every live session outright.
    pub fn cancel_all(&self) {
        let handles: Vec<Arc<SessionHandle>> = self.sessions.read().values().cloned().collect();
        for handle in handles {
            handle.cancel_token().cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    fn make_handle(id: u64) -> Arc<SessionHandle> {
        let (tx, rx) = mpsc::unbounded_channel();
        // Keep the receiver alive for the test's duration.
        std::mem::forget(rx);
        Arc::new(SessionHandle::new(
            id,
            "127.0.0.1:4000".parse().unwrap(),
            tx,
            Duration::from_secs(30),
            CancellationToken::new(),
        ))
    }

    #[test]
    fn register_and_get() {
        let registry = SessionRegistry::new();
        let handle = make_handle(1);

        registry.register("TEST_CLIENT", Arc::clone(&handle)).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("TEST_CLIENT").is_some());
        assert!(registry.get("OTHER").is_none());
    }

    #[test]
    fn duplicate_comp_id_refused() {
        let registry = SessionRegistry::new();
        registry.register("TEST_CLIENT", make_handle(1)).unwrap();

        let result = registry.register("TEST_CLIENT", make_handle(2));
        assert!(matches!(
            result,
            Err(SessionError::DuplicateCompId { comp_id }) if comp_id == "TEST_CLIENT"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_only_evicts_own_entry() {
        let registry = SessionRegistry::new();
        let first = make_handle(1);
        let second = make_handle(2);

        registry.register("TEST_CLIENT", Arc::clone(&first)).unwrap();
        registry.unregister("TEST_CLIENT", &second);
        assert_eq!(registry.len(), 1, "foreign handle must not evict");

        registry.unregister("TEST_CLIENT", &first);
        assert!(registry.is_empty());
    }

    #[test]
    fn cancel_all_trips_every_token() {
        let registry = SessionRegistry::new();
        let a = make_handle(1);
        let b = make_handle(2);
        registry.register("A", Arc::clone(&a)).unwrap();
        registry.register("B", Arc::clone(&b)).unwrap();

        registry.cancel_all();
        assert!(a.cancel_token().is_cancelled());
        assert!(b.cancel_token().is_cancelled());
    }
}
