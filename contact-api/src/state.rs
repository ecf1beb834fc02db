use std::sync::Arc;

use message_store::MessageStore;
use session_store::SessionStore;

use crate::notify::Notifier;

/// Shared state for the contact handlers: the file-backed store, the
/// session tokens that gate the admin surface, and the optional email
/// relay.
pub struct ContactState {
    pub store: MessageStore,
    pub sessions: Arc<SessionStore>,
    pub notifier: Option<Notifier>,
}

impl ContactState {
    pub fn new(store: MessageStore, sessions: Arc<SessionStore>) -> Self {
        Self {
            store,
            sessions,
            notifier: None,
        }
    }

    pub fn with_notifier(
        store: MessageStore,
        sessions: Arc<SessionStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            sessions,
            notifier: Some(notifier),
        }
    }
}
