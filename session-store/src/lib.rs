//! In-memory admin session tokens
//!
//! The admin surface is gated by bearer tokens minted at login. Tokens
//! are random 32-byte hex strings, expire 24 hours after creation, and
//! never touch disk; restarting the server logs everyone out.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::RngCore;
use subtle::ConstantTimeEq;

/// How long a login stays valid.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Session {
    username: String,
    created: Instant,
}

/// Token store shared across all HTTP handlers.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL)
    }

    /// Create a store with a custom expiry window.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Mint a token for the given user.
    pub fn create(&self, username: &str) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                created: Instant::now(),
            },
        );
        token
    }

    /// Look up a token, returning the username it was minted for.
    /// Expired sessions are purged on the way through.
    pub fn verify(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().unwrap();
        let ttl = self.ttl;
        sessions.retain(|_, s| s.created.elapsed() < ttl);
        sessions.get(token).map(|s| s.username.clone())
    }

    /// Revoke a token. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.lock().unwrap().remove(token).is_some()
    }

    /// Number of live sessions (for monitoring).
    pub fn active_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Constant-time credential comparison. Both fields are always compared
/// so a mismatch reveals nothing about which one was wrong.
pub fn credentials_match(
    expected_username: &str,
    expected_password: &str,
    username: &str,
    password: &str,
) -> bool {
    let user_ok = expected_username.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = expected_password.as_bytes().ct_eq(password.as_bytes());
    bool::from(user_ok & pass_ok)
}
