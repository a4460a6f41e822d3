use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::LOG_TARGET;

/// In-memory `login → session token` map.
///
/// Created once at process start and injected into whatever needs it;
/// the contents do not survive a restart. A login can be present at
/// most once, so logging in again replaces the previous token.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `login` as logged in under `token`.
    pub async fn insert(&self, login: &str, token: &str) {
        self.sessions
            .write()
            .await
            .insert(login.to_owned(), token.to_owned());
        debug!(target: LOG_TARGET, login, "Session opened");
    }

    /// Drop the session for `login`; `false` when it was not logged
    /// in.
    pub async fn remove(&self, login: &str) -> bool {
        let removed = self.sessions.write().await.remove(login).is_some();
        if removed {
            debug!(target: LOG_TARGET, login, "Session closed");
        }
        removed
    }

    pub async fn contains_login(&self, login: &str) -> bool {
        self.sessions.read().await.contains_key(login)
    }

    /// Reverse lookup across session values: the login whose token
    /// equals `token` (first match in iteration order when several
    /// logins share one).
    pub async fn login_for_token(&self, token: &str) -> Option<String> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|(_, session_token)| *session_token == token)
            .map(|(login, _)| login.clone())
    }
}
