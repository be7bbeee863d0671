//! Session state shared by every Resource trigger.
//!
//! Authentication itself belongs to the backend. This module only mirrors what the
//! backend told us (`/login`, `/verify_auth`, a 401 anywhere) into a
//! [`watch`] channel so that resource actors can gate their fetches on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::model::SessionUser;

/// Identity of an authenticated session. Resources are keyed to it implicitly.
///
/// `epoch` counts sign-ins, so signing out and back in as the same user is
/// still a different session even when a watcher only sees the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub user_id: i64,
    pub epoch: u64,
}

/// Snapshot of the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
    /// Sign-in counter of the session that produced this state.
    pub epoch: u64,
}

impl AuthState {
    /// State before the first auth check has resolved.
    pub fn pending() -> Self {
        Self { is_loading: true, is_authenticated: false, user: None, epoch: 0 }
    }

    /// `Some(key)` once auth has resolved to an authenticated user.
    pub fn session_key(&self) -> Option<SessionKey> {
        if self.is_loading || !self.is_authenticated {
            return None;
        }
        self.user.as_ref().map(|user| SessionKey { user_id: user.id, epoch: self.epoch })
    }
}

/// Out-of-band session notifications for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(SessionUser),
    SignedOut,
    /// A request came back 401; the application should send the user to login.
    LoginRequired,
}

struct SessionInner {
    state: watch::Sender<AuthState>,
    events: broadcast::Sender<SessionEvent>,
    expirations: AtomicU64,
    sign_ins: AtomicU64,
}

/// Cloneable handle over the current [`AuthState`].
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<SessionInner>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::pending());
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(SessionInner {
                state,
                events,
                expirations: AtomicU64::new(0),
                sign_ins: AtomicU64::new(0),
            }),
        }
    }

    pub fn current(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Number of times a 401 has expired the session.
    pub fn expirations(&self) -> u64 {
        self.inner.expirations.load(Ordering::SeqCst)
    }

    /// Marks an auth check as in flight.
    pub fn begin_check(&self) {
        self.inner.state.send_modify(|state| state.is_loading = true);
    }

    pub fn sign_in(&self, user: SessionUser) {
        let epoch = self.inner.sign_ins.fetch_add(1, Ordering::SeqCst) + 1;
        info!(user_id = user.id, role = %user.role, epoch, "Signed in");
        self.inner.state.send_replace(AuthState {
            is_loading: false,
            is_authenticated: true,
            user: Some(user.clone()),
            epoch,
        });
        let _ = self.inner.events.send(SessionEvent::SignedIn(user));
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.clear();
        let _ = self.inner.events.send(SessionEvent::SignedOut);
    }

    /// Central 401 handling: drop the session and ask the app for a login.
    pub fn expire(&self) {
        let count = self.inner.expirations.fetch_add(1, Ordering::SeqCst) + 1;
        warn!(expirations = count, "Session expired; login required");
        self.clear();
        let _ = self.inner.events.send(SessionEvent::LoginRequired);
    }

    fn clear(&self) {
        self.inner.state.send_modify(|state| {
            state.is_loading = false;
            state.is_authenticated = false;
            state.user = None;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> SessionUser {
        SessionUser {
            id,
            username: format!("user{id}"),
            name: "Test".into(),
            email: None,
            department: Some("Quality".into()),
            role: "user".into(),
            is_active: true,
        }
    }

    #[test]
    fn session_key_requires_resolved_authentication() {
        assert_eq!(AuthState::pending().session_key(), None);

        let guard = SessionGuard::new();
        guard.sign_in(user(4));
        assert_eq!(guard.current().session_key(), Some(SessionKey { user_id: 4, epoch: 1 }));

        guard.begin_check();
        assert_eq!(guard.current().session_key(), None);
    }

    #[test]
    fn signing_in_again_is_a_new_session() {
        let guard = SessionGuard::new();
        guard.sign_in(user(4));
        let first = guard.current().session_key();
        guard.sign_out();
        guard.sign_in(user(4));
        let second = guard.current().session_key();

        assert_ne!(first, second);
        assert_eq!(second.map(|key| key.user_id), Some(4));
    }

    #[tokio::test]
    async fn expire_clears_state_and_requests_login() {
        let guard = SessionGuard::new();
        let mut events = guard.events();
        guard.sign_in(user(1));
        guard.expire();

        assert!(!guard.current().is_authenticated);
        assert_eq!(guard.expirations(), 1);
        assert!(matches!(events.recv().await, Ok(SessionEvent::SignedIn(_))));
        assert_eq!(events.recv().await.ok(), Some(SessionEvent::LoginRequired));
    }
}
