//! Preconditions that gate when a Resource may fetch.

use tokio::sync::watch;

use crate::http::{AuthState, SessionGuard, SessionKey};

/// Key reported by triggers that are not tied to a session.
pub const UNGATED_KEY: SessionKey = SessionKey { user_id: 0, epoch: 0 };

/// When a Resource is allowed to fetch.
///
/// A session-bound trigger is satisfied once auth has resolved to an
/// authenticated user, and it is keyed by that user's id and sign-in epoch:
/// signing out, signing in again or signing in as someone else all count as a
/// change, even when the watch channel only delivers the final state.
pub enum FetchTrigger {
    Always,
    Session(watch::Receiver<AuthState>),
}

impl FetchTrigger {
    pub fn always() -> Self {
        FetchTrigger::Always
    }

    pub fn authenticated(session: &SessionGuard) -> Self {
        FetchTrigger::Session(session.subscribe())
    }

    /// `Some(key)` while the trigger is satisfied.
    pub fn current(&mut self) -> Option<SessionKey> {
        match self {
            FetchTrigger::Always => Some(UNGATED_KEY),
            FetchTrigger::Session(rx) => rx.borrow_and_update().session_key(),
        }
    }

    /// Resolves with the new key on the next auth change. Never resolves for
    /// [`FetchTrigger::Always`] or once the session guard is gone.
    pub async fn changed(&mut self) -> Option<SessionKey> {
        match self {
            FetchTrigger::Always => std::future::pending().await,
            FetchTrigger::Session(rx) => {
                if rx.changed().await.is_err() {
                    return std::future::pending().await;
                }
                rx.borrow_and_update().session_key()
            }
        }
    }
}
