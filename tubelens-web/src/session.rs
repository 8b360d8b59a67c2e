//! In-memory per-session state.
//!
//! Each browser tab owns one session, keyed by a v4 UUID the page requests
//! on load. Sessions hold the user's credential and the most recent report
//! and nothing else; everything is lost on process exit.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub credential: Option<String>,
    pub last_report: Option<String>,
}

/// Shared store of independent sessions. Concurrent sessions never observe
/// each other's state.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, Session::default());
        tracing::debug!(session = %id, "session created");
        id
    }

    /// Snapshot of one session, if it exists.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Returns false when the session is unknown.
    pub async fn set_credential(&self, id: Uuid, credential: String) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.credential = Some(credential);
                true
            }
            None => false,
        }
    }

    /// Overwrites any prior report. Returns false when the session is
    /// unknown.
    pub async fn set_report(&self, id: Uuid, report: String) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.last_report = Some(report);
                true
            }
            None => false,
        }
    }
}
