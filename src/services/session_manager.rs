// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::transcript::{Entry, Transcript};

/// One widget visitor: what they have seen and the backend session serving them.
#[derive(Clone, Debug)]
pub struct WidgetSession {
    pub id: String,
    pub upstream_session: Option<String>,
    pub transcript: Transcript,
    pub last_active: Instant,
}

impl WidgetSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            upstream_session: None,
            transcript: Transcript::new(),
            last_active: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, WidgetSession>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    // Create a fresh widget session and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = WidgetSession::new(id.clone());

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        id
    }

    // Ensure there's a session with this id.
    pub async fn ensure_session(&self, id: &str) -> String {
        {
            let guard = self.inner.read().await;
            if guard.contains_key(id) {
                return id.to_string();
            }
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| WidgetSession::new(id));
        id.to_string()
    }

    /// Append to a session's transcript and touch `last_active`. Returns the entry index.
    pub async fn append_entry(&self, session_id: &str, entry: Entry) -> usize {
        let mut guard = self.inner.write().await;
        let session = guard
            .entry(session_id.to_string())
            .or_insert_with(|| WidgetSession::new(session_id));
        session.last_active = Instant::now();
        session.transcript.push(entry)
    }

    /// Overwrite a transcript entry in place.
    pub async fn replace_entry(&self, session_id: &str, index: usize, entry: Entry) -> bool {
        let mut guard = self.inner.write().await;
        match guard.get_mut(session_id) {
            Some(session) => {
                session.last_active = Instant::now();
                session.transcript.replace(index, entry)
            }
            None => false,
        }
    }

    /// Backend session id last issued to this widget session, if any.
    pub async fn upstream_session(&self, session_id: &str) -> Option<String> {
        let guard = self.inner.read().await;
        guard.get(session_id).and_then(|s| s.upstream_session.clone())
    }

    pub async fn set_upstream_session(&self, session_id: &str, upstream: Option<String>) {
        let mut guard = self.inner.write().await;
        if let Some(session) = guard.get_mut(session_id) {
            session.upstream_session = upstream;
        }
    }

    /// Full conversation markup, or `None` for an unknown session.
    pub async fn render_transcript(&self, session_id: &str) -> Option<String> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.transcript.render())
    }

    /// Get a copy of the session's transcript
    pub async fn get_transcript(&self, session_id: &str) -> Option<Transcript> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.transcript.clone())
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_active) < self.ttl);
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// List session ids
    pub async fn list_session_ids(&self) -> Vec<String> {
        let guard = self.inner.read().await;
        guard.keys().cloned().collect()
    }
}
