//! Cookie sessions
//!
//! Sessions live in an in-memory [`SessionStore`] keyed by a random
//! [`SessionId`]. The session middleware places a [`Session`] handle in the
//! request extensions; handlers take it as an extractor and read or change
//! the signed-in user through it.

use super::user::UserId;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};
use thiserror::Error;
use uuid::Uuid;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Cookie value is not a session id
    #[error("Invalid session ID")]
    InvalidSessionId,
}

/// Unique session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random session id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as it appears in the cookie
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(|_| Self(s.to_string()))
            .map_err(|_| SessionError::InvalidSessionId)
    }
}

/// Data kept per session
#[derive(Debug, Clone)]
pub struct SessionData {
    /// When this session was created
    pub created_at: DateTime<Utc>,
    /// When this session was last accessed
    pub last_accessed: DateTime<Utc>,
    /// When this session expires unless touched again
    pub expires_at: DateTime<Utc>,
    /// Signed-in user, if any
    pub user_id: Option<UserId>,
}

impl SessionData {
    /// Anonymous session living for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            last_accessed: now,
            expires_at: now + ttl,
            user_id: None,
        }
    }

    /// Whether the session has expired
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Update last accessed time and push expiry out by `ttl`
    pub fn touch(&mut self, ttl: Duration) {
        self.last_accessed = Utc::now();
        self.expires_at = self.last_accessed + ttl;
    }
}

// Ten years
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// In-memory session storage shared by every request
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    ttl: Duration,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.read().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionStore {
    /// Store whose sessions expire after `max_age_secs` of inactivity
    #[must_use]
    pub fn new(max_age_secs: u64) -> Self {
        let secs = i64::try_from(max_age_secs.min(MAX_TTL_SECS)).unwrap_or_default();
        Self {
            sessions: Arc::default(),
            ttl: Duration::seconds(secs),
        }
    }

    /// Start a new anonymous session
    #[must_use]
    pub fn create(&self) -> SessionId {
        let id = SessionId::generate();
        self.sessions.write().insert(id.clone(), SessionData::new(self.ttl));
        id
    }

    /// Load a live session and extend it
    ///
    /// An expired session is removed and reported as absent.
    #[must_use]
    pub fn load(&self, id: &SessionId) -> Option<SessionData> {
        let mut sessions = self.sessions.write();
        if sessions.get(id)?.is_expired() {
            sessions.remove(id);
            return None;
        }
        let data = sessions.get_mut(id)?;
        data.touch(self.ttl);
        Some(data.clone())
    }

    /// Set or clear the signed-in user; returns whether the session exists
    pub fn set_user_id(&self, id: &SessionId, user_id: Option<UserId>) -> bool {
        match self.sessions.write().get_mut(id) {
            Some(data) => {
                data.user_id = user_id;
                true
            }
            None => false,
        }
    }

    /// Signed-in user of a session
    #[must_use]
    pub fn user_id(&self, id: &SessionId) -> Option<UserId> {
        self.sessions.read().get(id).and_then(|data| data.user_id.clone())
    }

    /// Forget a session
    pub fn destroy(&self, id: &SessionId) {
        self.sessions.write().remove(id);
    }

    /// Drop every expired session, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired());
        before - sessions.len()
    }

    /// Number of stored sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Whether no sessions are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, id: SessionId, data: SessionData) {
        self.sessions.write().insert(id, data);
    }
}

/// The current request's session
///
/// Inserted by [`crate::middleware::SessionLayer`]; extracting it without the
/// layer installed is a server error.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    store: SessionStore,
}

impl Session {
    /// Handle onto session `id` in `store`
    #[must_use]
    pub const fn new(id: SessionId, store: SessionStore) -> Self {
        Self { id, store }
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    /// Signed-in user, if any
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.store.user_id(&self.id)
    }

    /// Mark `user_id` as signed in
    pub fn sign_in(&self, user_id: UserId) {
        tracing::debug!(session = %self.id, user_id = %user_id, "session signed in");
        self.store.set_user_id(&self.id, Some(user_id));
    }

    /// End the session
    pub fn destroy(&self) {
        tracing::debug!(session = %self.id, "session destroyed");
        self.store.destroy(&self.id);
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Session layer is not installed",
        ))
    }
}
