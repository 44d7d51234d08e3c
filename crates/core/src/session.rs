//! Sessions: server-held conversation state keyed by an opaque identifier.
//!
//! A [`Session`] always starts with the fixed system instruction. The
//! [`SessionStore`] trait is the narrow interface the chat server is given;
//! the in-process implementation lives in `simchat-sessions`.

use crate::message::{Message, Role};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// Unique identifier for a chat session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A conversation held in server memory between chat requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier
    pub id: SessionId,

    /// Chronological messages; `messages[0]` is the system instruction
    pub messages: Vec<Message>,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// Refreshed on every access; drives idle eviction
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create a session seeded with the system instruction.
    pub fn new(id: SessionId, system_prompt: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: vec![Message::system(system_prompt)],
            created_at: now,
            last_activity: now,
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Mark the session as used at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    /// Whether the session has been idle longer than `idle` at `now`.
    pub fn is_idle(&self, now: DateTime<Utc>, idle: chrono::Duration) -> bool {
        self.last_activity < now - idle
    }

    /// Bound the history to `cap` messages.
    ///
    /// Keeps the system message plus the most recent `cap - 1` messages. Tool
    /// results at the start of the retained window lost their originating
    /// assistant message to the cut, so they are dropped too. Returns the
    /// number of messages removed.
    pub fn trim(&mut self, cap: usize) -> usize {
        let len = self.messages.len();
        if len <= cap {
            return 0;
        }

        let keep_head = usize::from(self.messages.first().is_some_and(|m| m.role == Role::System));
        let mut start = len - cap.saturating_sub(keep_head);
        while start < len && self.messages[start].role == Role::Tool {
            start += 1;
        }

        self.messages.drain(keep_head..start);
        len - self.messages.len()
    }
}

/// Exclusive access to one session for the duration of a chat turn.
pub type SessionGuard = OwnedMutexGuard<Session>;

/// Where sessions live between requests.
///
/// Each session sits behind its own lock: holding the [`SessionGuard`]
/// returned by `get_or_create` serializes turns for the same session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `id`, creating it seeded with the system
    /// message if unseen. Refreshes `last_activity` and trims the history.
    async fn get_or_create(&self, id: &SessionId) -> SessionGuard;

    /// Evict every session idle longer than the store's threshold at `now`.
    /// Returns how many were removed.
    async fn sweep(&self, now: DateTime<Utc>) -> usize;

    /// Whether a session with this id exists.
    async fn contains(&self, id: &SessionId) -> bool;

    /// Number of live sessions.
    async fn len(&self) -> usize;
}
