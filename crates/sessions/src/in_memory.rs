//! In-memory session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use simchat_core::session::{Session, SessionGuard, SessionId, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Sessions keyed by id, each behind its own lock.
///
/// The map lock is only held for lookups, inserts, and sweeps; a chat turn
/// holds the per-session lock instead.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    system_prompt: String,
    max_messages: usize,
    idle_timeout: chrono::Duration,
}

impl InMemorySessionStore {
    pub fn new(system_prompt: impl Into<String>, max_messages: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            system_prompt: system_prompt.into(),
            max_messages,
            idle_timeout: chrono::Duration::from_std(idle_timeout)
                .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100)),
        }
    }

    async fn handle(&self, id: &SessionId) -> Arc<Mutex<Session>> {
        let existing = self.sessions.read().await.get(id.as_str()).cloned();
        if let Some(handle) = existing {
            return handle;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.0.clone())
            .or_insert_with(|| {
                info!(session_id = %id, "Creating session");
                Arc::new(Mutex::new(Session::new(id.clone(), &self.system_prompt)))
            })
            .clone()
    }

    async fn is_live(&self, id: &SessionId, handle: &Arc<Mutex<Session>>) -> bool {
        self.sessions
            .read()
            .await
            .get(id.as_str())
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, id: &SessionId) -> SessionGuard {
        loop {
            let handle = self.handle(id).await;
            let mut session = handle.clone().lock_owned().await;

            // Swept while we waited for the lock: start over with a fresh one.
            if !self.is_live(id, &handle).await {
                continue;
            }

            session.touch(Utc::now());
            let dropped = session.trim(self.max_messages);
            if dropped > 0 {
                debug!(session_id = %id, dropped, "Trimmed session history");
            }
            return session;
        }
    }

    async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_idle(now, self.idle_timeout),
            // Mid-turn sessions are in use by definition.
            Err(_) => true,
        });
        before - sessions.len()
    }

    async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id.as_str())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
