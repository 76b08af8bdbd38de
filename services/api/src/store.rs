//! In-memory Session Store
//!
//! Debates live only as long as the process. Each session sits behind its
//! own async mutex so that at most one advance runs on it at a time.

use debate_core::DebateSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<DebateSession>>;

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: DebateSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        let id = store.insert(DebateSession::new("Topic").unwrap()).await;

        let session = store.get(id).await.expect("session should be stored");
        assert_eq!(session.lock().await.topic(), "Topic");
        assert_eq!(store.len().await, 1);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let first = store.insert(DebateSession::new("One").unwrap()).await;
        let second = store.insert(DebateSession::new("Two").unwrap()).await;

        assert_ne!(first, second);

        let held = store.get(first).await.unwrap();
        let _guard = held.lock().await;
        let other = store.get(second).await.unwrap();
        assert!(other.try_lock().is_ok());
    }
}
