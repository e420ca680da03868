//! Session services
//!
//! In-memory per-session state behind the supervisor and the drafting
//! workflow. Each session's state sits behind its own async mutex that a pass
//! holds from start to finish, so one session never has two passes in flight
//! while different sessions run concurrently.

pub mod chat;
pub mod draft;

pub use chat::{ChatReply, ChatService};
pub use draft::{DraftService, DraftTurn};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub struct SessionStore<T> {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<T>>>>>,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Default> Default for SessionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> SessionStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Session slot, created empty on first use
    pub async fn entry(&self, session_id: Uuid) -> Arc<Mutex<T>> {
        if let Some(slot) = self.inner.read().await.get(&session_id) {
            return slot.clone();
        }

        let mut guard = self.inner.write().await;
        guard
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(T::default())))
            .clone()
    }

    pub async fn get(&self, session_id: &Uuid) -> Option<Arc<Mutex<T>>> {
        let guard = self.inner.read().await;
        guard.get(session_id).cloned()
    }

    pub async fn remove(&self, session_id: &Uuid) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entry_returns_the_same_slot() {
        let store: SessionStore<Vec<u32>> = SessionStore::new();
        let id = Uuid::new_v4();

        store.entry(id).await.lock().await.push(7);
        assert_eq!(*store.entry(id).await.lock().await, vec![7]);
        assert_eq!(store.len().await, 1);

        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_clones_share_sessions() {
        let store: SessionStore<Vec<u32>> = SessionStore::new();
        let clone = store.clone();
        let id = Uuid::new_v4();

        tokio_test::block_on(async {
            store.entry(id).await.lock().await.push(1);
            assert_eq!(clone.get(&id).await.unwrap().lock().await.len(), 1);
        });
    }
}
