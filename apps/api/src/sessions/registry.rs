use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::sessions::ClientSession;

pub type SessionHandle = Arc<Mutex<ClientSession>>;

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Live client sessions keyed by id. Sessions are in-memory only and
/// expire once idle for longer than the configured window.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> (Uuid, SessionHandle) {
        let session = ClientSession::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        let entry = Entry {
            handle: handle.clone(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        debug!("Session {id} created");
        (id, handle)
    }

    /// Looks a session up and marks it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        let removed = self.sessions.write().await.remove(&id).map(|e| e.handle);
        if removed.is_some() {
            debug!("Session {id} removed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions unseen for at least `idle`. A session whose handle is
    /// still held by a request is kept regardless of age.
    pub async fn sweep(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            Arc::strong_count(&entry.handle) > 1 || now.duration_since(entry.last_seen) < idle
        });
        let expired = before - sessions.len();
        if expired > 0 {
            info!("Expired {expired} idle sessions; {} remain", sessions.len());
        }
        expired
    }

    /// Sweeps on a fixed period until the task is dropped.
    pub async fn run_sweeper(self: Arc<Self>, idle: Duration) {
        let period = (idle / 4).max(Duration::from_secs(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("Session sweeper running every {period:?}");
        loop {
            ticker.tick().await;
            self.sweep(idle).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_remove() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create().await;

        assert_eq!(handle.lock().await.id, id);
        assert!(registry.get(id).await.is_some());
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await.is_some());
        assert!(registry.get(id).await.is_none());
        assert!(registry.remove(id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let (a, _) = registry.create().await;
        let (b, _) = registry.create().await;
        assert_ne!(a, b);

        registry.get(a).await.unwrap().lock().await.advisory = Some("only a".to_string());
        assert!(registry.get(b).await.unwrap().lock().await.advisory.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_swept() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create().await;
        drop(handle);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(registry.sweep(Duration::from_secs(60)).await, 0);

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(registry.sweep(Duration::from_secs(60)).await, 1);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_keeps_session_alive() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create().await;
        drop(handle);

        tokio::time::advance(Duration::from_secs(45)).await;
        drop(registry.get(id).await);
        tokio::time::advance(Duration::from_secs(45)).await;

        assert_eq!(registry.sweep(Duration::from_secs(60)).await, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_in_use_is_not_swept() {
        let registry = SessionRegistry::new();
        let (id, _held) = registry.create().await;

        tokio::time::advance(Duration::from_secs(600)).await;

        assert_eq!(registry.sweep(Duration::from_secs(60)).await, 0);
        assert!(registry.get(id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweeper_expires_sessions() {
        let registry = Arc::new(SessionRegistry::new());
        let (_, handle) = registry.create().await;
        drop(handle);

        let sweeper = tokio::spawn(registry.clone().run_sweeper(Duration::from_secs(60)));
        tokio::time::sleep(Duration::from_secs(90)).await;

        assert_eq!(registry.len().await, 0);
        sweeper.abort();
    }
}
