//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the in-memory session store.

use crate::config::Config;
use hiring_assistant_core::{CallControl, InterviewSession, SessionPorts};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ports: SessionPorts,
    pub sessions: Arc<SessionStore>,
    /// Cancelled on shutdown to abort in-flight model and search calls.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Arc<Config>, ports: SessionPorts) -> Self {
        Self {
            config,
            ports,
            sessions: Arc::new(SessionStore::default()),
            shutdown: CancellationToken::new(),
        }
    }

    /// The deadline and cancellation applied to every collaborator call.
    pub fn call_control(&self) -> CallControl {
        CallControl::with_timeout(self.config.llm_timeout).cancelled_by(self.shutdown.child_token())
    }
}

//=========================================================================================
// SessionStore (One Entry Per Candidate Interview)
//=========================================================================================

/// A shared handle to one session. The mutex makes each session single-writer.
pub type SessionHandle = Arc<Mutex<InterviewSession>>;

struct StoredSession {
    handle: SessionHandle,
    /// Milliseconds since the store's epoch at the last lookup.
    last_seen_ms: AtomicU64,
}

/// Sessions keyed by id. Nothing is shared between sessions.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
    epoch: Instant,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            epoch: Instant::now(),
        }
    }
}

impl SessionStore {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Creates a freshly seeded session and returns its id.
    pub async fn create(&self, ports: SessionPorts) -> Uuid {
        let id = Uuid::new_v4();
        let stored = StoredSession {
            handle: Arc::new(Mutex::new(InterviewSession::new(id, ports))),
            last_seen_ms: AtomicU64::new(self.now_ms()),
        };
        self.sessions.write().await.insert(id, stored);
        info!(session_id = %id, "Session created");
        id
    }

    /// Looks a session up and marks it as recently used.
    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        let stored = sessions.get(&id)?;
        stored.last_seen_ms.store(self.now_ms(), Ordering::Relaxed);
        Some(stored.handle.clone())
    }

    /// Drops a session from memory. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session removed");
        }
        removed
    }

    /// Drops every session not looked up within `ttl` and returns how many were dropped.
    ///
    /// A handler still holding an evicted session's handle finishes normally.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = self.now_ms();
        let ttl_ms = ttl.as_millis() as u64;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, stored| {
            let idle_ms = now.saturating_sub(stored.last_seen_ms.load(Ordering::Relaxed));
            let keep = idle_ms < ttl_ms;
            if !keep {
                debug!(session_id = %id, idle_ms, "Evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically evicts sessions idle for longer than `ttl` until `shutdown` is cancelled.
pub fn spawn_idle_sweeper(
    sessions: Arc<SessionStore>,
    ttl: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = sessions.evict_idle(ttl).await;
                    if removed > 0 {
                        info!(removed, "Evicted idle sessions");
                    }
                }
            }
        }
        debug!("Idle session sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hiring_assistant_core::{
        ConversationTurn, FollowUpResponder, PortResult, Responder, SentimentAnalyzer,
    };

    struct Silent;

    #[async_trait]
    impl Responder for Silent {
        async fn generate(&self, _: &str, _: &[ConversationTurn]) -> PortResult<String> {
            Ok(String::new())
        }
    }

    #[async_trait]
    impl FollowUpResponder for Silent {
        async fn answer(&self, _: &str, _: &[ConversationTurn]) -> PortResult<String> {
            Ok(String::new())
        }
    }

    impl SentimentAnalyzer for Silent {
        fn polarity(&self, _: &str) -> f64 {
            0.0
        }
    }

    fn ports() -> SessionPorts {
        SessionPorts {
            responder: Arc::new(Silent),
            follow_up: Arc::new(Silent),
            analyzer: Arc::new(Silent),
        }
    }

    #[tokio::test]
    async fn test_recent_sessions_survive_eviction() {
        let store = SessionStore::default();
        let id = store.create(ports()).await;

        assert_eq!(store.evict_idle(Duration::from_secs(3600)).await, 0);
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn test_lookup_refreshes_idle_clock() {
        let store = SessionStore::default();
        let active = store.create(ports()).await;
        let idle = store.create(ports()).await;

        tokio::time::sleep(Duration::from_millis(60)).await;
        store.get(active).await.unwrap();

        assert_eq!(store.evict_idle(Duration::from_millis(40)).await, 1);
        assert!(store.get(active).await.is_some());
        assert!(store.get(idle).await.is_none());
    }

    #[tokio::test]
    async fn test_evicted_handle_stays_usable() {
        let store = SessionStore::default();
        let id = store.create(ports()).await;
        let handle = store.get(id).await.unwrap();

        assert_eq!(store.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(handle.lock().await.id(), id);
    }

    #[tokio::test]
    async fn test_sweeper_evicts_and_stops_on_shutdown() {
        let store = Arc::new(SessionStore::default());
        store.create(ports()).await;
        let shutdown = CancellationToken::new();

        let sweeper = spawn_idle_sweeper(store.clone(), Duration::ZERO, shutdown.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.is_empty().await);

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), sweeper)
            .await
            .expect("sweeper should stop after shutdown")
            .unwrap();
    }
}
