//! Sessions for the streamable HTTP transport.
//!
//! Every reply sent on `POST /mcp` is also recorded in the caller's session.
//! A client holding a `GET /mcp` stream receives it live, and a client that
//! reconnects with `Last-Event-ID` gets whatever it missed from a bounded
//! history.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::http::HeaderValue;
use axum::response::sse::Event;
use tokio::sync::{RwLock, broadcast};

/// Events kept per session for replay.
pub const HISTORY_SIZE: usize = 100;

/// Idle time after which a session is dropped.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(3600);

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

const BROADCAST_CAPACITY: usize = 64;

/// A recorded SSE event.
#[derive(Clone, Debug)]
pub struct SessionEvent {
    /// Per-session sequence number, starting at 1.
    pub id: u64,
    /// SSE event name.
    pub kind: &'static str,
    /// Serialized JSON-RPC message.
    pub data: String,
}

impl SessionEvent {
    #[must_use]
    pub fn to_sse_event(&self) -> Event {
        Event::default()
            .id(self.id.to_string())
            .event(self.kind)
            .data(self.data.as_str())
    }
}

/// One client session.
pub struct Session {
    id: String,
    tx: broadcast::Sender<SessionEvent>,
    history: RwLock<VecDeque<SessionEvent>>,
    next_event_id: AtomicU64,
    last_active: RwLock<Instant>,
}

impl Session {
    fn new(id: String) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            id,
            tx,
            history: RwLock::new(VecDeque::with_capacity(HISTORY_SIZE)),
            next_event_id: AtomicU64::new(1),
            last_active: RwLock::new(Instant::now()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Session id as an `Mcp-Session-Id` header value.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.id).ok()
    }

    /// Record a message and deliver it to live subscribers. Returns its event id.
    pub async fn push(&self, kind: &'static str, data: String) -> u64 {
        let id = self.next_event_id.fetch_add(1, Ordering::SeqCst);
        let event = SessionEvent { id, kind, data };

        {
            let mut history = self.history.write().await;
            if history.len() == HISTORY_SIZE {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // No subscribers is fine; the event stays in history.
        let _ = self.tx.send(event);
        self.touch().await;
        id
    }

    /// Events newer than `last_event_id`, oldest first.
    pub async fn events_after(&self, last_event_id: u64) -> Vec<SessionEvent> {
        self.history
            .read()
            .await
            .iter()
            .filter(|e| e.id > last_event_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    pub async fn touch(&self) {
        *self.last_active.write().await = Instant::now();
    }

    async fn idle_for(&self) -> Duration {
        self.last_active.read().await.elapsed()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("next_event_id", &self.next_event_id.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// All live sessions, keyed by id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(uuid::Uuid::new_v4().to_string()));
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), Arc::clone(&session));

        tracing::info!(session_id = %session.id, "Created session");
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Resume `id` if it is still live, otherwise start a new session.
    pub async fn get_or_create(&self, id: Option<&str>) -> Arc<Session> {
        if let Some(session) = match id {
            Some(id) => self.get(id).await,
            None => None,
        } {
            session.touch().await;
            return session;
        }
        self.create().await
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Closed session");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions idle for longer than `timeout`. Returns how many went.
    pub async fn remove_idle(&self, timeout: Duration) -> usize {
        let snapshot: Vec<Arc<Session>> = self.sessions.read().await.values().cloned().collect();

        let mut stale = Vec::new();
        for session in snapshot {
            if session.idle_for().await > timeout {
                stale.push(session.id.clone());
            }
        }

        if !stale.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &stale {
                sessions.remove(id);
                tracing::info!(session_id = %id, "Expired idle session");
            }
        }
        stale.len()
    }

    /// Periodically expire idle sessions for as long as the runtime lives.
    pub fn spawn_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                let removed = store.remove_idle(SESSION_TIMEOUT).await;
                if removed > 0 {
                    tracing::debug!(count = removed, "Session cleanup completed");
                }
            }
        })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
