pub mod engine;
pub mod points;
pub mod result;
pub mod roster;
pub mod session;
mod sse;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::{config::AppConfig, dao::result_sink::ResultSink, error::ServiceError};

pub use self::sse::SseHub;
use self::session::MatchSession;

pub type SharedState = Arc<AppState>;

/// Handle on one scoreboard. Events for a session are serialized by its lock.
pub type SessionHandle = Arc<Mutex<MatchSession>>;

/// Central application state: live sessions, the result sink and the SSE hub.
pub struct AppState {
    config: AppConfig,
    sessions: DashMap<Uuid, SessionHandle>,
    session_count: AtomicUsize,
    result_sink: RwLock<Option<Arc<dyn ResultSink>>>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a result sink is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let sse = SseHub::new(config.sse_capacity());
        Arc::new(Self {
            config,
            sessions: DashMap::new(),
            session_count: AtomicUsize::new(0),
            result_sink: RwLock::new(None),
            sse,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current result sink, if one is installed.
    pub async fn result_sink(&self) -> Option<Arc<dyn ResultSink>> {
        let guard = self.result_sink.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the result sink or fail with [`ServiceError::Degraded`].
    pub async fn require_result_sink(&self) -> Result<Arc<dyn ResultSink>, ServiceError> {
        self.result_sink().await.ok_or(ServiceError::Degraded)
    }

    /// Install a result sink and leave degraded mode.
    pub async fn install_result_sink(&self, sink: Arc<dyn ResultSink>) {
        let mut guard = self.result_sink.write().await;
        *guard = Some(sink);
    }

    /// Current degraded flag: no result sink to deliver finished matches to.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.result_sink.read().await;
        guard.is_none()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Registry of live sessions keyed by their identifier.
    pub fn sessions(&self) -> &DashMap<Uuid, SessionHandle> {
        &self.sessions
    }

    /// Register a session, refusing it once `max_sessions` are open.
    pub fn insert_session(&self, session: MatchSession) -> Result<SessionHandle, ServiceError> {
        let limit = self.config.max_sessions();
        self.session_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < limit).then_some(count + 1)
            })
            .map_err(|_| ServiceError::InvalidState(format!("session limit reached ({limit})")))?;

        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, handle.clone());
        Ok(handle)
    }

    /// Unregister a session, returning its handle.
    pub fn remove_session(&self, id: Uuid) -> Option<SessionHandle> {
        let (_, handle) = self.sessions.remove(&id)?;
        self.session_count.fetch_sub(1, Ordering::AcqRel);
        Some(handle)
    }

    /// Look up a session handle.
    pub fn session(&self, id: Uuid) -> Result<SessionHandle, ServiceError> {
        self.sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::NotFound(format!("session `{id}` not found")))
    }
}
