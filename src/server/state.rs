//! Application state shared across all request handlers.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::coach::engine::CoachOrchestrator;
use crate::server::session::ChatSession;

/// Idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
/// Upper bound on live sessions; the least recently used is evicted beyond it.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Shared application state.
pub struct AppState {
    /// Turn orchestrator, shared with blocking workers.
    pub orchestrator: Arc<CoachOrchestrator>,
    /// Live sessions by id.
    pub sessions: DashMap<Uuid, ChatSession>,
    session_ttl: Duration,
    max_sessions: usize,
}

impl AppState {
    /// Create a new application state with the default session limits.
    #[must_use]
    pub fn new(orchestrator: Arc<CoachOrchestrator>) -> Arc<Self> {
        Self::with_limits(
            orchestrator,
            Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            DEFAULT_MAX_SESSIONS,
        )
    }

    /// Create a new application state with explicit idle TTL and session cap.
    #[must_use]
    pub fn with_limits(
        orchestrator: Arc<CoachOrchestrator>,
        session_ttl: Duration,
        max_sessions: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            orchestrator,
            sessions: DashMap::new(),
            session_ttl,
            max_sessions: max_sessions.max(1),
        })
    }

    /// Create and store an empty session, returning its id.
    ///
    /// Idle sessions are pruned first; at capacity the least recently used one is evicted.
    #[must_use]
    pub fn create_session(&self) -> Uuid {
        self.prune_idle(Utc::now());
        while self.sessions.len() >= self.max_sessions {
            if !self.evict_oldest() {
                break;
            }
        }

        let session = ChatSession::new();
        let id = session.id;
        self.sessions.insert(id, session);
        id
    }

    /// Copy of a session, if it exists.
    #[must_use]
    pub fn snapshot(&self, id: &Uuid) -> Option<ChatSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Record a finished turn unless the session was cleared or dropped since `epoch`.
    #[must_use]
    pub fn record_turn(&self, id: &Uuid, epoch: u64, user_input: &str, reply: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut session) if session.epoch() == epoch => {
                session.record_turn(user_input, reply);
                true
            }
            _ => false,
        }
    }

    /// Drop sessions idle for longer than the TTL. Returns how many were removed.
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.signed_duration_since(session.updated_at) < self.session_ttl);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            tracing::debug!(removed, "pruned idle sessions");
        }
        removed
    }

    fn evict_oldest(&self) -> bool {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().updated_at)
            .map(|entry| *entry.key());
        oldest.is_some_and(|id| self.sessions.remove(&id).is_some())
    }
}
