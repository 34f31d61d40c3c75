//! In-memory session store for tests and local runs.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It holds every tenant's sessions in
//! one map and loses them on restart. Production uses `PostgresSessionStore`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{CompanyId, DomainError, ErrorCode, SessionId};
use crate::domain::notification::NotificationSession;
use crate::ports::SessionStore;

/// In-memory session store keyed by session id.
///
/// Lookups still require the owning company to match, mirroring the
/// `WHERE id = $1 AND company_id = $2` of the Postgres adapter.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, NotificationSession>>,
    updates: AtomicUsize,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns a stored session regardless of tenant (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn find(&self, id: &SessionId) -> Option<NotificationSession> {
        self.sessions
            .read()
            .expect("InMemorySessionStore: sessions lock poisoned")
            .get(id)
            .cloned()
    }

    /// Snapshot of every stored session.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn all(&self) -> Vec<NotificationSession> {
        self.sessions
            .read()
            .expect("InMemorySessionStore: sessions lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Number of stored sessions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .expect("InMemorySessionStore: sessions lock poisoned")
            .len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successful `update` calls.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "session store lock poisoned")
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &NotificationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        if sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionConflict,
                format!("Session already exists: {}", session.id()),
            )
            .with_detail("session_id", session.id().to_string()));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SessionId,
        company_id: &CompanyId,
    ) -> Result<Option<NotificationSession>, DomainError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions
            .get(id)
            .filter(|s| s.belongs_to(company_id))
            .cloned())
    }

    async fn update(&self, session: &mut NotificationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().map_err(|_| poisoned())?;
        let stored = match sessions.get_mut(session.id()) {
            Some(stored) if stored.belongs_to(session.company_id()) => stored,
            _ => {
                return Err(DomainError::new(ErrorCode::SessionNotFound, "Session not found")
                    .with_detail("session_id", session.id().to_string()))
            }
        };
        if stored.revision() != session.revision() {
            return Err(DomainError::new(
                ErrorCode::ConcurrencyConflict,
                format!(
                    "Session {} is at revision {}, update was based on {}",
                    session.id(),
                    stored.revision(),
                    session.revision()
                ),
            )
            .with_detail("session_id", session.id().to_string()));
        }

        session.advance_revision();
        *stored = session.clone();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
