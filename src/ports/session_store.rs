//! Session store port.
//!
//! Defines the contract for persisting and retrieving NotificationSession
//! aggregates. Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Tenant-scoped**: every read and write is keyed by (session id, company id)
//!   inside the storage query itself
//! - **Transactional**: a failed write leaves no partial record visible
//! - **Optimistic**: `update` only applies when the stored revision still
//!   equals the revision the caller loaded

use crate::domain::foundation::{CompanyId, DomainError, SessionId};
use crate::domain::notification::NotificationSession;
use async_trait::async_trait;

/// Store port for NotificationSession persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session.
    ///
    /// # Errors
    ///
    /// - `SessionConflict` if a session with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, session: &NotificationSession) -> Result<(), DomainError>;

    /// Find a session owned by `company_id`.
    ///
    /// Returns `None` both when the session does not exist and when it belongs
    /// to another company.
    async fn find_by_id(
        &self,
        id: &SessionId,
        company_id: &CompanyId,
    ) -> Result<Option<NotificationSession>, DomainError>;

    /// Persist the mutable fields of an existing session.
    ///
    /// The write is conditional on the stored revision equalling
    /// `session.revision()`. On success the stored revision is one higher and
    /// `session` has been advanced to match.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no session matches (id, company)
    /// - `ConcurrencyConflict` if the stored revision moved on; nothing is written
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &mut NotificationSession) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
