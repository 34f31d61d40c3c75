//! Work dispatcher port.
//!
//! Hands a session to the processing routine. Two strategies exist, chosen
//! once at startup: deferred (queued to a worker, returns immediately) and
//! inline (runs in the caller's task). Both end in the same
//! [`SessionProcessor`](super::SessionProcessor) call, so the effect on a
//! session is identical and only latency differs.

use crate::domain::foundation::{CompanyId, DomainError, SessionId};
use crate::domain::notification::NotificationSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Unit of work handed to a dispatcher.
///
/// Carries the owning company so the worker's re-fetch stays tenant-scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionJob {
    pub session_id: SessionId,
    pub company_id: CompanyId,
}

impl SessionJob {
    pub fn for_session(session: &NotificationSession) -> Self {
        Self {
            session_id: *session.id(),
            company_id: *session.company_id(),
        }
    }
}

/// Dispatcher port.
#[async_trait]
pub trait WorkDispatcher: Send + Sync {
    /// Submit a job for processing.
    ///
    /// # Errors
    ///
    /// - `QueueError` if a deferred job could not be enqueued
    ///
    /// Processing failures are never returned here; they are recorded on the
    /// session as FAILED.
    async fn dispatch(&self, job: SessionJob) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn work_dispatcher_is_object_safe() {
        fn _accepts_dyn(_dispatcher: &dyn WorkDispatcher) {}
    }

    #[test]
    fn job_serializes_to_flat_json() {
        let job = SessionJob {
            session_id: SessionId::from_uuid(Uuid::nil()),
            company_id: CompanyId::from_uuid(Uuid::nil()),
        };
        let json = serde_json::to_value(job).unwrap();
        assert_eq!(json["session_id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["company_id"], "00000000-0000-0000-0000-000000000000");
    }
}
