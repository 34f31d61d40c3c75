//! GetSessionHandler - Query handler for reading a single session.

use crate::domain::foundation::{CompanyId, SessionId};
use crate::domain::notification::{NotificationSession, SessionError};

use super::SessionLifecycle;

/// Query for a session by id, scoped to the requesting company.
#[derive(Debug, Clone, Copy)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
    pub company_id: CompanyId,
}

/// Handler for session reads.
pub struct GetSessionHandler {
    lifecycle: SessionLifecycle,
}

impl GetSessionHandler {
    pub fn new(lifecycle: SessionLifecycle) -> Self {
        Self { lifecycle }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<NotificationSession, SessionError> {
        self.lifecycle
            .get_session(&query.session_id, &query.company_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::foundation::{AdminId, CampaignId};
    use std::sync::Arc;
    use uuid::Uuid;

    #[tokio::test]
    async fn returns_session_for_owner_only() {
        let lifecycle = SessionLifecycle::new(Arc::new(InMemorySessionStore::new()));
        let company_id = CompanyId::from_uuid(Uuid::new_v4());
        let session = lifecycle
            .create_session(
                Some("Topic".to_string()),
                company_id,
                AdminId::from_uuid(Uuid::new_v4()),
                CampaignId::new(),
            )
            .await
            .unwrap();
        let handler = GetSessionHandler::new(lifecycle);

        let found = handler
            .handle(GetSessionQuery {
                session_id: *session.id(),
                company_id,
            })
            .await
            .unwrap();
        assert_eq!(found, session);

        let err = handler
            .handle(GetSessionQuery {
                session_id: *session.id(),
                company_id: CompanyId::from_uuid(Uuid::new_v4()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::NotFound(*session.id()));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler =
            GetSessionHandler::new(SessionLifecycle::new(Arc::new(InMemorySessionStore::new())));
        let id = SessionId::new();

        let err = handler
            .handle(GetSessionQuery {
                session_id: id,
                company_id: CompanyId::from_uuid(Uuid::new_v4()),
            })
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::NotFound(id));
    }
}
