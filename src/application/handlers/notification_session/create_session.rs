//! CreateSessionHandler - Command handler for starting a notification session.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::foundation::{
    AdminId, CampaignId, CompanyId, NotificationSessionStatus, SessionId,
};
use crate::domain::notification::SessionError;
use crate::ports::{CampaignReader, SessionJob, WorkDispatcher};

use super::SessionLifecycle;

/// Command to create a new notification session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub topic: Option<String>,
    pub company_id: CompanyId,
    pub admin_id: AdminId,
    pub campaign_id: CampaignId,
}

/// Result of successful session creation.
///
/// `status` is the creation-time status. With inline dispatch the stored
/// session may already have moved on by the time this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
    pub status: NotificationSessionStatus,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    campaigns: Arc<dyn CampaignReader>,
    lifecycle: SessionLifecycle,
    dispatcher: Arc<dyn WorkDispatcher>,
}

impl CreateSessionHandler {
    pub fn new(
        campaigns: Arc<dyn CampaignReader>,
        lifecycle: SessionLifecycle,
        dispatcher: Arc<dyn WorkDispatcher>,
    ) -> Self {
        Self {
            campaigns,
            lifecycle,
            dispatcher,
        }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<CreateSessionResult, SessionError> {
        // 1. Campaign must exist for the requesting company
        if self
            .campaigns
            .find_for_company(&cmd.campaign_id, &cmd.company_id)
            .await?
            .is_none()
        {
            warn!(
                campaign_id = %cmd.campaign_id,
                company_id = %cmd.company_id,
                "campaign not found for company"
            );
            return Err(SessionError::CampaignNotFound);
        }

        // 2. Create and persist
        let mut session = self
            .lifecycle
            .create_session(cmd.topic, cmd.company_id, cmd.admin_id, cmd.campaign_id)
            .await?;
        let result = CreateSessionResult {
            session_id: *session.id(),
            status: session.status(),
        };

        // 3. Hand off to processing
        if let Err(e) = self.dispatcher.dispatch(SessionJob::for_session(&session)).await {
            error!(session_id = %session.id(), error = %e, "failed to dispatch session");
            if let Err(mark) = self
                .lifecycle
                .transition_status(&mut session, NotificationSessionStatus::Failed)
                .await
            {
                error!(session_id = %session.id(), error = %mark, "failed to mark session FAILED");
            }
            return Err(SessionError::infrastructure(e.message));
        }

        Ok(result)
    }
}
