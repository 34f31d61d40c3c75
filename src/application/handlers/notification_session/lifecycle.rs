//! SessionLifecycle - the session lifecycle engine.
//!
//! Every mutation of a notification session goes through here: load or
//! receive the aggregate, apply the domain rule, persist through the
//! [`SessionStore`]. Storage technology stays behind the port; the rules stay
//! on the aggregate.
//!
//! Writes are optimistic. A session copy that is older than the stored one
//! is refused with `ConcurrentModification`, so two requests racing on the
//! same session cannot undo each other (a stale copy cannot reopen a
//! COMPLETED session, for instance).

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::{
    AdminId, CampaignId, CompanyId, DomainError, NotificationSessionStatus, SessionId,
};
use crate::domain::notification::{
    ConversationMessage, NotificationSession, SessionError, Suggestion,
};
use crate::ports::SessionStore;

/// Lifecycle engine over the session store.
#[derive(Clone)]
pub struct SessionLifecycle {
    store: Arc<dyn SessionStore>,
}

impl SessionLifecycle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Create and persist a new session in PROCESSING.
    ///
    /// Campaign ownership is checked by the caller before this is reached.
    pub async fn create_session(
        &self,
        topic: Option<String>,
        company_id: CompanyId,
        admin_id: AdminId,
        campaign_id: CampaignId,
    ) -> Result<NotificationSession, SessionError> {
        let session =
            NotificationSession::new(SessionId::new(), company_id, admin_id, campaign_id, topic)?;

        self.store.insert(&session).await?;

        info!(
            session_id = %session.id(),
            company_id = %company_id,
            campaign_id = %campaign_id,
            "notification session created"
        );
        Ok(session)
    }

    /// Tenant-scoped read.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session does not exist or belongs to another company
    pub async fn get_session(
        &self,
        session_id: &SessionId,
        company_id: &CompanyId,
    ) -> Result<NotificationSession, SessionError> {
        self.store
            .find_by_id(session_id, company_id)
            .await?
            .ok_or_else(|| SessionError::not_found(*session_id))
    }

    /// Append generated suggestions.
    pub async fn add_suggestions(
        &self,
        session: &mut NotificationSession,
        suggestions: Vec<Suggestion>,
    ) -> Result<(), SessionError> {
        let count = suggestions.len();
        self.save(session, |s| {
            s.add_suggestions(suggestions);
            Ok(())
        })
        .await?;

        debug!(session_id = %session.id(), count, "suggestions added");
        Ok(())
    }

    /// Replace the admin's selection. No write happens when the session has no
    /// suggestions yet, so retries of an early selection are harmless.
    pub async fn update_selections(
        &self,
        session: &mut NotificationSession,
        selected_indices: &[i64],
    ) -> Result<(), SessionError> {
        self.review_suggestions(session, selected_indices, None).await
    }

    /// Append suggestions the admin explicitly rejected.
    pub async fn reject_suggestions(
        &self,
        session: &mut NotificationSession,
        rejected_indices: &[i64],
    ) -> Result<(), SessionError> {
        if session.all_suggestions().is_empty() {
            return Ok(());
        }
        self.save(session, |s| {
            s.reject_suggestions(rejected_indices);
            Ok(())
        })
        .await
    }

    /// Replace the selection and, if given, record rejections in one write.
    pub async fn review_suggestions(
        &self,
        session: &mut NotificationSession,
        selected_indices: &[i64],
        rejected_indices: Option<&[i64]>,
    ) -> Result<(), SessionError> {
        if session.all_suggestions().is_empty() {
            debug!(session_id = %session.id(), "no suggestions to select from, skipping");
            return Ok(());
        }

        self.save(session, |s| {
            s.update_selections(selected_indices);
            if let Some(rejected) = rejected_indices {
                s.reject_suggestions(rejected);
            }
            Ok(())
        })
        .await
    }

    /// Record admin feedback against the current topic version.
    pub async fn add_feedback(
        &self,
        session: &mut NotificationSession,
        feedback: String,
    ) -> Result<(), SessionError> {
        self.save(session, |s| {
            s.add_feedback(feedback);
            Ok(())
        })
        .await?;

        debug!(
            session_id = %session.id(),
            topic_version = session.current_topic_version(),
            "feedback recorded"
        );
        Ok(())
    }

    /// Change the topic and bump its version. Does not touch status or queue work.
    pub async fn change_topic(
        &self,
        session: &mut NotificationSession,
        new_topic: String,
    ) -> Result<(), SessionError> {
        self.save(session, |s| s.change_topic(new_topic)).await?;

        debug!(
            session_id = %session.id(),
            topic_version = session.current_topic_version(),
            "topic changed"
        );
        Ok(())
    }

    /// Append a conversation entry.
    pub async fn append_message(
        &self,
        session: &mut NotificationSession,
        message: ConversationMessage,
    ) -> Result<(), SessionError> {
        self.save(session, |s| {
            s.append_message(message);
            Ok(())
        })
        .await
    }

    /// Store a generation result and move PROCESSING -> AWAITING_REVIEW in
    /// one write.
    pub async fn record_generation(
        &self,
        session: &mut NotificationSession,
        suggestions: Vec<Suggestion>,
    ) -> Result<(), SessionError> {
        let count = suggestions.len();
        self.save(session, |s| {
            if count > 0 {
                s.add_suggestions(suggestions);
            }
            s.append_message(ConversationMessage::assistant(format!(
                "Generated {} notification suggestions",
                count
            )));
            s.transition_to(NotificationSessionStatus::AwaitingReview)
        })
        .await?;

        info!(
            session_id = %session.id(),
            suggestions = count,
            "session ready for review"
        );
        Ok(())
    }

    /// Validate and persist a status transition.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the state machine forbids it; nothing is written
    /// - `ConcurrentModification` if the stored session moved on since `session`
    ///   was loaded; nothing is written
    pub async fn transition_status(
        &self,
        session: &mut NotificationSession,
        new_status: NotificationSessionStatus,
    ) -> Result<(), SessionError> {
        let from = session.status();
        let result = self.save(session, |s| s.transition_to(new_status)).await;
        if let Err(e) = result {
            warn!(
                session_id = %session.id(),
                from = %from,
                to = %new_status,
                error = %e,
                "rejected status transition"
            );
            return Err(e);
        }

        info!(
            session_id = %session.id(),
            from = %from,
            to = %new_status,
            "session status changed"
        );
        Ok(())
    }

    /// Apply `change` to a copy and persist it. The caller's session is only
    /// replaced once the store accepted the write, so a failed change or a
    /// rejected write leaves both untouched.
    async fn save<F>(&self, session: &mut NotificationSession, change: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut NotificationSession) -> Result<(), DomainError>,
    {
        let mut next = session.clone();
        change(&mut next)?;
        self.store.update(&mut next).await?;
        *session = next;
        Ok(())
    }
}
