//! ReviewSessionHandler - Admin review commands on a generated session.
//!
//! Selections, feedback, topic changes and completion. Feedback and topic
//! changes on an AWAITING_REVIEW session send it back through processing.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::foundation::{CompanyId, NotificationSessionStatus, SessionId, StateMachine};
use crate::domain::notification::{NotificationSession, SessionError};
use crate::ports::{SessionJob, WorkDispatcher};

use super::SessionLifecycle;

/// Replace the selection and optionally reject suggestions.
#[derive(Debug, Clone)]
pub struct UpdateSelectionsCommand {
    pub session_id: SessionId,
    pub company_id: CompanyId,
    pub selected_indices: Vec<i64>,
    pub rejected_indices: Option<Vec<i64>>,
}

/// Record admin feedback.
#[derive(Debug, Clone)]
pub struct SubmitFeedbackCommand {
    pub session_id: SessionId,
    pub company_id: CompanyId,
    pub feedback: String,
}

/// Change the session topic.
#[derive(Debug, Clone)]
pub struct ChangeTopicCommand {
    pub session_id: SessionId,
    pub company_id: CompanyId,
    pub topic: String,
}

/// Mark a reviewed session done.
#[derive(Debug, Clone, Copy)]
pub struct CompleteSessionCommand {
    pub session_id: SessionId,
    pub company_id: CompanyId,
}

/// Outcome of a review command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewResult {
    pub session_id: SessionId,
    pub status: NotificationSessionStatus,
}

impl ReviewResult {
    fn of(session: &NotificationSession) -> Self {
        Self {
            session_id: *session.id(),
            status: session.status(),
        }
    }
}

/// Handler for admin review commands.
pub struct ReviewSessionHandler {
    lifecycle: SessionLifecycle,
    dispatcher: Arc<dyn WorkDispatcher>,
}

impl ReviewSessionHandler {
    pub fn new(lifecycle: SessionLifecycle, dispatcher: Arc<dyn WorkDispatcher>) -> Self {
        Self {
            lifecycle,
            dispatcher,
        }
    }

    /// Apply selections. Only allowed while AWAITING_REVIEW.
    pub async fn update_selections(
        &self,
        cmd: UpdateSelectionsCommand,
    ) -> Result<NotificationSession, SessionError> {
        let mut session = self
            .lifecycle
            .get_session(&cmd.session_id, &cmd.company_id)
            .await?;
        require_status(&session, NotificationSessionStatus::AwaitingReview)?;

        self.lifecycle
            .review_suggestions(
                &mut session,
                &cmd.selected_indices,
                cmd.rejected_indices.as_deref(),
            )
            .await?;

        Ok(session)
    }

    /// Record feedback; a reviewed session goes back to PROCESSING.
    pub async fn submit_feedback(
        &self,
        cmd: SubmitFeedbackCommand,
    ) -> Result<ReviewResult, SessionError> {
        if cmd.feedback.trim().is_empty() {
            return Err(SessionError::validation("feedback", "Feedback cannot be empty"));
        }

        let mut session = self
            .lifecycle
            .get_session(&cmd.session_id, &cmd.company_id)
            .await?;
        reject_terminal(&session)?;

        self.lifecycle.add_feedback(&mut session, cmd.feedback).await?;
        self.regenerate_if_reviewed(&mut session).await?;

        Ok(ReviewResult::of(&session))
    }

    /// Change the topic; a reviewed session goes back to PROCESSING.
    pub async fn change_topic(&self, cmd: ChangeTopicCommand) -> Result<ReviewResult, SessionError> {
        if cmd.topic.trim().is_empty() {
            return Err(SessionError::validation("topic", "Topic cannot be empty"));
        }

        let mut session = self
            .lifecycle
            .get_session(&cmd.session_id, &cmd.company_id)
            .await?;
        reject_terminal(&session)?;

        self.lifecycle.change_topic(&mut session, cmd.topic).await?;
        self.regenerate_if_reviewed(&mut session).await?;

        Ok(ReviewResult::of(&session))
    }

    /// AWAITING_REVIEW -> COMPLETED.
    pub async fn complete(&self, cmd: CompleteSessionCommand) -> Result<ReviewResult, SessionError> {
        let mut session = self
            .lifecycle
            .get_session(&cmd.session_id, &cmd.company_id)
            .await?;

        self.lifecycle
            .transition_status(&mut session, NotificationSessionStatus::Completed)
            .await?;

        info!(session_id = %session.id(), "session completed");
        Ok(ReviewResult::of(&session))
    }

    async fn regenerate_if_reviewed(
        &self,
        session: &mut NotificationSession,
    ) -> Result<(), SessionError> {
        if session.status() != NotificationSessionStatus::AwaitingReview {
            return Ok(());
        }

        self.lifecycle
            .transition_status(session, NotificationSessionStatus::Processing)
            .await?;

        if let Err(e) = self.dispatcher.dispatch(SessionJob::for_session(session)).await {
            error!(session_id = %session.id(), error = %e, "failed to dispatch regeneration");
            if let Err(mark) = self
                .lifecycle
                .transition_status(session, NotificationSessionStatus::Failed)
                .await
            {
                error!(session_id = %session.id(), error = %mark, "failed to mark session FAILED");
            }
            return Err(SessionError::infrastructure(e.message));
        }

        // Inline dispatch may have advanced the stored copy.
        *session = self
            .lifecycle
            .get_session(session.id(), session.company_id())
            .await?;
        Ok(())
    }
}

fn require_status(
    session: &NotificationSession,
    expected: NotificationSessionStatus,
) -> Result<(), SessionError> {
    if session.status() != expected {
        return Err(SessionError::invalid_transition(format!(
            "session is {}, expected {}",
            session.status(),
            expected
        )));
    }
    Ok(())
}

fn reject_terminal(session: &NotificationSession) -> Result<(), SessionError> {
    if session.status().is_terminal() {
        return Err(SessionError::invalid_transition(format!(
            "session is {}",
            session.status()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::domain::foundation::{AdminId, CampaignId, DomainError};
    use crate::domain::notification::Suggestion;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingDispatcher {
        jobs: Mutex<Vec<SessionJob>>,
    }

    #[async_trait]
    impl WorkDispatcher for RecordingDispatcher {
        async fn dispatch(&self, job: SessionJob) -> Result<(), DomainError> {
            self.jobs.lock().unwrap().push(job);
            Ok(())
        }
    }

    struct Fixture {
        handler: ReviewSessionHandler,
        lifecycle: SessionLifecycle,
        store: Arc<InMemorySessionStore>,
        dispatcher: Arc<RecordingDispatcher>,
        company_id: CompanyId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemorySessionStore::new());
        let lifecycle = SessionLifecycle::new(store.clone());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        Fixture {
            handler: ReviewSessionHandler::new(lifecycle.clone(), dispatcher.clone()),
            lifecycle,
            store,
            dispatcher,
            company_id: CompanyId::from_uuid(Uuid::new_v4()),
        }
    }

    async fn reviewed_session(f: &Fixture) -> NotificationSession {
        let mut session = f
            .lifecycle
            .create_session(
                Some("Launch".to_string()),
                f.company_id,
                AdminId::from_uuid(Uuid::new_v4()),
                CampaignId::new(),
            )
            .await
            .unwrap();
        f.lifecycle
            .add_suggestions(
                &mut session,
                vec![Suggestion::new("one", 1), Suggestion::new("two", 1)],
            )
            .await
            .unwrap();
        f.lifecycle
            .transition_status(&mut session, NotificationSessionStatus::AwaitingReview)
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn selections_apply_while_awaiting_review() {
        let f = fixture();
        let session = reviewed_session(&f).await;

        let updated = f
            .handler
            .update_selections(UpdateSelectionsCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                selected_indices: vec![1, 9],
                rejected_indices: Some(vec![0]),
            })
            .await
            .unwrap();

        assert_eq!(updated.selected_suggestions(), &[Suggestion::new("two", 1)]);
        assert_eq!(updated.rejected_suggestions(), &[Suggestion::new("one", 1)]);
        assert_eq!(f.store.find(session.id()).unwrap(), updated);
    }

    #[tokio::test]
    async fn selections_and_rejections_are_one_write() {
        let f = fixture();
        let session = reviewed_session(&f).await;
        let writes_before = f.store.update_count();

        f.handler
            .update_selections(UpdateSelectionsCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                selected_indices: vec![0],
                rejected_indices: Some(vec![1]),
            })
            .await
            .unwrap();

        assert_eq!(f.store.update_count(), writes_before + 1);
    }

    #[tokio::test]
    async fn feedback_while_processing_is_recorded_without_requeue() {
        let f = fixture();
        let session = f
            .lifecycle
            .create_session(
                Some("Launch".to_string()),
                f.company_id,
                AdminId::from_uuid(Uuid::new_v4()),
                CampaignId::new(),
            )
            .await
            .unwrap();

        let result = f
            .handler
            .submit_feedback(SubmitFeedbackCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                feedback: "Mention the discount".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status, NotificationSessionStatus::Processing);
        assert!(f.dispatcher.jobs.lock().unwrap().is_empty());
        assert_eq!(f.store.find(session.id()).unwrap().feedback_history().len(), 1);
    }

    #[tokio::test]
    async fn selections_rejected_while_processing() {
        let f = fixture();
        let session = f
            .lifecycle
            .create_session(
                None,
                f.company_id,
                AdminId::from_uuid(Uuid::new_v4()),
                CampaignId::new(),
            )
            .await
            .unwrap();

        let err = f
            .handler
            .update_selections(UpdateSelectionsCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                selected_indices: vec![0],
                rejected_indices: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn feedback_on_reviewed_session_requeues_it() {
        let f = fixture();
        let session = reviewed_session(&f).await;

        let result = f
            .handler
            .submit_feedback(SubmitFeedbackCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                feedback: "Shorter please".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status, NotificationSessionStatus::Processing);
        assert_eq!(f.dispatcher.jobs.lock().unwrap().len(), 1);
        let stored = f.store.find(session.id()).unwrap();
        assert_eq!(stored.feedback_history().len(), 1);
        assert_eq!(stored.feedback_history()[0].feedback, "Shorter please");
    }

    #[tokio::test]
    async fn empty_feedback_is_a_validation_error() {
        let f = fixture();
        let session = reviewed_session(&f).await;

        let err = f
            .handler
            .submit_feedback(SubmitFeedbackCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                feedback: "   ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::ValidationFailed { .. }));
        assert!(f.dispatcher.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn topic_change_bumps_version_and_requeues() {
        let f = fixture();
        let session = reviewed_session(&f).await;

        let result = f
            .handler
            .change_topic(ChangeTopicCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                topic: "Relaunch".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.status, NotificationSessionStatus::Processing);
        let stored = f.store.find(session.id()).unwrap();
        assert_eq!(stored.topic(), Some("Relaunch"));
        assert_eq!(stored.current_topic_version(), 2);
    }

    #[tokio::test]
    async fn completed_session_rejects_feedback() {
        let f = fixture();
        let session = reviewed_session(&f).await;
        f.handler
            .complete(CompleteSessionCommand {
                session_id: *session.id(),
                company_id: f.company_id,
            })
            .await
            .unwrap();

        let err = f
            .handler
            .submit_feedback(SubmitFeedbackCommand {
                session_id: *session.id(),
                company_id: f.company_id,
                feedback: "More".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::InvalidTransition(_)));
        let stored = f.store.find(session.id()).unwrap();
        assert_eq!(stored.status(), NotificationSessionStatus::Completed);
        assert!(stored.feedback_history().is_empty());
    }

    #[tokio::test]
    async fn complete_requires_awaiting_review() {
        let f = fixture();
        let session = f
            .lifecycle
            .create_session(
                None,
                f.company_id,
                AdminId::from_uuid(Uuid::new_v4()),
                CampaignId::new(),
            )
            .await
            .unwrap();

        let err = f
            .handler
            .complete(CompleteSessionCommand {
                session_id: *session.id(),
                company_id: f.company_id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn other_company_cannot_review() {
        let f = fixture();
        let session = reviewed_session(&f).await;

        let err = f
            .handler
            .complete(CompleteSessionCommand {
                session_id: *session.id(),
                company_id: CompanyId::from_uuid(Uuid::new_v4()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }
}
