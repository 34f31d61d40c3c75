//! NotificationSession aggregate entity.
//!
//! A notification session is one unit of generation work for a company's
//! campaign. The aggregate holds the accumulated suggestions, the admin's
//! selections and feedback, and the lifecycle status.
//!
//! # Ownership
//!
//! `company_id`, `admin_id` and `campaign_id` are fixed at creation. The
//! company is the tenant boundary: every lookup is keyed by it.

use crate::domain::foundation::{
    AdminId, CampaignId, CompanyId, DomainError, ErrorCode, NotificationSessionStatus, SessionId,
    StateMachine, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::records::{ConversationMessage, FeedbackEntry, Suggestion};

/// Maximum length for a session topic.
pub const MAX_TOPIC_LENGTH: usize = 255;

/// Topic version assigned at creation.
pub const INITIAL_TOPIC_VERSION: i32 = 1;

/// Notification session aggregate.
///
/// # Invariants
///
/// - `id` is globally unique and immutable
/// - `company_id`, `admin_id`, `campaign_id` never change
/// - `current_topic_version` starts at 1 and grows by exactly 1 per topic change
/// - `all_suggestions`, `rejected_suggestions`, `conversation_history` and
///   `feedback_history` are append-only
/// - COMPLETED and FAILED are terminal
/// - every mutation refreshes `updated_at`
/// - `revision` is the stored write count as of load; a store only accepts an
///   update whose revision matches what it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSession {
    id: SessionId,
    company_id: CompanyId,
    admin_id: AdminId,
    campaign_id: CampaignId,
    status: NotificationSessionStatus,
    topic: Option<String>,
    current_topic_version: i32,
    all_suggestions: Vec<Suggestion>,
    selected_suggestions: Vec<Suggestion>,
    rejected_suggestions: Vec<Suggestion>,
    conversation_history: Vec<ConversationMessage>,
    feedback_history: Vec<FeedbackEntry>,
    created_at: Timestamp,
    updated_at: Timestamp,
    last_feedback_at: Option<Timestamp>,
    revision: i64,
}

/// Stored state of a session, used to rebuild the aggregate from persistence.
#[derive(Debug, Clone)]
pub struct NotificationSessionParts {
    pub id: SessionId,
    pub company_id: CompanyId,
    pub admin_id: AdminId,
    pub campaign_id: CampaignId,
    pub status: NotificationSessionStatus,
    pub topic: Option<String>,
    pub current_topic_version: i32,
    pub all_suggestions: Vec<Suggestion>,
    pub selected_suggestions: Vec<Suggestion>,
    pub rejected_suggestions: Vec<Suggestion>,
    pub conversation_history: Vec<ConversationMessage>,
    pub feedback_history: Vec<FeedbackEntry>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub last_feedback_at: Option<Timestamp>,
    pub revision: i64,
}

impl NotificationSession {
    /// Create a new session in PROCESSING with a seeded conversation entry.
    ///
    /// A blank topic is treated as no topic.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the topic exceeds [`MAX_TOPIC_LENGTH`]
    pub fn new(
        id: SessionId,
        company_id: CompanyId,
        admin_id: AdminId,
        campaign_id: CampaignId,
        topic: Option<String>,
    ) -> Result<Self, DomainError> {
        let topic = normalize_topic(topic)?;
        let seed = ConversationMessage::user(seed_prompt(topic.as_deref()));

        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            admin_id,
            campaign_id,
            status: NotificationSessionStatus::Processing,
            topic,
            current_topic_version: INITIAL_TOPIC_VERSION,
            all_suggestions: Vec::new(),
            selected_suggestions: Vec::new(),
            rejected_suggestions: Vec::new(),
            conversation_history: vec![seed],
            feedback_history: Vec::new(),
            created_at: now,
            updated_at: now,
            last_feedback_at: None,
            revision: 0,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(parts: NotificationSessionParts) -> Self {
        Self {
            id: parts.id,
            company_id: parts.company_id,
            admin_id: parts.admin_id,
            campaign_id: parts.campaign_id,
            status: parts.status,
            topic: parts.topic,
            current_topic_version: parts.current_topic_version,
            all_suggestions: parts.all_suggestions,
            selected_suggestions: parts.selected_suggestions,
            rejected_suggestions: parts.rejected_suggestions,
            conversation_history: parts.conversation_history,
            feedback_history: parts.feedback_history,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
            last_feedback_at: parts.last_feedback_at,
            revision: parts.revision,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn company_id(&self) -> &CompanyId {
        &self.company_id
    }

    pub fn admin_id(&self) -> &AdminId {
        &self.admin_id
    }

    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    pub fn status(&self) -> NotificationSessionStatus {
        self.status
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn current_topic_version(&self) -> i32 {
        self.current_topic_version
    }

    pub fn all_suggestions(&self) -> &[Suggestion] {
        &self.all_suggestions
    }

    pub fn selected_suggestions(&self) -> &[Suggestion] {
        &self.selected_suggestions
    }

    pub fn rejected_suggestions(&self) -> &[Suggestion] {
        &self.rejected_suggestions
    }

    pub fn conversation_history(&self) -> &[ConversationMessage] {
        &self.conversation_history
    }

    pub fn feedback_history(&self) -> &[FeedbackEntry] {
        &self.feedback_history
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn last_feedback_at(&self) -> Option<&Timestamp> {
        self.last_feedback_at.as_ref()
    }

    /// Revision the store held when this copy was loaded or last saved.
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Called by a store once it has written this copy.
    pub fn advance_revision(&mut self) {
        self.revision += 1;
    }

    /// Checks if the session belongs to the given company.
    pub fn belongs_to(&self, company_id: &CompanyId) -> bool {
        &self.company_id == company_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append suggestions in the given order. Duplicates are kept.
    pub fn add_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.all_suggestions.extend(suggestions);
        self.touch();
    }

    /// Replace the selection with the suggestions at `indices`, in the order given.
    ///
    /// Out-of-range indices are dropped. With no suggestions at all this is a
    /// no-op and `updated_at` is left alone.
    ///
    /// Returns true if the session was mutated.
    pub fn update_selections(&mut self, indices: &[i64]) -> bool {
        if self.all_suggestions.is_empty() {
            return false;
        }

        self.selected_suggestions = self.pick(indices);
        self.touch();
        true
    }

    /// Append the suggestions at `indices` to the rejected list.
    ///
    /// Same index and no-op rules as [`update_selections`](Self::update_selections).
    pub fn reject_suggestions(&mut self, indices: &[i64]) -> bool {
        if self.all_suggestions.is_empty() {
            return false;
        }

        let rejected = self.pick(indices);
        self.rejected_suggestions.extend(rejected);
        self.touch();
        true
    }

    /// Record admin feedback against the current topic version.
    pub fn add_feedback(&mut self, feedback: String) {
        let now = Timestamp::now();
        self.feedback_history.push(FeedbackEntry {
            timestamp: now,
            feedback: feedback.clone(),
            topic_version: self.current_topic_version,
        });
        self.conversation_history.push(ConversationMessage::user(feedback));
        self.last_feedback_at = Some(now);
        self.updated_at = now;
    }

    /// Replace the topic and bump the topic version by one.
    ///
    /// Status is not changed; re-queueing is the caller's decision.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the topic exceeds [`MAX_TOPIC_LENGTH`]
    pub fn change_topic(&mut self, new_topic: String) -> Result<(), DomainError> {
        validate_topic_length(&new_topic)?;

        self.topic = Some(new_topic);
        self.current_topic_version += 1;
        self.touch();
        Ok(())
    }

    /// Append a conversation entry.
    pub fn append_message(&mut self, message: ConversationMessage) {
        self.conversation_history.push(message);
        self.touch();
    }

    /// Move to `target` if the state machine allows it.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the move is illegal; status is unchanged
    pub fn transition_to(&mut self, target: NotificationSessionStatus) -> Result<(), DomainError> {
        let next = self.status.transition_to(target).map_err(|_| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition session from {} to {}", self.status, target),
            )
            .with_detail("from", self.status.as_str())
            .with_detail("to", target.as_str())
        })?;

        self.status = next;
        self.touch();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn pick(&self, indices: &[i64]) -> Vec<Suggestion> {
        let len = self.all_suggestions.len();
        indices
            .iter()
            .filter_map(|&i| usize::try_from(i).ok())
            .filter(|&i| i < len)
            .map(|i| self.all_suggestions[i].clone())
            .collect()
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// The first user message of a session.
pub fn seed_prompt(topic: Option<&str>) -> String {
    match topic {
        Some(topic) => format!("Generate notifications about {}", topic),
        None => "Generate notifications".to_string(),
    }
}

fn normalize_topic(topic: Option<String>) -> Result<Option<String>, DomainError> {
    match topic {
        Some(t) if t.trim().is_empty() => Ok(None),
        Some(t) => {
            validate_topic_length(&t)?;
            Ok(Some(t))
        }
        None => Ok(None),
    }
}

fn validate_topic_length(topic: &str) -> Result<(), DomainError> {
    let len = topic.chars().count();
    if len > MAX_TOPIC_LENGTH {
        return Err(ValidationError::too_long("topic", MAX_TOPIC_LENGTH, len).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::MessageRole;
    use proptest::prelude::*;
    use std::thread::sleep;
    use std::time::Duration;
    use uuid::Uuid;

    fn test_session(topic: Option<&str>) -> NotificationSession {
        NotificationSession::new(
            SessionId::new(),
            CompanyId::from_uuid(Uuid::new_v4()),
            AdminId::from_uuid(Uuid::new_v4()),
            CampaignId::new(),
            topic.map(str::to_string),
        )
        .unwrap()
    }

    fn with_suggestions(n: usize) -> NotificationSession {
        let mut session = test_session(Some("Sale"));
        session.add_suggestions(
            (0..n)
                .map(|i| Suggestion::new(format!("suggestion {}", i), 1))
                .collect(),
        );
        session
    }

    fn pause() {
        sleep(Duration::from_millis(5));
    }

    // Construction tests

    #[test]
    fn new_session_is_processing_at_version_one() {
        let session = test_session(Some("Test Topic"));
        assert_eq!(session.status(), NotificationSessionStatus::Processing);
        assert_eq!(session.current_topic_version(), 1);
        assert!(session.all_suggestions().is_empty());
        assert!(session.last_feedback_at().is_none());
    }

    #[test]
    fn new_session_seeds_topic_message() {
        let session = test_session(Some("Test Topic"));
        let history = session.conversation_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "Generate notifications about Test Topic");
    }

    #[test]
    fn new_session_without_topic_seeds_generic_message() {
        let session = test_session(None);
        assert_eq!(session.conversation_history().len(), 1);
        assert_eq!(session.conversation_history()[0].content, "Generate notifications");
        assert_eq!(session.topic(), None);
    }

    #[test]
    fn blank_topic_is_treated_as_absent() {
        let session = test_session(Some("   "));
        assert_eq!(session.topic(), None);
        assert_eq!(session.conversation_history()[0].content, "Generate notifications");
    }

    #[test]
    fn new_session_rejects_overlong_topic() {
        let result = NotificationSession::new(
            SessionId::new(),
            CompanyId::from_uuid(Uuid::new_v4()),
            AdminId::from_uuid(Uuid::new_v4()),
            CampaignId::new(),
            Some("x".repeat(MAX_TOPIC_LENGTH + 1)),
        );
        assert!(matches!(result, Err(e) if e.code == ErrorCode::ValidationFailed));
    }

    // Suggestion tests

    #[test]
    fn add_suggestions_appends_in_order_without_dedup() {
        let mut session = test_session(None);
        session.add_suggestions(vec![Suggestion::new("a", 1), Suggestion::new("b", 1)]);
        session.add_suggestions(vec![Suggestion::new("a", 1)]);
        let texts: Vec<_> = session.all_suggestions().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "a"]);
    }

    #[test]
    fn add_suggestions_touches_updated_at() {
        let mut session = test_session(None);
        let before = *session.updated_at();
        pause();
        session.add_suggestions(vec![Suggestion::new("a", 1)]);
        assert!(session.updated_at().is_after(&before));
    }

    // Selection tests

    #[test]
    fn update_selections_on_empty_suggestions_is_noop() {
        let mut session = test_session(None);
        let before = *session.updated_at();
        pause();
        assert!(!session.update_selections(&[0, 1]));
        assert_eq!(session.updated_at(), &before);
        assert!(session.selected_suggestions().is_empty());
    }

    #[test]
    fn update_selections_drops_out_of_range_indices() {
        let mut session = with_suggestions(3);
        assert!(session.update_selections(&[0, 5]));
        assert_eq!(session.selected_suggestions().len(), 1);
        assert_eq!(session.selected_suggestions()[0].text, "suggestion 0");
    }

    #[test]
    fn update_selections_preserves_given_order_and_replaces() {
        let mut session = with_suggestions(3);
        session.update_selections(&[2, 0]);
        session.update_selections(&[1]);
        assert_eq!(session.selected_suggestions().len(), 1);
        assert_eq!(session.selected_suggestions()[0].text, "suggestion 1");

        session.update_selections(&[2, 0]);
        let texts: Vec<_> = session
            .selected_suggestions()
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["suggestion 2", "suggestion 0"]);
    }

    #[test]
    fn update_selections_drops_negative_indices() {
        let mut session = with_suggestions(2);
        session.update_selections(&[-1, 1]);
        assert_eq!(session.selected_suggestions().len(), 1);
        assert_eq!(session.selected_suggestions()[0].text, "suggestion 1");
    }

    #[test]
    fn reject_suggestions_accumulates() {
        let mut session = with_suggestions(3);
        session.reject_suggestions(&[0]);
        session.reject_suggestions(&[2, 9]);
        assert_eq!(session.rejected_suggestions().len(), 2);
        assert_eq!(session.rejected_suggestions()[1].text, "suggestion 2");
    }

    #[test]
    fn reject_suggestions_on_empty_is_noop() {
        let mut session = test_session(None);
        assert!(!session.reject_suggestions(&[0]));
        assert!(session.rejected_suggestions().is_empty());
    }

    // Feedback tests

    #[test]
    fn add_feedback_records_topic_version_and_timestamps() {
        let mut session = test_session(Some("Sale"));
        session.change_topic("Winter sale".to_string()).unwrap();
        session.add_feedback("Shorter please".to_string());

        let entry = &session.feedback_history()[0];
        assert_eq!(entry.feedback, "Shorter please");
        assert_eq!(entry.topic_version, 2);
        assert_eq!(session.last_feedback_at(), Some(&entry.timestamp));
        assert_eq!(session.updated_at(), &entry.timestamp);
    }

    #[test]
    fn add_feedback_extends_conversation() {
        let mut session = test_session(None);
        session.add_feedback("More emojis".to_string());
        let last = session.conversation_history().last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "More emojis");
    }

    // Topic tests

    #[test]
    fn change_topic_increments_version_by_one_each_call() {
        let mut session = test_session(Some("A"));
        session.change_topic("B".to_string()).unwrap();
        session.change_topic("B".to_string()).unwrap();
        assert_eq!(session.current_topic_version(), 3);
        assert_eq!(session.topic(), Some("B"));
    }

    #[test]
    fn change_topic_keeps_status() {
        let mut session = test_session(Some("A"));
        session.transition_to(NotificationSessionStatus::AwaitingReview).unwrap();
        session.change_topic("B".to_string()).unwrap();
        assert_eq!(session.status(), NotificationSessionStatus::AwaitingReview);
    }

    #[test]
    fn change_topic_rejects_overlong_topic_without_bumping_version() {
        let mut session = test_session(Some("A"));
        assert!(session.change_topic("y".repeat(MAX_TOPIC_LENGTH + 1)).is_err());
        assert_eq!(session.current_topic_version(), 1);
        assert_eq!(session.topic(), Some("A"));
    }

    // Transition tests

    #[test]
    fn transition_follows_state_machine() {
        let mut session = test_session(None);
        session.transition_to(NotificationSessionStatus::AwaitingReview).unwrap();
        session.transition_to(NotificationSessionStatus::Processing).unwrap();
        session.transition_to(NotificationSessionStatus::AwaitingReview).unwrap();
        session.transition_to(NotificationSessionStatus::Completed).unwrap();
        assert_eq!(session.status(), NotificationSessionStatus::Completed);
    }

    #[test]
    fn terminal_session_rejects_transition_and_keeps_status() {
        let mut session = test_session(None);
        session.transition_to(NotificationSessionStatus::Failed).unwrap();
        let before = *session.updated_at();

        let err = session
            .transition_to(NotificationSessionStatus::Processing)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(session.status(), NotificationSessionStatus::Failed);
        assert_eq!(session.updated_at(), &before);
    }

    #[test]
    fn processing_cannot_complete_directly() {
        let mut session = test_session(None);
        assert!(session.transition_to(NotificationSessionStatus::Completed).is_err());
        assert_eq!(session.status(), NotificationSessionStatus::Processing);
    }

    proptest! {
        #[test]
        fn selections_only_contain_in_range_indices(
            n in 0usize..8,
            indices in proptest::collection::vec(-3i64..12, 0..10),
        ) {
            let mut session = with_suggestions(n);
            session.update_selections(&indices);

            let expected = if n == 0 {
                0
            } else {
                indices.iter().filter(|&&i| i >= 0 && (i as usize) < n).count()
            };
            prop_assert_eq!(session.selected_suggestions().len(), expected);
        }
    }
}
