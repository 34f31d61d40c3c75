//! Placeholder suggestion generator.
//!
//! Stands in until a real text model is wired up. Produces nothing, so
//! sessions move straight to AWAITING_REVIEW with an empty suggestion list.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::DomainError;
use crate::domain::notification::{NotificationSession, Suggestion};
use crate::ports::SuggestionGenerator;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderGenerator;

impl PlaceholderGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SuggestionGenerator for PlaceholderGenerator {
    async fn generate(&self, session: &NotificationSession) -> Result<Vec<Suggestion>, DomainError> {
        debug!(
            session_id = %session.id(),
            topic_version = session.current_topic_version(),
            "placeholder generator produced no suggestions"
        );
        Ok(Vec::new())
    }
}
