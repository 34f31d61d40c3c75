//! Suggestion generator port.
//!
//! The content-generation pipeline sits behind this trait so the processing
//! routine, dispatcher and HTTP layer stay unchanged when it is replaced.

use crate::domain::foundation::DomainError;
use crate::domain::notification::{NotificationSession, Suggestion};
use async_trait::async_trait;

/// Produces notification suggestions for a session.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    /// Generate suggestions for the session's current topic and conversation.
    ///
    /// # Errors
    ///
    /// Any error marks the session FAILED.
    async fn generate(&self, session: &NotificationSession) -> Result<Vec<Suggestion>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn SuggestionGenerator) {}
    }
}
