//! Notification session domain module.
//!
//! Handles the notification session aggregate: creation with a seeded
//! conversation, suggestion accumulation, admin selections and feedback,
//! topic versioning, and the status state machine.

mod aggregate;
mod errors;
mod records;

pub use aggregate::{
    seed_prompt, NotificationSession, NotificationSessionParts, INITIAL_TOPIC_VERSION,
    MAX_TOPIC_LENGTH,
};
pub use errors::SessionError;
pub use records::{ConversationMessage, FeedbackEntry, MessageRole, Suggestion};
