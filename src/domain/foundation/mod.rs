//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the notification domain.

mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AdminId, CampaignId, CompanyId, SessionId};
pub use session_status::NotificationSessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
