//! Notification session handlers.
//!
//! [`SessionLifecycle`] owns every mutation; the command and query handlers
//! compose it with campaign checks and dispatch.

mod create_session;
mod get_session;
mod lifecycle;
mod process_session;
mod review_session;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use lifecycle::SessionLifecycle;
pub use process_session::{ProcessSessionHandler, DEFAULT_PROCESSING_TIMEOUT};
pub use review_session::{
    ChangeTopicCommand, CompleteSessionCommand, ReviewResult, ReviewSessionHandler,
    SubmitFeedbackCommand, UpdateSelectionsCommand,
};
