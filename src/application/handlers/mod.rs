//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod notification_session;

pub use notification_session::{
    // Engine
    SessionLifecycle,
    // Commands and results
    ChangeTopicCommand, CompleteSessionCommand, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, ReviewResult, ReviewSessionHandler, SubmitFeedbackCommand,
    UpdateSelectionsCommand,
    // Queries
    GetSessionHandler, GetSessionQuery,
    // Processing
    ProcessSessionHandler, DEFAULT_PROCESSING_TIMEOUT,
};
