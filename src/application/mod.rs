//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) and query handlers (read) are kept separate.

pub mod handlers;

pub use handlers::{
    ChangeTopicCommand, CompleteSessionCommand, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, GetSessionHandler, GetSessionQuery, ProcessSessionHandler, ReviewResult,
    ReviewSessionHandler, SessionLifecycle, SubmitFeedbackCommand, UpdateSelectionsCommand,
    DEFAULT_PROCESSING_TIMEOUT,
};
