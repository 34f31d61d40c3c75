//! HTTP adapter for notification session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChangeTopicRequest, CompanyQuery, CreateSessionRequest, ErrorResponse, FeedbackRequest,
    FieldError, SessionResponse, SessionStatusResponse, UpdateSelectionsRequest,
};
pub use handlers::NotificationSessionHandlers;
pub use routes::notification_session_routes;
