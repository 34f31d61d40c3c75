//! HTTP routes for notification session endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    change_topic, complete_session, create_session, get_session, submit_feedback,
    update_selections, NotificationSessionHandlers,
};

/// Creates the notification session router, to be nested under
/// `/api/v1/notification-sessions`.
pub fn notification_session_routes(handlers: NotificationSessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:session_id", get(get_session))
        .route("/:session_id/selections", put(update_selections))
        .route("/:session_id/feedback", post(submit_feedback))
        .route("/:session_id/topic", put(change_topic))
        .route("/:session_id/complete", post(complete_session))
        .with_state(handlers)
}
