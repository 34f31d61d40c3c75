//! HTTP handlers for notification session endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::{
    ChangeTopicCommand, CompleteSessionCommand, CreateSessionHandler, GetSessionHandler,
    GetSessionQuery, ReviewResult, ReviewSessionHandler, SubmitFeedbackCommand,
    UpdateSelectionsCommand,
};
use crate::domain::foundation::{CompanyId, SessionId};
use crate::domain::notification::SessionError;

use super::dto::{
    ChangeTopicRequest, CompanyQuery, CreateSessionRequest, ErrorResponse, FeedbackRequest,
    FieldError, SessionResponse, SessionStatusResponse, UpdateSelectionsRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NotificationSessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    review_handler: Arc<ReviewSessionHandler>,
    verbose_errors: bool,
}

impl NotificationSessionHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        get_handler: Arc<GetSessionHandler>,
        review_handler: Arc<ReviewSessionHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            review_handler,
            verbose_errors: false,
        }
    }

    /// Include internal error messages in 500 bodies.
    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    fn error(&self, error: SessionError) -> Response {
        handle_session_error(error, self.verbose_errors)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/notification-sessions - Start a session
pub async fn create_session(
    State(handlers): State<NotificationSessionHandlers>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };
    let cmd = match req.into_command() {
        Ok(cmd) => cmd,
        Err(errors) => return unprocessable(errors),
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(result) => (
            StatusCode::ACCEPTED,
            Json(SessionStatusResponse {
                session_id: result.session_id.to_string(),
                status: result.status,
            }),
        )
            .into_response(),
        Err(e) => handlers.error(e),
    }
}

/// GET /api/v1/notification-sessions/:session_id - Read a session
pub async fn get_session(
    State(handlers): State<NotificationSessionHandlers>,
    Path(session_id): Path<String>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Response {
    let (session_id, company_id) = match scope(&session_id, query) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match handlers
        .get_handler
        .handle(GetSessionQuery {
            session_id,
            company_id,
        })
        .await
    {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// PUT /api/v1/notification-sessions/:session_id/selections
pub async fn update_selections(
    State(handlers): State<NotificationSessionHandlers>,
    Path(session_id): Path<String>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
    body: Result<Json<UpdateSelectionsRequest>, JsonRejection>,
) -> Response {
    let (session_id, company_id) = match scope(&session_id, query) {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };

    let cmd = UpdateSelectionsCommand {
        session_id,
        company_id,
        selected_indices: req.selected_indices,
        rejected_indices: req.rejected_indices,
    };

    match handlers.review_handler.update_selections(cmd).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// POST /api/v1/notification-sessions/:session_id/feedback
pub async fn submit_feedback(
    State(handlers): State<NotificationSessionHandlers>,
    Path(session_id): Path<String>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let (session_id, company_id) = match scope(&session_id, query) {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };

    let cmd = SubmitFeedbackCommand {
        session_id,
        company_id,
        feedback: req.feedback,
    };

    match handlers.review_handler.submit_feedback(cmd).await {
        Ok(result) => acknowledged(StatusCode::ACCEPTED, result),
        Err(e) => handlers.error(e),
    }
}

/// PUT /api/v1/notification-sessions/:session_id/topic
pub async fn change_topic(
    State(handlers): State<NotificationSessionHandlers>,
    Path(session_id): Path<String>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
    body: Result<Json<ChangeTopicRequest>, JsonRejection>,
) -> Response {
    let (session_id, company_id) = match scope(&session_id, query) {
        Ok(ids) => ids,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return body_rejected(rejection),
    };

    let cmd = ChangeTopicCommand {
        session_id,
        company_id,
        topic: req.topic,
    };

    match handlers.review_handler.change_topic(cmd).await {
        Ok(result) => acknowledged(StatusCode::ACCEPTED, result),
        Err(e) => handlers.error(e),
    }
}

/// POST /api/v1/notification-sessions/:session_id/complete
pub async fn complete_session(
    State(handlers): State<NotificationSessionHandlers>,
    Path(session_id): Path<String>,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Response {
    let (session_id, company_id) = match scope(&session_id, query) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    let cmd = CompleteSessionCommand {
        session_id,
        company_id,
    };

    match handlers.review_handler.complete(cmd).await {
        Ok(result) => acknowledged(StatusCode::OK, result),
        Err(e) => handlers.error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Request helpers
// ════════════════════════════════════════════════════════════════════════════

/// Parse the tenant and session id; both failures are 400.
fn scope(
    session_id: &str,
    query: Result<Query<CompanyQuery>, QueryRejection>,
) -> Result<(SessionId, CompanyId), Response> {
    let Query(query) = query.map_err(|r| bad_request(r.body_text()))?;
    let company_id = query
        .parse()
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)).into_response())?;
    let session_id = session_id
        .parse::<SessionId>()
        .map_err(|_| bad_request("Invalid session ID"))?;
    Ok((session_id, company_id))
}

fn acknowledged(status: StatusCode, result: ReviewResult) -> Response {
    (
        status,
        Json(SessionStatusResponse {
            session_id: result.session_id.to_string(),
            status: result.status,
        }),
    )
        .into_response()
}

fn bad_request(detail: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(detail))).into_response()
}

fn unprocessable(errors: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::unprocessable(errors)),
    )
        .into_response()
}

fn body_rejected(rejection: JsonRejection) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse::unprocessable_body(rejection.body_text())),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError, verbose: bool) -> Response {
    match error {
        SessionError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::session_not_found()),
        )
            .into_response(),
        SessionError::CampaignNotFound => unprocessable(vec![FieldError::new(
            "campaign_id",
            "Campaign not found",
        )]),
        SessionError::ValidationFailed { field, message } => {
            unprocessable(vec![FieldError::new(field, message)])
        }
        SessionError::InvalidTransition(msg) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(format!("Invalid transition: {}", msg))),
        )
            .into_response(),
        SessionError::Conflict(id) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(format!("Session already exists: {}", id))),
        )
            .into_response(),
        error @ SessionError::ConcurrentModification(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::conflict(error.message())),
        )
            .into_response(),
        SessionError::Infrastructure(msg) => {
            error!(error = %msg, "request failed");
            let detail = if verbose {
                msg
            } else {
                "Internal server error".to_string()
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal(detail)),
            )
                .into_response()
        }
    }
}
