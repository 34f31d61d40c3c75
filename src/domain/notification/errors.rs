//! Notification-session error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Errors surfaced by session command and query handlers.
///
/// `NotFound` covers both an absent session and a session owned by another
/// company; callers must not be able to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found for the requesting company.
    NotFound(SessionId),
    /// Campaign does not exist for the requesting company.
    CampaignNotFound,
    /// A session with the same id already exists.
    Conflict(SessionId),
    /// The session was written by someone else after it was loaded.
    ConcurrentModification(SessionId),
    /// Illegal status transition; stored status is unchanged.
    InvalidTransition(String),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        SessionError::InvalidTransition(message.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::CampaignNotFound => ErrorCode::CampaignNotFound,
            SessionError::Conflict(_) => ErrorCode::SessionConflict,
            SessionError::ConcurrentModification(_) => ErrorCode::ConcurrencyConflict,
            SessionError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(_) => "Session not found".to_string(),
            SessionError::CampaignNotFound => "Campaign not found".to_string(),
            SessionError::Conflict(id) => format!("Session already exists: {}", id),
            SessionError::ConcurrentModification(_) => {
                "Session was modified by another request; reload and retry".to_string()
            }
            SessionError::InvalidTransition(msg) => format!("Invalid transition: {}", msg),
            SessionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => SessionError::NotFound(session_id(&err)),
            ErrorCode::CampaignNotFound => SessionError::CampaignNotFound,
            ErrorCode::SessionConflict => SessionError::Conflict(session_id(&err)),
            ErrorCode::ConcurrencyConflict => SessionError::ConcurrentModification(session_id(&err)),
            ErrorCode::InvalidStateTransition => SessionError::InvalidTransition(err.message),
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                SessionError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}

fn session_id(err: &DomainError) -> SessionId {
    err.details
        .get("session_id")
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}
