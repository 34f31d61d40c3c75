//! Request and response DTOs for notification session endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::handlers::CreateSessionCommand;
use crate::domain::foundation::{AdminId, CampaignId, CompanyId, NotificationSessionStatus};
use crate::domain::notification::{
    ConversationMessage, FeedbackEntry, NotificationSession, Suggestion,
};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/v1/notification-sessions`.
///
/// Ids arrive as raw strings so every missing or malformed one can be
/// reported at once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub admin_id: Option<String>,
}

impl CreateSessionRequest {
    /// Validate into a command, collecting every field error.
    pub fn into_command(self) -> Result<CreateSessionCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let campaign_id = required_uuid("campaign_id", self.campaign_id.as_deref(), &mut errors);
        let company_id = required_uuid("company_id", self.company_id.as_deref(), &mut errors);
        let admin_id = required_uuid("admin_id", self.admin_id.as_deref(), &mut errors);

        match (campaign_id, company_id, admin_id) {
            (Some(campaign_id), Some(company_id), Some(admin_id)) if errors.is_empty() => {
                Ok(CreateSessionCommand {
                    topic: self.topic,
                    company_id: CompanyId::from_uuid(company_id),
                    admin_id: AdminId::from_uuid(admin_id),
                    campaign_id: CampaignId::from_uuid(campaign_id),
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_uuid(field: &str, value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    match value {
        None => {
            errors.push(FieldError::new(field, "Field required"));
            None
        }
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FieldError::new(field, "Input should be a valid UUID"));
                None
            }
        },
    }
}

/// Query string carrying the tenant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyQuery {
    pub company_id: Option<String>,
}

impl CompanyQuery {
    pub fn parse(&self) -> Result<CompanyId, ErrorResponse> {
        let raw = self
            .company_id
            .as_deref()
            .ok_or_else(|| ErrorResponse::bad_request("company_id query parameter is required"))?;
        raw.parse()
            .map_err(|_| ErrorResponse::bad_request("Invalid company_id format"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSelectionsRequest {
    pub selected_indices: Vec<i64>,
    #[serde(default)]
    pub rejected_indices: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeTopicRequest {
    pub topic: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// Short acknowledgement for commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub status: NotificationSessionStatus,
}

/// Full session representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub company_id: String,
    pub admin_id: String,
    pub campaign_id: String,
    pub status: NotificationSessionStatus,
    pub topic: Option<String>,
    pub current_topic_version: i32,
    pub created_at: String,
    pub updated_at: String,
    pub last_feedback_at: Option<String>,
    pub all_suggestions: Vec<Suggestion>,
    pub selected_suggestions: Vec<Suggestion>,
    pub rejected_suggestions: Vec<Suggestion>,
    pub conversation_history: Vec<ConversationMessage>,
    pub feedback_history: Vec<FeedbackEntry>,
}

impl From<&NotificationSession> for SessionResponse {
    fn from(session: &NotificationSession) -> Self {
        Self {
            id: session.id().to_string(),
            company_id: session.company_id().to_string(),
            admin_id: session.admin_id().to_string(),
            campaign_id: session.campaign_id().to_string(),
            status: session.status(),
            topic: session.topic().map(str::to_string),
            current_topic_version: session.current_topic_version(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
            last_feedback_at: session.last_feedback_at().map(|t| t.to_rfc3339()),
            all_suggestions: session.all_suggestions().to_vec(),
            selected_suggestions: session.selected_suggestions().to_vec(),
            rejected_suggestions: session.rejected_suggestions().to_vec(),
            conversation_history: session.conversation_history().to_vec(),
            feedback_history: session.feedback_history().to_vec(),
        }
    }
}

/// One field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn new(code: &str, detail: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            detail: detail.into(),
            errors: None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", detail)
    }

    pub fn session_not_found() -> Self {
        Self::new("NOT_FOUND", "Session not found")
    }

    pub fn unprocessable(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::new("VALIDATION_FAILED", "Request validation failed")
        }
    }

    pub fn unprocessable_body(detail: impl Into<String>) -> Self {
        Self::new("VALIDATION_FAILED", detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new("CONFLICT", detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", detail)
    }
}
