//! PostgreSQL implementation of SessionStore.
//!
//! Persists NotificationSession aggregates to `notification_sessions`. The
//! list-valued fields are JSONB columns written whole on every update, so
//! updates are guarded by the `revision` column: a write based on an older
//! copy matches no row and is reported as a concurrency conflict.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    AdminId, CampaignId, CompanyId, DomainError, ErrorCode, NotificationSessionStatus, SessionId,
    Timestamp,
};
use crate::domain::notification::{
    ConversationMessage, FeedbackEntry, NotificationSession, NotificationSessionParts, Suggestion,
};
use crate::ports::SessionStore;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn insert(&self, session: &NotificationSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notification_sessions (
                id, company_id, admin_id, campaign_id, status, topic,
                current_topic_version, all_suggestions, selected_suggestions,
                rejected_suggestions, conversation_history, feedback_history,
                created_at, updated_at, last_feedback_at, revision
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.company_id().as_uuid())
        .bind(session.admin_id().as_uuid())
        .bind(session.campaign_id().as_uuid())
        .bind(session.status().as_str())
        .bind(session.topic())
        .bind(session.current_topic_version())
        .bind(Json(session.all_suggestions()))
        .bind(Json(session.selected_suggestions()))
        .bind(Json(session.rejected_suggestions()))
        .bind(Json(session.conversation_history()))
        .bind(Json(session.feedback_history()))
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .bind(session.last_feedback_at().map(|t| *t.as_datetime()))
        .bind(session.revision())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DomainError::new(
                    ErrorCode::SessionConflict,
                    format!("Session already exists: {}", session.id()),
                )
                .with_detail("session_id", session.id().to_string()))
            }
            Err(e) => Err(DomainError::database(format!(
                "Failed to insert notification session: {}",
                e
            ))),
        }
    }

    async fn find_by_id(
        &self,
        id: &SessionId,
        company_id: &CompanyId,
    ) -> Result<Option<NotificationSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, company_id, admin_id, campaign_id, status, topic,
                   current_topic_version, all_suggestions, selected_suggestions,
                   rejected_suggestions, conversation_history, feedback_history,
                   created_at, updated_at, last_feedback_at, revision
            FROM notification_sessions
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch notification session: {}", e)))?;

        row.map(row_to_session).transpose()
    }

    async fn update(&self, session: &mut NotificationSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE notification_sessions SET
                status = $4,
                topic = $5,
                current_topic_version = $6,
                all_suggestions = $7,
                selected_suggestions = $8,
                rejected_suggestions = $9,
                conversation_history = $10,
                feedback_history = $11,
                updated_at = $12,
                last_feedback_at = $13,
                revision = revision + 1
            WHERE id = $1 AND company_id = $2 AND revision = $3
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.company_id().as_uuid())
        .bind(session.revision())
        .bind(session.status().as_str())
        .bind(session.topic())
        .bind(session.current_topic_version())
        .bind(Json(session.all_suggestions()))
        .bind(Json(session.selected_suggestions()))
        .bind(Json(session.rejected_suggestions()))
        .bind(Json(session.conversation_history()))
        .bind(Json(session.feedback_history()))
        .bind(session.updated_at().as_datetime())
        .bind(session.last_feedback_at().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update notification session: {}", e)))?;

        if result.rows_affected() == 0 {
            // Tell a missing row apart from one that moved past our revision
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM notification_sessions WHERE id = $1 AND company_id = $2)",
            )
            .bind(session.id().as_uuid())
            .bind(session.company_id().as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to check notification session: {}", e))
            })?;

            let error = if exists {
                DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!(
                        "Session {} changed since revision {}",
                        session.id(),
                        session.revision()
                    ),
                )
            } else {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("Session not found: {}", session.id()),
                )
            };
            return Err(error.with_detail("session_id", session.id().to_string()));
        }

        session.advance_revision();
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn column<'r, T>(row: &'r sqlx::postgres::PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<NotificationSession, DomainError> {
    let status: String = column(&row, "status")?;
    let status: NotificationSessionStatus = status
        .parse()
        .map_err(|e| DomainError::database(format!("Invalid session status: {}", e)))?;

    let all_suggestions: Json<Vec<Suggestion>> = column(&row, "all_suggestions")?;
    let selected_suggestions: Json<Vec<Suggestion>> = column(&row, "selected_suggestions")?;
    let rejected_suggestions: Json<Vec<Suggestion>> = column(&row, "rejected_suggestions")?;
    let conversation_history: Json<Vec<ConversationMessage>> =
        column(&row, "conversation_history")?;
    let feedback_history: Json<Vec<FeedbackEntry>> = column(&row, "feedback_history")?;
    let last_feedback_at: Option<chrono::DateTime<chrono::Utc>> =
        column(&row, "last_feedback_at")?;

    Ok(NotificationSession::reconstitute(NotificationSessionParts {
        id: SessionId::from_uuid(column(&row, "id")?),
        company_id: CompanyId::from_uuid(column(&row, "company_id")?),
        admin_id: AdminId::from_uuid(column(&row, "admin_id")?),
        campaign_id: CampaignId::from_uuid(column(&row, "campaign_id")?),
        status,
        topic: column(&row, "topic")?,
        current_topic_version: column(&row, "current_topic_version")?,
        all_suggestions: all_suggestions.0,
        selected_suggestions: selected_suggestions.0,
        rejected_suggestions: rejected_suggestions.0,
        conversation_history: conversation_history.0,
        feedback_history: feedback_history.0,
        created_at: Timestamp::from_datetime(column(&row, "created_at")?),
        updated_at: Timestamp::from_datetime(column(&row, "updated_at")?),
        last_feedback_at: last_feedback_at.map(Timestamp::from_datetime),
        revision: column(&row, "revision")?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_session_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresSessionStore>();
    }
}
