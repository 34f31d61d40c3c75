//! PostgreSQL implementation of CampaignReader.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::campaign::{Campaign, CampaignStatus};
use crate::domain::foundation::{CampaignId, CompanyId, DomainError};
use crate::ports::CampaignReader;

/// PostgreSQL implementation of CampaignReader.
#[derive(Clone)]
pub struct PostgresCampaignReader {
    pool: PgPool,
}

impl PostgresCampaignReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignReader for PostgresCampaignReader {
    async fn find_for_company(
        &self,
        id: &CampaignId,
        company_id: &CompanyId,
    ) -> Result<Option<Campaign>, DomainError> {
        let row = sqlx::query(
            "SELECT id, company_id, name, status FROM campaigns WHERE id = $1 AND company_id = $2",
        )
        .bind(id.as_uuid())
        .bind(company_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch campaign: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let get_err = |e: sqlx::Error| DomainError::database(format!("Failed to read campaign: {}", e));
        let status: String = row.try_get("status").map_err(get_err)?;

        Ok(Some(Campaign {
            id: CampaignId::from_uuid(row.try_get("id").map_err(get_err)?),
            company_id: CompanyId::from_uuid(row.try_get("company_id").map_err(get_err)?),
            name: row.try_get("name").map_err(get_err)?,
            status: CampaignStatus::parse(&status).unwrap_or_default(),
        }))
    }
}
