//! Campaign reader port.
//!
//! Campaigns are managed outside this service; sessions only need to confirm
//! that a campaign exists for the company creating the session.

use crate::domain::campaign::Campaign;
use crate::domain::foundation::{CampaignId, CompanyId, DomainError};
use async_trait::async_trait;

/// Reader port for campaign lookups.
#[async_trait]
pub trait CampaignReader: Send + Sync {
    /// Find a campaign owned by `company_id`.
    ///
    /// Returns `None` if it does not exist or belongs to another company.
    async fn find_for_company(
        &self,
        id: &CampaignId,
        company_id: &CompanyId,
    ) -> Result<Option<Campaign>, DomainError>;
}
