//! In-memory campaign reader for tests and local runs.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::campaign::Campaign;
use crate::domain::foundation::{CampaignId, CompanyId, DomainError, ErrorCode};
use crate::ports::CampaignReader;

/// Campaign reader over a fixed in-memory list.
#[derive(Default)]
pub struct InMemoryCampaignReader {
    campaigns: RwLock<Vec<Campaign>>,
}

impl InMemoryCampaignReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader seeded with campaigns.
    pub fn with_campaigns(campaigns: Vec<Campaign>) -> Self {
        Self {
            campaigns: RwLock::new(campaigns),
        }
    }

    /// Adds a campaign.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add(&self, campaign: Campaign) {
        self.campaigns
            .write()
            .expect("InMemoryCampaignReader: lock poisoned")
            .push(campaign);
    }
}

#[async_trait]
impl CampaignReader for InMemoryCampaignReader {
    async fn find_for_company(
        &self,
        id: &CampaignId,
        company_id: &CompanyId,
    ) -> Result<Option<Campaign>, DomainError> {
        let campaigns = self.campaigns.read().map_err(|_| {
            DomainError::new(ErrorCode::InternalError, "campaign reader lock poisoned")
        })?;
        Ok(campaigns
            .iter()
            .find(|c| &c.id == id && c.is_owned_by(company_id))
            .cloned())
    }
}
