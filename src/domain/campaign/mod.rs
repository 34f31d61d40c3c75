//! Campaign reference entity.
//!
//! Campaigns are owned and managed elsewhere. The notification domain only
//! reads them to confirm that a campaign exists and belongs to the company
//! creating a session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CampaignId, CompanyId};

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    /// Parses the stored representation; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(CampaignStatus::Draft),
            "ACTIVE" => Some(CampaignStatus::Active),
            "PAUSED" => Some(CampaignStatus::Paused),
            "COMPLETED" => Some(CampaignStatus::Completed),
            "CANCELLED" => Some(CampaignStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}

/// Read-only view of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub company_id: CompanyId,
    pub name: String,
    pub status: CampaignStatus,
}

impl Campaign {
    /// Returns true if the campaign belongs to the given company.
    pub fn is_owned_by(&self, company_id: &CompanyId) -> bool {
        &self.company_id == company_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn ownership_compares_company() {
        let company = CompanyId::from_uuid(Uuid::new_v4());
        let campaign = Campaign {
            id: CampaignId::new(),
            company_id: company,
            name: "Spring".to_string(),
            status: CampaignStatus::Draft,
        };
        assert!(campaign.is_owned_by(&company));
        assert!(!campaign.is_owned_by(&CompanyId::from_uuid(Uuid::new_v4())));
    }

    #[test]
    fn status_parse_roundtrips_display() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Active,
            CampaignStatus::Paused,
            CampaignStatus::Completed,
            CampaignStatus::Cancelled,
        ] {
            assert_eq!(CampaignStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(CampaignStatus::parse("archived"), None);
    }
}
