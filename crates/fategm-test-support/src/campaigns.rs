//! Campaign directory doubles.

use std::collections::HashSet;

use async_trait::async_trait;
use fategm_core::campaign::CampaignDirectory;
use fategm_core::error::DomainError;
use uuid::Uuid;

/// A campaign directory backed by a fixed set of known ids.
#[derive(Debug, Default)]
pub struct StaticCampaignDirectory {
    known: HashSet<Uuid>,
}

impl StaticCampaignDirectory {
    /// Creates a directory that knows exactly the given campaigns.
    #[must_use]
    pub fn with_campaigns(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            known: ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl CampaignDirectory for StaticCampaignDirectory {
    async fn exists(&self, campaign_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.known.contains(&campaign_id))
    }
}

/// A campaign directory whose lookups always fail. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingCampaignDirectory;

#[async_trait]
impl CampaignDirectory for FailingCampaignDirectory {
    async fn exists(&self, _campaign_id: Uuid) -> Result<bool, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
