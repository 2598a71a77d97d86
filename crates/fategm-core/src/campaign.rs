//! Campaign lookup seam.
//!
//! Campaigns are owned by the surrounding application; the round subsystem
//! only ever needs to know whether one exists. This trait is the narrow
//! interface to that external collaborator.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;

/// Existence checks against the externally-owned campaign resource.
#[async_trait]
pub trait CampaignDirectory: Send + Sync {
    /// Returns whether a campaign with the given id exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lookup itself fails.
    async fn exists(&self, campaign_id: Uuid) -> Result<bool, DomainError>;

    /// Fails with [`DomainError::CampaignNotFound`] unless the campaign exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CampaignNotFound` for an unknown id and
    /// `DomainError::Infrastructure` if the lookup fails.
    async fn require(&self, campaign_id: Uuid) -> Result<(), DomainError> {
        if self.exists(campaign_id).await? {
            Ok(())
        } else {
            Err(DomainError::CampaignNotFound(campaign_id))
        }
    }
}
