//! `PostgreSQL` implementation of the `CampaignDirectory` trait.
//!
//! Read-only: campaigns belong to the surrounding application, this crate
//! only checks that a referenced id exists.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::error::DomainError;

use crate::error::storage_error;

/// PostgreSQL-backed campaign lookup.
#[derive(Debug, Clone)]
pub struct PgCampaignDirectory {
    pool: PgPool,
}

impl PgCampaignDirectory {
    /// Creates a new `PgCampaignDirectory`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignDirectory for PgCampaignDirectory {
    async fn exists(&self, campaign_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM campaigns WHERE id = $1)")
            .bind(campaign_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }
}
