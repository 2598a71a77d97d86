//! `PostgreSQL` implementation of the `HistoryRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fategm_core::error::DomainError;
use fategm_rounds::domain::history::ActionHistory;
use fategm_rounds::repository::HistoryRepository;

use crate::error::{storage_error, write_error};

/// Column list for `action_history` queries.
const COLUMNS: &str = "id, campaign_id, turn_number, closed_at, action_order, \
                       servant_actions, master_actions, created_at";

/// PostgreSQL-backed history archive.
#[derive(Debug, Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    /// Creates a new `PgHistoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    campaign_id: Uuid,
    turn_number: i32,
    closed_at: DateTime<Utc>,
    action_order: Option<serde_json::Value>,
    servant_actions: Option<serde_json::Value>,
    master_actions: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for ActionHistory {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            campaign_id: row.campaign_id,
            turn_number: row.turn_number,
            closed_at: row.closed_at,
            action_order: row.action_order,
            servant_actions: row.servant_actions,
            master_actions: row.master_actions,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn insert(&self, history: &ActionHistory) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO action_history \
             (id, campaign_id, turn_number, closed_at, action_order, \
              servant_actions, master_actions, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(history.id)
        .bind(history.campaign_id)
        .bind(history.turn_number)
        .bind(history.closed_at)
        .bind(&history.action_order)
        .bind(&history.servant_actions)
        .bind(&history.master_actions)
        .bind(history.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                &format!(
                    "history for campaign {} turn {} already archived",
                    history.campaign_id, history.turn_number
                ),
                e,
            )
        })?;
        Ok(())
    }

    async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ActionHistory>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_history \
             WHERE campaign_id = $1 \
             ORDER BY turn_number DESC"
        );
        let rows = sqlx::query_as::<_, HistoryRow>(&query)
            .bind(campaign_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(ActionHistory::from).collect())
    }
}
