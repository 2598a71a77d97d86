//! `PostgreSQL` implementation of the `RoundRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fategm_core::error::DomainError;
use fategm_rounds::domain::round::{Round, RoundStatus};
use fategm_rounds::repository::RoundRepository;

use crate::error::{storage_error, write_error};

/// Column list for `rounds` queries.
const COLUMNS: &str = "id, campaign_id, turn_number, status, created_at, closed_at";

/// PostgreSQL-backed round repository.
#[derive(Debug, Clone)]
pub struct PgRoundRepository {
    pool: PgPool,
}

impl PgRoundRepository {
    /// Creates a new `PgRoundRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoundRow {
    id: Uuid,
    campaign_id: Uuid,
    turn_number: i32,
    status: String,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl TryFrom<RoundRow> for Round {
    type Error = DomainError;

    fn try_from(row: RoundRow) -> Result<Self, Self::Error> {
        let status: RoundStatus = row
            .status
            .parse()
            .map_err(DomainError::Infrastructure)?;
        Ok(Self {
            id: row.id,
            campaign_id: row.campaign_id,
            turn_number: row.turn_number,
            status,
            created_at: row.created_at,
            closed_at: row.closed_at,
        })
    }
}

#[async_trait]
impl RoundRepository for PgRoundRepository {
    async fn find_open(&self, campaign_id: Uuid) -> Result<Option<Round>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM rounds WHERE campaign_id = $1 AND status = 'OPEN'"
        );
        let row = sqlx::query_as::<_, RoundRow>(&query)
            .bind(campaign_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        row.map(Round::try_from).transpose()
    }

    async fn latest_turn_number(&self, campaign_id: Uuid) -> Result<Option<i32>, DomainError> {
        sqlx::query_scalar("SELECT MAX(turn_number) FROM rounds WHERE campaign_id = $1")
            .bind(campaign_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn insert(&self, round: &Round) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO rounds (id, campaign_id, turn_number, status, created_at, closed_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(round.id)
        .bind(round.campaign_id)
        .bind(round.turn_number)
        .bind(round.status.as_str())
        .bind(round.created_at)
        .bind(round.closed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            write_error(
                &format!(
                    "round turn {} for campaign {} already exists or another round is open",
                    round.turn_number, round.campaign_id
                ),
                e,
            )
        })?;
        Ok(())
    }

    async fn close(&self, round_id: Uuid, closed_at: DateTime<Utc>) -> Result<Round, DomainError> {
        let query = format!(
            "UPDATE rounds SET status = 'CLOSED', closed_at = $2 \
             WHERE id = $1 AND status = 'OPEN' \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, RoundRow>(&query)
            .bind(round_id)
            .bind(closed_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::Conflict(format!("round {round_id} is not open")))?;
        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> RoundRow {
        RoundRow {
            id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            turn_number: 1,
            status: status.to_owned(),
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn test_row_conversion_parses_status() {
        let round = Round::try_from(row("OPEN")).unwrap();
        assert_eq!(round.status, RoundStatus::Open);
    }

    #[test]
    fn test_row_conversion_rejects_unknown_status() {
        let result = Round::try_from(row("LIMBO"));
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
