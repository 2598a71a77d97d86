//! `PostgreSQL` implementation of the `SubmissionRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use fategm_core::error::DomainError;
use fategm_rounds::domain::submission::{ActionKind, ActionSubmission};
use fategm_rounds::repository::SubmissionRepository;

use crate::error::{storage_error, write_error};

/// Column list for `action_submissions` queries.
const COLUMNS: &str = "id, round_id, campaign_id, servant_class, action_kind, content, \
                       submitted_by, is_current, turn_number, created_at";

/// PostgreSQL-backed submission ledger.
#[derive(Debug, Clone)]
pub struct PgSubmissionRepository {
    pool: PgPool,
}

impl PgSubmissionRepository {
    /// Creates a new `PgSubmissionRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: Uuid,
    round_id: Uuid,
    campaign_id: Uuid,
    servant_class: String,
    action_kind: String,
    content: String,
    submitted_by: Option<String>,
    is_current: bool,
    turn_number: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for ActionSubmission {
    type Error = DomainError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let action_kind: ActionKind = row
            .action_kind
            .parse()
            .map_err(DomainError::Infrastructure)?;
        Ok(Self {
            id: row.id,
            round_id: row.round_id,
            campaign_id: row.campaign_id,
            servant_class: row.servant_class,
            action_kind,
            content: row.content,
            submitted_by: row.submitted_by,
            current: row.is_current,
            turn_number: row.turn_number,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn put_current(&self, submission: &ActionSubmission) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // Lock the round row so concurrent writers to any slot of this round
        // serialize; the one that commits second is the one left current.
        sqlx::query("SELECT id FROM rounds WHERE id = $1 FOR UPDATE")
            .bind(submission.round_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?;

        sqlx::query(
            "UPDATE action_submissions SET is_current = FALSE \
             WHERE round_id = $1 AND servant_class = $2 AND action_kind = $3 AND is_current",
        )
        .bind(submission.round_id)
        .bind(&submission.servant_class)
        .bind(submission.action_kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            "INSERT INTO action_submissions \
             (id, round_id, campaign_id, servant_class, action_kind, content, \
              submitted_by, is_current, turn_number, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(submission.id)
        .bind(submission.round_id)
        .bind(submission.campaign_id)
        .bind(&submission.servant_class)
        .bind(submission.action_kind.as_str())
        .bind(&submission.content)
        .bind(&submission.submitted_by)
        .bind(submission.current)
        .bind(submission.turn_number)
        .bind(submission.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            write_error(
                &format!(
                    "slot ({}, {}, {}) already has a current submission",
                    submission.round_id, submission.servant_class, submission.action_kind
                ),
                e,
            )
        })?;

        tx.commit().await.map_err(storage_error)
    }

    async fn list_current(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ActionSubmission>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_submissions \
             WHERE campaign_id = $1 AND is_current \
             ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(campaign_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        rows.into_iter().map(ActionSubmission::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_parses_action_kind() {
        let row = SubmissionRow {
            id: Uuid::new_v4(),
            round_id: Uuid::new_v4(),
            campaign_id: Uuid::new_v4(),
            servant_class: "弓".to_owned(),
            action_kind: "MASTER_ACTION".to_owned(),
            content: "command spell".to_owned(),
            submitted_by: None,
            is_current: true,
            turn_number: 2,
            created_at: Utc::now(),
        };

        let submission = ActionSubmission::try_from(row).unwrap();
        assert_eq!(submission.action_kind, ActionKind::MasterAction);
        assert!(submission.current);
    }
}
