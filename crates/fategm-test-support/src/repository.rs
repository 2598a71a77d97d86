//! In-memory repositories — mock implementations of the round-context
//! persistence traits for tests.
//!
//! Each repository guards its rows with a single `Mutex`, which gives the
//! same atomicity the PostgreSQL implementations get from transactions and
//! row locks: `put_current`'s demote+insert pair happens under one guard,
//! and `insert` enforces the same uniqueness rules the schema's unique
//! indexes do.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use fategm_core::error::DomainError;
use fategm_rounds::domain::history::ActionHistory;
use fategm_rounds::domain::round::{Round, RoundStatus};
use fategm_rounds::domain::submission::ActionSubmission;
use fategm_rounds::repository::{HistoryRepository, RoundRepository, SubmissionRepository};

/// In-memory `RoundRepository`.
#[derive(Debug, Default)]
pub struct InMemoryRoundRepository {
    rounds: Mutex<Vec<Round>>,
}

impl InMemoryRoundRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored round, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<Round> {
        self.rounds.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoundRepository for InMemoryRoundRepository {
    async fn find_open(&self, campaign_id: Uuid) -> Result<Option<Round>, DomainError> {
        Ok(self
            .rounds
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.campaign_id == campaign_id && r.status == RoundStatus::Open)
            .cloned())
    }

    async fn latest_turn_number(&self, campaign_id: Uuid) -> Result<Option<i32>, DomainError> {
        Ok(self
            .rounds
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.campaign_id == campaign_id)
            .map(|r| r.turn_number)
            .max())
    }

    async fn insert(&self, round: &Round) -> Result<(), DomainError> {
        let mut rounds = self.rounds.lock().unwrap();
        if round.status == RoundStatus::Open
            && rounds
                .iter()
                .any(|r| r.campaign_id == round.campaign_id && r.status == RoundStatus::Open)
        {
            return Err(DomainError::Conflict(format!(
                "campaign {} already has an open round",
                round.campaign_id
            )));
        }
        if rounds
            .iter()
            .any(|r| r.campaign_id == round.campaign_id && r.turn_number == round.turn_number)
        {
            return Err(DomainError::Conflict(format!(
                "turn number {} already exists for campaign {}",
                round.turn_number, round.campaign_id
            )));
        }
        rounds.push(round.clone());
        Ok(())
    }

    async fn close(&self, round_id: Uuid, closed_at: DateTime<Utc>) -> Result<Round, DomainError> {
        let mut rounds = self.rounds.lock().unwrap();
        let round = rounds
            .iter_mut()
            .find(|r| r.id == round_id && r.status == RoundStatus::Open)
            .ok_or_else(|| DomainError::Conflict(format!("round {round_id} is not open")))?;
        round.status = RoundStatus::Closed;
        round.closed_at = Some(closed_at);
        Ok(round.clone())
    }
}

/// In-memory `SubmissionRepository`.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    submissions: Mutex<Vec<ActionSubmission>>,
}

impl InMemorySubmissionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored submission, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all(&self) -> Vec<ActionSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn put_current(&self, submission: &ActionSubmission) -> Result<(), DomainError> {
        let mut submissions = self.submissions.lock().unwrap();
        for existing in submissions.iter_mut().filter(|s| {
            s.round_id == submission.round_id
                && s.servant_class == submission.servant_class
                && s.action_kind == submission.action_kind
        }) {
            existing.current = false;
        }
        submissions.push(submission.clone());
        Ok(())
    }

    async fn list_current(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ActionSubmission>, DomainError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.campaign_id == campaign_id && s.current)
            .cloned()
            .collect())
    }
}

/// In-memory `HistoryRepository`.
#[derive(Debug, Default)]
pub struct InMemoryHistoryRepository {
    rows: Mutex<Vec<ActionHistory>>,
}

impl InMemoryHistoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn insert(&self, history: &ActionHistory) -> Result<(), DomainError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|h| h.campaign_id == history.campaign_id && h.turn_number == history.turn_number)
        {
            return Err(DomainError::Conflict(format!(
                "history for campaign {} turn {} already archived",
                history.campaign_id, history.turn_number
            )));
        }
        rows.push(history.clone());
        Ok(())
    }

    async fn list_by_campaign(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ActionHistory>, DomainError> {
        let mut rows: Vec<ActionHistory> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.campaign_id == campaign_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.turn_number.cmp(&a.turn_number));
        Ok(rows)
    }
}

/// A round repository whose operations always fail. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingRoundRepository;

#[async_trait]
impl RoundRepository for FailingRoundRepository {
    async fn find_open(&self, _campaign_id: Uuid) -> Result<Option<Round>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn latest_turn_number(&self, _campaign_id: Uuid) -> Result<Option<i32>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn insert(&self, _round: &Round) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn close(
        &self,
        _round_id: Uuid,
        _closed_at: DateTime<Utc>,
    ) -> Result<Round, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A submission repository whose operations always fail.
#[derive(Debug)]
pub struct FailingSubmissionRepository;

#[async_trait]
impl SubmissionRepository for FailingSubmissionRepository {
    async fn put_current(&self, _submission: &ActionSubmission) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_current(
        &self,
        _campaign_id: Uuid,
    ) -> Result<Vec<ActionSubmission>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

/// A history repository whose operations always fail.
#[derive(Debug)]
pub struct FailingHistoryRepository;

#[async_trait]
impl HistoryRepository for FailingHistoryRepository {
    async fn insert(&self, _history: &ActionHistory) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_by_campaign(
        &self,
        _campaign_id: Uuid,
    ) -> Result<Vec<ActionHistory>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
