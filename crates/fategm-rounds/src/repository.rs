//! Persistence seams for the round bounded context.
//!
//! Implementations must uphold the uniqueness contracts documented on each
//! method; the application services rely on them instead of taking locks of
//! their own. The PostgreSQL implementations live in `fategm-store`, the
//! in-memory ones in `fategm-test-support`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use fategm_core::error::DomainError;

use crate::domain::history::ActionHistory;
use crate::domain::round::Round;
use crate::domain::submission::ActionSubmission;

/// Durable table of rounds per campaign. CRUD only; the lifecycle rules live
/// in [`crate::application::lifecycle`].
#[async_trait]
pub trait RoundRepository: Send + Sync {
    /// Returns the campaign's OPEN round, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn find_open(&self, campaign_id: Uuid) -> Result<Option<Round>, DomainError>;

    /// Returns the highest turn number recorded for the campaign.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn latest_turn_number(&self, campaign_id: Uuid) -> Result<Option<i32>, DomainError>;

    /// Inserts a new round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` when the campaign already has an OPEN
    /// round or the turn number is taken — callers lost a creation race and
    /// should re-fetch. Returns `DomainError::Infrastructure` on storage
    /// failure.
    async fn insert(&self, round: &Round) -> Result<(), DomainError>;

    /// Transitions a round OPEN → CLOSED, stamping `closed_at`, and returns
    /// the updated round. The update is conditional on the round still being
    /// OPEN.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` when the round is no longer OPEN
    /// (a concurrent close won) and `DomainError::Infrastructure` on storage
    /// failure.
    async fn close(&self, round_id: Uuid, closed_at: DateTime<Utc>) -> Result<Round, DomainError>;
}

/// Ledger of action submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Stores `submission` as the current one for its slot: within a single
    /// atomic unit, clears `current` on every existing submission for
    /// `(round_id, servant_class, action_kind)` and inserts the new row.
    /// Two concurrent calls for the same slot must serialize; the one that
    /// commits second is the one left current.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn put_current(&self, submission: &ActionSubmission) -> Result<(), DomainError>;

    /// All submissions for the campaign with `current = true`, across
    /// rounds. Uniqueness of `current` is scoped per round+slot, so slots
    /// never re-submitted in a later round remain visible here.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn list_current(&self, campaign_id: Uuid)
    -> Result<Vec<ActionSubmission>, DomainError>;
}

/// Append-only archive of closed rounds.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends one history row.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Conflict` when a row for the same
    /// `(campaign_id, turn_number)` already exists — prior snapshots are
    /// never overwritten. Returns `DomainError::Infrastructure` on storage
    /// failure.
    async fn insert(&self, history: &ActionHistory) -> Result<(), DomainError>;

    /// All history rows for the campaign, ordered by turn number descending.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on storage failure.
    async fn list_by_campaign(&self, campaign_id: Uuid)
    -> Result<Vec<ActionHistory>, DomainError>;
}
