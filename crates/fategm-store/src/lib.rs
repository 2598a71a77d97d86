//! PostgreSQL persistence for the round bounded context.
//!
//! Implements the `fategm-rounds` repository traits and the campaign
//! lookup seam on top of a `sqlx` connection pool. The uniqueness
//! invariants (one open round per campaign, one current submission per
//! slot, one history row per turn) are backstopped by the unique indexes
//! in [`schema`]; unique-violation errors surface as
//! `DomainError::Conflict`.

mod error;
pub mod pg_campaign_directory;
pub mod pg_history_repository;
pub mod pg_round_repository;
pub mod pg_submission_repository;
pub mod schema;

pub use pg_campaign_directory::PgCampaignDirectory;
pub use pg_history_repository::PgHistoryRepository;
pub use pg_round_repository::PgRoundRepository;
pub use pg_submission_repository::PgSubmissionRepository;
