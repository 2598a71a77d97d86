//! Shared test doubles and utilities for the Fate GM Helper backend.

mod campaigns;
mod clock;
mod repository;

pub use campaigns::{FailingCampaignDirectory, StaticCampaignDirectory};
pub use clock::FixedClock;
pub use repository::{
    FailingHistoryRepository, FailingRoundRepository, FailingSubmissionRepository,
    InMemoryHistoryRepository, InMemoryRoundRepository, InMemorySubmissionRepository,
};
