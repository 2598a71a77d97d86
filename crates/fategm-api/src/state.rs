//! Shared application state.

use std::sync::Arc;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::clock::Clock;
use fategm_notify::NotificationHub;
use fategm_rounds::domain::submission::ActionSubmission;
use fategm_rounds::repository::{HistoryRepository, RoundRepository, SubmissionRepository};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Time source for round and submission timestamps.
    pub clock: Arc<dyn Clock>,
    /// Existence checks against the externally-owned campaign resource.
    pub campaigns: Arc<dyn CampaignDirectory>,
    /// Durable round table.
    pub rounds: Arc<dyn RoundRepository>,
    /// Durable submission ledger.
    pub submissions: Arc<dyn SubmissionRepository>,
    /// Durable history archive.
    pub histories: Arc<dyn HistoryRepository>,
    /// Process-local subscriber registry for live submission fan-out.
    pub hub: NotificationHub<ActionSubmission>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        campaigns: Arc<dyn CampaignDirectory>,
        rounds: Arc<dyn RoundRepository>,
        submissions: Arc<dyn SubmissionRepository>,
        histories: Arc<dyn HistoryRepository>,
        hub: NotificationHub<ActionSubmission>,
    ) -> Self {
        Self {
            clock,
            campaigns,
            rounds,
            submissions,
            histories,
            hub,
        }
    }
}
