//! History archiver — immutable per-turn snapshots of closed rounds.

use uuid::Uuid;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::clock::Clock;
use fategm_core::error::DomainError;

use crate::domain::history::ActionHistory;
use crate::repository::HistoryRepository;

/// A request to archive one closed round.
///
/// The three payload fields are independently optional; a missing field is
/// stored as empty, not an error.
#[derive(Debug, Clone)]
pub struct ArchiveRound {
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Turn number of the closed round.
    pub turn_number: i32,
    /// Closing timestamp of the closed round.
    pub closed_at: chrono::DateTime<chrono::Utc>,
    /// Ordered action sequence. Opaque.
    pub action_order: Option<Vec<serde_json::Value>>,
    /// Servant-side actions. Opaque.
    pub servant_actions: Option<Vec<serde_json::Value>>,
    /// Master-side actions. Opaque.
    pub master_actions: Option<Vec<serde_json::Value>>,
}

/// Appends one history snapshot.
///
/// A payload field that fails to encode is logged and stored empty rather
/// than aborting the archive.
///
/// # Errors
///
/// Returns `DomainError::CampaignNotFound` for an unknown campaign,
/// `DomainError::Conflict` when the `(campaign, turn)` pair was already
/// archived, and `DomainError::Infrastructure` on storage failure.
pub async fn archive(
    command: ArchiveRound,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    histories: &dyn HistoryRepository,
) -> Result<ActionHistory, DomainError> {
    campaigns.require(command.campaign_id).await?;

    let history = ActionHistory {
        id: Uuid::new_v4(),
        campaign_id: command.campaign_id,
        turn_number: command.turn_number,
        closed_at: command.closed_at,
        action_order: encode_payload("actionOrder", command.action_order),
        servant_actions: encode_payload("servantActions", command.servant_actions),
        master_actions: encode_payload("masterActions", command.master_actions),
        created_at: clock.now(),
    };
    histories.insert(&history).await?;
    Ok(history)
}

/// All archived rounds for the campaign, latest turn first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
pub async fn list_by_campaign(
    campaign_id: Uuid,
    histories: &dyn HistoryRepository,
) -> Result<Vec<ActionHistory>, DomainError> {
    histories.list_by_campaign(campaign_id).await
}

fn encode_payload(
    field: &'static str,
    payload: Option<Vec<serde_json::Value>>,
) -> Option<serde_json::Value> {
    let payload = payload?;
    match serde_json::to_value(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(field, error = %e, "failed to encode history payload, storing empty");
            None
        }
    }
}
