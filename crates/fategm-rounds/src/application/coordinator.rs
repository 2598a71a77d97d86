//! Coordinator — ties the ledger, lifecycle, archiver, and hub together for
//! the two orchestrated entry points consumed by the HTTP layer.
//!
//! Notification and archival are best-effort side channels relative to the
//! authoritative round/submission state: a publish or archive failure is
//! logged and absorbed here, never surfaced to the caller, and never rolls
//! back a committed write.

use uuid::Uuid;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::clock::Clock;
use fategm_core::error::DomainError;
use fategm_notify::NotificationHub;

use crate::application::archiver::{self, ArchiveRound};
use crate::application::ledger::{self, SubmitAction};
use crate::application::lifecycle;
use crate::domain::history::ActionHistory;
use crate::domain::round::Round;
use crate::domain::submission::ActionSubmission;
use crate::repository::{HistoryRepository, RoundRepository, SubmissionRepository};

/// Caller-supplied payload for the close-round snapshot.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// Ordered action sequence. Opaque.
    pub action_order: Option<Vec<serde_json::Value>>,
    /// Servant-side actions. Opaque.
    pub servant_actions: Option<Vec<serde_json::Value>>,
    /// Master-side actions. Opaque.
    pub master_actions: Option<Vec<serde_json::Value>>,
}

/// Result of closing a round: the closed round, plus the archived snapshot
/// when a report was supplied and the archive succeeded.
#[derive(Debug, Clone)]
pub struct CloseRoundOutcome {
    /// The round, now CLOSED.
    pub round: Round,
    /// The snapshot, if one was written.
    pub history: Option<ActionHistory>,
}

/// Records a submission and fans it out to the campaign's live subscribers.
///
/// The publish happens after the ledger write commits and cannot fail the
/// submission.
///
/// # Errors
///
/// Propagates ledger errors; see [`ledger::submit`].
pub async fn submit_action(
    command: SubmitAction,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    rounds: &dyn RoundRepository,
    submissions: &dyn SubmissionRepository,
    hub: &NotificationHub<ActionSubmission>,
) -> Result<ActionSubmission, DomainError> {
    let saved = ledger::submit(command, clock, campaigns, rounds, submissions).await?;
    hub.publish(saved.campaign_id, &saved);
    Ok(saved)
}

/// Closes the campaign's open round and, when a report is supplied,
/// archives it under the just-closed round's turn number and closing time.
///
/// The close is authoritative: an archive failure is logged and reported as
/// `history: None` while the round stays CLOSED.
///
/// # Errors
///
/// Propagates lifecycle errors; see [`lifecycle::close_open_round`].
pub async fn close_round(
    campaign_id: Uuid,
    report: Option<RoundReport>,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    rounds: &dyn RoundRepository,
    histories: &dyn HistoryRepository,
) -> Result<CloseRoundOutcome, DomainError> {
    let round = lifecycle::close_open_round(campaign_id, clock, rounds).await?;

    let history = match report {
        None => None,
        Some(report) => {
            let command = ArchiveRound {
                campaign_id,
                turn_number: round.turn_number,
                closed_at: round.closed_at.unwrap_or_else(|| clock.now()),
                action_order: report.action_order,
                servant_actions: report.servant_actions,
                master_actions: report.master_actions,
            };
            match archiver::archive(command, clock, campaigns, histories).await {
                Ok(history) => Some(history),
                Err(e) => {
                    tracing::error!(
                        %campaign_id,
                        turn_number = round.turn_number,
                        error = %e,
                        "failed to archive closed round, close stands"
                    );
                    None
                }
            }
        }
    };

    Ok(CloseRoundOutcome { round, history })
}
