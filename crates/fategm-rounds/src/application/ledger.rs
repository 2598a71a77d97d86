//! Submission ledger — validated, atomic per-slot action submission.

use uuid::Uuid;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::clock::Clock;
use fategm_core::error::DomainError;

use crate::application::lifecycle;
use crate::domain::submission::{ActionKind, ActionSubmission};
use crate::repository::{RoundRepository, SubmissionRepository};

/// A request to record one action for a slot of the campaign's open round.
#[derive(Debug, Clone)]
pub struct SubmitAction {
    /// Target campaign.
    pub campaign_id: Uuid,
    /// Free-text class label identifying the slot, e.g. "弓".
    pub servant_class: String,
    /// Which side of the slot the action belongs to.
    pub action_kind: ActionKind,
    /// Free-text action content.
    pub content: String,
    /// Optional submitter label.
    pub submitted_by: Option<String>,
}

/// Records a submission as the current one for its slot.
///
/// Resolves the campaign's open round (creating one if absent), then the
/// repository atomically demotes any prior submission for the slot and
/// inserts the new row with `current = true` and the round's turn number.
///
/// # Errors
///
/// Returns `DomainError::Validation` when `servantClass` or `content` is
/// empty, `DomainError::CampaignNotFound` for an unknown campaign, and
/// whatever the round resolution or the ledger write propagates.
pub async fn submit(
    command: SubmitAction,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    rounds: &dyn RoundRepository,
    submissions: &dyn SubmissionRepository,
) -> Result<ActionSubmission, DomainError> {
    if command.servant_class.trim().is_empty() {
        return Err(DomainError::validation(
            "servantClass",
            "must not be empty",
        ));
    }
    if command.content.trim().is_empty() {
        return Err(DomainError::validation("content", "must not be empty"));
    }
    campaigns.require(command.campaign_id).await?;

    let round =
        lifecycle::get_or_create_open_round(command.campaign_id, clock, campaigns, rounds).await?;

    let submission = ActionSubmission {
        id: Uuid::new_v4(),
        round_id: round.id,
        campaign_id: command.campaign_id,
        servant_class: command.servant_class,
        action_kind: command.action_kind,
        content: command.content,
        submitted_by: command.submitted_by,
        current: true,
        turn_number: round.turn_number,
        created_at: clock.now(),
    };
    submissions.put_current(&submission).await?;
    Ok(submission)
}

/// All submissions for the campaign with `current = true`, across rounds.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
pub async fn list_current(
    campaign_id: Uuid,
    submissions: &dyn SubmissionRepository,
) -> Result<Vec<ActionSubmission>, DomainError> {
    submissions.list_current(campaign_id).await
}
