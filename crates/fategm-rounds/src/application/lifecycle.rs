//! Round lifecycle — opening, fetching, and closing rounds for a campaign.
//!
//! At most one round per campaign is OPEN at any instant. Creation is
//! optimistic: the repository's uniqueness rules reject the losers of a
//! concurrent creation race, who then re-fetch the winner's round.

use uuid::Uuid;

use fategm_core::campaign::CampaignDirectory;
use fategm_core::clock::Clock;
use fategm_core::error::DomainError;

use crate::domain::round::Round;
use crate::repository::RoundRepository;

/// Attempts per creation race before giving up.
const CREATE_ATTEMPTS: u32 = 3;

/// Returns the campaign's open round, if any.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` on storage failure.
pub async fn find_open_round(
    campaign_id: Uuid,
    rounds: &dyn RoundRepository,
) -> Result<Option<Round>, DomainError> {
    rounds.find_open(campaign_id).await
}

/// Returns the campaign's open round, creating one if none exists.
///
/// A created round gets turn number max+1 (1 for a fresh campaign). Under
/// concurrent callers exactly one creation succeeds; the rest observe a
/// conflict from the repository and re-fetch the created round.
///
/// # Errors
///
/// Returns `DomainError::CampaignNotFound` for an unknown campaign,
/// `DomainError::Conflict` if the creation race cannot be resolved within
/// the retry budget, and `DomainError::Infrastructure` on storage failure.
pub async fn get_or_create_open_round(
    campaign_id: Uuid,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    rounds: &dyn RoundRepository,
) -> Result<Round, DomainError> {
    for _ in 0..CREATE_ATTEMPTS {
        if let Some(open) = rounds.find_open(campaign_id).await? {
            return Ok(open);
        }
        campaigns.require(campaign_id).await?;

        let next_turn = rounds.latest_turn_number(campaign_id).await?.unwrap_or(0) + 1;
        let round = Round::open(campaign_id, next_turn, clock.now());
        match rounds.insert(&round).await {
            Ok(()) => return Ok(round),
            // Lost the race; loop around and fetch the winner's round.
            Err(DomainError::Conflict(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Err(DomainError::Conflict(format!(
        "could not resolve an open round for campaign {campaign_id} after {CREATE_ATTEMPTS} attempts"
    )))
}

/// Closes the campaign's open round, stamping the closing time.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` when no round is OPEN,
/// `DomainError::Conflict` when a concurrent close wins the transition, and
/// `DomainError::Infrastructure` on storage failure.
pub async fn close_open_round(
    campaign_id: Uuid,
    clock: &dyn Clock,
    rounds: &dyn RoundRepository,
) -> Result<Round, DomainError> {
    let open = rounds.find_open(campaign_id).await?.ok_or_else(|| {
        DomainError::InvalidState(format!("campaign {campaign_id} has no open round"))
    })?;
    rounds.close(open.id, clock.now()).await
}

/// Manually advances the campaign to a fresh round.
///
/// If a round is currently OPEN it is closed first, so the one-open-round
/// invariant holds throughout; the new round gets turn number max+1.
///
/// # Errors
///
/// Returns `DomainError::CampaignNotFound` for an unknown campaign,
/// `DomainError::Conflict` if the creation race cannot be resolved within
/// the retry budget, and `DomainError::Infrastructure` on storage failure.
pub async fn open_next_round(
    campaign_id: Uuid,
    clock: &dyn Clock,
    campaigns: &dyn CampaignDirectory,
    rounds: &dyn RoundRepository,
) -> Result<Round, DomainError> {
    campaigns.require(campaign_id).await?;

    for _ in 0..CREATE_ATTEMPTS {
        if let Some(open) = rounds.find_open(campaign_id).await? {
            match rounds.close(open.id, clock.now()).await {
                Ok(_) => {}
                // A concurrent caller closed it first; the advance proceeds.
                Err(DomainError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let next_turn = rounds.latest_turn_number(campaign_id).await?.unwrap_or(0) + 1;
        let round = Round::open(campaign_id, next_turn, clock.now());
        match rounds.insert(&round).await {
            Ok(()) => return Ok(round),
            Err(DomainError::Conflict(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Err(DomainError::Conflict(format!(
        "could not advance campaign {campaign_id} to a new round after {CREATE_ATTEMPTS} attempts"
    )))
}
