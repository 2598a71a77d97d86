//! Rounds — one discrete cycle of action collection within a campaign.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a round. The transition is one-way: OPEN → CLOSED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    /// Accepting submissions.
    Open,
    /// Resolved; no further submissions.
    Closed,
}

impl RoundStatus {
    /// Canonical storage/wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            other => Err(format!("unknown round status: {other}")),
        }
    }
}

/// A round belongs to exactly one campaign. For a given campaign at most one
/// round is OPEN at any instant, and turn numbers increase by 1 from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    /// Round identifier.
    pub id: Uuid,
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Position in the campaign's turn order, starting at 1.
    pub turn_number: i32,
    /// Current lifecycle state.
    pub status: RoundStatus,
    /// When the round was opened.
    pub created_at: DateTime<Utc>,
    /// When the round was closed; set only on the OPEN → CLOSED transition.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Round {
    /// Creates a new open round for a campaign at the given turn number.
    #[must_use]
    pub fn open(campaign_id: Uuid, turn_number: i32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            turn_number,
            status: RoundStatus::Open,
            created_at,
            closed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_storage_form() {
        assert_eq!("OPEN".parse::<RoundStatus>().unwrap(), RoundStatus::Open);
        assert_eq!(
            "CLOSED".parse::<RoundStatus>().unwrap(),
            RoundStatus::Closed
        );
        assert_eq!(RoundStatus::Open.as_str(), "OPEN");
        assert!("open".parse::<RoundStatus>().is_err());
    }

    #[test]
    fn test_open_round_has_no_closing_timestamp() {
        let round = Round::open(Uuid::new_v4(), 1, Utc::now());
        assert_eq!(round.status, RoundStatus::Open);
        assert_eq!(round.turn_number, 1);
        assert!(round.closed_at.is_none());
    }
}
