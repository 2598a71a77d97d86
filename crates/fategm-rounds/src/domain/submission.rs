//! Action submissions — per-slot player declarations within an open round.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two submission categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// A servant-side action.
    ServantAction,
    /// A master-side action.
    MasterAction,
}

impl ActionKind {
    /// Canonical storage/wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServantAction => "SERVANT_ACTION",
            Self::MasterAction => "MASTER_ACTION",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SERVANT_ACTION" => Ok(Self::ServantAction),
            "MASTER_ACTION" => Ok(Self::MasterAction),
            other => Err(format!("unknown action kind: {other}")),
        }
    }
}

/// One submitted action, tied to a round and a slot.
///
/// Among all submissions sharing the same `(round_id, servant_class,
/// action_kind)` slot, at most one has `current = true` — the most recently
/// accepted one. Superseded rows only ever have `current` cleared; rows are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSubmission {
    /// Submission identifier.
    pub id: Uuid,
    /// Round this submission targets.
    pub round_id: Uuid,
    /// Owning campaign, denormalized for query convenience.
    pub campaign_id: Uuid,
    /// Free-text class label chosen by the submitter, e.g. "弓".
    pub servant_class: String,
    /// Which side of the slot the action belongs to.
    pub action_kind: ActionKind,
    /// Free-text action content.
    pub content: String,
    /// Optional submitter label, echoed back verbatim.
    pub submitted_by: Option<String>,
    /// Whether this is the authoritative submission for its slot.
    pub current: bool,
    /// Copy of the round's turn number at submission time.
    pub turn_number: i32,
    /// When the submission was accepted.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_round_trips_through_storage_form() {
        assert_eq!(
            "SERVANT_ACTION".parse::<ActionKind>().unwrap(),
            ActionKind::ServantAction
        );
        assert_eq!(
            "MASTER_ACTION".parse::<ActionKind>().unwrap(),
            ActionKind::MasterAction
        );
        assert!("servant_action".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ActionKind::ServantAction).unwrap();
        assert_eq!(json, "\"SERVANT_ACTION\"");
    }
}
