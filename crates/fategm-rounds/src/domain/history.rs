//! Action history — the immutable snapshot archived when a round closes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One archived round. A campaign owns at most one history row per turn
/// number; rows are append-only and immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionHistory {
    /// History record identifier.
    pub id: Uuid,
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Turn number of the archived round.
    pub turn_number: i32,
    /// Closing timestamp of the archived round.
    pub closed_at: DateTime<Utc>,
    /// Ordered action sequence, as supplied by the caller. Opaque.
    pub action_order: Option<serde_json::Value>,
    /// Servant-side actions, as supplied by the caller. Opaque.
    pub servant_actions: Option<serde_json::Value>,
    /// Master-side actions, as supplied by the caller. Opaque.
    pub master_actions: Option<serde_json::Value>,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}
