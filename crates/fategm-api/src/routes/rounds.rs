//! Routes for the round lifecycle: current, next, close-current, history.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use fategm_rounds::application::{archiver, coordinator, lifecycle};
use fategm_rounds::domain::history::ActionHistory;
use fategm_rounds::domain::round::{Round, RoundStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for every round endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    /// Campaign to scope the request to.
    pub campaign_id: Uuid,
}

/// Optional request body for POST /api/rounds/close-current.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRoundRequest {
    /// Ordered action sequence. Opaque.
    #[serde(default)]
    pub action_order: Option<Vec<serde_json::Value>>,
    /// Servant-side actions. Opaque.
    #[serde(default)]
    pub servant_actions: Option<Vec<serde_json::Value>>,
    /// Master-side actions. Opaque.
    #[serde(default)]
    pub master_actions: Option<Vec<serde_json::Value>>,
}

/// Wire representation of a round.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    /// Round identifier.
    pub id: Uuid,
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Position in the campaign's turn order.
    pub turn_number: i32,
    /// OPEN or CLOSED.
    pub status: RoundStatus,
    /// When the round was opened.
    pub created_at: DateTime<Utc>,
    /// When the round was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<&Round> for RoundResponse {
    fn from(round: &Round) -> Self {
        Self {
            id: round.id,
            campaign_id: round.campaign_id,
            turn_number: round.turn_number,
            status: round.status,
            created_at: round.created_at,
            closed_at: round.closed_at,
        }
    }
}

/// Wire representation of an archived round.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionHistoryResponse {
    /// History record identifier.
    pub id: Uuid,
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Turn number of the archived round.
    pub turn_number: i32,
    /// Closing timestamp of the archived round.
    pub closed_at: DateTime<Utc>,
    /// Ordered action sequence, if archived.
    pub action_order: Option<serde_json::Value>,
    /// Servant-side actions, if archived.
    pub servant_actions: Option<serde_json::Value>,
    /// Master-side actions, if archived.
    pub master_actions: Option<serde_json::Value>,
    /// When the snapshot was written.
    pub created_at: DateTime<Utc>,
}

impl From<&ActionHistory> for ActionHistoryResponse {
    fn from(history: &ActionHistory) -> Self {
        Self {
            id: history.id,
            campaign_id: history.campaign_id,
            turn_number: history.turn_number,
            closed_at: history.closed_at,
            action_order: history.action_order.clone(),
            servant_actions: history.servant_actions.clone(),
            master_actions: history.master_actions.clone(),
            created_at: history.created_at,
        }
    }
}

/// Response envelope for the endpoints that return a single round.
#[derive(Debug, Serialize)]
pub struct RoundEnvelope {
    /// The round.
    pub round: RoundResponse,
}

/// Response for POST /api/rounds/close-current.
#[derive(Debug, Serialize)]
pub struct CloseRoundResponse {
    /// The round, now CLOSED.
    pub round: RoundResponse,
    /// The archived snapshot, when a payload was supplied and stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<ActionHistoryResponse>,
}

/// GET /api/rounds/current?campaignId=
#[instrument(skip(state, query), fields(campaign_id = %query.campaign_id))]
async fn current(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<RoundEnvelope>, ApiError> {
    let round = lifecycle::get_or_create_open_round(
        query.campaign_id,
        state.clock.as_ref(),
        &*state.campaigns,
        &*state.rounds,
    )
    .await?;
    Ok(Json(RoundEnvelope {
        round: RoundResponse::from(&round),
    }))
}

/// POST /api/rounds/next?campaignId=
#[instrument(skip(state, query), fields(campaign_id = %query.campaign_id))]
async fn next(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<RoundEnvelope>, ApiError> {
    info!("advancing campaign to the next round");
    let round = lifecycle::open_next_round(
        query.campaign_id,
        state.clock.as_ref(),
        &*state.campaigns,
        &*state.rounds,
    )
    .await?;
    Ok(Json(RoundEnvelope {
        round: RoundResponse::from(&round),
    }))
}

/// POST /api/rounds/close-current?campaignId=
#[instrument(skip(state, query, request), fields(campaign_id = %query.campaign_id))]
async fn close_current(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
    request: Option<Json<CloseRoundRequest>>,
) -> Result<Json<CloseRoundResponse>, ApiError> {
    let report = request.map(|Json(body)| coordinator::RoundReport {
        action_order: body.action_order,
        servant_actions: body.servant_actions,
        master_actions: body.master_actions,
    });

    info!(archive = report.is_some(), "closing current round");

    let outcome = coordinator::close_round(
        query.campaign_id,
        report,
        state.clock.as_ref(),
        &*state.campaigns,
        &*state.rounds,
        &*state.histories,
    )
    .await?;

    Ok(Json(CloseRoundResponse {
        round: RoundResponse::from(&outcome.round),
        history: outcome.history.as_ref().map(ActionHistoryResponse::from),
    }))
}

/// GET /api/rounds/history?campaignId=
#[instrument(skip(state, query), fields(campaign_id = %query.campaign_id))]
async fn history(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<Vec<ActionHistoryResponse>>, ApiError> {
    let rows = archiver::list_by_campaign(query.campaign_id, &*state.histories).await?;
    Ok(Json(rows.iter().map(ActionHistoryResponse::from).collect()))
}

/// Returns the router for the round lifecycle.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/current", get(current))
        .route("/next", post(next))
        .route("/close-current", post(close_current))
        .route("/history", get(history))
}
