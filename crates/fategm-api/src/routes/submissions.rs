//! Routes for action submissions: submit, list current, and the live
//! event stream.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use fategm_notify::HubEvent;
use fategm_rounds::application::{coordinator, ledger};
use fategm_rounds::domain::submission::{ActionKind, ActionSubmission};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/action-submissions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitActionRequest {
    /// Target campaign.
    pub campaign_id: Uuid,
    /// Free-text class label identifying the slot.
    pub servant_class: String,
    /// SERVANT_ACTION or MASTER_ACTION.
    pub action_type: ActionKind,
    /// Free-text action content.
    pub content: String,
    /// Optional submitter label.
    #[serde(default)]
    pub submitted_by: Option<String>,
}

/// Query parameters shared by the list and stream endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    /// Campaign to scope the request to.
    pub campaign_id: Uuid,
}

/// Wire representation of an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSubmissionResponse {
    /// Submission identifier.
    pub id: Uuid,
    /// Owning campaign.
    pub campaign_id: Uuid,
    /// Round the submission targets.
    pub round_id: Uuid,
    /// Slot class label.
    pub servant_class: String,
    /// Slot action kind.
    pub action_type: ActionKind,
    /// Action content.
    pub content: String,
    /// Submitter label, if supplied.
    pub submitted_by: Option<String>,
    /// Whether this row is the authoritative one for its slot.
    pub current: bool,
    /// Turn number at submission time.
    pub turn_number: i32,
    /// Acceptance timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&ActionSubmission> for ActionSubmissionResponse {
    fn from(submission: &ActionSubmission) -> Self {
        Self {
            id: submission.id,
            campaign_id: submission.campaign_id,
            round_id: submission.round_id,
            servant_class: submission.servant_class.clone(),
            action_type: submission.action_kind,
            content: submission.content.clone(),
            submitted_by: submission.submitted_by.clone(),
            current: submission.current,
            turn_number: submission.turn_number,
            created_at: submission.created_at,
        }
    }
}

/// POST /api/action-submissions
#[instrument(skip(state, request), fields(campaign_id = %request.campaign_id))]
async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitActionRequest>,
) -> Result<Json<ActionSubmissionResponse>, ApiError> {
    let command = ledger::SubmitAction {
        campaign_id: request.campaign_id,
        servant_class: request.servant_class,
        action_kind: request.action_type,
        content: request.content,
        submitted_by: request.submitted_by,
    };

    info!("handling action submission");

    let saved = coordinator::submit_action(
        command,
        state.clock.as_ref(),
        &*state.campaigns,
        &*state.rounds,
        &*state.submissions,
        &state.hub,
    )
    .await?;

    Ok(Json(ActionSubmissionResponse::from(&saved)))
}

/// GET /api/action-submissions?campaignId=
#[instrument(skip(state, query), fields(campaign_id = %query.campaign_id))]
async fn list_current(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<Vec<ActionSubmissionResponse>>, ApiError> {
    let submissions = ledger::list_current(query.campaign_id, &*state.submissions).await?;
    Ok(Json(
        submissions.iter().map(ActionSubmissionResponse::from).collect(),
    ))
}

/// GET /api/action-submissions/stream?campaignId=
///
/// A persistent text/event-stream: a `connected` event on open, then one
/// `submission` event per accepted submission for the campaign. The
/// connection is held open until the client disconnects; dropping the
/// response stream unregisters the subscriber.
#[instrument(skip(state, query), fields(campaign_id = %query.campaign_id))]
async fn stream(
    State(state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe(query.campaign_id);
    let events = subscription.map(|event| Ok(to_sse_event(&event)));
    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse_event(event: &HubEvent<ActionSubmission>) -> Event {
    match event {
        HubEvent::Connected => Event::default().event("connected").data("connected"),
        HubEvent::Message(submission) => {
            let response = ActionSubmissionResponse::from(submission);
            match Event::default().event("submission").json_data(&response) {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode submission event");
                    Event::default().event("submission").data("{}")
                }
            }
        }
    }
}

/// Returns the router for action submissions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit).get(list_current))
        .route("/stream", get(stream))
}
