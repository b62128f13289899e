//! Slack webhook endpoints
//!
//! - `POST /slack/events`: Events API (URL verification, mentions, direct messages)
//! - `POST /slack/events/interactivity`: block actions from posted messages

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::dto::{ChallengeResponse, EventEnvelope, InteractionPayload, InteractivityForm};
use super::signature;
use crate::config::AppConfig;
use crate::domain::dispatch::DispatchError;
use crate::state::AppState;
use crate::utils::AppError;

/// Reject requests Slack did not sign, unless verification is disabled for development
fn authenticate(config: &AppConfig, headers: &HeaderMap, body: &[u8]) -> Result<(), AppError> {
    if config.skip_signature_verification {
        warn!("Slack signature verification skipped (development mode)");
        return Ok(());
    }
    signature::verify_request(&config.slack_signing_secret, headers, body)
}

/// Handle Events API callbacks
///
/// Endpoint: POST /slack/events
///
/// Failures while handling an event are reported in Slack, so the endpoint still answers 200
/// and Slack does not redeliver the event.
pub async fn handle_slack_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    authenticate(&state.config, &headers, &body)?;

    let envelope: EventEnvelope = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Failed to parse Slack event envelope");
        AppError::bad_request(format!("Invalid payload: {}", e))
    })?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("Answering Slack URL verification");
            Ok(Json(ChallengeResponse { challenge }).into_response())
        }
        EventEnvelope::EventCallback { event } => {
            let outcome = state.router.handle_event(&event).await;
            debug!(outcome = ?outcome, "Slack event processed");
            Ok(Json(json!({})).into_response())
        }
        EventEnvelope::Other => {
            debug!("Ignoring unsupported envelope type");
            Ok(Json(json!({})).into_response())
        }
    }
}

/// Handle interactive component callbacks
///
/// Endpoint: POST /slack/events/interactivity
pub async fn handle_slack_interactivity(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    authenticate(&state.config, &headers, &body)?;

    match parse_interaction(&body) {
        Ok(payload) => {
            let outcome = state.router.handle_interaction(&payload).await;
            debug!(outcome = ?outcome, "Slack interaction processed");
        }
        Err((user_id, err)) => {
            warn!(error = %err, "Rejected interaction payload");
            state.router.report_failure(&user_id, &err).await;
        }
    }

    Ok(Json(json!({})))
}

/// Decode the form body, keeping the best user id available for error reports
fn parse_interaction(body: &[u8]) -> Result<InteractionPayload, (String, DispatchError)> {
    let unknown = || "unknown".to_string();

    let form: InteractivityForm = serde_urlencoded::from_bytes(body)
        .map_err(|e| (unknown(), DispatchError::MalformedPayload(e.to_string())))?;

    serde_json::from_str(&form.payload).map_err(|e| {
        let user_id = serde_json::from_str::<Value>(&form.payload)
            .ok()
            .and_then(|v| v["user"]["id"].as_str().map(String::from))
            .unwrap_or_else(unknown);
        (user_id, DispatchError::MalformedPayload(e.to_string()))
    })
}
