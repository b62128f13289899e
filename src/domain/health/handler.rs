use axum::{extract::State, Json};

use super::dto::HealthStatus;
use crate::state::AppState;

/// Health check API
///
/// Echoes the configured health value so deployments can confirm which environment answered.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        health: state.config.health_value.clone(),
    })
}
