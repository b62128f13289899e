pub mod config;
pub mod domain;
pub mod global;
pub mod shutdown;
pub mod state;
pub mod utils;

pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(domain::health::health_check))
        .route("/slack/events", post(domain::webhook::handle_slack_events))
        .route(
            "/slack/events/interactivity",
            post(domain::webhook::handle_slack_interactivity),
        )
        .layer(axum::middleware::from_fn(global::request_tracing))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
