//! Liveness probe

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// Repository routes answer with a config error until a token is set
    github_token_configured: bool,
    default_window_days: u32,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "repo-rank",
        version: env!("CARGO_PKG_VERSION"),
        github_token_configured: state.config.github_token.is_some(),
        default_window_days: state.config.activity_window_days,
    })
}
