//! Repo Rank API Server

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("processor=debug".parse()?)
                .add_directive("github=debug".parse()?)
                .add_directive("repo_rank_api=debug".parse()?),
        )
        .init();

    info!("📊 Starting Repo Rank API");

    // Load configuration
    let config = common::Config::from_env();
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set, repository requests will fail");
    }
    info!(
        "Activity window {} days, cache max-age {}s",
        config.activity_window_days, config.cache_max_age_secs
    );

    let addr = format!("{}:{}", config.host, config.port);

    // Create app state
    let state = Arc::new(AppState::new(config));

    let app = build_router(state);

    // Start server
    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/repos/:owner/:name", get(routes::repos::get))
        .route("/api/repos/:owner/:name/rank", get(routes::repos::rank))
        .route(
            "/api/repos/:owner/:name/activity",
            get(routes::repos::activity),
        )
        .route(
            "/api/repos/:owner/:name/analytics",
            get(routes::repos::analytics),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
