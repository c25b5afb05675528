//! Repository card routes

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use common::config::MAX_ACTIVITY_WINDOW_DAYS;
use common::models::{
    ActivityDay, AnalyticsMetrics, HealthStatus, LanguageShare, RankResult, RepoSummary,
    StreakStats,
};
use processor::{build_report, RankBreakdown, RepoReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CardQuery {
    /// Activity window override, parsed by the handler so bad input gets a JSON error
    pub days: Option<String>,
}

#[derive(Serialize)]
pub struct RepoCard {
    pub repo: RepoSummary,
    #[serde(flatten)]
    pub report: RepoReport,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub repo: String,
    #[serde(flatten)]
    pub rank: RankResult,
    pub breakdown: RankBreakdown,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub repo: String,
    pub days: Vec<ActivityDay>,
    pub streak: StreakStats,
}

#[derive(Serialize)]
pub struct AnalyticsResponse {
    pub repo: String,
    pub analytics: AnalyticsMetrics,
    pub health_status: HealthStatus,
    pub languages: Vec<LanguageShare>,
}

/// GitHub owner and repository names: alphanumerics, `-`, `_` and `.`
fn validate_name(kind: &str, value: &str) -> ApiResult<()> {
    let valid = !value.is_empty()
        && value.len() <= 100
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Invalid {}: {:?}", kind, value)))
    }
}

fn window_days(query: &CardQuery, default_days: u32) -> ApiResult<u32> {
    let Some(raw) = query.days.as_deref() else {
        return Ok(default_days);
    };
    match raw.trim().parse::<u32>() {
        Ok(days) if (1..=MAX_ACTIVITY_WINDOW_DAYS).contains(&days) => Ok(days),
        _ => Err(ApiError::BadRequest(format!(
            "days must be an integer between 1 and {}, got {:?}",
            MAX_ACTIVITY_WINDOW_DAYS, raw
        ))),
    }
}

/// JSON response with the configured cache lifetime
fn cached<T: Serialize>(state: &AppState, body: T) -> Response {
    let cache_control = format!("public, max-age={}", state.config.cache_max_age_secs);
    let mut response = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    response
}

/// Fetch signals and derive the full report
async fn load_card(
    state: &AppState,
    owner: &str,
    name: &str,
    query: &CardQuery,
) -> ApiResult<RepoCard> {
    validate_name("owner", owner)?;
    validate_name("repository", name)?;
    let days = window_days(query, state.config.activity_window_days)?;
    state.config.require_github_token()?;

    let snapshot = state.github.fetch_snapshot(owner, name).await?;
    let now = Utc::now();
    let report = build_report(&snapshot.signals, &snapshot.summary, days, now);

    info!(
        "Ranked {}/{}: {} ({})",
        owner, name, report.rank.score, report.rank.tier
    );

    Ok(RepoCard {
        repo: snapshot.summary,
        report,
    })
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Response> {
    let card = load_card(&state, &owner, &name, &query).await?;
    Ok(cached(&state, card))
}

pub async fn rank(
    State(state): State<Arc<AppState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Response> {
    let card = load_card(&state, &owner, &name, &query).await?;
    Ok(cached(
        &state,
        RankResponse {
            repo: format!("{}/{}", owner, name),
            rank: card.report.rank,
            breakdown: card.report.rank_breakdown,
        },
    ))
}

pub async fn activity(
    State(state): State<Arc<AppState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Response> {
    let card = load_card(&state, &owner, &name, &query).await?;
    Ok(cached(
        &state,
        ActivityResponse {
            repo: format!("{}/{}", owner, name),
            days: card.report.activity,
            streak: card.report.streak,
        },
    ))
}

pub async fn analytics(
    State(state): State<Arc<AppState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Response> {
    let card = load_card(&state, &owner, &name, &query).await?;
    Ok(cached(
        &state,
        AnalyticsResponse {
            repo: format!("{}/{}", owner, name),
            analytics: card.report.analytics,
            health_status: card.report.health_status,
            languages: card.report.languages,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Config;

    fn state() -> AppState {
        AppState::new(Config::from_lookup(|key| match key {
            "CACHE_MAX_AGE_SECS" => Some("600".to_string()),
            _ => None,
        }))
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("owner", "sigp").is_ok());
        assert!(validate_name("repository", "review-royale").is_ok());
        assert!(validate_name("repository", "my_repo.rs").is_ok());
        assert!(validate_name("owner", "").is_err());
        assert!(validate_name("owner", "..").is_err());
        assert!(validate_name("repository", "a/b").is_err());
        assert!(validate_name("repository", "name?x=1").is_err());
    }

    fn days(value: &str) -> CardQuery {
        CardQuery {
            days: Some(value.to_string()),
        }
    }

    #[test]
    fn test_window_days() {
        assert_eq!(window_days(&CardQuery { days: None }, 30).unwrap(), 30);
        assert_eq!(window_days(&days("7"), 30).unwrap(), 7);
        assert_eq!(window_days(&days("365"), 30).unwrap(), 365);
        assert!(matches!(
            window_days(&days("0"), 30),
            Err(ApiError::BadRequest(_))
        ));
        assert!(window_days(&days("366"), 30).is_err());
    }

    #[test]
    fn test_window_days_rejects_non_numeric() {
        for raw in ["abc", "", "-3", "7.5"] {
            assert!(matches!(
                window_days(&days(raw), 30),
                Err(ApiError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_cached_sets_cache_control() {
        let response = cached(&state(), serde_json::json!({ "ok": true }));
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=600"
        );
    }

    #[tokio::test]
    async fn test_missing_token_rejected_before_fetch() {
        let result = load_card(&state(), "sigp", "lighthouse", &CardQuery { days: None }).await;
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_invalid_owner_rejected() {
        let result = load_card(&state(), "bad owner", "repo", &CardQuery { days: None }).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
