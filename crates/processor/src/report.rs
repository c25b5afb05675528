//! Full repository report
//!
//! Runs the calculators for one `now`: analytics feeds the rank, the activity
//! window feeds the streaks.

use chrono::{DateTime, Utc};
use common::models::{
    ActivityDay, AnalyticsMetrics, Contributor, HealthStatus, LanguageShare, LatestRelease,
    RankResult, RawSignals, RepoSummary, StreakStats,
};
use serde::Serialize;
use tracing::debug;

use crate::activity::activity_days;
use crate::analytics::calculate_analytics;
use crate::languages::{language_color, language_shares, DEFAULT_LANGUAGE_COLOR, TOP_LANGUAGES};
use crate::rank::{Popularity, RankBreakdown, RankPolicy};
use crate::streak::streak_stats;

/// Days without an update before a repository counts as stale
pub const ACTIVE_WITHIN_DAYS: i64 = 30;

/// Contributors listed on a card
pub const TOP_CONTRIBUTORS: usize = 5;

/// Everything derived for one repository at one instant
#[derive(Debug, Clone, Serialize)]
pub struct RepoReport {
    pub generated_at: DateTime<Utc>,
    pub analytics: AnalyticsMetrics,
    pub rank: RankResult,
    pub rank_breakdown: RankBreakdown,
    pub activity: Vec<ActivityDay>,
    pub streak: StreakStats,
    pub health_status: HealthStatus,
    pub languages: Vec<LanguageShare>,
    pub primary_language_color: &'static str,
    pub top_contributors: Vec<Contributor>,
    pub latest_release: Option<LatestRelease>,
}

pub fn build_report(
    signals: &RawSignals,
    summary: &RepoSummary,
    window_days: u32,
    now: DateTime<Utc>,
) -> RepoReport {
    let policy = RankPolicy::STANDARD;

    let analytics = calculate_analytics(signals, now);
    let popularity = Popularity::from_signals(signals);
    let rank_breakdown = policy.breakdown(&analytics, &popularity, now);
    let score = policy.composite(&rank_breakdown);
    let rank = RankResult {
        score,
        tier: policy.tiers.tier_for(score),
    };

    let activity = activity_days(signals, window_days, now);
    let streak = streak_stats(&activity);

    debug!(
        "Report for {}/{}: score {} tier {} ({} contributions over {} days)",
        summary.owner, summary.name, rank.score, rank.tier, streak.total_contributions, window_days
    );

    RepoReport {
        generated_at: now,
        analytics,
        rank,
        rank_breakdown,
        activity,
        streak,
        health_status: health_status(summary.updated_at.or(signals.pushed_at), now),
        languages: language_shares(&summary.languages, TOP_LANGUAGES),
        primary_language_color: summary
            .primary_language
            .as_deref()
            .map(language_color)
            .unwrap_or(DEFAULT_LANGUAGE_COLOR),
        top_contributors: signals
            .contributors
            .iter()
            .take(TOP_CONTRIBUTORS)
            .cloned()
            .collect(),
        latest_release: signals.releases.first().map(LatestRelease::from),
    }
}

pub fn health_status(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> HealthStatus {
    match last_update {
        Some(at) if (now - at).num_days() <= ACTIVE_WITHIN_DAYS => HealthStatus::Active,
        _ => HealthStatus::Stale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use common::models::{CommitSignal, Release, Tier};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_report() {
        let report = build_report(&RawSignals::default(), &RepoSummary::default(), 30, now());

        assert_eq!(report.activity.len(), 30);
        assert_eq!(report.streak, StreakStats::default());
        assert_eq!(report.health_status, HealthStatus::Stale);
        assert!(report.languages.is_empty());
        assert_eq!(report.primary_language_color, DEFAULT_LANGUAGE_COLOR);
        assert!(report.top_contributors.is_empty());
        assert_eq!(report.latest_release, None);
        assert!(report.rank.score.is_finite());
        assert!((0.0..=100.0).contains(&report.rank.score));
        assert_eq!(report.rank.tier, Tier::D);
    }

    #[test]
    fn test_report_rank_matches_standalone_rank() {
        let signals = RawSignals {
            commits: (0..12)
                .map(|i| CommitSignal {
                    message: "Refactor the daily bucketing loop".to_string(),
                    committed_at: Some(now() - Duration::days(i)),
                    author_login: Some(format!("dev{}", i % 3)),
                })
                .collect(),
            contributors: vec![Contributor {
                login: "dev0".to_string(),
                contributions: 40,
            }],
            stars: 250,
            forks: 20,
            watchers: 10,
            pushed_at: Some(now()),
            ..Default::default()
        };

        let report = build_report(&signals, &RepoSummary::default(), 30, now());
        let expected = crate::rank::calculate_rank(
            &report.analytics,
            &Popularity::from_signals(&signals),
            now(),
        );

        assert_eq!(report.rank, expected);
        assert_eq!(report.streak.current_streak, 12);
        assert_eq!(report.streak.total_contributions, 12);
        assert_eq!(report.health_status, HealthStatus::Active);
    }

    #[test]
    fn test_card_details() {
        let signals = RawSignals {
            contributors: (0..8)
                .map(|i| Contributor {
                    login: format!("dev{}", i),
                    contributions: 100 - i,
                })
                .collect(),
            releases: vec![
                Release {
                    name: None,
                    tag_name: Some("v2.0.0".to_string()),
                    published_at: Some(now() - Duration::days(3)),
                },
                Release {
                    name: Some("First".to_string()),
                    tag_name: Some("v1.0.0".to_string()),
                    published_at: Some(now() - Duration::days(90)),
                },
            ],
            ..Default::default()
        };
        let summary = RepoSummary {
            primary_language: Some("Rust".to_string()),
            ..Default::default()
        };

        let report = build_report(&signals, &summary, 30, now());

        assert_eq!(report.primary_language_color, "#dea584");
        assert_eq!(report.top_contributors.len(), TOP_CONTRIBUTORS);
        assert_eq!(report.top_contributors[0].login, "dev0");
        assert_eq!(report.top_contributors[4].login, "dev4");
        // Untitled releases fall back to the tag
        assert_eq!(
            report.latest_release,
            Some(LatestRelease {
                name: Some("v2.0.0".to_string()),
                tag: Some("v2.0.0".to_string()),
                published_at: Some(now() - Duration::days(3)),
            })
        );
    }

    #[test]
    fn test_health_status_boundary() {
        assert_eq!(
            health_status(Some(now() - Duration::days(30)), now()),
            HealthStatus::Active
        );
        assert_eq!(
            health_status(Some(now() - Duration::days(30) - Duration::hours(23)), now()),
            HealthStatus::Active
        );
        assert_eq!(
            health_status(Some(now() - Duration::days(31)), now()),
            HealthStatus::Stale
        );
        assert_eq!(health_status(None, now()), HealthStatus::Stale);
    }
}
