//! Repository health and quality metrics
//!
//! Every metric is a pure function of the sampled signals and a single `now`.
//! Empty samples never fail; they map to the documented sentinel of each metric.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use common::models::{
    AnalyticsMetrics, BusFactor, CommitActivity, CommitSignal, Contributor, ContributorDiversity,
    GrowthTrend, IssueSignal, IssueState, MergeTime, Metric, PullRequestSignal, RawSignals,
    Release, ReleaseCadence, ResponseTime,
};

/// Sampling windows and thresholds
pub mod limits {
    /// Commits within this many days count towards commit activity
    pub const RECENT_COMMIT_DAYS: i64 = 30;
    /// Open issues older than this are stale
    pub const STALE_ISSUE_DAYS: i64 = 90;
    /// Most recent commits scanned for active authors
    pub const RECENT_AUTHOR_SAMPLE: usize = 50;
    /// Commented items considered for the response time heuristic
    pub const RESPONSE_SAMPLE: usize = 20;
    /// Commented items needed (strictly more than) to report a response time
    pub const RESPONSE_MIN_ITEMS: usize = 5;
    /// Most recent releases used for cadence
    pub const RELEASE_SAMPLE: usize = 5;
    /// Commit message length bounds for a quality commit, inclusive
    pub const QUALITY_MIN_LEN: usize = 20;
    pub const QUALITY_MAX_LEN: usize = 200;
    /// Messages that are never quality commits, case-insensitive
    pub const LOW_EFFORT_MESSAGES: &[&str] = &["fix", "update", "change", "wip"];
}

const SECS_PER_DAY: i64 = 24 * 60 * 60;
const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Compute all analytics metrics for one repository
pub fn calculate_analytics(signals: &RawSignals, now: DateTime<Utc>) -> AnalyticsMetrics {
    let recent_authors = recent_authors(&signals.commits);
    let age_days = repo_age_days(signals.created_at, now);

    AnalyticsMetrics {
        commit_activity: commit_activity(&signals.commits, now),
        pr_merge_rate: rate(signals.merged_pull_requests, signals.total_pull_requests),
        issue_close_rate: rate(signals.closed_issues, signals.total_issues),
        avg_time_to_merge: avg_time_to_merge(&signals.pull_requests),
        avg_response_time: avg_response_time(&signals.issues, &signals.pull_requests),
        stale_issues_count: stale_issues_count(&signals.issues, now),
        contributor_diversity: contributor_diversity(recent_authors.len(), &signals.contributors),
        bus_factor: bus_factor(&signals.contributors),
        release_cadence: release_cadence(&signals.releases),
        commit_quality_score: commit_quality_score(&signals.commits),
        growth_trend: growth_trend(signals.stars, age_days),
        stars_per_day: stars_per_day(signals.stars, age_days),
        discussion_activity: discussion_activity(&signals.issues, &signals.pull_requests),
        active_contributors: recent_authors.len() as u32,
    }
}

/// Bucket the number of commits made in the last 30 days
pub fn commit_activity(commits: &[CommitSignal], now: DateTime<Utc>) -> CommitActivity {
    if commits.is_empty() {
        return CommitActivity::Unknown;
    }

    let cutoff = now - Duration::days(limits::RECENT_COMMIT_DAYS);
    let recent = commits
        .iter()
        .filter(|c| c.committed_at.is_some_and(|at| at > cutoff))
        .count();

    match recent {
        0..=9 => CommitActivity::Low,
        10..=29 => CommitActivity::Medium,
        _ => CommitActivity::High,
    }
}

/// Floored percentage of `part` in `total`, capped at 100. Zero when `total` is zero.
pub fn rate(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (part as u128 * 100) / total as u128;
    pct.min(100) as u32
}

/// Mean creation-to-merge time over sampled PRs that were merged
pub fn avg_time_to_merge(prs: &[PullRequestSignal]) -> Metric<MergeTime> {
    let durations: Vec<i64> = prs
        .iter()
        .filter_map(|pr| match (pr.created_at, pr.merged_at) {
            (Some(created), Some(merged)) => Some((merged - created).num_milliseconds()),
            _ => None,
        })
        .collect();

    if durations.is_empty() {
        return Metric::Unavailable;
    }

    let avg_ms = (durations.iter().sum::<i64>() / durations.len() as i64).max(0);
    let days = avg_ms / MILLIS_PER_DAY;
    if days > 0 {
        Metric::Value(MergeTime::Days(days))
    } else {
        Metric::Value(MergeTime::Hours((avg_ms % MILLIS_PER_DAY) / MILLIS_PER_HOUR))
    }
}

/// Coarse responsiveness signal: enough recently commented items means "< 24h".
///
/// This is not a first-response latency; it only checks for discussion presence.
pub fn avg_response_time(
    issues: &[IssueSignal],
    prs: &[PullRequestSignal],
) -> Metric<ResponseTime> {
    let commented = issues
        .iter()
        .map(|i| i.comment_count)
        .chain(prs.iter().map(|pr| pr.comment_count))
        .filter(|&comments| comments > 0)
        .take(limits::RESPONSE_SAMPLE)
        .count();

    if commented > limits::RESPONSE_MIN_ITEMS {
        Metric::Value(ResponseTime::UnderADay)
    } else {
        Metric::Unavailable
    }
}

/// Open issues created more than 90 days ago
pub fn stale_issues_count(issues: &[IssueSignal], now: DateTime<Utc>) -> u32 {
    let cutoff = now - Duration::days(limits::STALE_ISSUE_DAYS);
    issues
        .iter()
        .filter(|i| i.state == IssueState::Open && i.created_at.is_some_and(|at| at < cutoff))
        .count() as u32
}

/// Distinct author logins among the most recent commits
pub fn recent_authors(commits: &[CommitSignal]) -> HashSet<&str> {
    commits
        .iter()
        .take(limits::RECENT_AUTHOR_SAMPLE)
        .filter_map(|c| c.author_login.as_deref())
        .collect()
}

pub fn contributor_diversity(active: usize, contributors: &[Contributor]) -> ContributorDiversity {
    let total = contributors
        .iter()
        .map(|c| c.login.as_str())
        .collect::<HashSet<_>>()
        .len();

    if total == 0 {
        return ContributorDiversity::default();
    }

    ContributorDiversity {
        active: active as u32,
        total: total as u32,
    }
}

/// Risk from the top contributor's share of all sampled contributions.
///
/// Thresholds are strict: exactly 70% is medium risk, exactly 50% is low risk.
pub fn bus_factor(contributors: &[Contributor]) -> BusFactor {
    let Some(top) = contributors.first() else {
        return BusFactor::LowRisk;
    };

    let total: u128 = contributors.iter().map(|c| c.contributions as u128).sum();
    if total == 0 {
        return BusFactor::LowRisk;
    }

    let top_pct = top.contributions as u128 * 100;
    if top_pct > 70 * total {
        BusFactor::HighRisk
    } else if top_pct > 50 * total {
        BusFactor::MediumRisk
    } else {
        BusFactor::LowRisk
    }
}

/// Mean gap between consecutive recent releases
pub fn release_cadence(releases: &[Release]) -> Metric<ReleaseCadence> {
    let published: Vec<DateTime<Utc>> = releases
        .iter()
        .filter_map(|r| r.published_at)
        .take(limits::RELEASE_SAMPLE)
        .collect();

    if published.len() < 2 {
        return Metric::Unavailable;
    }

    let total_days: f64 = published
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_seconds().abs() as f64 / SECS_PER_DAY as f64)
        .sum();
    let avg_days = (total_days / (published.len() - 1) as f64).floor() as u64;

    Metric::Value(if avg_days < 30 {
        ReleaseCadence::Days(avg_days)
    } else if avg_days < 90 {
        ReleaseCadence::Weeks(avg_days / 7)
    } else {
        ReleaseCadence::Months(avg_days / 30)
    })
}

/// Whether a commit message is descriptive enough to count as a quality commit
pub fn is_quality_message(message: &str) -> bool {
    let len = message.chars().count();
    (limits::QUALITY_MIN_LEN..=limits::QUALITY_MAX_LEN).contains(&len)
        && !limits::LOW_EFFORT_MESSAGES
            .iter()
            .any(|m| message.eq_ignore_ascii_case(m))
}

/// Floored percentage of sampled commits with a quality message
pub fn commit_quality_score(commits: &[CommitSignal]) -> u32 {
    let quality = commits
        .iter()
        .filter(|c| is_quality_message(&c.message))
        .count();
    rate(quality as u64, commits.len() as u64)
}

/// Whole days since the repository was created; zero when unknown
pub fn repo_age_days(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    created_at
        .map(|created| (now - created).num_days().max(0) as u64)
        .unwrap_or(0)
}

/// Label from the stars-per-day rate at the same 2 decimal precision the report shows
pub fn growth_trend(stars: u64, age_days: u64) -> GrowthTrend {
    let per_day = round_to(stars as f64 / age_days.max(1) as f64, 2);
    if per_day > 1.0 {
        GrowthTrend::HighGrowth
    } else if per_day > 0.1 {
        GrowthTrend::Growing
    } else {
        GrowthTrend::Stable
    }
}

/// Stars gained per day of age, rounded to 2 decimals. Zero for a repository created today.
pub fn stars_per_day(stars: u64, age_days: u64) -> f64 {
    if age_days == 0 {
        return 0.0;
    }
    round_to(stars as f64 / age_days as f64, 2)
}

/// Mean comments per sampled issue and PR, rounded to 1 decimal
pub fn discussion_activity(issues: &[IssueSignal], prs: &[PullRequestSignal]) -> f64 {
    let items = issues.len() + prs.len();
    if items == 0 {
        return 0.0;
    }
    let comments: u64 = issues
        .iter()
        .map(|i| i.comment_count as u64)
        .chain(prs.iter().map(|pr| pr.comment_count as u64))
        .sum();
    round_to(comments as f64 / items as f64, 1)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
