//! Composite repository rank
//!
//! Eleven sub-scores, each normalized to 0-100, are combined with a fixed weight
//! table into a single score and letter tier. The weights and tier thresholds are
//! a policy value rather than runtime configuration; [`RankPolicy::STANDARD`] is
//! the published one.

use chrono::{DateTime, Utc};
use common::models::{
    AnalyticsMetrics, CommitActivity, ContributorDiversity, Metric, RankResult, RawSignals,
    ReleaseCadence, Tier,
};
use serde::Serialize;

use crate::analytics::round_to;

/// Weight of each sub-score, in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWeights {
    // Popularity
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    // Activity
    pub commit_activity: u32,
    pub release_cadence: u32,
    pub recency: u32,
    // Community health
    pub pr_merge_rate: u32,
    pub issue_close_rate: u32,
    pub contributor_diversity: u32,
    pub discussion_activity: u32,
    pub commit_quality: u32,
}

impl RankWeights {
    pub fn total(&self) -> u32 {
        self.stars
            + self.forks
            + self.watchers
            + self.commit_activity
            + self.release_cadence
            + self.recency
            + self.pr_merge_rate
            + self.issue_close_rate
            + self.contributor_diversity
            + self.discussion_activity
            + self.commit_quality
    }
}

/// Inclusive lower bounds of each tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub s: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl TierThresholds {
    pub fn tier_for(&self, score: f64) -> Tier {
        if score >= self.s {
            Tier::S
        } else if score >= self.a {
            Tier::A
        } else if score >= self.b {
            Tier::B
        } else if score >= self.c {
            Tier::C
        } else {
            Tier::D
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankPolicy {
    pub weights: RankWeights,
    pub tiers: TierThresholds,
}

impl RankPolicy {
    pub const STANDARD: RankPolicy = RankPolicy {
        weights: RankWeights {
            stars: 15,
            forks: 8,
            watchers: 7,
            commit_activity: 12,
            release_cadence: 8,
            recency: 10,
            pr_merge_rate: 10,
            issue_close_rate: 10,
            contributor_diversity: 8,
            discussion_activity: 7,
            commit_quality: 5,
        },
        tiers: TierThresholds {
            s: 90.0,
            a: 75.0,
            b: 60.0,
            c: 45.0,
        },
    };

    /// Normalized sub-scores for a repository
    pub fn breakdown(
        &self,
        metrics: &AnalyticsMetrics,
        popularity: &Popularity,
        now: DateTime<Utc>,
    ) -> RankBreakdown {
        RankBreakdown {
            stars: log_score(popularity.stars, 20.0),
            forks: log_score(popularity.forks, 25.0),
            watchers: log_score(popularity.watchers, 25.0),
            commit_activity: commit_activity_score(metrics.commit_activity),
            release_cadence: release_cadence_score(&metrics.release_cadence),
            recency: recency_score(popularity.pushed_at, now),
            pr_merge_rate: metrics.pr_merge_rate.min(100) as f64,
            issue_close_rate: metrics.issue_close_rate.min(100) as f64,
            contributor_diversity: contributor_diversity_score(&metrics.contributor_diversity),
            discussion_activity: discussion_score(metrics.discussion_activity),
            commit_quality: metrics.commit_quality_score.min(100) as f64,
        }
    }

    /// Weighted composite of a breakdown, rounded to one decimal
    pub fn composite(&self, breakdown: &RankBreakdown) -> f64 {
        let w = &self.weights;
        let weighted = [
            (breakdown.stars, w.stars),
            (breakdown.forks, w.forks),
            (breakdown.watchers, w.watchers),
            (breakdown.commit_activity, w.commit_activity),
            (breakdown.release_cadence, w.release_cadence),
            (breakdown.recency, w.recency),
            (breakdown.pr_merge_rate, w.pr_merge_rate),
            (breakdown.issue_close_rate, w.issue_close_rate),
            (breakdown.contributor_diversity, w.contributor_diversity),
            (breakdown.discussion_activity, w.discussion_activity),
            (breakdown.commit_quality, w.commit_quality),
        ];

        let total: f64 = weighted
            .iter()
            .map(|&(score, weight)| score * weight as f64 / 100.0)
            .sum();

        round_to(total, 1).clamp(0.0, 100.0)
    }

    pub fn rank(
        &self,
        metrics: &AnalyticsMetrics,
        popularity: &Popularity,
        now: DateTime<Utc>,
    ) -> RankResult {
        let score = self.composite(&self.breakdown(metrics, popularity, now));
        RankResult {
            score,
            tier: self.tiers.tier_for(score),
        }
    }
}

impl Default for RankPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Raw popularity inputs that bypass the analytics step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Popularity {
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl Popularity {
    pub fn from_signals(signals: &RawSignals) -> Self {
        Self {
            stars: signals.stars,
            forks: signals.forks,
            watchers: signals.watchers,
            pushed_at: signals.pushed_at,
        }
    }
}

/// Each sub-score on a 0-100 scale, before weighting
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RankBreakdown {
    pub stars: f64,
    pub forks: f64,
    pub watchers: f64,
    pub commit_activity: f64,
    pub release_cadence: f64,
    pub recency: f64,
    pub pr_merge_rate: f64,
    pub issue_close_rate: f64,
    pub contributor_diversity: f64,
    pub discussion_activity: f64,
    pub commit_quality: f64,
}

/// Rank a repository with the standard policy
pub fn calculate_rank(
    metrics: &AnalyticsMetrics,
    popularity: &Popularity,
    now: DateTime<Utc>,
) -> RankResult {
    RankPolicy::STANDARD.rank(metrics, popularity, now)
}

/// Logarithmic popularity score, floored at one so zero counts score zero
pub fn log_score(count: u64, multiplier: f64) -> f64 {
    ((count.max(1) as f64).log10() * multiplier).min(100.0)
}

pub fn commit_activity_score(activity: CommitActivity) -> f64 {
    match activity {
        CommitActivity::High => 100.0,
        CommitActivity::Medium => 65.0,
        CommitActivity::Low => 30.0,
        CommitActivity::Unknown => 0.0,
    }
}

pub fn release_cadence_score(cadence: &Metric<ReleaseCadence>) -> f64 {
    match cadence {
        Metric::Unavailable => 0.0,
        Metric::Value(ReleaseCadence::Days(_)) => 100.0,
        Metric::Value(ReleaseCadence::Weeks(_)) => 85.0,
        Metric::Value(ReleaseCadence::Months(n)) if *n <= 3 => 70.0,
        Metric::Value(ReleaseCadence::Months(_)) => 50.0,
    }
}

/// Score from whole days since the last push. An unknown push date scores as the oldest bucket.
pub fn recency_score(pushed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(pushed_at) = pushed_at else {
        return 20.0;
    };

    match (now - pushed_at).num_days() {
        d if d <= 30 => 100.0,
        d if d <= 90 => 80.0,
        d if d <= 180 => 60.0,
        d if d <= 365 => 40.0,
        _ => 20.0,
    }
}

/// Ratio of recent authors to known contributors, doubled, with a bonus for larger teams
pub fn contributor_diversity_score(diversity: &ContributorDiversity) -> f64 {
    if diversity.total == 0 {
        return 0.0;
    }

    let ratio = diversity.active as f64 / diversity.total as f64;
    let score = (ratio * 200.0).min(100.0);
    if diversity.total >= 10 {
        (score * 1.2).min(100.0)
    } else {
        score
    }
}

/// Five comments per item or more scores full marks
pub fn discussion_score(comments_per_item: f64) -> f64 {
    (comments_per_item.max(0.0) * 20.0).min(100.0)
}
