//! Domain models

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Raw activity signals for a single repository.
///
/// Sampled collections are bounded by the retrieval layer and may be empty.
/// A timestamp of `None` means it was missing or unparseable upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSignals {
    /// Most recent first
    pub commits: Vec<CommitSignal>,
    pub pull_requests: Vec<PullRequestSignal>,
    /// Pull requests are never included here
    pub issues: Vec<IssueSignal>,
    /// Ordered by contribution count, descending
    pub contributors: Vec<Contributor>,
    /// Newest first
    pub releases: Vec<Release>,
    pub total_pull_requests: u64,
    pub total_issues: u64,
    pub merged_pull_requests: u64,
    pub closed_issues: u64,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A commit on the default branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSignal {
    pub message: String,
    pub committed_at: Option<DateTime<Utc>>,
    pub author_login: Option<String>,
}

/// A sampled pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSignal {
    pub state: PrState,
    pub created_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub comment_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Merged,
    Closed,
}

/// A sampled issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSignal {
    pub state: IssueState,
    pub created_at: Option<DateTime<Utc>>,
    pub comment_count: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub name: Option<String>,
    pub tag_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Descriptive repository metadata that isn't part of the scoring inputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSummary {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub homepage: Option<String>,
    pub archived: bool,
    pub fork: bool,
    pub primary_language: Option<String>,
    pub license: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub languages: Vec<LanguageSize>,
}

/// Bytes of code in one language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSize {
    pub name: String,
    pub bytes: u64,
}

/// A metric that may not be computable from the available sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric<T> {
    Unavailable,
    Value(T),
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Unavailable => f.write_str("N/A"),
            Metric::Value(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl<T: fmt::Display> Serialize for Metric<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Commit volume over the last 30 days
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommitActivity {
    Unknown,
    Low,
    Medium,
    High,
}

impl fmt::Display for CommitActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommitActivity::Unknown => "unknown",
            CommitActivity::Low => "low",
            CommitActivity::Medium => "medium",
            CommitActivity::High => "high",
        })
    }
}

/// Mean time from PR creation to merge, in whole days or, below a day, whole hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeTime {
    Days(i64),
    Hours(i64),
}

impl fmt::Display for MergeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeTime::Days(d) => write!(f, "{}d", d),
            MergeTime::Hours(h) => write!(f, "{}h", h),
        }
    }
}

/// Coarse response time bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTime {
    UnderADay,
}

impl fmt::Display for ResponseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseTime::UnderADay => f.write_str("< 24h"),
        }
    }
}

/// Recent commit authors against the known contributor set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContributorDiversity {
    pub active: u32,
    pub total: u32,
}

impl fmt::Display for ContributorDiversity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            f.write_str("0/0")
        } else {
            write!(f, "{}/{}", self.active, self.total)
        }
    }
}

impl Serialize for ContributorDiversity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Concentration risk from the top contributor's share
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BusFactor {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl fmt::Display for BusFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusFactor::LowRisk => "Low Risk",
            BusFactor::MediumRisk => "Medium Risk",
            BusFactor::HighRisk => "High Risk",
        })
    }
}

/// Mean gap between recent releases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseCadence {
    Days(u64),
    Weeks(u64),
    /// 30-day months
    Months(u64),
}

impl fmt::Display for ReleaseCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseCadence::Days(n) => write!(f, "~{}d", n),
            ReleaseCadence::Weeks(n) => write!(f, "~{}w", n),
            ReleaseCadence::Months(n) => write!(f, "~{}mo", n),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum GrowthTrend {
    Stable,
    Growing,
    #[serde(rename = "High Growth")]
    HighGrowth,
}

impl fmt::Display for GrowthTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GrowthTrend::Stable => "Stable",
            GrowthTrend::Growing => "Growing",
            GrowthTrend::HighGrowth => "High Growth",
        })
    }
}

/// Health, quality and popularity metrics derived from [`RawSignals`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyticsMetrics {
    pub commit_activity: CommitActivity,
    /// 0-100, floored
    pub pr_merge_rate: u32,
    /// 0-100, floored
    pub issue_close_rate: u32,
    pub avg_time_to_merge: Metric<MergeTime>,
    pub avg_response_time: Metric<ResponseTime>,
    pub stale_issues_count: u32,
    pub contributor_diversity: ContributorDiversity,
    pub bus_factor: BusFactor,
    pub release_cadence: Metric<ReleaseCadence>,
    /// 0-100, floored
    pub commit_quality_score: u32,
    pub growth_trend: GrowthTrend,
    /// Rounded to 2 decimals
    pub stars_per_day: f64,
    /// Mean comments per sampled issue/PR, rounded to 1 decimal
    pub discussion_activity: f64,
    pub active_contributors: u32,
}

impl AnalyticsMetrics {
    pub fn stars_per_day_label(&self) -> String {
        format!("{:.2}", self.stars_per_day)
    }

    pub fn discussion_activity_label(&self) -> String {
        format!("{:.1}", self.discussion_activity)
    }
}

/// One day of the activity graph
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub label: String,
    pub count: u32,
}

/// Streak statistics over an activity window
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_contributions: u32,
}

/// Letter grade for the composite score
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        })
    }
}

/// Composite rank
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RankResult {
    /// 0-100, one decimal
    pub score: f64,
    pub tier: Tier,
}

/// Share of the codebase in one language
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub bytes: u64,
    /// Rounded to 1 decimal
    pub percentage: f64,
    /// Hex colour, `#rrggbb`
    pub color: &'static str,
}

/// Newest release as shown on a card
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LatestRelease {
    /// Release title, falling back to the tag
    pub name: Option<String>,
    pub tag: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&Release> for LatestRelease {
    fn from(release: &Release) -> Self {
        Self {
            name: release.name.clone().or_else(|| release.tag_name.clone()),
            tag: release.tag_name.clone(),
            published_at: release.published_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Active,
    Stale,
}
