//! Repository GraphQL query and its response shapes
//!
//! One query fetches the metadata, totals and samples that feed the engine.
//! Timestamps are decoded leniently: a missing or malformed value becomes `None`.

use chrono::{DateTime, Utc};
use common::models::{
    CommitSignal, Contributor, IssueSignal, IssueState, LanguageSize, PrState,
    PullRequestSignal, RawSignals, Release, RepoSummary,
};
use serde::{Deserialize, Deserializer};

/// Commits sampled from the default branch
pub const COMMIT_SAMPLE: usize = 100;
/// Pull requests and issues sampled, newest first
pub const ITEM_SAMPLE: usize = 30;
/// Releases sampled, newest first
pub const RELEASE_SAMPLE: usize = 10;

pub const REPO_QUERY: &str = r#"
query RepoData($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    name
    description
    url
    homepageUrl
    isArchived
    isFork
    createdAt
    updatedAt
    pushedAt
    stargazerCount
    forkCount
    primaryLanguage { name }
    licenseInfo { name spdxId }
    watchers { totalCount }
    issues(states: [OPEN]) { totalCount }
    closedIssues: issues(states: [CLOSED]) { totalCount }
    allIssues: issues(first: 30, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes { state createdAt comments { totalCount } }
    }
    pullRequests(states: [OPEN]) { totalCount }
    closedPullRequests: pullRequests(states: [CLOSED, MERGED]) { totalCount }
    mergedPullRequests: pullRequests(states: [MERGED]) { totalCount }
    recentPRs: pullRequests(first: 30, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes { state createdAt mergedAt comments { totalCount } }
    }
    languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
      edges { size node { name } }
    }
    releases(first: 10, orderBy: {field: CREATED_AT, direction: DESC}) {
      nodes { name tagName publishedAt }
    }
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: 100) {
            nodes { message committedDate author { user { login } } }
          }
        }
      }
    }
  }
}"#;

/// Decode an optional RFC 3339 timestamp, treating garbage as absent
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RepoQueryData {
    pub repository: Option<GqlRepository>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TotalCount {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlLicense {
    pub name: Option<String>,
    pub spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlRepository {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub homepage_url: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_fork: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stargazer_count: u64,
    #[serde(default)]
    pub fork_count: u64,
    pub primary_language: Option<Named>,
    pub license_info: Option<GqlLicense>,
    #[serde(default)]
    pub watchers: TotalCount,
    #[serde(default)]
    pub issues: TotalCount,
    #[serde(default)]
    pub closed_issues: TotalCount,
    #[serde(default)]
    pub all_issues: Nodes<GqlIssue>,
    #[serde(default)]
    pub pull_requests: TotalCount,
    #[serde(default)]
    pub closed_pull_requests: TotalCount,
    #[serde(default)]
    pub merged_pull_requests: TotalCount,
    #[serde(default, rename = "recentPRs")]
    pub recent_prs: Nodes<GqlPullRequest>,
    pub languages: Option<GqlLanguages>,
    #[serde(default)]
    pub releases: Nodes<GqlRelease>,
    pub default_branch_ref: Option<GqlBranchRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlIssue {
    pub state: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: TotalCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlPullRequest {
    pub state: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: TotalCount,
}

#[derive(Debug, Deserialize)]
pub struct GqlLanguages {
    #[serde(default)]
    pub edges: Vec<GqlLanguageEdge>,
}

#[derive(Debug, Deserialize)]
pub struct GqlLanguageEdge {
    pub size: u64,
    pub node: Named,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlRelease {
    #[serde(default)]
    pub name: Option<String>,
    pub tag_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct GqlBranchRef {
    pub target: Option<GqlCommitTarget>,
}

#[derive(Debug, Deserialize)]
pub struct GqlCommitTarget {
    pub history: Option<Nodes<GqlCommit>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlCommit {
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub committed_date: Option<DateTime<Utc>>,
    pub author: Option<GqlCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct GqlCommitAuthor {
    pub user: Option<GqlUser>,
}

#[derive(Debug, Deserialize)]
pub struct GqlUser {
    pub login: String,
}

/// Contributor as returned by the REST contributors endpoint
#[derive(Debug, Deserialize)]
pub struct GithubContributor {
    /// Absent for anonymous contributors
    pub login: Option<String>,
    #[serde(default)]
    pub contributions: u64,
}

/// Everything fetched for one repository
#[derive(Debug, Clone)]
pub struct RepoSnapshot {
    pub summary: RepoSummary,
    pub signals: RawSignals,
}

fn pr_state(state: &str, merged_at: Option<DateTime<Utc>>) -> PrState {
    match state.to_ascii_uppercase().as_str() {
        "MERGED" => PrState::Merged,
        "CLOSED" => PrState::Closed,
        "OPEN" => PrState::Open,
        _ if merged_at.is_some() => PrState::Merged,
        _ => PrState::Open,
    }
}

fn issue_state(state: &str) -> IssueState {
    if state.eq_ignore_ascii_case("closed") {
        IssueState::Closed
    } else {
        IssueState::Open
    }
}

impl GqlRepository {
    /// Convert the query response and contributor list into engine inputs
    pub fn into_snapshot(self, owner: &str, contributors: Vec<GithubContributor>) -> RepoSnapshot {
        let commits = self
            .default_branch_ref
            .and_then(|r| r.target)
            .and_then(|t| t.history)
            .unwrap_or_default()
            .nodes
            .into_iter()
            .take(COMMIT_SAMPLE)
            .map(|c| CommitSignal {
                message: c.message,
                committed_at: c.committed_date,
                author_login: c.author.and_then(|a| a.user).map(|u| u.login),
            })
            .collect();

        let pull_requests = self
            .recent_prs
            .nodes
            .into_iter()
            .take(ITEM_SAMPLE)
            .map(|pr| PullRequestSignal {
                state: pr_state(&pr.state, pr.merged_at),
                created_at: pr.created_at,
                merged_at: pr.merged_at,
                comment_count: pr.comments.total_count.min(u32::MAX as u64) as u32,
            })
            .collect();

        let issues = self
            .all_issues
            .nodes
            .into_iter()
            .take(ITEM_SAMPLE)
            .map(|i| IssueSignal {
                state: issue_state(&i.state),
                created_at: i.created_at,
                comment_count: i.comments.total_count.min(u32::MAX as u64) as u32,
            })
            .collect();

        let releases = self
            .releases
            .nodes
            .into_iter()
            .take(RELEASE_SAMPLE)
            .map(|r| Release {
                name: r.name.filter(|n| !n.is_empty()),
                tag_name: r.tag_name,
                published_at: r.published_at,
            })
            .collect();

        let contributors = contributors
            .into_iter()
            .filter_map(|c| {
                c.login.map(|login| Contributor {
                    login,
                    contributions: c.contributions,
                })
            })
            .collect();

        let languages = self
            .languages
            .map(|l| l.edges)
            .unwrap_or_default()
            .into_iter()
            .map(|edge| LanguageSize {
                name: edge.node.name,
                bytes: edge.size,
            })
            .collect();

        let signals = RawSignals {
            commits,
            pull_requests,
            issues,
            contributors,
            releases,
            total_pull_requests: self.pull_requests.total_count
                + self.closed_pull_requests.total_count,
            total_issues: self.issues.total_count + self.closed_issues.total_count,
            merged_pull_requests: self.merged_pull_requests.total_count,
            closed_issues: self.closed_issues.total_count,
            stars: self.stargazer_count,
            forks: self.fork_count,
            watchers: self.watchers.total_count,
            created_at: self.created_at,
            pushed_at: self.pushed_at,
        };

        let summary = RepoSummary {
            owner: owner.to_string(),
            name: self.name,
            description: self.description,
            url: self.url,
            homepage: self.homepage_url,
            archived: self.is_archived,
            fork: self.is_fork,
            primary_language: self.primary_language.map(|l| l.name),
            license: self
                .license_info
                .and_then(|l| l.spdx_id.or(l.name)),
            updated_at: self.updated_at,
            languages,
        };

        RepoSnapshot { summary, signals }
    }
}
