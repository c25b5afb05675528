//! GitHub API client for fetching repository signals

pub mod client;
pub mod query;

pub use client::{ClientError, GitHubClient};
pub use query::RepoSnapshot;
