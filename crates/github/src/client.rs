//! GitHub API client for fetching repository signals

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::query::{GithubContributor, GraphQlResponse, RepoQueryData, RepoSnapshot, REPO_QUERY};

/// Contributors fetched from the REST API
pub const CONTRIBUTOR_SAMPLE: u32 = 10;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid GitHub token")]
    Unauthorized,
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("GraphQL error: {0}")]
    GraphQl(String),
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_url(token, "https://api.github.com")
    }

    pub fn with_api_url(token: Option<String>, api_url: impl Into<String>) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            token,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("repo-rank/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    async fn send<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ClientError> {
        let resp = request.headers(self.headers()).send().await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(what.to_string()));
        }
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ClientError> {
        debug!("GET {}", url);
        self.send(self.client.get(url), url).await
    }

    /// Run the repository query
    pub async fn query_repo(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<crate::query::GqlRepository, ClientError> {
        let url = format!("{}/graphql", self.api_url);
        debug!("POST {} for {}/{}", url, owner, name);

        let body = json!({
            "query": REPO_QUERY,
            "variables": { "owner": owner, "name": name },
        });
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        let response: GraphQlResponse<RepoQueryData> =
            self.send(request, &format!("{}/{}", owner, name)).await?;

        if let Some(err) = response.errors.first() {
            if err.message.contains("Could not resolve") {
                return Err(ClientError::NotFound(format!("{}/{}", owner, name)));
            }
            return Err(ClientError::GraphQl(err.message.clone()));
        }

        response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| ClientError::NotFound(format!("{}/{}", owner, name)))
    }

    /// Fetch the top contributors by contribution count
    pub async fn list_contributors(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<GithubContributor>, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/contributors?per_page={}",
            self.api_url, owner, name, CONTRIBUTOR_SAMPLE
        );
        self.get(&url).await
    }

    /// Fetch everything the engine needs for one repository.
    ///
    /// Contributors are best effort: if that request fails the list is empty.
    pub async fn fetch_snapshot(&self, owner: &str, name: &str) -> Result<RepoSnapshot, ClientError> {
        let (repo, contributors) =
            tokio::join!(self.query_repo(owner, name), self.list_contributors(owner, name));
        let repo = repo?;

        let contributors = contributors.unwrap_or_else(|e| {
            warn!("Failed to fetch contributors for {}/{}: {}", owner, name, e);
            Vec::new()
        });

        let snapshot = repo.into_snapshot(owner, contributors);
        info!(
            "Fetched {}/{}: {} commits, {} PRs, {} issues, {} releases, {} contributors",
            owner,
            name,
            snapshot.signals.commits.len(),
            snapshot.signals.pull_requests.len(),
            snapshot.signals.issues.len(),
            snapshot.signals.releases.len(),
            snapshot.signals.contributors.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(None);
        assert!(client.token.is_none());
        assert_eq!(client.api_url, "https://api.github.com");

        let client = GitHubClient::new(Some("test".to_string()));
        assert_eq!(client.token, Some("test".to_string()));
    }

    #[test]
    fn test_custom_api_url_trims_slash() {
        let client = GitHubClient::with_api_url(None, "http://localhost:9000/");
        assert_eq!(client.api_url, "http://localhost:9000");
    }

    #[test]
    fn test_auth_header() {
        let client = GitHubClient::new(Some("abc".to_string()));
        let headers = client.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");

        let anonymous = GitHubClient::new(None);
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());
    }
}
