//! Application state

use common::Config;
use github::GitHubClient;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub github: GitHubClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let github = GitHubClient::with_api_url(
            config.github_token.clone(),
            config.github_api_url.clone(),
        );
        Self { config, github }
    }
}
