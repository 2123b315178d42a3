pub mod error;
pub mod types;

pub use error::{GitHubError, Result};
pub use types::{
    Account, CommitBody, CommitDetail, CommitSummary, Contributor, FileChange, FileStatus,
    GitSignature, ReadmeFile, RepoMetadata,
};

use std::time::Duration;

use serde::de::DeserializeOwned;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "repolens-activity-aggregator";

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client with a per-request timeout. Requests are never retried.
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Point the client at a different API root (GitHub Enterprise, test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url).header("Accept", ACCEPT);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(path, status = status.as_u16(), "GitHub request failed");
            return Err(GitHubError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch repository metadata.
    pub async fn repo_metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata> {
        self.get_json(&format!("/repos/{owner}/{repo}")).await
    }

    /// Fetch the README and return its decoded text (untruncated).
    pub async fn readme(&self, owner: &str, repo: &str) -> Result<String> {
        let file: ReadmeFile = self.get_json(&format!("/repos/{owner}/{repo}/readme")).await?;
        file.decoded_text()
    }

    /// Fetch one page of the contributor listing (1-based page numbers).
    pub async fn contributors_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Contributor>> {
        self.get_json(&format!(
            "/repos/{owner}/{repo}/contributors?page={page}&per_page={per_page}&anon=false"
        ))
        .await
    }

    /// Fetch one page of the commit list, newest first.
    pub async fn commits_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CommitSummary>> {
        self.get_json(&format!(
            "/repos/{owner}/{repo}/commits?page={page}&per_page={per_page}"
        ))
        .await
    }

    /// Fetch a single commit including its per-file changes.
    pub async fn commit_detail(&self, owner: &str, repo: &str, sha: &str) -> Result<CommitDetail> {
        self.get_json(&format!("/repos/{owner}/{repo}/commits/{sha}"))
            .await
    }
}
