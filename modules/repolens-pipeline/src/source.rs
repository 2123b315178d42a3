// Trait abstraction over the remote repository API.
//
// RepoSource covers exactly the five operations the pipeline consumes.
// GitHubClient is the production implementation; testing::MockSource
// replays canned data so the pipeline runs without network access.

use async_trait::async_trait;

use github_client::{CommitDetail, CommitSummary, Contributor, GitHubClient, GitHubError, RepoMetadata};
use repolens_common::RepoRef;

pub type SourceResult<T> = Result<T, GitHubError>;

#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Repository metadata (single item).
    async fn metadata(&self, repo: &RepoRef) -> SourceResult<RepoMetadata>;

    /// Decoded README text, untruncated.
    async fn readme(&self, repo: &RepoRef) -> SourceResult<String>;

    /// One page (1-based) of the authoritative contributor listing.
    async fn contributors_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<Contributor>>;

    /// One page (1-based) of the commit stream, newest first.
    async fn commits_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<CommitSummary>>;

    /// Per-file detail for one commit.
    async fn commit_detail(&self, repo: &RepoRef, sha: &str) -> SourceResult<CommitDetail>;
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn metadata(&self, repo: &RepoRef) -> SourceResult<RepoMetadata> {
        self.repo_metadata(&repo.owner, &repo.name).await
    }

    async fn readme(&self, repo: &RepoRef) -> SourceResult<String> {
        GitHubClient::readme(self, &repo.owner, &repo.name).await
    }

    async fn contributors_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<Contributor>> {
        GitHubClient::contributors_page(self, &repo.owner, &repo.name, page, per_page).await
    }

    async fn commits_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<CommitSummary>> {
        GitHubClient::commits_page(self, &repo.owner, &repo.name, page, per_page).await
    }

    async fn commit_detail(&self, repo: &RepoRef, sha: &str) -> SourceResult<CommitDetail> {
        GitHubClient::commit_detail(self, &repo.owner, &repo.name, sha).await
    }
}
