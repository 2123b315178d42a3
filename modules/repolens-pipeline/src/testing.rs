// Test mocks for the aggregation pipeline.
//
// MockSource implements RepoSource from in-memory data:
// - paged listings are sliced from registered vectors
// - individual operations can be made to fail with a given status
// - commit_detail tracks call count and peak concurrency
//
// Plus builders for the GitHub wire types used in tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use github_client::{
    Account, CommitBody, CommitDetail, CommitSummary, Contributor, FileChange, FileStatus,
    GitHubError, GitSignature, RepoMetadata,
};
use repolens_common::{RepoRef, MAX_PAGE_SIZE};

use crate::source::{RepoSource, SourceResult};

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// In-memory `RepoSource`. Unregistered commit details return 404.
/// Builder pattern: `.on_commits()`, `.on_detail()`, `.fail_detail()`, …
pub struct MockSource {
    metadata: Option<RepoMetadata>,
    metadata_status: Option<u16>,
    readme: Option<String>,
    contributors: Vec<Contributor>,
    failing_contributor_pages: HashSet<u32>,
    commits: Vec<CommitSummary>,
    failing_commit_pages: HashMap<u32, u16>,
    details: HashMap<String, CommitDetail>,
    failing_details: HashSet<String>,
    delay: Option<Duration>,

    detail_calls: AtomicUsize,
    commit_page_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            metadata: Some(metadata("widget", Some("A test repository"))),
            metadata_status: None,
            readme: None,
            contributors: Vec::new(),
            failing_contributor_pages: HashSet::new(),
            commits: Vec::new(),
            failing_commit_pages: HashMap::new(),
            details: HashMap::new(),
            failing_details: HashSet::new(),
            delay: None,
            detail_calls: AtomicUsize::new(0),
            commit_page_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn on_metadata(mut self, metadata: RepoMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn fail_metadata(mut self, status: u16) -> Self {
        self.metadata_status = Some(status);
        self
    }

    pub fn on_readme(mut self, text: &str) -> Self {
        self.readme = Some(text.to_string());
        self
    }

    pub fn on_contributors(mut self, contributors: Vec<Contributor>) -> Self {
        self.contributors = contributors;
        self
    }

    pub fn fail_contributors_page(mut self, page: u32) -> Self {
        self.failing_contributor_pages.insert(page);
        self
    }

    pub fn on_commits(mut self, commits: Vec<CommitSummary>) -> Self {
        self.commits = commits;
        self
    }

    pub fn fail_commits_page(mut self, page: u32, status: u16) -> Self {
        self.failing_commit_pages.insert(page, status);
        self
    }

    pub fn on_detail(mut self, detail: CommitDetail) -> Self {
        self.details.insert(detail.sha.clone(), detail);
        self
    }

    pub fn fail_detail(mut self, sha: &str) -> Self {
        self.failing_details.insert(sha.to_string());
        self
    }

    /// Delay every commit-detail response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn commit_page_calls(&self) -> usize {
        self.commit_page_calls.load(Ordering::SeqCst)
    }

    /// Highest number of commit-detail requests observed in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

fn api_error(status: u16, message: &str) -> GitHubError {
    GitHubError::Api {
        status,
        message: message.to_string(),
    }
}

/// Pages are never larger than the API maximum, whatever was asked for.
fn slice_page<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let per_page = per_page.min(MAX_PAGE_SIZE) as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).cloned().collect()
}

#[async_trait]
impl RepoSource for MockSource {
    async fn metadata(&self, _repo: &RepoRef) -> SourceResult<RepoMetadata> {
        if let Some(status) = self.metadata_status {
            return Err(api_error(status, "MockSource: metadata failure"));
        }
        self.metadata
            .clone()
            .ok_or_else(|| api_error(404, "MockSource: no metadata registered"))
    }

    async fn readme(&self, _repo: &RepoRef) -> SourceResult<String> {
        self.readme
            .clone()
            .ok_or_else(|| api_error(404, "MockSource: no README registered"))
    }

    async fn contributors_page(
        &self,
        _repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<Contributor>> {
        if self.failing_contributor_pages.contains(&page) {
            return Err(api_error(500, "MockSource: contributors page failure"));
        }
        Ok(slice_page(&self.contributors, page, per_page))
    }

    async fn commits_page(
        &self,
        _repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> SourceResult<Vec<CommitSummary>> {
        self.commit_page_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(&status) = self.failing_commit_pages.get(&page) {
            return Err(api_error(status, "MockSource: commits page failure"));
        }
        Ok(slice_page(&self.commits, page, per_page))
    }

    async fn commit_detail(&self, _repo: &RepoRef, sha: &str) -> SourceResult<CommitDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let sibling requests in the same batch start before this one ends.
        tokio::task::yield_now().await;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_details.contains(sha) {
            return Err(api_error(502, "MockSource: detail failure"));
        }
        self.details
            .get(sha)
            .cloned()
            .ok_or_else(|| api_error(404, &format!("MockSource: no detail registered for {sha}")))
    }
}

// ---------------------------------------------------------------------------
// Wire type builders
// ---------------------------------------------------------------------------

pub fn metadata(name: &str, description: Option<&str>) -> RepoMetadata {
    RepoMetadata {
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        description: description.map(str::to_string),
        language: Some("Rust".to_string()),
        stargazers_count: 42,
        forks_count: 7,
        open_issues_count: 3,
        created_at: Some(day(1)),
        updated_at: Some(day(28)),
        default_branch: Some("main".to_string()),
        topics: vec!["cli".to_string()],
        html_url: Some(format!("https://github.com/acme/{name}")),
    }
}

pub fn contributor(login: &str, id: u64, contributions: u64) -> Contributor {
    Contributor {
        login: login.to_string(),
        id,
        contributions,
        avatar_url: format!("https://avatars.example.com/u/{id}"),
    }
}

/// A commit authored on 2024-01-`day_of_month` (clamped to 1..=28).
pub fn commit(sha: &str, login: Option<&str>, message: &str, day_of_month: u32) -> CommitSummary {
    CommitSummary {
        sha: sha.to_string(),
        commit: CommitBody {
            message: message.to_string(),
            author: Some(GitSignature {
                name: login.map(|l| format!("{l} (name)")),
                email: None,
                date: Some(day(day_of_month)),
            }),
        },
        author: login.map(|l| Account {
            login: l.to_string(),
            id: None,
        }),
    }
}

pub fn detail(sha: &str, login: Option<&str>, files: Vec<FileChange>) -> CommitDetail {
    CommitDetail {
        sha: sha.to_string(),
        author: login.map(|l| Account {
            login: l.to_string(),
            id: None,
        }),
        files,
    }
}

pub fn file(path: &str, status: FileStatus, additions: u64, deletions: u64) -> FileChange {
    FileChange {
        filename: path.to_string(),
        status,
        additions,
        deletions,
    }
}

fn day(day_of_month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day_of_month.clamp(1, 28), 12, 0, 0)
        .single()
        .unwrap_or_default()
}
