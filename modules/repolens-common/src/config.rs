use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::RepoLensError;

/// Largest `per_page` the GitHub REST API honours. Larger requests are
/// silently served as pages of this size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // GitHub
    pub github_token: Option<String>,
    pub github_api_url: String,

    // Timeouts
    pub request_timeout: Duration,
    pub run_deadline: Duration,

    // Retrieval limits
    pub page_size: u32,
    pub max_commits: usize,
    pub sample_limit: usize,
    pub batch_size: usize,
    pub readme_chars: usize,

    // Report shape
    pub top_folders: usize,
    pub top_areas: usize,
    pub recent_commits: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
            request_timeout: Duration::from_secs(20),
            run_deadline: Duration::from_secs(120),
            page_size: MAX_PAGE_SIZE,
            max_commits: 500,
            sample_limit: 50,
            batch_size: 10,
            readme_chars: 800,
            top_folders: 10,
            top_areas: 5,
            recent_commits: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional; malformed numbers are reported instead of silently ignored.
    pub fn from_env() -> Result<Self, RepoLensError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RepoLensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            github_token: lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()),
            github_api_url: lookup("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            request_timeout: Duration::from_secs(positive(
                &lookup,
                "REPOLENS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            run_deadline: Duration::from_secs(positive(
                &lookup,
                "REPOLENS_RUN_DEADLINE_SECS",
                defaults.run_deadline.as_secs(),
            )?),
            page_size: page_size(&lookup)?,
            max_commits: positive(&lookup, "REPOLENS_MAX_COMMITS", defaults.max_commits)?,
            sample_limit: positive(&lookup, "REPOLENS_SAMPLE_LIMIT", defaults.sample_limit)?,
            batch_size: positive(&lookup, "REPOLENS_BATCH_SIZE", defaults.batch_size)?,
            readme_chars: positive(&lookup, "REPOLENS_README_CHARS", defaults.readme_chars)?,
            top_folders: positive(&lookup, "REPOLENS_TOP_FOLDERS", defaults.top_folders)?,
            top_areas: positive(&lookup, "REPOLENS_TOP_AREAS", defaults.top_areas)?,
            recent_commits: positive(&lookup, "REPOLENS_RECENT_COMMITS", defaults.recent_commits)?,
        })
    }

    /// Log the effective configuration without the token.
    pub fn log_redacted(&self) {
        info!(
            github_api_url = self.github_api_url.as_str(),
            github_token = if self.github_token.is_some() { "set" } else { "unset" },
            request_timeout_secs = self.request_timeout.as_secs(),
            run_deadline_secs = self.run_deadline.as_secs(),
            page_size = self.page_size,
            max_commits = self.max_commits,
            sample_limit = self.sample_limit,
            batch_size = self.batch_size,
            "Configuration loaded"
        );
    }
}

fn page_size<F>(lookup: &F) -> Result<u32, RepoLensError>
where
    F: Fn(&str) -> Option<String>,
{
    let size = positive(lookup, "REPOLENS_PAGE_SIZE", MAX_PAGE_SIZE)?;
    if size > MAX_PAGE_SIZE {
        return Err(RepoLensError::Config(format!(
            "REPOLENS_PAGE_SIZE must be at most {MAX_PAGE_SIZE}, got {size}"
        )));
    }
    Ok(size)
}

/// Parse an optional numeric variable, rejecting zero and garbage.
fn positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, RepoLensError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| RepoLensError::Config(format!("{key} must be a number, got {raw:?}")))?;
    if value == T::default() {
        return Err(RepoLensError::Config(format!("{key} must be greater than zero")));
    }
    Ok(value)
}
