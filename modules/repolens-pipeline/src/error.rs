use std::time::Duration;

use thiserror::Error;

use github_client::GitHubError;

/// Failures that cross the pipeline boundary. Optional fetches and sampled
/// details degrade locally and never show up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: GitHubError,
    },

    #[error("Analysis did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Caller-actionable classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    RateLimited,
    Other,
}

impl PipelineError {
    /// Upstream HTTP status of a failed required fetch.
    pub fn status(&self) -> Option<u16> {
        match self {
            PipelineError::Fetch { source, .. } => source.status(),
            PipelineError::DeadlineExceeded(_) => None,
        }
    }

    pub fn failure_kind(&self) -> FailureKind {
        match self {
            PipelineError::Fetch { source, .. } if source.is_not_found() => FailureKind::NotFound,
            PipelineError::Fetch { source, .. } if source.is_rate_limited() => {
                FailureKind::RateLimited
            }
            _ => FailureKind::Other,
        }
    }

    /// Message suitable for showing to whoever asked for the analysis.
    pub fn user_message(&self) -> String {
        match self.failure_kind() {
            FailureKind::NotFound => "Repository not found: it does not exist or is private. \
                 Try providing a GitHub token."
                .to_string(),
            FailureKind::RateLimited => "GitHub API rate limit exceeded. \
                 Provide a GitHub token or try again later."
                .to_string(),
            FailureKind::Other => format!("Analysis failed: {self}"),
        }
    }
}
