use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitHubError>;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl GitHubError {
    /// Upstream HTTP status, when the failure came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// GitHub signals primary rate limits with 403 and secondary ones with 429.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(403) | Some(429))
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GitHubError::Timeout(err.to_string());
        }
        if err.is_decode() {
            return GitHubError::Parse(err.to_string());
        }
        GitHubError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GitHubError {
    fn from(err: serde_json::Error) -> Self {
        GitHubError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_only_reported_for_api_errors() {
        let api = GitHubError::Api {
            status: 404,
            message: "Not Found".into(),
        };
        assert_eq!(api.status(), Some(404));
        assert!(api.is_not_found());
        assert!(!api.is_rate_limited());

        let net = GitHubError::Network("connection reset".into());
        assert_eq!(net.status(), None);
        assert!(!net.is_not_found());
    }

    #[test]
    fn forbidden_and_too_many_requests_are_rate_limits() {
        for status in [403, 429] {
            let err = GitHubError::Api {
                status,
                message: String::new(),
            };
            assert!(err.is_rate_limited(), "status {status}");
        }
    }
}
