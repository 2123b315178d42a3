use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{GitHubError, Result};

// --- Repository ---

/// Subset of `GET /repos/{owner}/{repo}` used for the repository overview.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub html_url: Option<String>,
}

/// Response of `GET /repos/{owner}/{repo}/readme`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeFile {
    #[serde(default)]
    pub content: String,
    pub encoding: Option<String>,
}

impl ReadmeFile {
    /// Decode the README body. GitHub wraps base64 payloads at 60 columns,
    /// so whitespace is stripped before decoding. Non-base64 encodings are
    /// returned as-is.
    pub fn decoded_text(&self) -> Result<String> {
        match self.encoding.as_deref() {
            Some("base64") => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact.as_bytes())
                    .map_err(|e| GitHubError::Parse(format!("README base64: {e}")))?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => Ok(self.content.clone()),
        }
    }
}

// --- Contributors ---

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub contributions: u64,
    #[serde(default)]
    pub avatar_url: String,
}

// --- Commits ---

/// Platform account attached to a commit. `null` when the commit email
/// is not linked to any GitHub account.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
    pub id: Option<u64>,
}

/// Git-level author signature.
#[derive(Debug, Clone, Deserialize)]
pub struct GitSignature {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitBody {
    #[serde(default)]
    pub message: String,
    pub author: Option<GitSignature>,
}

/// One entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitBody,
    pub author: Option<Account>,
}

impl CommitSummary {
    pub fn login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }

    pub fn author_name(&self) -> Option<&str> {
        self.commit.author.as_ref().and_then(|a| a.name.as_deref())
    }

    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }

    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }
}

/// Per-file change status. GitHub also reports `renamed`, `copied`,
/// `changed` and `unchanged`; those collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// Response of `GET /repos/{owner}/{repo}/commits/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub sha: String,
    pub author: Option<Account>,
    #[serde(default)]
    pub files: Vec<FileChange>,
}

impl CommitDetail {
    pub fn login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}
