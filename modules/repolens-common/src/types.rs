use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Report ---

/// The aggregated activity model for one repository, handed to downstream
/// consumers (summarization, presentation) by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub repository: RepositoryOverview,
    pub contributors: Vec<ContributorSummary>,
    pub automated_accounts: Vec<AutomatedAccount>,
    pub change_summary: ChangeSummary,
    pub counts: Counts,
    pub sampling: SampleStats,
    pub recent_commits: Vec<CommitHeadline>,
    pub validation: ValidationFlags,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOverview {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub url: String,
    pub description: String,
    pub primary_language: String,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub default_branch: Option<String>,
    /// README text, truncated to the configured character budget.
    pub readme: String,
}

// --- Contributors ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    pub login: String,
    pub name: String,
    pub id: u64,
    pub contributions: u64,
    pub avatar_url: String,
    pub commit_count: u64,
    pub main_areas: Vec<String>,
    pub active_period: Option<ActivePeriod>,
    pub lines_added: u64,
    pub lines_removed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePeriod {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedAccount {
    pub login: String,
    pub id: u64,
    pub contributions: u64,
    pub avatar_url: String,
}

// --- Changes ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTally {
    pub folder: String,
    pub change_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub most_changed_folders: Vec<FolderTally>,
    pub new_files: usize,
    pub modified_files: usize,
    pub deleted_files: usize,
    pub total_commits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    /// Size of the raw contributor listing, bots and duplicates included.
    pub total_contributors: usize,
    pub human_contributors: usize,
    pub automated_accounts: usize,
    pub total_commits: usize,
}

/// How much of the commit history was inspected at file level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleStats {
    pub requested: usize,
    pub fetched: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitHeadline {
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

// --- Validation ---

/// Advisory data-quality checks computed once after aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFlags {
    /// Resolved human contributors == human identity records accepted after dedup.
    pub count_consistent: bool,
    pub no_duplicate_identity: bool,
    /// A description or README text is present.
    pub has_descriptive_purpose: bool,
    pub automated_excluded: usize,
}

impl ValidationFlags {
    pub fn is_valid(&self) -> bool {
        self.count_consistent && self.no_duplicate_identity && self.has_descriptive_purpose
    }
}
