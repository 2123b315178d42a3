//! Per-run aggregation state.
//!
//! `AggregationContext` is owned by a single pipeline run. The commit scan
//! mutates it sequentially through `&mut self`; sampled commit details are
//! merged only after a whole batch has completed, so no concurrent fetch
//! ever touches these maps.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use github_client::{CommitDetail, CommitSummary, FileStatus};

use crate::classify::{area_of, folder_of, message_areas};

/// Commit-stream activity for one handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub handle: String,
    pub display_name: String,
    pub commit_count: u64,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
    /// Area label → number of times it was observed.
    pub areas: HashMap<String, u32>,
    pub lines_added: u64,
    pub lines_removed: u64,
}

impl ActivityRecord {
    pub fn new(handle: &str, display_name: &str) -> Self {
        Self {
            handle: handle.to_string(),
            display_name: display_name.to_string(),
            commit_count: 0,
            first_seen: None,
            last_seen: None,
            areas: HashMap::new(),
            lines_added: 0,
            lines_removed: 0,
        }
    }

    fn observe(&mut self, at: Option<DateTime<Utc>>) {
        self.commit_count += 1;
        let Some(at) = at else { return };
        self.first_seen = Some(self.first_seen.map_or(at, |t| t.min(at)));
        self.last_seen = Some(self.last_seen.map_or(at, |t| t.max(at)));
    }

    fn add_area(&mut self, area: &str) {
        *self.areas.entry(area.to_string()).or_default() += 1;
    }

    /// Most frequent areas first; ties broken alphabetically.
    pub fn top_areas(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, &u32)> = self.areas.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        ranked.into_iter().take(n).map(|(area, _)| area.clone()).collect()
    }
}

/// Disjoint added / modified / removed path sets. The last status observed
/// for a path wins.
#[derive(Debug, Default)]
pub struct FileStatusSets {
    added: HashSet<String>,
    modified: HashSet<String>,
    removed: HashSet<String>,
}

impl FileStatusSets {
    pub fn record(&mut self, path: &str, status: FileStatus) {
        self.added.remove(path);
        self.modified.remove(path);
        self.removed.remove(path);
        let target = match status {
            FileStatus::Added => &mut self.added,
            FileStatus::Removed => &mut self.removed,
            FileStatus::Modified | FileStatus::Other => &mut self.modified,
        };
        target.insert(path.to_string());
    }

    pub fn added(&self) -> usize {
        self.added.len()
    }

    pub fn modified(&self) -> usize {
        self.modified.len()
    }

    pub fn removed(&self) -> usize {
        self.removed.len()
    }
}

#[derive(Debug, Default)]
pub struct AggregationContext {
    /// Handle → activity, created lazily on first commit.
    pub activity: HashMap<String, ActivityRecord>,
    /// Folder → number of file changes in sampled commits.
    pub folder_changes: HashMap<String, u64>,
    pub file_status: FileStatusSets,
}

impl AggregationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the full commit stream into per-handle activity. Commits whose
    /// author is not linked to a platform account are skipped.
    pub fn scan_commits(&mut self, commits: &[CommitSummary]) {
        for commit in commits {
            let Some(login) = commit.login() else {
                continue;
            };
            let record = self.activity.entry(login.to_string()).or_insert_with(|| {
                ActivityRecord::new(login, commit.author_name().unwrap_or(login))
            });
            record.observe(commit.authored_at());
            for area in message_areas(&commit.commit.message) {
                record.add_area(area);
            }
        }
        debug!(handles = self.activity.len(), commits = commits.len(), "Commit scan complete");
    }

    /// Merge one completed batch of commit details, in sample order.
    pub fn merge_details<I>(&mut self, details: I)
    where
        I: IntoIterator<Item = CommitDetail>,
    {
        for detail in details {
            let login = detail.login().map(str::to_string);
            for file in &detail.files {
                let folder = folder_of(&file.filename);
                self.file_status.record(&file.filename, file.status);

                if let Some(record) = login.as_deref().and_then(|l| self.activity.get_mut(l)) {
                    record.lines_added += file.additions;
                    record.lines_removed += file.deletions;
                    if let Some(area) = area_of(&folder) {
                        record.add_area(area);
                    }
                }

                *self.folder_changes.entry(folder).or_default() += 1;
            }
        }
    }
}
