//! Final fold from resolved identities and sampled changes into an
//! [`ActivityReport`], plus the advisory validation flags.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use github_client::{CommitSummary, RepoMetadata};
use repolens_common::{
    ActivePeriod, ActivityReport, AutomatedAccount, ChangeSummary, CommitHeadline,
    ContributorSummary, Counts, FolderTally, RepoRef, RepositoryOverview, SampleStats,
    ValidationFlags,
};

use crate::activity::AggregationContext;
use crate::identity::{Resolution, ResolvedContributor};

/// Everything a finished run has collected.
pub struct AggregateInput<'a> {
    pub repo: &'a RepoRef,
    pub metadata: &'a RepoMetadata,
    /// Already truncated to the character budget.
    pub readme: &'a str,
    /// Raw contributor listing length, before dedup.
    pub listed_contributors: usize,
    pub resolution: &'a Resolution,
    pub context: &'a AggregationContext,
    /// The full, unsampled commit stream.
    pub commits: &'a [CommitSummary],
    pub sampling: SampleStats,
}

#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    pub top_folders: usize,
    pub top_areas: usize,
    pub recent_commits: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            top_folders: 10,
            top_areas: 5,
            recent_commits: 20,
        }
    }
}

impl Aggregator {
    pub fn aggregate(&self, input: &AggregateInput<'_>, analyzed_at: DateTime<Utc>) -> ActivityReport {
        let repository = overview(input.repo, input.metadata, input.readme);

        let contributors: Vec<ContributorSummary> = input
            .resolution
            .humans
            .iter()
            .map(|c| self.summarize(c))
            .collect();

        let automated_accounts: Vec<AutomatedAccount> = input
            .resolution
            .automated
            .iter()
            .map(|r| AutomatedAccount {
                login: r.handle.clone(),
                id: r.numeric_id,
                contributions: r.contribution_count,
                avatar_url: r.avatar_ref.clone(),
            })
            .collect();

        let total_commits = input.commits.len();
        let change_summary = ChangeSummary {
            most_changed_folders: top_folders(input.context, self.top_folders),
            new_files: input.context.file_status.added(),
            modified_files: input.context.file_status.modified(),
            deleted_files: input.context.file_status.removed(),
            total_commits,
        };

        let counts = Counts {
            total_contributors: input.listed_contributors,
            human_contributors: contributors.len(),
            automated_accounts: automated_accounts.len(),
            total_commits,
        };

        let validation = validate(
            &contributors,
            input.resolution.accepted_humans,
            automated_accounts.len(),
            &repository,
        );

        let recent_commits = input
            .commits
            .iter()
            .take(self.recent_commits)
            .map(headline)
            .collect();

        ActivityReport {
            repository,
            contributors,
            automated_accounts,
            change_summary,
            counts,
            sampling: input.sampling,
            recent_commits,
            validation,
            analyzed_at,
        }
    }

    fn summarize(&self, contributor: &ResolvedContributor) -> ContributorSummary {
        let identity = &contributor.identity;
        let activity = contributor.activity.as_ref();

        let active_period = activity.and_then(|a| match (a.first_seen, a.last_seen) {
            (Some(from), Some(to)) => Some(ActivePeriod { from, to }),
            _ => None,
        });

        ContributorSummary {
            login: identity.handle.clone(),
            name: activity
                .map(|a| a.display_name.clone())
                .unwrap_or_else(|| identity.handle.clone()),
            id: identity.numeric_id,
            contributions: identity.contribution_count,
            avatar_url: identity.avatar_ref.clone(),
            commit_count: activity.map_or(0, |a| a.commit_count),
            main_areas: activity.map_or_else(Vec::new, |a| a.top_areas(self.top_areas)),
            active_period,
            lines_added: activity.map_or(0, |a| a.lines_added),
            lines_removed: activity.map_or(0, |a| a.lines_removed),
        }
    }
}

fn overview(repo: &RepoRef, metadata: &RepoMetadata, readme: &str) -> RepositoryOverview {
    RepositoryOverview {
        owner: repo.owner.clone(),
        name: metadata.name.clone(),
        full_name: metadata.full_name.clone(),
        url: metadata.html_url.clone().unwrap_or_else(|| repo.html_url()),
        description: metadata.description.clone().unwrap_or_default(),
        primary_language: metadata
            .language
            .clone()
            .unwrap_or_else(|| "Not specified".to_string()),
        topics: metadata.topics.clone(),
        stars: metadata.stargazers_count,
        forks: metadata.forks_count,
        open_issues: metadata.open_issues_count,
        created_at: metadata.created_at,
        updated_at: metadata.updated_at,
        default_branch: metadata.default_branch.clone(),
        readme: readme.to_string(),
    }
}

/// Folder tallies by change count, ties broken by path so output never
/// depends on map iteration order.
fn top_folders(ctx: &AggregationContext, n: usize) -> Vec<FolderTally> {
    let mut tallies: Vec<FolderTally> = ctx
        .folder_changes
        .iter()
        .map(|(folder, count)| FolderTally {
            folder: folder.clone(),
            change_count: *count,
        })
        .collect();
    tallies.sort_by(|a, b| {
        b.change_count
            .cmp(&a.change_count)
            .then_with(|| a.folder.cmp(&b.folder))
    });
    tallies.truncate(n);
    tallies
}

fn headline(commit: &CommitSummary) -> CommitHeadline {
    let author = commit
        .login()
        .or_else(|| commit.author_name())
        .unwrap_or("Unknown");
    CommitHeadline {
        message: commit.headline().to_string(),
        author: author.to_string(),
        date: commit.authored_at(),
    }
}

/// Compute the advisory flags and log them. They never change control flow.
pub fn validate(
    contributors: &[ContributorSummary],
    accepted_humans: usize,
    automated: usize,
    repository: &RepositoryOverview,
) -> ValidationFlags {
    let distinct: HashSet<&str> = contributors.iter().map(|c| c.login.as_str()).collect();

    let flags = ValidationFlags {
        count_consistent: contributors.len() == accepted_humans,
        no_duplicate_identity: distinct.len() == contributors.len(),
        has_descriptive_purpose: !repository.description.trim().is_empty()
            || !repository.readme.trim().is_empty(),
        automated_excluded: automated,
    };

    if flags.is_valid() {
        info!(contributors = contributors.len(), automated, "Validation passed");
    } else {
        warn!(
            count_consistent = flags.count_consistent,
            no_duplicate_identity = flags.no_duplicate_identity,
            has_descriptive_purpose = flags.has_descriptive_purpose,
            "Data validation warning"
        );
    }

    flags
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use github_client::{Account, CommitBody, CommitDetail, FileChange, FileStatus, GitSignature};

    use super::*;
    use crate::identity::{resolve, IdentityRecord};

    fn metadata(description: Option<&str>) -> RepoMetadata {
        RepoMetadata {
            name: "widget".into(),
            full_name: "acme/widget".into(),
            description: description.map(str::to_string),
            language: None,
            stargazers_count: 3,
            forks_count: 1,
            open_issues_count: 0,
            created_at: None,
            updated_at: None,
            default_branch: Some("main".into()),
            topics: vec![],
            html_url: None,
        }
    }

    fn commit(sha: &str, login: Option<&str>, message: &str) -> CommitSummary {
        CommitSummary {
            sha: sha.into(),
            commit: CommitBody {
                message: message.into(),
                author: Some(GitSignature {
                    name: Some("Commit Name".into()),
                    email: None,
                    date: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
                }),
            },
            author: login.map(|l| Account {
                login: l.into(),
                id: None,
            }),
        }
    }

    fn identity(handle: &str, id: u64, contributions: u64) -> IdentityRecord {
        IdentityRecord {
            handle: handle.into(),
            numeric_id: id,
            contribution_count: contributions,
            avatar_ref: format!("https://avatars.example/{id}"),
            is_automated: crate::identity::is_automated(handle),
        }
    }

    fn fixture() -> (Vec<CommitSummary>, AggregationContext, Resolution) {
        let commits = vec![
            commit("c1", Some("alice"), "Add parser tests\n\nbody"),
            commit("c2", Some("alice"), "Fix server crash"),
            commit("c3", None, "Anonymous tweak"),
        ];
        let mut ctx = AggregationContext::new();
        ctx.scan_commits(&commits);
        ctx.merge_details(vec![CommitDetail {
            sha: "c1".into(),
            author: Some(Account {
                login: "alice".into(),
                id: Some(1),
            }),
            files: vec![
                FileChange { filename: "src/a.rs".into(), status: FileStatus::Added, additions: 5, deletions: 0 },
                FileChange { filename: "src/b.rs".into(), status: FileStatus::Modified, additions: 1, deletions: 1 },
                FileChange { filename: "docs/x.md".into(), status: FileStatus::Modified, additions: 2, deletions: 0 },
                FileChange { filename: "lib/z.rs".into(), status: FileStatus::Removed, additions: 0, deletions: 9 },
            ],
        }]);
        let resolution = resolve(
            &[identity("alice", 1, 10), identity("ci[bot]", 2, 3)],
            &ctx.activity,
        );
        (commits, ctx, resolution)
    }

    #[test]
    fn report_counts_and_summaries() {
        let (commits, ctx, resolution) = fixture();
        let repo = RepoRef::new("acme", "widget");
        let meta = metadata(Some("A widget"));
        let input = AggregateInput {
            repo: &repo,
            metadata: &meta,
            readme: "",
            listed_contributors: 2,
            resolution: &resolution,
            context: &ctx,
            commits: &commits,
            sampling: SampleStats { requested: 1, fetched: 1, failed: 0 },
        };
        let report = Aggregator::default().aggregate(&input, Utc::now());

        assert_eq!(report.counts.total_commits, 3);
        assert_eq!(report.counts.human_contributors, 1);
        assert_eq!(report.counts.automated_accounts, 1);
        assert_eq!(report.counts.total_contributors, 2);

        let alice = &report.contributors[0];
        assert_eq!(alice.name, "Commit Name");
        assert_eq!(alice.commit_count, 2);
        assert_eq!(alice.lines_added, 8);
        assert_eq!(alice.lines_removed, 10);
        assert!(alice.active_period.is_some());

        assert_eq!(report.change_summary.new_files, 1);
        assert_eq!(report.change_summary.modified_files, 2);
        assert_eq!(report.change_summary.deleted_files, 1);
        assert_eq!(report.change_summary.most_changed_folders[0].folder, "/src");
        assert_eq!(report.change_summary.most_changed_folders[0].change_count, 2);

        assert_eq!(report.recent_commits[0].message, "Add parser tests");
        assert_eq!(report.recent_commits[2].author, "Commit Name");
        assert_eq!(report.repository.primary_language, "Not specified");
        assert_eq!(report.repository.url, "https://github.com/acme/widget");

        assert!(report.validation.count_consistent);
        assert!(report.validation.no_duplicate_identity);
        assert!(report.validation.has_descriptive_purpose);
        assert_eq!(report.validation.automated_excluded, 1);
    }

    #[test]
    fn folder_ties_are_ordered_by_path() {
        let mut ctx = AggregationContext::new();
        for folder in ["/b", "/a", "/c"] {
            ctx.folder_changes.insert(folder.to_string(), 4);
        }
        ctx.folder_changes.insert("/hot".to_string(), 9);

        let names: Vec<_> = top_folders(&ctx, 3).into_iter().map(|t| t.folder).collect();
        assert_eq!(names, vec!["/hot", "/a", "/b"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let (commits, ctx, resolution) = fixture();
        let repo = RepoRef::new("acme", "widget");
        let meta = metadata(None);
        let input = AggregateInput {
            repo: &repo,
            metadata: &meta,
            readme: "# Widget",
            listed_contributors: 2,
            resolution: &resolution,
            context: &ctx,
            commits: &commits,
            sampling: SampleStats::default(),
        };
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let aggregator = Aggregator::default();

        assert_eq!(aggregator.aggregate(&input, at), aggregator.aggregate(&input, at));
    }

    #[test]
    fn missing_description_and_readme_fails_purpose_check() {
        let repo = RepoRef::new("acme", "widget");
        let overview = overview(&repo, &metadata(None), "   ");
        let flags = validate(&[], 0, 0, &overview);
        assert!(!flags.has_descriptive_purpose);
        assert!(flags.count_consistent);
        assert!(!flags.is_valid());
    }

    #[test]
    fn lost_contributor_breaks_count_consistency() {
        let repo = RepoRef::new("acme", "widget");
        let overview = overview(&repo, &metadata(Some("desc")), "");
        let flags = validate(&[], 2, 0, &overview);
        assert!(!flags.count_consistent);
    }
}
