use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use github_client::GitHubError;
use repolens_common::{ActivityReport, Config, RepoRef, MAX_PAGE_SIZE};

use crate::activity::AggregationContext;
use crate::aggregate::{AggregateInput, Aggregator};
use crate::error::PipelineError;
use crate::identity::{resolve, IdentityRecord};
use crate::paginate::{fetch_pages, Pagination};
use crate::sampling::SamplingFetcher;
use crate::source::RepoSource;

/// Limits and report shape for one run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub page_size: u32,
    pub max_commits: usize,
    pub sample_limit: usize,
    pub batch_size: usize,
    pub readme_chars: usize,
    pub run_deadline: Duration,
    pub aggregator: Aggregator,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            max_commits: config.max_commits,
            sample_limit: config.sample_limit,
            batch_size: config.batch_size,
            readme_chars: config.readme_chars,
            run_deadline: config.run_deadline,
            aggregator: Aggregator {
                top_folders: config.top_folders,
                top_areas: config.top_areas,
                recent_commits: config.recent_commits,
            },
        }
    }
}

/// Runs the repository activity aggregation for one repository at a time.
/// Each call to [`RepoPipeline::run`] owns all of its state.
pub struct RepoPipeline {
    source: Arc<dyn RepoSource>,
    settings: PipelineSettings,
}

impl RepoPipeline {
    pub fn new(source: Arc<dyn RepoSource>, settings: PipelineSettings) -> Self {
        Self { source, settings }
    }

    /// Analyze `repo` within the configured deadline. Either a complete
    /// report is returned or the run fails; there is no partial result.
    pub async fn run(&self, repo: &RepoRef) -> Result<ActivityReport, PipelineError> {
        let deadline = self.settings.run_deadline;
        match tokio::time::timeout(deadline, self.run_inner(repo)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(repo = %repo, ?deadline, "Analysis deadline exceeded");
                Err(PipelineError::DeadlineExceeded(deadline))
            }
        }
    }

    async fn run_inner(&self, repo: &RepoRef) -> Result<ActivityReport, PipelineError> {
        let source = self.source.as_ref();
        let settings = &self.settings;
        let page_size = settings.page_size.min(MAX_PAGE_SIZE);
        if page_size < settings.page_size {
            warn!(requested = settings.page_size, page_size, "Page size clamped to API limit");
        }

        info!(repo = %repo, "Fetching repository metadata, README and contributors");
        let (metadata, readme, contributors) = tokio::join!(
            source.metadata(repo),
            self.fetch_readme(repo),
            fetch_pages("contributors", Pagination::optional(page_size, None), |page| {
                source.contributors_page(repo, page, page_size)
            }),
        );

        let metadata = metadata.map_err(|source| PipelineError::Fetch {
            what: "repository metadata",
            source,
        })?;
        // Truncating walk: failures were already logged and never surface here.
        let contributors = contributors.unwrap_or_default();
        info!(
            repo = %repo,
            name = metadata.name.as_str(),
            contributors = contributors.len(),
            "Repository loaded"
        );

        let commits = fetch_pages(
            "commits",
            Pagination::required(page_size, Some(settings.max_commits)),
            |page| source.commits_page(repo, page, page_size),
        )
        .await
        .map_err(|source| PipelineError::Fetch {
            what: "commit history",
            source,
        })?;
        info!(repo = %repo, commits = commits.len(), "Commit history loaded");

        let mut ctx = AggregationContext::new();
        ctx.scan_commits(&commits);

        let sampling = SamplingFetcher::new(settings.sample_limit, settings.batch_size)
            .run(source, repo, &commits, &mut ctx)
            .await;

        let identities: Vec<IdentityRecord> = contributors.iter().map(IdentityRecord::from).collect();
        let resolution = resolve(&identities, &ctx.activity);

        let report = settings.aggregator.aggregate(
            &AggregateInput {
                repo,
                metadata: &metadata,
                readme: &readme,
                listed_contributors: contributors.len(),
                resolution: &resolution,
                context: &ctx,
                commits: &commits,
                sampling,
            },
            Utc::now(),
        );

        info!(
            repo = %repo,
            contributors = report.counts.human_contributors,
            bots = report.counts.automated_accounts,
            commits = report.counts.total_commits,
            "Analysis complete"
        );
        Ok(report)
    }

    /// README text cut to the character budget; empty when unavailable.
    async fn fetch_readme(&self, repo: &RepoRef) -> String {
        match self.source.readme(repo).await {
            Ok(text) => truncate_chars(&text, self.settings.readme_chars),
            Err(GitHubError::Api { status: 404, .. }) => {
                info!(repo = %repo, "No README found");
                String::new()
            }
            Err(e) => {
                warn!(repo = %repo, error = %e, "README inaccessible");
                String::new()
            }
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 800), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn settings_follow_config() {
        let config = Config {
            batch_size: 3,
            top_folders: 4,
            ..Config::default()
        };
        let settings = PipelineSettings::from(&config);
        assert_eq!(settings.batch_size, 3);
        assert_eq!(settings.aggregator.top_folders, 4);
        assert_eq!(settings.max_commits, 500);
    }
}
