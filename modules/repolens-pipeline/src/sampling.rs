//! Sampled commit-detail retrieval.
//!
//! Commit details are expensive and rate limited, so only an evenly spread
//! subset is fetched, in fixed-width batches with a full barrier between
//! batches.

use futures::future::join_all;
use tracing::{debug, info, warn};

use github_client::CommitSummary;
use repolens_common::{RepoRef, SampleStats};

use crate::activity::AggregationContext;
use crate::source::RepoSource;

/// `sample_size` indices spread evenly over `0..total`: `floor(i * total / sample_size)`.
pub fn sample_indices(total: usize, sample_size: usize) -> Vec<usize> {
    let sample_size = sample_size.min(total);
    (0..sample_size).map(|i| i * total / sample_size).collect()
}

pub struct SamplingFetcher {
    sample_limit: usize,
    batch_size: usize,
}

impl SamplingFetcher {
    pub fn new(sample_limit: usize, batch_size: usize) -> Self {
        Self {
            sample_limit,
            batch_size: batch_size.max(1),
        }
    }

    /// Fetch details for a sample of `commits` and merge each batch into `ctx`
    /// once the whole batch has finished. Failed details are logged and skipped.
    pub async fn run(
        &self,
        source: &dyn RepoSource,
        repo: &RepoRef,
        commits: &[CommitSummary],
        ctx: &mut AggregationContext,
    ) -> SampleStats {
        let indices = sample_indices(commits.len(), self.sample_limit);
        let mut stats = SampleStats {
            requested: indices.len(),
            ..SampleStats::default()
        };

        info!(repo = %repo, sampled = indices.len(), total = commits.len(), "Fetching commit details");

        for (batch_no, batch) in indices.chunks(self.batch_size).enumerate() {
            let fetches = batch.iter().map(|&idx| {
                let sha = commits[idx].sha.as_str();
                async move {
                    match source.commit_detail(repo, sha).await {
                        Ok(detail) => Some(detail),
                        Err(e) => {
                            warn!(sha, error = %e, "Commit detail fetch failed");
                            None
                        }
                    }
                }
            });

            let results = join_all(fetches).await;
            let details: Vec<_> = results.into_iter().flatten().collect();
            stats.fetched += details.len();
            stats.failed += batch.len() - details.len();
            ctx.merge_details(details);

            debug!(batch = batch_no, fetched = stats.fetched, failed = stats.failed, "Batch merged");
        }

        stats
    }
}
