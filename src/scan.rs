//! Organization scan for PRs similar to a source PR
//!
//! Walks every repository of the organization except the one holding the
//! source PR, keeps open PRs opened by automation accounts and scores
//! each against the source. Discovery order is preserved: repository
//! order as listed by the host, then PR order within a repository.

use crate::automation::is_automation_author;
use crate::compare::compare_pull_requests;
use crate::error::{Error, Result};
use crate::platform::SourceControlHost;
use crate::progress::ProgressCallback;
use crate::types::{ComparisonResult, PrReference, PullRequestInfo};
use tracing::{debug, info, warn};

/// A PR that matched the source PR
#[derive(Debug, Clone)]
pub struct SimilarPr {
    /// Full PR details as fetched during the scan
    pub pr: PullRequestInfo,
    /// Why it matched
    pub comparison: ComparisonResult,
}

/// Fetch the source PR and check it was opened by an automation account
///
/// Host failures here are fatal: without the source PR there is nothing
/// to compare against.
pub async fn load_source_pr(
    host: &dyn SourceControlHost,
    reference: &PrReference,
) -> Result<PullRequestInfo> {
    let pr = host
        .fetch_pull_request(&reference.owner, &reference.repo, reference.number)
        .await?;

    if !is_automation_author(&pr.author) {
        return Err(Error::NotAutomationAuthor {
            repository: pr.repository_full_name,
            number: pr.number,
            author: pr.author,
        });
    }

    Ok(pr)
}

/// Find open automation PRs in `org` that are similar to `source`
///
/// Only the repository listing is fatal. A PR whose details cannot be
/// fetched is reported as a warning and skipped.
pub async fn find_similar_prs(
    host: &dyn SourceControlHost,
    source: &PullRequestInfo,
    org: &str,
    threshold: f64,
    progress: &dyn ProgressCallback,
) -> Result<Vec<SimilarPr>> {
    let repositories = host.list_organization_repositories(org).await?;
    info!(org, repositories = repositories.len(), "scanning organization");

    let mut similar = Vec::new();

    for (index, repo) in repositories.iter().enumerate() {
        progress
            .on_repository(index, repositories.len(), &repo.full_name)
            .await;

        if repo.full_name == source.repository_full_name {
            debug!(repo = %repo.full_name, "skipping source repository");
            continue;
        }

        let open_prs = host.list_open_pull_requests(repo).await.unwrap_or_else(|e| {
            warn!(repo = %repo.full_name, error = %e, "failed to list open PRs");
            Vec::new()
        });

        for pr_ref in open_prs
            .iter()
            .filter(|p| is_automation_author(&p.author))
        {
            let target = match host
                .fetch_pull_request(&repo.owner, &repo.name, pr_ref.number)
                .await
            {
                Ok(pr) => pr,
                Err(e) => {
                    warn!(repo = %repo.full_name, pr_number = pr_ref.number, error = %e, "failed to fetch PR details");
                    progress
                        .on_warning(&format!(
                            "Warning: Failed to analyze PR {} in {}: {e}",
                            pr_ref.number, repo.full_name
                        ))
                        .await;
                    continue;
                }
            };

            let comparison = compare_pull_requests(source, &target, threshold);
            debug!(
                repo = %repo.full_name,
                pr_number = target.number,
                score = comparison.confidence_score,
                is_similar = comparison.is_similar,
                "compared PR"
            );

            if comparison.is_similar {
                similar.push(SimilarPr {
                    pr: target,
                    comparison,
                });
            }
        }
    }

    info!(org, similar = similar.len(), "scan complete");
    Ok(similar)
}
