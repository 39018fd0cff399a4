//! Source control host services
//!
//! The scanner and the merge driver only talk to the host through
//! [`SourceControlHost`], so they can run against an in-memory fake.

mod detection;
mod github;

pub use detection::parse_pr_reference;
pub use github::{GitHubService, DEFAULT_APPROVAL_MESSAGE};

use crate::error::Result;
use crate::types::{MergeMethod, PrRef, PullRequestInfo, RepositoryRef};
use async_trait::async_trait;

/// Host operations needed to find and merge automation PRs
///
/// Retries and timeouts belong to implementations. Callers only see
/// success or a single terminal failure.
#[async_trait]
pub trait SourceControlHost: Send + Sync {
    /// Fetch full PR details, including changed files.
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo>;

    /// List every repository of an organization, in host order.
    async fn list_organization_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>>;

    /// List open PRs of a repository.
    ///
    /// Implementations should log a warning and return an empty list when
    /// the listing fails, so one broken repository does not end a scan.
    async fn list_open_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<PrRef>>;

    /// Submit an approving review. Returns `false` if the host refused.
    async fn approve(&self, owner: &str, repo: &str, number: u64) -> Result<bool>;

    /// Merge a PR.
    ///
    /// Implementations must check mergeability first and return `false`
    /// without merging when the PR is not mergeable.
    async fn merge(&self, owner: &str, repo: &str, number: u64, method: MergeMethod)
    -> Result<bool>;

    /// Bring the PR branch up to date with its base.
    ///
    /// Returns `false` when the PR is not behind its base.
    async fn update_branch(&self, owner: &str, repo: &str, number: u64) -> Result<bool>;
}
