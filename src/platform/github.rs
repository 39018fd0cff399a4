//! GitHub host implementation

use crate::error::{Error, Result};
use crate::platform::SourceControlHost;
use crate::types::{
    FileChange, FileStatus, MergeMethod, PrRef, PrState, PullRequestInfo, RepositoryRef,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, warn};

/// Review body used when approving
pub const DEFAULT_APPROVAL_MESSAGE: &str = "Auto-approved by dependamerge";

const PUBLIC_API: &str = "https://api.github.com";
const PAGE_SIZE: u8 = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    approval_message: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let base_uri = host.map_or_else(
            || PUBLIC_API.to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_base_uri(token, &base_uri)
    }

    /// Create a service talking to an explicit API root
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)
            .map_err(|e| Error::Host(e.to_string()))?
            .build()
            .map_err(|e| Error::Host(e.to_string()))?;

        Ok(Self {
            client,
            approval_message: DEFAULT_APPROVAL_MESSAGE.to_string(),
        })
    }

    /// Use a custom review body when approving
    #[must_use]
    pub fn with_approval_message(mut self, message: impl Into<String>) -> Self {
        self.approval_message = message.into();
        self
    }
}

/// Render a serde-named enum (e.g. `MergeableState::Behind`) as its wire name
fn wire_name<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

fn file_from_octocrab(entry: &octocrab::models::repos::DiffEntry) -> FileChange {
    let status = wire_name(&entry.status)
        .and_then(|s| s.parse().ok())
        .unwrap_or(FileStatus::Modified);

    FileChange {
        filename: entry.filename.clone(),
        additions: entry.additions,
        deletions: entry.deletions,
        changes: entry.changes,
        status,
    }
}

/// Helper to convert an octocrab PR to our `PullRequestInfo` type
fn pr_from_octocrab(
    owner: &str,
    repo: &str,
    pr: &octocrab::models::pulls::PullRequest,
    files_changed: Vec<FileChange>,
) -> PullRequestInfo {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
        Some(_) | None => PrState::Closed,
    };

    PullRequestInfo {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        author: pr
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default(),
        head_sha: pr.head.sha.clone(),
        base_branch: pr.base.ref_field.clone(),
        head_branch: pr.head.ref_field.clone(),
        state,
        mergeable: pr.mergeable,
        mergeable_state: pr.mergeable_state.as_ref().and_then(wire_name),
        // The pulls API does not report how far behind a branch is
        behind_by: None,
        files_changed,
        repository_full_name: format!("{owner}/{repo}"),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl SourceControlHost for GitHubService {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo> {
        debug!(owner, repo, pr_number = number, "fetching PR");
        let pulls = self.client.pulls(owner, repo);

        let pr = pulls.get(number).await?;
        let first_page = pulls.list_files(number).await?;
        let files = self.client.all_pages(first_page).await?;

        let info = pr_from_octocrab(
            owner,
            repo,
            &pr,
            files.iter().map(file_from_octocrab).collect(),
        );
        debug!(
            owner,
            repo,
            pr_number = number,
            files = info.files_changed.len(),
            mergeable = ?info.mergeable,
            mergeable_state = ?info.mergeable_state,
            "fetched PR"
        );
        Ok(info)
    }

    async fn list_organization_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>> {
        debug!(org, "listing organization repositories");
        let first_page = self
            .client
            .orgs(org)
            .list_repos()
            .per_page(PAGE_SIZE)
            .send()
            .await
            .map_err(|e| Error::Host(format!("Failed to fetch repositories for {org}: {e}")))?;
        let repos = self.client.all_pages(first_page).await?;

        let result: Vec<RepositoryRef> = repos
            .into_iter()
            .map(|r| {
                let owner = r
                    .owner
                    .as_ref()
                    .map_or_else(|| org.to_string(), |o| o.login.clone());
                RepositoryRef::new(owner, r.name)
            })
            .collect();
        debug!(org, count = result.len(), "listed organization repositories");
        Ok(result)
    }

    async fn list_open_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<PrRef>> {
        debug!(repo = %repo.full_name, "listing open PRs");
        let listing: std::result::Result<Vec<octocrab::models::pulls::PullRequest>, _> = async {
            let first_page = self
                .client
                .pulls(&repo.owner, &repo.name)
                .list()
                .state(octocrab::params::State::Open)
                .per_page(PAGE_SIZE)
                .send()
                .await?;
            self.client.all_pages(first_page).await
        }
        .await;

        match listing {
            Ok(prs) => {
                let result: Vec<PrRef> = prs
                    .iter()
                    .map(|pr| PrRef {
                        number: pr.number,
                        author: pr
                            .user
                            .as_ref()
                            .map(|u| u.login.clone())
                            .unwrap_or_default(),
                    })
                    .collect();
                debug!(repo = %repo.full_name, count = result.len(), "listed open PRs");
                Ok(result)
            }
            Err(e) => {
                warn!(repo = %repo.full_name, error = %e, "failed to fetch open PRs");
                Ok(Vec::new())
            }
        }
    }

    async fn approve(&self, owner: &str, repo: &str, number: u64) -> Result<bool> {
        debug!(owner, repo, pr_number = number, "approving PR");
        let route = format!("/repos/{owner}/{repo}/pulls/{number}/reviews");
        let body = serde_json::json!({
            "body": self.approval_message,
            "event": "APPROVE",
        });

        let _review: serde_json::Value = self
            .client
            .post(route, Some(&body))
            .await
            .map_err(|e| Error::Host(format!("Failed to approve PR #{number}: {e}")))?;

        debug!(owner, repo, pr_number = number, "approved PR");
        Ok(true)
    }

    async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        method: MergeMethod,
    ) -> Result<bool> {
        debug!(owner, repo, pr_number = number, %method, "merging PR");
        let pulls = self.client.pulls(owner, repo);

        let pr = pulls.get(number).await?;
        if pr.mergeable != Some(true) {
            warn!(owner, repo, pr_number = number, mergeable = ?pr.mergeable, "PR is not mergeable");
            return Ok(false);
        }

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        // For squash, use PR title and body as commit message
        let result = if method == MergeMethod::Squash {
            let title = pr.title.clone().unwrap_or_default();
            let mut builder = pulls
                .merge(number)
                .method(octocrab_method)
                .title(format!("{title} (#{number})"));
            if let Some(ref body) = pr.body {
                builder = builder.message(body);
            }
            builder.send().await
        } else {
            pulls.merge(number).method(octocrab_method).send().await
        }
        .map_err(|e| Error::Host(format!("Merge failed: {e}")))?;

        debug!(
            owner,
            repo,
            pr_number = number,
            merged = result.merged,
            sha = ?result.sha,
            "merge complete"
        );
        Ok(result.merged)
    }

    async fn update_branch(&self, owner: &str, repo: &str, number: u64) -> Result<bool> {
        debug!(owner, repo, pr_number = number, "updating PR branch");
        let pr = self.client.pulls(owner, repo).get(number).await?;

        let state = pr.mergeable_state.as_ref().and_then(wire_name);
        if state.as_deref() != Some("behind") {
            warn!(owner, repo, pr_number = number, mergeable_state = ?state, "PR is not behind the base branch");
            return Ok(false);
        }

        let route = format!("/repos/{owner}/{repo}/pulls/{number}/update-branch");
        let body = serde_json::json!({ "expected_head_sha": pr.head.sha });

        let _accepted: serde_json::Value = self
            .client
            .put(route, Some(&body))
            .await
            .map_err(|e| Error::Host(format!("Failed to update PR #{number}: {e}")))?;

        debug!(owner, repo, pr_number = number, "requested branch update");
        Ok(true)
    }
}
