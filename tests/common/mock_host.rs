//! In-memory host for testing
//!
//! Manually implements `SourceControlHost` with response maps, call
//! tracking and error injection. `merge` and `update_branch` apply the
//! same guards as the GitHub service: merge needs `mergeable == Some(true)`
//! and a branch update needs `mergeable_state == "behind"`.

use async_trait::async_trait;
use dependamerge::error::{Error, Result};
use dependamerge::platform::SourceControlHost;
use dependamerge::progress::ProgressCallback;
use dependamerge::types::{MergeMethod, PrRef, PullRequestInfo, RepositoryRef};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A recorded host call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Fetch(String, u64),
    ListRepositories(String),
    ListOpen(String),
    Approve(String, u64),
    Merge(String, u64, MergeMethod),
    UpdateBranch(String, u64),
}

type PrKey = (String, u64);

fn key(owner: &str, repo: &str, number: u64) -> PrKey {
    (format!("{owner}/{repo}"), number)
}

/// Mock host keyed by `owner/repo` and PR number
#[derive(Default)]
pub struct MockHost {
    // Responses
    repositories: Mutex<HashMap<String, Vec<RepositoryRef>>>,
    open_prs: Mutex<HashMap<String, Vec<PrRef>>>,
    prs: Mutex<HashMap<PrKey, PullRequestInfo>>,
    prs_after_update: Mutex<HashMap<PrKey, PullRequestInfo>>,
    declined_approvals: Mutex<HashSet<PrKey>>,
    // Call tracking
    calls: Mutex<Vec<HostCall>>,
    // Error injection
    error_on_fetch: Mutex<HashSet<PrKey>>,
    error_on_list_repositories: Mutex<Option<String>>,
    error_on_list_open: Mutex<HashSet<String>>,
    error_on_approve: Mutex<HashSet<PrKey>>,
    error_on_merge: Mutex<HashSet<PrKey>>,
    error_on_update: Mutex<HashSet<PrKey>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository under its owner (idempotent)
    pub fn add_repository(&self, full_name: &str) {
        let (owner, name) = full_name.split_once('/').expect("owner/repo");
        let mut repos = self.repositories.lock().unwrap();
        let list = repos.entry(owner.to_string()).or_default();
        if !list.iter().any(|r| r.full_name == full_name) {
            list.push(RepositoryRef::new(owner, name));
        }
    }

    /// Register an open PR: its repository, listing entry and details
    pub fn add_pr(&self, pr: PullRequestInfo) {
        self.add_repository(&pr.repository_full_name);
        self.open_prs
            .lock()
            .unwrap()
            .entry(pr.repository_full_name.clone())
            .or_default()
            .push(PrRef {
                number: pr.number,
                author: pr.author.clone(),
            });
        self.set_pr(pr);
    }

    /// Set the details returned by `fetch_pull_request`
    pub fn set_pr(&self, pr: PullRequestInfo) {
        self.prs
            .lock()
            .unwrap()
            .insert((pr.repository_full_name.clone(), pr.number), pr);
    }

    /// Details that replace the PR once its branch has been updated
    pub fn set_pr_after_update(&self, pr: PullRequestInfo) {
        self.prs_after_update
            .lock()
            .unwrap()
            .insert((pr.repository_full_name.clone(), pr.number), pr);
    }

    // === Error injection methods ===

    pub fn fail_fetch(&self, repository: &str, number: u64) {
        self.error_on_fetch
            .lock()
            .unwrap()
            .insert((repository.to_string(), number));
    }

    pub fn fail_list_repositories(&self, msg: &str) {
        *self.error_on_list_repositories.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_list_open(&self, repository: &str) {
        self.error_on_list_open
            .lock()
            .unwrap()
            .insert(repository.to_string());
    }

    pub fn fail_approve(&self, repository: &str, number: u64) {
        self.error_on_approve
            .lock()
            .unwrap()
            .insert((repository.to_string(), number));
    }

    /// Make `approve` answer `false` instead of erroring
    pub fn decline_approve(&self, repository: &str, number: u64) {
        self.declined_approvals
            .lock()
            .unwrap()
            .insert((repository.to_string(), number));
    }

    pub fn fail_merge(&self, repository: &str, number: u64) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert((repository.to_string(), number));
    }

    pub fn fail_update_branch(&self, repository: &str, number: u64) {
        self.error_on_update
            .lock()
            .unwrap()
            .insert((repository.to_string(), number));
    }

    // === Call verification methods ===

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change something on the host
    pub fn write_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    HostCall::Approve(..) | HostCall::Merge(..) | HostCall::UpdateBranch(..)
                )
            })
            .collect()
    }

    pub fn fetch_calls(&self) -> Vec<PrKey> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Fetch(repo, n) => Some((repo, n)),
                _ => None,
            })
            .collect()
    }

    pub fn merged(&self) -> Vec<PrKey> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Merge(repo, n, _) => Some((repo, n)),
                _ => None,
            })
            .collect()
    }

    pub fn assert_merge_not_called(&self, repository: &str, number: u64) {
        let merged = self.merged();
        assert!(
            !merged.contains(&(repository.to_string(), number)),
            "Expected merge({repository}#{number}) NOT to be called but it was: {merged:?}"
        );
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn stored(&self, key: &PrKey) -> Result<PullRequestInfo> {
        self.prs.lock().unwrap().get(key).cloned().ok_or_else(|| {
            Error::Host(format!("no PR configured for {}#{}", key.0, key.1))
        })
    }
}

#[async_trait]
impl SourceControlHost for MockHost {
    async fn fetch_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestInfo> {
        let key = key(owner, repo, number);
        self.record(HostCall::Fetch(key.0.clone(), number));

        if self.error_on_fetch.lock().unwrap().contains(&key) {
            return Err(Error::Host("502 Bad Gateway".to_string()));
        }
        self.stored(&key)
    }

    async fn list_organization_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>> {
        self.record(HostCall::ListRepositories(org.to_string()));

        if let Some(msg) = self.error_on_list_repositories.lock().unwrap().as_ref() {
            return Err(Error::Host(msg.clone()));
        }
        Ok(self
            .repositories
            .lock()
            .unwrap()
            .get(org)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_open_pull_requests(&self, repo: &RepositoryRef) -> Result<Vec<PrRef>> {
        self.record(HostCall::ListOpen(repo.full_name.clone()));

        if self.error_on_list_open.lock().unwrap().contains(&repo.full_name) {
            return Err(Error::Host("403 Forbidden".to_string()));
        }
        Ok(self
            .open_prs
            .lock()
            .unwrap()
            .get(&repo.full_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn approve(&self, owner: &str, repo: &str, number: u64) -> Result<bool> {
        let key = key(owner, repo, number);
        self.record(HostCall::Approve(key.0.clone(), number));

        if self.error_on_approve.lock().unwrap().contains(&key) {
            return Err(Error::Host("422 Unprocessable Entity".to_string()));
        }
        Ok(!self.declined_approvals.lock().unwrap().contains(&key))
    }

    async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        method: MergeMethod,
    ) -> Result<bool> {
        let key = key(owner, repo, number);
        self.record(HostCall::Merge(key.0.clone(), number, method));

        if self.error_on_merge.lock().unwrap().contains(&key) {
            return Err(Error::Host("405 Method Not Allowed".to_string()));
        }
        Ok(self.stored(&key)?.mergeable == Some(true))
    }

    async fn update_branch(&self, owner: &str, repo: &str, number: u64) -> Result<bool> {
        let key = key(owner, repo, number);
        self.record(HostCall::UpdateBranch(key.0.clone(), number));

        if self.error_on_update.lock().unwrap().contains(&key) {
            return Err(Error::Host("409 Conflict".to_string()));
        }
        if self.stored(&key)?.mergeable_state.as_deref() != Some("behind") {
            return Ok(false);
        }

        if let Some(updated) = self.prs_after_update.lock().unwrap().remove(&key) {
            self.prs.lock().unwrap().insert(key, updated);
        }
        Ok(true)
    }
}

/// Progress callback that keeps every line, tagged by kind
#[derive(Default)]
pub struct RecordingProgress {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        self.lines.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines().into_iter().map(|(_, text)| text).collect()
    }

    pub fn of_kind(&self, kind: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text)
            .collect()
    }

    fn push(&self, kind: &'static str, message: &str) {
        self.lines.lock().unwrap().push((kind, message.to_string()));
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_message(&self, message: &str) {
        self.push("message", message);
    }

    async fn on_warning(&self, message: &str) {
        self.push("warning", message);
    }

    async fn on_success(&self, message: &str) {
        self.push("success", message);
    }

    async fn on_error(&self, message: &str) {
        self.push("error", message);
    }
}
