//! Core types for dependamerge

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of change applied to a single file in a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File was created
    Added,
    /// File contents changed
    Modified,
    /// File was deleted
    Removed,
    /// File was moved (possibly with edits)
    Renamed,
}

impl FromStr for FileStatus {
    type Err = String;

    /// Parse a host status string. Hosts report a few extra kinds
    /// (`copied`, `changed`, `unchanged`) which are folded into `Modified`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Self::Added),
            "modified" | "changed" | "copied" | "unchanged" => Ok(Self::Modified),
            "removed" => Ok(Self::Removed),
            "renamed" => Ok(Self::Renamed),
            other => Err(format!("unknown file status: {other}")),
        }
    }
}

/// Diff stats for one file in a PR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path of the file, relative to the repository root
    pub filename: String,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Total lines changed
    pub changes: u64,
    /// Kind of change
    pub status: FileStatus,
}

/// PR state (open, closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed (merged or not)
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Snapshot of a pull request as reported by the host
///
/// Never mutated: after a host-side change (e.g. a branch update) the PR
/// is fetched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestInfo {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Login of the PR author
    pub author: String,
    /// SHA of the head commit
    pub head_sha: String,
    /// Base branch name
    pub base_branch: String,
    /// Head branch name
    pub head_branch: String,
    /// Current state of the PR
    pub state: PrState,
    /// Whether the PR can be merged
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = not mergeable
    /// - `None` = unknown (host still computing)
    pub mergeable: Option<bool>,
    /// Host sub-state (clean, dirty, behind, blocked, draft, unknown, ...)
    pub mergeable_state: Option<String>,
    /// Number of commits the head is behind the base, when known
    pub behind_by: Option<u64>,
    /// Files touched by the PR, in host order
    pub files_changed: Vec<FileChange>,
    /// `owner/repo`
    pub repository_full_name: String,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequestInfo {
    /// Split `repository_full_name` into `(owner, repo)`.
    pub fn owner_and_repo(&self) -> Option<(&str, &str)> {
        self.repository_full_name
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty())
    }

    /// Repository name without the owner prefix
    pub fn repository_name(&self) -> &str {
        self.owner_and_repo()
            .map_or(self.repository_full_name.as_str(), |(_, repo)| repo)
    }
}

/// Outcome of comparing two PRs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Whether `confidence_score` reached the threshold
    pub is_similar: bool,
    /// Mean of the title, files and author scores, in `[0, 1]`
    pub confidence_score: f64,
    /// Human-readable explanations, in scoring order
    pub reasons: Vec<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

impl FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(format!(
                "unknown merge method '{other}' (expected merge, squash or rebase)"
            )),
        }
    }
}

/// A repository listed in an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Owner login (organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
}

impl RepositoryRef {
    /// Build a reference from owner and name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{owner}/{name}");
        Self {
            owner,
            name,
            full_name,
        }
    }
}

/// Lightweight open-PR listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrRef {
    /// PR number
    pub number: u64,
    /// Login of the PR author
    pub author: String,
}

/// Parsed PR URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrReference {
    /// Custom host (None for github.com)
    pub host: Option<String>,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub number: u64,
}

impl std::fmt::Display for PrReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
