//! Shared fixtures for dependamerge tests

#![allow(dead_code)]

mod mock_host;

pub use mock_host::{HostCall, MockHost, RecordingProgress};

use dependamerge::types::{FileChange, FileStatus, PrState, PullRequestInfo};

/// Build a changed file entry
pub fn make_file(filename: &str) -> FileChange {
    FileChange {
        filename: filename.to_string(),
        additions: 1,
        deletions: 1,
        changes: 2,
        status: FileStatus::Modified,
    }
}

/// Build an open, mergeable PR
pub fn make_pr(
    repository: &str,
    number: u64,
    title: &str,
    author: &str,
    files: &[&str],
) -> PullRequestInfo {
    PullRequestInfo {
        number,
        title: title.to_string(),
        body: Some("Automated dependency update".to_string()),
        author: author.to_string(),
        head_sha: format!("{number:040x}"),
        base_branch: "main".to_string(),
        head_branch: format!("dependabot/pip/update-{number}"),
        state: PrState::Open,
        mergeable: Some(true),
        mergeable_state: Some("clean".to_string()),
        behind_by: None,
        files_changed: files.iter().map(|f| make_file(f)).collect(),
        repository_full_name: repository.to_string(),
        html_url: format!("https://github.com/{repository}/pull/{number}"),
    }
}

/// Dependabot PR bumping `requests`
pub fn requests_bump(repository: &str, number: u64, from: &str) -> PullRequestInfo {
    make_pr(
        repository,
        number,
        &format!("Bump requests from {from} to 2.28.1"),
        "dependabot[bot]",
        &["requirements.txt"],
    )
}

/// Same PR with different mergeability
pub fn with_mergeability(
    mut pr: PullRequestInfo,
    mergeable: Option<bool>,
    mergeable_state: &str,
) -> PullRequestInfo {
    pr.mergeable = mergeable;
    pr.mergeable_state = Some(mergeable_state.to_string());
    pr
}
