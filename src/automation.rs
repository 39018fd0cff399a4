//! Automation detection
//!
//! Two checks with different strictness:
//! - [`is_automation_author`] matches the author login against a fixed set of
//!   bot accounts. It decides whether a PR may be auto-merged at all.
//! - [`is_automation_pr`] looks for loose substring hints in the title, body
//!   and author. It gates similarity comparison.

use crate::types::PullRequestInfo;

/// Bot accounts whose PRs are eligible for auto-merging
pub const AUTOMATION_AUTHORS: &[&str] = &[
    "dependabot[bot]",
    "pre-commit-ci[bot]",
    "renovate[bot]",
    "github-actions[bot]",
    "allcontributors[bot]",
];

/// Substrings that mark a PR as tool-generated
pub const AUTOMATION_INDICATORS: &[&str] = &[
    "dependabot",
    "pre-commit",
    "renovate",
    "github-actions",
    "auto-update",
    "automated",
    "bot",
];

/// Whether `author` is one of the known automation accounts (exact match).
pub fn is_automation_author(author: &str) -> bool {
    AUTOMATION_AUTHORS.contains(&author)
}

/// Whether the PR text or author hints at an automation tool.
pub fn is_automation_pr(pr: &PullRequestInfo) -> bool {
    let text = format!(
        "{} {} {}",
        pr.title,
        pr.body.as_deref().unwrap_or_default(),
        pr.author
    )
    .to_lowercase();

    AUTOMATION_INDICATORS
        .iter()
        .any(|indicator| text.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrState;

    fn pr(title: &str, body: Option<&str>, author: &str) -> PullRequestInfo {
        PullRequestInfo {
            number: 1,
            title: title.to_string(),
            body: body.map(str::to_string),
            author: author.to_string(),
            head_sha: "abc123".to_string(),
            base_branch: "main".to_string(),
            head_branch: "update".to_string(),
            state: PrState::Open,
            mergeable: Some(true),
            mergeable_state: Some("clean".to_string()),
            behind_by: None,
            files_changed: vec![],
            repository_full_name: "acme/widgets".to_string(),
            html_url: "https://github.com/acme/widgets/pull/1".to_string(),
        }
    }

    #[test]
    fn test_known_bot_accounts() {
        assert!(is_automation_author("dependabot[bot]"));
        assert!(is_automation_author("pre-commit-ci[bot]"));
        assert!(is_automation_author("allcontributors[bot]"));
    }

    #[test]
    fn test_author_match_is_exact() {
        assert!(!is_automation_author("dependabot"));
        assert!(!is_automation_author("Dependabot[bot]"));
        assert!(!is_automation_author("octocat"));
    }

    #[test]
    fn test_pr_detected_from_author() {
        assert!(is_automation_pr(&pr("Bump serde", None, "dependabot[bot]")));
    }

    #[test]
    fn test_pr_detected_from_title_case_insensitive() {
        assert!(is_automation_pr(&pr(
            "[Pre-Commit] autoupdate hooks",
            None,
            "octocat"
        )));
    }

    #[test]
    fn test_pr_detected_from_body() {
        assert!(is_automation_pr(&pr(
            "Update lockfile",
            Some("This PR was Automated by a workflow"),
            "octocat"
        )));
    }

    #[test]
    fn test_human_pr_not_detected() {
        assert!(!is_automation_pr(&pr(
            "Fix login redirect",
            Some("Closes #12"),
            "octocat"
        )));
    }
}
