//! Merge planning - pure functions for creating merge plans
//!
//! The plan is the ordered list of PRs to push through the state machine:
//! every similar PR in discovery order, then the source PR.

use super::status::{pr_status_details, PrStatus};
use crate::scan::SimilarPr;
use crate::types::{ComparisonResult, MergeMethod, PullRequestInfo};

/// Options for merge execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Merge method passed to the host
    pub merge_method: MergeMethod,
    /// Update out-of-date branches before merging
    pub fix: bool,
}

/// A PR selected for approve/merge
#[derive(Debug, Clone)]
pub struct MergeCandidate {
    /// PR data as of planning
    pub pr: PullRequestInfo,
    /// How the PR matched the source (`None` for the source PR itself)
    pub comparison: Option<ComparisonResult>,
    /// Status at planning time
    pub status: PrStatus,
}

impl MergeCandidate {
    /// Whether this is the seed PR
    pub const fn is_source(&self) -> bool {
        self.comparison.is_none()
    }
}

impl std::fmt::Display for MergeCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PR #{} in {}: {}",
            self.pr.number, self.pr.repository_full_name, self.pr.title
        )?;
        match &self.comparison {
            Some(comparison) => write!(f, " (confidence {:.2})", comparison.confidence_score)?,
            None => write!(f, " (source)")?,
        }
        write!(f, " [{}]", self.status)
    }
}

/// Merge plan - the functional core output
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Candidates in processing order; the source PR is always last
    pub candidates: Vec<MergeCandidate>,
}

impl MergePlan {
    /// Number of similar PRs (excluding the source PR)
    pub fn similar_count(&self) -> usize {
        self.candidates.iter().filter(|c| !c.is_source()).count()
    }

    /// Number of PRs that will be processed
    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates whose status currently allows a merge
    pub fn ready_count(&self) -> usize {
        self.candidates
            .iter()
            .filter(|c| c.status == PrStatus::Ready && c.pr.mergeable == Some(true))
            .count()
    }
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// Similar PRs keep their discovery order; the source PR is appended even
/// when nothing similar was found.
pub fn create_merge_plan(source: &PullRequestInfo, similar: &[SimilarPr]) -> MergePlan {
    let mut candidates: Vec<MergeCandidate> = similar
        .iter()
        .map(|s| MergeCandidate {
            status: pr_status_details(&s.pr),
            pr: s.pr.clone(),
            comparison: Some(s.comparison.clone()),
        })
        .collect();

    candidates.push(MergeCandidate {
        status: pr_status_details(source),
        pr: source.clone(),
        comparison: None,
    });

    MergePlan { candidates }
}
