//! Human-readable merge status of a PR

use crate::types::{PrState, PullRequestInfo};
use std::fmt;

/// Why a PR can or cannot be merged right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrStatus {
    /// PR is no longer open
    Closed(PrState),
    /// PR is a draft
    Draft,
    /// Head conflicts with base
    MergeConflicts,
    /// Head is behind base and must be updated
    RebaseRequired,
    /// Required checks or reviews are missing
    BlockedByChecks,
    /// Not mergeable for another host-reported reason
    NotMergeable(Option<String>),
    /// Nothing is known to block the merge
    Ready,
}

impl PrStatus {
    /// Whether updating the branch could make the PR mergeable
    pub const fn is_rebase_required(&self) -> bool {
        matches!(self, Self::RebaseRequired)
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(state) => write!(f, "Closed ({state})"),
            Self::Draft => write!(f, "Draft PR"),
            Self::MergeConflicts => write!(f, "Merge conflicts"),
            Self::RebaseRequired => write!(f, "Rebase required"),
            Self::BlockedByChecks => write!(f, "Blocked by checks"),
            Self::NotMergeable(state) => {
                write!(f, "Not mergeable ({})", state.as_deref().unwrap_or("unknown"))
            }
            Self::Ready => write!(f, "Ready to merge"),
        }
    }
}

/// Classify a PR's merge status.
///
/// Checks run in a fixed order: closed, draft, explicit `mergeable == false`
/// (refined by `mergeable_state`), then a stale branch that the host still
/// reports as mergeable or has not computed yet.
pub fn pr_status_details(pr: &PullRequestInfo) -> PrStatus {
    if pr.state != PrState::Open {
        return PrStatus::Closed(pr.state);
    }

    let mergeable_state = pr.mergeable_state.as_deref();

    if mergeable_state == Some("draft") {
        return PrStatus::Draft;
    }

    if pr.mergeable == Some(false) {
        return match mergeable_state {
            Some("dirty") => PrStatus::MergeConflicts,
            Some("behind") => PrStatus::RebaseRequired,
            Some("blocked") => PrStatus::BlockedByChecks,
            other => PrStatus::NotMergeable(other.map(str::to_string)),
        };
    }

    if mergeable_state == Some("behind") {
        return PrStatus::RebaseRequired;
    }

    PrStatus::Ready
}
