//! Per-PR merge state machine - pure transitions
//!
//! ```text
//! Discovered -> Evaluating -> Approving -> Merging -> Merged
//!                   |  ^          |           |
//!                   |  |          +-----------+--> Failed
//!                   |  Refetching
//!                   |  ^
//!                   +-> Fixing --> Failed
//!                   |
//!                   +-> Skipped
//! ```
//!
//! [`advance`] performs no I/O. It returns the next state, the host call
//! to make (if any) and the message to show. The driver in `execute` makes
//! the call and feeds its [`EffectOutcome`] into the next `advance`.

use super::plan::MergeOptions;
use super::status::pr_status_details;
use crate::types::{MergeMethod, PullRequestInfo};

/// Where a PR is in the approve/merge workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeState {
    /// Selected for merging, nothing checked yet
    Discovered,
    /// Deciding between approve, fix and skip
    Evaluating {
        /// A branch update already ran for this PR
        fix_attempted: bool,
    },
    /// Waiting for the branch update
    Fixing,
    /// Waiting for fresh PR data after a branch update
    Refetching,
    /// Waiting for the approving review
    Approving,
    /// Waiting for the merge call
    Merging,
    /// Merged (terminal)
    Merged,
    /// Left alone because it is not mergeable (terminal, not an error)
    Skipped {
        /// Status detail, e.g. "Merge conflicts"
        reason: String,
    },
    /// A host call failed or was refused (terminal)
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl MergeState {
    /// Whether the machine has stopped
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Merged | Self::Skipped { .. } | Self::Failed { .. }
        )
    }
}

/// Host call requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Update the PR branch from its base
    UpdateBranch,
    /// Fetch the PR again
    Refetch,
    /// Submit an approving review
    Approve,
    /// Merge with the given method
    Merge(MergeMethod),
}

/// Result of the last [`Effect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The call succeeded
    Done,
    /// The host answered but refused (e.g. merge returned `false`)
    Declined,
    /// The call failed
    Errored(String),
}

/// How a message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Progress
    Info,
    /// Something completed
    Success,
    /// Tolerated problem
    Warning,
    /// The PR failed
    Error,
}

/// User-visible line produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepMessage {
    /// Presentation hint
    pub tone: Tone,
    /// Message text
    pub text: String,
}

impl StepMessage {
    fn new(tone: Tone, text: String) -> Self {
        Self { tone, text }
    }
}

/// Output of [`advance`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after this step
    pub next: MergeState,
    /// Host call to make before the next step
    pub effect: Option<Effect>,
    /// Line to show the user
    pub message: Option<StepMessage>,
}

impl Transition {
    const fn to(next: MergeState) -> Self {
        Self {
            next,
            effect: None,
            message: None,
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }

    fn say(mut self, tone: Tone, text: String) -> Self {
        self.message = Some(StepMessage::new(tone, text));
        self
    }
}

/// Compute the next step for `pr` (PURE - no I/O).
///
/// `outcome` is the result of the effect returned by the previous call; it
/// is ignored in states that did not request one.
pub fn advance(
    state: &MergeState,
    pr: &PullRequestInfo,
    options: &MergeOptions,
    outcome: Option<&EffectOutcome>,
) -> Transition {
    let number = pr.number;
    let repo = &pr.repository_full_name;

    match state {
        MergeState::Discovered => Transition::to(MergeState::Evaluating {
            fix_attempted: false,
        }),

        MergeState::Evaluating { fix_attempted } => {
            if pr.mergeable == Some(true) {
                return Transition::to(MergeState::Approving)
                    .with_effect(Effect::Approve)
                    .say(Tone::Info, format!("Approving PR {number} in {repo}"));
            }

            let status = pr_status_details(pr);
            if options.fix && !fix_attempted && status.is_rebase_required() {
                return Transition::to(MergeState::Fixing)
                    .with_effect(Effect::UpdateBranch)
                    .say(Tone::Info, format!("Fixing out-of-date PR {number} in {repo}"));
            }

            let reason = status.to_string();
            let text = format!("Skipping unmergeable PR {number} in {repo} ({reason})");
            Transition::to(MergeState::Skipped { reason }).say(Tone::Warning, text)
        }

        MergeState::Fixing => match outcome {
            Some(EffectOutcome::Done) => Transition::to(MergeState::Refetching)
                .with_effect(Effect::Refetch)
                .say(Tone::Success, format!("✓ Successfully updated PR {number}")),
            other => {
                let reason = failure_reason(other, "branch update was refused");
                let text = format!("✗ Failed to update PR {number}: {reason}");
                Transition::to(MergeState::Failed { reason }).say(Tone::Error, text)
            }
        },

        MergeState::Refetching => {
            let next = Transition::to(MergeState::Evaluating {
                fix_attempted: true,
            });
            match outcome {
                Some(EffectOutcome::Done) => next,
                other => {
                    let reason = failure_reason(other, "no data returned");
                    next.say(
                        Tone::Warning,
                        format!("Warning: Failed to refresh PR info: {reason}"),
                    )
                }
            }
        }

        MergeState::Approving => match outcome {
            Some(EffectOutcome::Done) => Transition::to(MergeState::Merging)
                .with_effect(Effect::Merge(options.merge_method))
                .say(Tone::Info, format!("Merging PR {number} in {repo}")),
            other => {
                let reason = failure_reason(other, "approval was refused");
                let text = format!("✗ Failed to approve PR {number}: {reason}");
                Transition::to(MergeState::Failed { reason }).say(Tone::Error, text)
            }
        },

        MergeState::Merging => match outcome {
            Some(EffectOutcome::Done) => Transition::to(MergeState::Merged)
                .say(Tone::Success, format!("✓ Successfully merged PR {number}")),
            other => {
                let reason = failure_reason(other, "merge was refused");
                let text = format!("✗ Failed to merge PR {number}: {reason}");
                Transition::to(MergeState::Failed { reason }).say(Tone::Error, text)
            }
        },

        MergeState::Merged | MergeState::Skipped { .. } | MergeState::Failed { .. } => {
            Transition::to(state.clone())
        }
    }
}

fn failure_reason(outcome: Option<&EffectOutcome>, declined: &str) -> String {
    match outcome {
        Some(EffectOutcome::Errored(e)) => e.clone(),
        Some(EffectOutcome::Declined) => declined.to_string(),
        Some(EffectOutcome::Done) | None => "no result from host".to_string(),
    }
}
