//! Merge execution - effectful operations
//!
//! Drives each planned PR through the state machine in `machine`, one PR
//! at a time and in plan order. Merges are not idempotent, so nothing here
//! runs concurrently.

use super::machine::{advance, Effect, EffectOutcome, MergeState, StepMessage, Tone};
use super::plan::{MergeOptions, MergePlan};
use crate::error::Result;
use crate::platform::SourceControlHost;
use crate::progress::ProgressCallback;
use crate::types::PullRequestInfo;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Final state of one processed PR
#[derive(Debug, Clone)]
pub struct PrOutcome {
    /// `owner/repo`
    pub repository: String,
    /// PR number
    pub number: u64,
    /// Whether this was the source PR
    pub is_source: bool,
    /// Terminal state reached
    pub state: MergeState,
}

impl PrOutcome {
    /// Whether the PR was merged
    pub const fn is_merged(&self) -> bool {
        matches!(self.state, MergeState::Merged)
    }
}

/// Result of merge execution
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Processed PRs in plan order
    pub outcomes: Vec<PrOutcome>,
    /// Number of PRs in the plan (similar PRs + source PR)
    pub total: usize,
    /// The batch was aborted before every PR was processed
    pub aborted: bool,
}

impl MergeReport {
    /// Number of merged PRs
    pub fn merged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_merged()).count()
    }

    /// Check if every planned PR was merged
    pub fn is_success(&self) -> bool {
        !self.aborted && self.merged_count() == self.total
    }

    /// PRs that ended in `Failed`
    pub fn failed(&self) -> impl Iterator<Item = &PrOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, MergeState::Failed { .. }))
    }

    /// PRs that ended in `Skipped`
    pub fn skipped(&self) -> impl Iterator<Item = &PrOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.state, MergeState::Skipped { .. }))
    }
}

fn outcome_of(result: Result<bool>) -> EffectOutcome {
    match result {
        Ok(true) => EffectOutcome::Done,
        Ok(false) => EffectOutcome::Declined,
        Err(e) => EffectOutcome::Errored(e.to_string()),
    }
}

async fn report(progress: &dyn ProgressCallback, message: &StepMessage) {
    match message.tone {
        Tone::Info => progress.on_message(&message.text).await,
        Tone::Success => progress.on_success(&message.text).await,
        Tone::Warning => progress.on_warning(&message.text).await,
        Tone::Error => progress.on_error(&message.text).await,
    }
}

/// Run a single PR through the state machine until it stops (EFFECTFUL)
///
/// Host failures end the PR in `Failed`; they never escape as errors.
pub async fn process_pull_request(
    mut pr: PullRequestInfo,
    host: &dyn SourceControlHost,
    options: &MergeOptions,
    progress: &dyn ProgressCallback,
) -> MergeState {
    let Some((owner, repo)) = pr
        .owner_and_repo()
        .map(|(o, r)| (o.to_string(), r.to_string()))
    else {
        let reason = format!("invalid repository name '{}'", pr.repository_full_name);
        progress
            .on_error(&format!("✗ Cannot process PR {}: {reason}", pr.number))
            .await;
        return MergeState::Failed { reason };
    };
    let number = pr.number;
    let mut state = MergeState::Discovered;
    let mut outcome: Option<EffectOutcome> = None;

    loop {
        let transition = advance(&state, &pr, options, outcome.as_ref());
        if let Some(ref message) = transition.message {
            report(progress, message).await;
        }
        debug!(repo = %pr.repository_full_name, pr_number = number, from = ?state, to = ?transition.next, "merge transition");
        state = transition.next;

        let Some(effect) = transition.effect else {
            if state.is_terminal() {
                break;
            }
            outcome = None;
            continue;
        };

        outcome = Some(match effect {
            Effect::UpdateBranch => outcome_of(host.update_branch(&owner, &repo, number).await),
            Effect::Refetch => match host.fetch_pull_request(&owner, &repo, number).await {
                Ok(fresh) => {
                    pr = fresh;
                    EffectOutcome::Done
                }
                Err(e) => {
                    warn!(repo = %pr.repository_full_name, pr_number = number, error = %e, "refetch after branch update failed, using stale data");
                    EffectOutcome::Errored(e.to_string())
                }
            },
            Effect::Approve => outcome_of(host.approve(&owner, &repo, number).await),
            Effect::Merge(method) => outcome_of(host.merge(&owner, &repo, number, method).await),
        });
    }

    state
}

/// Execute the merge plan (EFFECTFUL)
///
/// Processes every candidate in order, each independently: a failed or
/// skipped PR does not stop the batch. Setting `abort` stops the batch
/// between PRs; the PR in flight always runs to completion.
pub async fn execute_merge(
    plan: &MergePlan,
    host: &dyn SourceControlHost,
    options: &MergeOptions,
    progress: &dyn ProgressCallback,
    abort: Option<&AtomicBool>,
) -> MergeReport {
    let mut report = MergeReport {
        outcomes: Vec::with_capacity(plan.total()),
        total: plan.total(),
        aborted: false,
    };

    for candidate in &plan.candidates {
        if abort.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            warn!(
                remaining = plan.total() - report.outcomes.len(),
                "merge batch aborted"
            );
            report.aborted = true;
            break;
        }

        if candidate.is_source() {
            progress
                .on_message(&format!("Merging source PR {}", candidate.pr.number))
                .await;
        }

        let state =
            process_pull_request(candidate.pr.clone(), host, options, progress).await;
        report.outcomes.push(PrOutcome {
            repository: candidate.pr.repository_full_name.clone(),
            number: candidate.pr.number,
            is_source: candidate.is_source(),
            state,
        });
    }

    info!(
        merged = report.merged_count(),
        total = report.total,
        aborted = report.aborted,
        "merge batch finished"
    );
    report
}

/// Execute the plan unless `dry_run` is set (EFFECTFUL)
///
/// A dry run makes no host calls at all and returns `None`.
pub async fn run_merge_plan(
    plan: &MergePlan,
    host: &dyn SourceControlHost,
    options: &MergeOptions,
    dry_run: bool,
    progress: &dyn ProgressCallback,
    abort: Option<&AtomicBool>,
) -> Option<MergeReport> {
    if dry_run {
        info!(candidates = plan.total(), "dry run, leaving PRs untouched");
        progress
            .on_warning("Dry run mode - no changes will be made")
            .await;
        return None;
    }

    Some(execute_merge(plan, host, options, progress, abort).await)
}
