//! Merge engine for similar automation PRs
//!
//! Three-phase pattern:
//! 1. Plan - order the candidates (pure, testable)
//! 2. Decide - per-PR state machine transitions (pure, testable)
//! 3. Execute - drive the machine against the host (effectful)

mod execute;
mod machine;
mod plan;
mod status;

pub use execute::{execute_merge, process_pull_request, run_merge_plan, MergeReport, PrOutcome};
pub use machine::{advance, Effect, EffectOutcome, MergeState, StepMessage, Tone, Transition};
pub use plan::{create_merge_plan, MergeCandidate, MergeOptions, MergePlan};
pub use status::{pr_status_details, PrStatus};
