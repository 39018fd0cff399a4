//! Similarity scoring between two automation PRs

use super::normalize::{normalize_filename, normalize_title};
use super::sequence::similarity_ratio;
use crate::automation::is_automation_pr;
use crate::types::{ComparisonResult, FileChange, PullRequestInfo};
use std::collections::HashSet;

/// Threshold used when none is configured
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Title scores above this add a reason
const TITLE_REASON_CUTOFF: f64 = 0.7;

/// File scores above this add a reason
const FILES_REASON_CUTOFF: f64 = 0.6;

/// Sequence similarity of the two normalized titles.
pub fn title_similarity(source: &str, target: &str) -> f64 {
    similarity_ratio(&normalize_title(source), &normalize_title(target))
}

/// Jaccard similarity of the normalized filename sets.
///
/// An empty side scores `0.0`: missing diff data is never evidence of
/// similarity, not even when both sides are empty.
#[allow(clippy::cast_precision_loss)]
pub fn files_similarity(source: &[FileChange], target: &[FileChange]) -> f64 {
    if source.is_empty() || target.is_empty() {
        return 0.0;
    }

    let source_names: HashSet<String> = source
        .iter()
        .map(|f| normalize_filename(&f.filename))
        .collect();
    let target_names: HashSet<String> = target
        .iter()
        .map(|f| normalize_filename(&f.filename))
        .collect();

    let intersection = source_names.intersection(&target_names).count();
    let union = source_names.union(&target_names).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// `1.0` when both PRs share an author, `0.0` otherwise.
pub fn author_similarity(source: &str, target: &str) -> f64 {
    if source == target { 1.0 } else { 0.0 }
}

/// Decide whether `target` carries the same kind of change as `source`.
///
/// The confidence score is the plain mean of the title, files and author
/// scores; the PRs are similar when it reaches `threshold`. PRs that do not
/// look tool-generated are never similar and score `0.0`.
pub fn compare_pull_requests(
    source: &PullRequestInfo,
    target: &PullRequestInfo,
    threshold: f64,
) -> ComparisonResult {
    if !is_automation_pr(source) || !is_automation_pr(target) {
        return ComparisonResult {
            is_similar: false,
            confidence_score: 0.0,
            reasons: vec!["One or both PRs are not from automation tools".to_string()],
        };
    }

    let mut reasons = Vec::new();

    let title_score = title_similarity(&source.title, &target.title);
    if title_score > TITLE_REASON_CUTOFF {
        reasons.push(format!("Similar titles (score: {title_score:.2})"));
    }

    let files_score = files_similarity(&source.files_changed, &target.files_changed);
    if files_score > FILES_REASON_CUTOFF {
        reasons.push(format!("Similar file changes (score: {files_score:.2})"));
    }

    let author_score = author_similarity(&source.author, &target.author);
    if author_score > 0.0 {
        reasons.push("Same automation author".to_string());
    }

    let confidence_score = (title_score + files_score + author_score) / 3.0;

    ComparisonResult {
        is_similar: confidence_score >= threshold,
        confidence_score,
        reasons,
    }
}
