//! Title and filename normalization

use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v?\d+\.\d+\.\d+(?:\.\d+)?(?:-[a-zA-Z0-9]+)?").expect("valid version regex")
});

// Filenames only drop the numeric part; suffixes like `-alpha` are kept.
static FILENAME_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v?\d+\.\d+\.\d+(?:\.\d+)?").expect("valid filename version regex")
});

static COMMIT_HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-f0-9]{7,40}\b").expect("valid commit hash regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid date regex"));

/// Normalize a PR title for comparison.
///
/// Removes, in order: version strings (`1.2.3`, `v1.2.3.4`, `1.2.3-rc1`),
/// lowercase hex commit hashes of 7 to 40 characters, and ISO dates. Then
/// collapses whitespace and lower-cases the result.
///
/// Versions are removed first. A version token always contains dots and a
/// hash token never does, so the two patterns never claim the same text.
pub fn normalize_title(title: &str) -> String {
    let without_versions = VERSION_RE.replace_all(title, "");
    let without_hashes = COMMIT_HASH_RE.replace_all(&without_versions, "");
    let without_dates = DATE_RE.replace_all(&without_hashes, "");

    without_dates
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a changed file path: strip version numbers and lower-case.
pub fn normalize_filename(filename: &str) -> String {
    FILENAME_VERSION_RE
        .replace_all(filename, "")
        .to_lowercase()
}
