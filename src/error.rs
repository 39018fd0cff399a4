//! Error types for dependamerge

use thiserror::Error;

/// Errors raised by dependamerge
#[derive(Debug, Error)]
pub enum Error {
    /// Input does not look like `.../owner/repo/pull/N`
    #[error("invalid pull request reference: {0}")]
    InvalidReference(String),

    /// No token could be found for the host
    #[error("GitHub token not found: {0}")]
    CredentialMissing(String),

    /// Transport or API failure reported by the host
    #[error("host error: {0}")]
    Host(String),

    /// The seed PR was not opened by a recognized automation account
    #[error("source PR #{number} in {repository} is not from a recognized automation tool (author: {author})")]
    NotAutomationAuthor {
        /// `owner/repo` of the source PR
        repository: String,
        /// PR number
        number: u64,
        /// Login of the PR author
        author: String,
    },

    /// Similarity threshold outside `[0, 1]`
    #[error("invalid similarity threshold {0}: must be between 0.0 and 1.0")]
    InvalidThreshold(f64),

    /// Configuration file could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::Host(e.to_string())
    }
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;
