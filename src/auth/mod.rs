//! Authentication for GitHub
//!
//! Supports explicit tokens, environment variables, the config file and
//! the GitHub CLI (`gh`).

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, resolve_github_token};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed with `--token`
    Flag,
    /// Token from environment variable
    EnvVar,
    /// Token from the config file
    Config,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--token"),
            Self::EnvVar => write!(f, "environment"),
            Self::Config => write!(f, "config file"),
            Self::Cli => write!(f, "gh auth token"),
        }
    }
}
