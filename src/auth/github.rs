//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order.
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick a token from the non-interactive sources (PURE)
///
/// Order: flag, `GITHUB_TOKEN`, `GH_TOKEN`, config file. `env` looks up an
/// environment variable; empty values are ignored.
pub fn resolve_github_token(
    flag: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    config_token: Option<&str>,
) -> Option<GitHubAuthConfig> {
    if let Some(token) = non_empty(flag.map(str::to_string)) {
        return Some(GitHubAuthConfig {
            token,
            source: AuthSource::Flag,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Some(token) = non_empty(env(var)) {
            debug!(var, "using GitHub token from environment");
            return Some(GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
            });
        }
    }

    non_empty(config_token.map(str::to_string)).map(|token| GitHubAuthConfig {
        token,
        source: AuthSource::Config,
    })
}

/// Ask the GitHub CLI for its token, if it is installed and logged in.
async fn gh_cli_token(host: Option<&str>) -> Option<String> {
    let mut command = Command::new("gh");
    command.args(["auth", "token"]);
    if let Some(host) = host {
        command.args(["--hostname", host]);
    }

    match command.output().await {
        Ok(output) if output.status.success() => {
            non_empty(String::from_utf8(output.stdout).ok())
        }
        Ok(output) => {
            debug!(status = %output.status, "gh auth token failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "gh CLI not available");
            None
        }
    }
}

/// Get GitHub authentication
///
/// Tries the flag, environment, config file and finally `gh auth token`.
pub async fn get_github_auth(
    flag: Option<&str>,
    config_token: Option<&str>,
    host: Option<&str>,
) -> Result<GitHubAuthConfig> {
    if let Some(auth) = resolve_github_token(flag, |var| std::env::var(var).ok(), config_token) {
        return Ok(auth);
    }

    if let Some(token) = gh_cli_token(host).await {
        debug!("using GitHub token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::CredentialMissing(
        "pass --token, set GITHUB_TOKEN or GH_TOKEN, or run 'gh auth login'".to_string(),
    ))
}
