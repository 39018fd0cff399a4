//! Shared setup for the merge command
//!
//! Resolves configuration, credentials and the host service from the PR
//! reference and command-line overrides.

use dependamerge::auth::{AuthSource, get_github_auth};
use dependamerge::config::{load_config, validate_threshold};
use dependamerge::error::Result;
use dependamerge::merge::MergeOptions;
use dependamerge::platform::{GitHubService, parse_pr_reference};
use dependamerge::types::{MergeMethod, PrReference};
use std::path::PathBuf;
use tracing::debug;

/// Command-line values that override the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--threshold`
    pub threshold: Option<f64>,
    /// `--merge-method`
    pub merge_method: Option<MergeMethod>,
    /// `--token`
    pub token: Option<String>,
    /// `--fix`
    pub fix: bool,
    /// `--config`
    pub config: Option<PathBuf>,
}

/// Everything the merge command needs before talking to the host
pub struct CommandContext {
    /// Parsed source PR reference
    pub reference: PrReference,
    /// Effective similarity threshold
    pub threshold: f64,
    /// Effective merge options
    pub options: MergeOptions,
    /// Host service
    pub host: GitHubService,
    /// Where the token came from
    pub auth_source: AuthSource,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// Fails before any network call on a malformed reference, a bad
    /// threshold or missing credentials.
    pub async fn new(pr_url: &str, overrides: Overrides) -> Result<Self> {
        let reference = parse_pr_reference(pr_url)?;
        let config = load_config(overrides.config.as_deref())?;

        let threshold = validate_threshold(overrides.threshold.unwrap_or(config.threshold))?;
        let options = MergeOptions {
            merge_method: overrides.merge_method.unwrap_or(config.merge_method),
            fix: overrides.fix || config.fix,
        };

        // A host in the URL wins over the configured enterprise host
        let host_name = reference.host.clone().or_else(|| config.github.host.clone());

        let auth = get_github_auth(
            overrides.token.as_deref(),
            config.github.token.as_deref(),
            host_name.as_deref(),
        )
        .await?;
        debug!(source = %auth.source, host = ?host_name, "resolved GitHub token");

        let host = GitHubService::new(&auth.token, host_name.as_deref())?
            .with_approval_message(config.approval_message);

        Ok(Self {
            reference,
            threshold,
            options,
            host,
            auth_source: auth.source,
        })
    }
}
