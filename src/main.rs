//! dependamerge - merge similar automation PRs across a GitHub organization

mod cli;

use anstream::eprintln;
use clap::Parser;
use cli::context::Overrides;
use cli::merge::{MergeCommandOptions, run_merge};
use cli::style::Stylize;
use dependamerge::types::MergeMethod;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Find open automation PRs similar to a source PR, then approve and merge
/// them together with the source PR.
#[derive(Parser, Debug)]
#[command(name = "dependamerge", version, about)]
struct Cli {
    /// URL of the source PR (e.g. https://github.com/org/repo/pull/42)
    pr_url: String,

    /// Show similar PRs without approving or merging anything
    #[arg(long)]
    dry_run: bool,

    /// Similarity threshold between 0.0 and 1.0 [default: 0.8]
    #[arg(long)]
    threshold: Option<f64>,

    /// Merge method: merge, squash or rebase [default: merge]
    #[arg(long)]
    merge_method: Option<MergeMethod>,

    /// GitHub token (or set GITHUB_TOKEN / GH_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Update out-of-date branches before merging
    #[arg(long)]
    fix: bool,

    /// Show the merge plan and ask before merging
    #[arg(long)]
    confirm: bool,

    /// Path to a config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// `--verbose` turns on debug output for this crate and keeps warnings
/// from everything else. Otherwise `RUST_LOG` applies, defaulting to `warn`.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("warn,dependamerge=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn init_tracing(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = MergeCommandOptions {
        dry_run: cli.dry_run,
        confirm: cli.confirm,
        overrides: Overrides {
            threshold: cli.threshold,
            merge_method: cli.merge_method,
            token: cli.token,
            fix: cli.fix,
            config: cli.config,
        },
    };

    match run_merge(&cli.pr_url, options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
