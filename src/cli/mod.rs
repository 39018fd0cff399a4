//! CLI commands and terminal output

pub mod context;
pub mod merge;
pub mod style;

use anstream::println;
use async_trait::async_trait;
use dependamerge::progress::ProgressCallback;
use indicatif::ProgressBar;
use style::Stylize;

/// Progress callback that prints styled lines
///
/// While a spinner is attached, lines are printed above it and repository
/// updates change its message.
pub struct CliProgress {
    spinner: Option<ProgressBar>,
}

impl CliProgress {
    /// Plain line output
    pub const fn lines() -> Self {
        Self { spinner: None }
    }

    /// Output that keeps `spinner` at the bottom
    pub const fn with_spinner(spinner: ProgressBar) -> Self {
        Self {
            spinner: Some(spinner),
        }
    }

    fn print(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        self.print(&message.accent());
    }

    async fn on_warning(&self, message: &str) {
        self.print(&message.warn());
    }

    async fn on_success(&self, message: &str) {
        self.print(&message.success());
    }

    async fn on_error(&self, message: &str) {
        self.print(&message.error());
    }

    async fn on_repository(&self, index: usize, total: usize, full_name: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!(
                "Analyzing PRs ({}/{total}) {}",
                index + 1,
                full_name.muted()
            ));
        }
    }
}
