//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips ANSI codes when stdout is
//! not a terminal, so styling here is unconditional.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Cross used for failed steps
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize {
    /// Bold, for headings and key values
    fn emphasis(&self) -> String;
    /// Dimmed, for secondary information
    fn muted(&self) -> String;
    /// Cyan, for names and identifiers
    fn accent(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Yellow
    fn warn(&self) -> String;
    /// Red
    fn error(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner style for long-running scans
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Render `text` as a clickable link when the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    if url.is_empty() || !supports_hyperlinks::on(Stream::Stdout) {
        return text.to_string();
    }
    Link::new(text, url).to_string()
}
