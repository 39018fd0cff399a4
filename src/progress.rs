//! User-visible progress reporting
//!
//! The scanner and the merge driver report what they are doing through
//! [`ProgressCallback`]. The CLI renders these as styled lines; tests use
//! [`NoopProgress`] or a recording implementation.

use async_trait::async_trait;

/// Receives progress messages from long-running operations
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A regular status line
    async fn on_message(&self, message: &str);

    /// Something went wrong but the run continues
    async fn on_warning(&self, message: &str);

    /// A step completed
    async fn on_success(&self, message: &str) {
        self.on_message(message).await;
    }

    /// A PR failed
    async fn on_error(&self, message: &str) {
        self.on_warning(message).await;
    }

    /// A repository is about to be scanned (`index` is zero-based)
    async fn on_repository(&self, _index: usize, _total: usize, _full_name: &str) {}
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}

    async fn on_warning(&self, _message: &str) {}
}
