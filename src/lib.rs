//! dependamerge - find and merge similar automation PRs across a GitHub organization
//!
//! Given one PR opened by a bot (Dependabot, Renovate, pre-commit.ci, ...),
//! dependamerge scans the rest of the organization for open PRs that make
//! the same change, then approves and merges them together with the
//! source PR.
//!
//! # Architecture
//!
//! - [`compare`] scores a pair of PRs (title, file set, author)
//! - [`scan`] walks the organization and collects similar PRs
//! - [`merge`] plans and drives each PR through approve and merge
//! - [`platform`] is the host boundary ([`platform::SourceControlHost`])
//!   with a GitHub implementation over octocrab

pub mod auth;
pub mod automation;
pub mod compare;
pub mod config;
pub mod error;
pub mod merge;
pub mod platform;
pub mod progress;
pub mod scan;
pub mod types;

pub use error::{Error, Result};
