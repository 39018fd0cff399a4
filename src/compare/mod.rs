//! PR similarity comparison
//!
//! Pure functions, no I/O:
//! - `normalize` strips volatile tokens (versions, hashes, dates)
//! - `sequence` computes a Ratcliff/Obershelp matching ratio
//! - `score` combines title, file-set and author scores into a verdict

mod normalize;
mod score;
mod sequence;

pub use normalize::{normalize_filename, normalize_title};
pub use score::{
    author_similarity, compare_pull_requests, files_similarity, title_similarity,
    DEFAULT_THRESHOLD,
};
pub use sequence::similarity_ratio;
