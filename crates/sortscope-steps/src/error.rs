//! Error types for sortscope-steps.

use thiserror::Error;

/// Result type for sortscope-steps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when wiring a generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The identifier does not name any known algorithm.
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
}
