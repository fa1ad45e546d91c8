//! Error types for the visualizer.

use thiserror::Error;

/// Result type for visualizer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or serving the visualizer.
///
/// Calling an entry point in a state where it means nothing (pausing while
/// idle, starting twice) is not an error; those calls return `false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The controls asked for an algorithm that does not exist.
    #[error(transparent)]
    Algorithm(#[from] sortscope_steps::Error),

    /// A configuration value could not be parsed.
    #[error("invalid configuration for {key}: {reason}")]
    Config {
        key: &'static str,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
