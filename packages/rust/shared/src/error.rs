//! Error types for Reachout.
//!
//! Library crates use [`ReachoutError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Reachout operations.
#[derive(Debug, thiserror::Error)]
pub enum ReachoutError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// WebDriver session or page interaction error.
    #[error("browser error: {0}")]
    Browser(String),

    /// CSV reading/writing error (malformed file, missing columns).
    #[error("csv error: {0}")]
    Csv(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Interactive prompt error (closed terminal, interrupted input).
    #[error("prompt error: {0}")]
    Prompt(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReachoutError>;

impl ReachoutError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
