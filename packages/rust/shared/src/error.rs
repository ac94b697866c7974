//! Error types for firmscope.
//!
//! Library crates use [`FirmscopeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all firmscope operations.
#[derive(Debug, thiserror::Error)]
pub enum FirmscopeError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed input, rejected before any network call.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The registry has no record for this registry number.
    #[error("company with registry number {registry_number} was not found")]
    NotFound { registry_number: String },

    /// Non-2xx status, timeout, or transport failure from an external source.
    #[error("upstream error from {source_name}: {message}")]
    Upstream {
        source_name: &'static str,
        message: String,
    },

    /// Markup or JSON could not be interpreted.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FirmscopeError>;

impl FirmscopeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create an upstream error, tagged with the source it came from.
    pub fn upstream(source_name: &'static str, msg: impl Into<String>) -> Self {
        Self::Upstream {
            source_name,
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
