#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for hcb
//!
//! This crate provides error types organized by domain: project metadata,
//! target configuration, recipe construction and the external conda build.
//! Every failure is fatal for the build that raised it; nothing here is
//! recovered locally.

use std::borrow::Cow;

use thiserror::Error;

pub mod build;
pub mod config;
pub mod metadata;
pub mod recipe;

// Re-export all error types at the root
pub use build::BuildError;
pub use config::ConfigError;
pub use metadata::MetadataError;
pub use recipe::RecipeError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("recipe error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Exit status reported by the external build tool, if this error carries one
    #[must_use]
    pub fn external_exit_code(&self) -> Option<i32> {
        match self {
            Error::Build(BuildError::CondaBuildFailed { exit_code, .. }) => *exit_code,
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

/// Result type alias for hcb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Metadata(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Recipe(err) => err.user_message(),
            Error::Build(err) => err.user_message(),
            Error::Io { message, path, .. } => match path {
                Some(path) => Cow::Owned(format!("{}: {message}", path.display())),
                None => Cow::Borrowed(message.as_str()),
            },
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Metadata(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Recipe(err) => err.user_hint(),
            Error::Build(err) => err.user_hint(),
            Error::Io { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Metadata(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Recipe(err) => err.user_code(),
            Error::Build(err) => err.user_code(),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
