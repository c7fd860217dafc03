//! Project metadata error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum MetadataError {
    #[error("project file not found: {path}")]
    ProjectFileNotFound { path: String },

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("version of {name} is dynamic; a static [project].version is required")]
    DynamicVersion { name: String },
}

impl UserFacingError for MetadataError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ProjectFileNotFound { .. } => {
                Some("Pass a project directory that contains pyproject.toml.")
            }
            Self::MissingField { .. } => Some("Declare the field in the [project] table."),
            Self::DynamicVersion { .. } => {
                Some("Set a literal version in [project] before building a conda package.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ProjectFileNotFound { .. } => "metadata.project_file_not_found",
            Self::ReadFailed { .. } => "metadata.read_failed",
            Self::Parse { .. } => "metadata.parse",
            Self::MissingField { .. } => "metadata.missing_field",
            Self::DynamicVersion { .. } => "metadata.dynamic_version",
        };
        Some(code)
    }
}
