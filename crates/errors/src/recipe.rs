//! Recipe construction error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RecipeError {
    #[error("invalid requirement `{requirement}`: {message}")]
    InvalidRequirement {
        requirement: String,
        message: String,
    },

    #[error("failed to serialize recipe as {format}: {message}")]
    SerializeFailed { format: String, message: String },
}

impl UserFacingError for RecipeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRequirement { .. } => {
                Some("Dependencies must be valid PEP 508 requirement strings.")
            }
            Self::SerializeFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidRequirement { .. } => "recipe.invalid_requirement",
            Self::SerializeFailed { .. } => "recipe.serialize_failed",
        };
        Some(code)
    }
}
