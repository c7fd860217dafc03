//! Conda build error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("failed to write recipe {path}: {message}")]
    RecipeWriteFailed { path: String, message: String },

    #[error("failed to create build directory: {message}")]
    BuildDirFailed { message: String },

    #[error("failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{command} exited with {}", exit_status_text(.exit_code.as_ref().copied()))]
    CondaBuildFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("failed to clean {path}: {message}")]
    CleanFailed { path: String, message: String },
}

fn exit_status_text(exit_code: Option<i32>) -> String {
    exit_code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |code| format!("status {code}"),
    )
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SpawnFailed { .. } => {
                Some("Make sure conda-build is installed and `conda` is on PATH, or set HCB_CONDA_EXE.")
            }
            Self::CondaBuildFailed { .. } => {
                Some("Inspect the conda-build output above; the recipe requirements may not be satisfiable from the configured channels.")
            }
            Self::RecipeWriteFailed { .. } | Self::BuildDirFailed { .. } => {
                Some("Check that the temporary directory is writable.")
            }
            Self::CleanFailed { .. } => Some("Check permissions on the output directory."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::RecipeWriteFailed { .. } => "build.recipe_write_failed",
            Self::BuildDirFailed { .. } => "build.build_dir_failed",
            Self::SpawnFailed { .. } => "build.spawn_failed",
            Self::CondaBuildFailed { .. } => "build.conda_build_failed",
            Self::CleanFailed { .. } => "build.clean_failed",
        };
        Some(code)
    }
}
