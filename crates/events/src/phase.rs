//! Per-build state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single conda build
///
/// Builds move strictly forward through the phases. `Failed` can be entered
/// from any phase that has not already finished; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    Idle,
    MetadataCollected,
    RequirementsNormalized,
    RecipeAssembled,
    RecipeWritten,
    ExternalBuildRunning,
    Completed,
    Failed,
}

impl BuildPhase {
    /// The phase that follows this one on the success path
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::MetadataCollected),
            Self::MetadataCollected => Some(Self::RequirementsNormalized),
            Self::RequirementsNormalized => Some(Self::RecipeAssembled),
            Self::RecipeAssembled => Some(Self::RecipeWritten),
            Self::RecipeWritten => Some(Self::ExternalBuildRunning),
            Self::ExternalBuildRunning => Some(Self::Completed),
            Self::Completed | Self::Failed => None,
        }
    }

    /// Whether the build has finished, successfully or not
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether moving from `self` to `to` is a legal transition
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::MetadataCollected => "metadata_collected",
            Self::RequirementsNormalized => "requirements_normalized",
            Self::RecipeAssembled => "recipe_assembled",
            Self::RecipeWritten => "recipe_written",
            Self::ExternalBuildRunning => "external_build_running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
