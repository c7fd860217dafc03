use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;
use crate::BuildPhase;

/// Build-specific events for the event system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildEvent {
    /// The build moved to a new phase
    PhaseChanged {
        package: String,
        from: BuildPhase,
        to: BuildPhase,
    },

    /// Requirement lists resolved for the recipe
    RequirementsNormalized {
        package: String,
        host: usize,
        run: usize,
        run_constrained: usize,
    },

    /// Recipe file written to the scoped build directory
    RecipeWritten { package: String, path: PathBuf },

    /// External packaging command about to run
    CommandStarted { package: String, command: String },

    /// Build finished and the artifact path is known
    Completed { package: String, artifact: PathBuf },

    /// Build aborted
    Failed {
        package: String,
        phase: BuildPhase,
        failure: FailureContext,
    },

    /// Output directory removed
    Cleaned { path: PathBuf },
}
