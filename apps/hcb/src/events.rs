//! Structured logging of build events

use hcb_events::{AppEvent, BuildEvent, GeneralEvent};
use tracing::{debug, error, info, warn};

/// Log an event through `tracing` with structured fields
pub fn log_event(event: &AppEvent) {
    match event {
        AppEvent::General(GeneralEvent::Warning { message }) => warn!("{message}"),
        AppEvent::General(GeneralEvent::DebugLog { message }) => debug!("{message}"),
        AppEvent::Build(build) => log_build_event(build),
    }
}

fn log_build_event(event: &BuildEvent) {
    match event {
        BuildEvent::PhaseChanged { package, from, to } => {
            debug!(package = %package, from = %from, to = %to, "Build phase changed");
        }
        BuildEvent::RequirementsNormalized {
            package,
            host,
            run,
            run_constrained,
        } => {
            info!(
                package = %package,
                host = host,
                run = run,
                run_constrained = run_constrained,
                "Requirements normalized"
            );
        }
        BuildEvent::RecipeWritten { package, path } => {
            debug!(package = %package, path = %path.display(), "Recipe written");
        }
        BuildEvent::CommandStarted { package, command } => {
            info!(package = %package, command = %command, "Running conda build");
        }
        BuildEvent::Completed { package, artifact } => {
            info!(package = %package, artifact = %artifact.display(), "Build completed");
        }
        BuildEvent::Failed {
            package,
            phase,
            failure,
        } => {
            error!(
                package = %package,
                phase = %phase,
                code = ?failure.code,
                "Build failed: {}",
                failure.message
            );
        }
        BuildEvent::Cleaned { path } => {
            info!(path = %path.display(), "Removed build output");
        }
    }
}
