//! Conda build driver

use crate::command::CondaBuildCommand;
use crate::runner::{BuildRunner, ProcessRunner};
use hcb_config::constants::RECIPE_FILE_NAME;
use hcb_config::{RecipeFormat, TargetConfig};
use hcb_errors::{BuildError, Error};
use hcb_events::{AppEvent, BuildEvent, BuildPhase, EventEmitter, EventSender, FailureContext};
use hcb_metadata::ProjectMetadata;
use hcb_recipe::{Recipe, RecipeBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Subdirectory of the output folder that holds `noarch` packages
pub const NOARCH_SUBDIR: &str = "noarch";

/// Where conda-build places the artifact for `recipe` under `output_dir`
#[must_use]
pub fn artifact_path(output_dir: &Path, recipe: &Recipe) -> PathBuf {
    output_dir
        .join(NOARCH_SUBDIR)
        .join(recipe.artifact_file_name())
}

/// Builds conda packages from Python project metadata
///
/// One call to [`CondaBuilder::build`] writes a recipe into a fresh scratch
/// directory, runs `conda build` on it and reports where the artifact lands.
/// The scratch directory is removed on every exit path.
pub struct CondaBuilder {
    recipes: RecipeBuilder,
    runner: Arc<dyn BuildRunner>,
    event_tx: Option<EventSender>,
}

impl CondaBuilder {
    /// Builder that spawns the configured conda executable
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        Self {
            recipes: RecipeBuilder::new(config),
            runner: Arc::new(ProcessRunner),
            event_tx: None,
        }
    }

    /// Replace the process runner
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn BuildRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the recipe builder, e.g. to use a custom package mapper
    #[must_use]
    pub fn with_recipe_builder(mut self, recipes: RecipeBuilder) -> Self {
        self.recipes = recipes;
        self
    }

    /// Report progress on `tx`
    ///
    /// Also wires the recipe builder, so call this after
    /// [`CondaBuilder::with_recipe_builder`].
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.recipes = self.recipes.with_event_sender(tx.clone());
        self.event_tx = Some(tx);
        self
    }

    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        self.recipes.config()
    }

    /// Assemble the recipe for `metadata` without building it
    ///
    /// # Errors
    ///
    /// Returns an error if a requirement cannot be normalized.
    pub fn recipe(&self, metadata: &ProjectMetadata) -> Result<Recipe, Error> {
        self.recipes.build(metadata)
    }

    /// Build a conda package and return the artifact path
    ///
    /// `output_dir` is passed to conda-build as its output folder; relative
    /// paths are resolved against the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if recipe construction fails, the scratch directory
    /// or recipe file cannot be written, the conda executable cannot be
    /// spawned, or `conda build` exits unsuccessfully.
    pub async fn build(
        &self,
        metadata: &ProjectMetadata,
        output_dir: &Path,
    ) -> Result<PathBuf, Error> {
        let mut progress = PhaseTracker::new(&metadata.name, &self.event_tx);

        match self.run_phases(metadata, output_dir, &mut progress).await {
            Ok(artifact) => {
                progress.advance(BuildPhase::Completed);
                info!(package = %metadata.name, artifact = %artifact.display(), "conda build completed");
                self.event_tx.emit(AppEvent::Build(BuildEvent::Completed {
                    package: metadata.name.clone(),
                    artifact: artifact.clone(),
                }));
                Ok(artifact)
            }
            Err(e) => {
                progress.fail(&e);
                Err(e)
            }
        }
    }

    async fn run_phases(
        &self,
        metadata: &ProjectMetadata,
        output_dir: &Path,
        progress: &mut PhaseTracker<'_>,
    ) -> Result<PathBuf, Error> {
        let config = self.recipes.config();
        progress.advance(BuildPhase::MetadataCollected);

        let requirements = self.recipes.requirements(metadata)?;
        self.event_tx
            .emit(AppEvent::Build(BuildEvent::RequirementsNormalized {
                package: metadata.name.clone(),
                host: requirements.host.len(),
                run: requirements.run.len(),
                run_constrained: requirements.run_constrained.len(),
            }));
        progress.advance(BuildPhase::RequirementsNormalized);

        let recipe = self.recipes.assemble(metadata, requirements)?;
        progress.advance(BuildPhase::RecipeAssembled);

        let output_dir =
            std::path::absolute(output_dir).map_err(|e| Error::io_with_path(&e, output_dir))?;

        // Dropped on every return below, which removes the directory
        let build_dir = tempfile::Builder::new()
            .prefix("hcb-recipe-")
            .tempdir()
            .map_err(|e| BuildError::BuildDirFailed {
                message: e.to_string(),
            })?;

        let recipe_path = write_recipe(&recipe, config.recipe_format, &build_dir).await?;
        self.event_tx.emit(AppEvent::Build(BuildEvent::RecipeWritten {
            package: metadata.name.clone(),
            path: recipe_path,
        }));
        progress.advance(BuildPhase::RecipeWritten);

        let command = CondaBuildCommand::from_config(config, build_dir.path(), &output_dir);
        info!(package = %metadata.name, command = %command, "running conda build");
        self.event_tx.emit(AppEvent::Build(BuildEvent::CommandStarted {
            package: metadata.name.clone(),
            command: command.to_string(),
        }));
        progress.advance(BuildPhase::ExternalBuildRunning);

        let result = self.runner.run(command.program(), command.args()).await?;
        if !result.success {
            return Err(BuildError::CondaBuildFailed {
                command: command.to_string(),
                exit_code: result.exit_code,
            }
            .into());
        }

        Ok(artifact_path(&output_dir, &recipe))
    }

    /// Remove a build output directory
    ///
    /// A directory that does not exist is already clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    pub async fn clean(&self, dir: &Path) -> Result<(), Error> {
        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            debug!(path = %dir.display(), "nothing to clean");
            return Ok(());
        }

        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| BuildError::CleanFailed {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;

        info!(path = %dir.display(), "removed build output");
        self.event_tx.emit(AppEvent::Build(BuildEvent::Cleaned {
            path: dir.to_path_buf(),
        }));
        Ok(())
    }
}

async fn write_recipe(
    recipe: &Recipe,
    format: RecipeFormat,
    build_dir: &TempDir,
) -> Result<PathBuf, Error> {
    let path = build_dir.path().join(RECIPE_FILE_NAME);
    let contents = recipe.render(format)?;
    debug!(path = %path.display(), %format, "writing recipe\n{contents}");

    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| BuildError::RecipeWriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(path)
}

/// Tracks and reports the phase of one build
struct PhaseTracker<'a> {
    package: &'a str,
    phase: BuildPhase,
    events: &'a Option<EventSender>,
}

impl<'a> PhaseTracker<'a> {
    fn new(package: &'a str, events: &'a Option<EventSender>) -> Self {
        Self {
            package,
            phase: BuildPhase::Idle,
            events,
        }
    }

    fn advance(&mut self, to: BuildPhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal build phase transition {} -> {to}",
            self.phase
        );
        debug!(package = self.package, from = %self.phase, %to, "build phase");
        self.events.emit_phase(self.package, self.phase, to);
        self.phase = to;
    }

    fn fail(&mut self, error: &Error) {
        let failed_in = self.phase;
        warn!(package = self.package, phase = %failed_in, error = %error, "conda build failed");
        self.advance(BuildPhase::Failed);
        self.events.emit(AppEvent::Build(BuildEvent::Failed {
            package: self.package.to_string(),
            phase: failed_in,
            failure: FailureContext::from_error(error),
        }));
    }
}
