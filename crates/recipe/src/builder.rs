//! Recipe assembly from project metadata and target configuration

use crate::mapping::{PackageMapper, PypiToCondaMapper};
use crate::model::{About, Build, Package, Recipe, Source, Test};
use crate::normalize::{RequirementNormalizer, Requirements};
use hcb_config::TargetConfig;
use hcb_errors::Error;
use hcb_events::EventSender;
use hcb_metadata::ProjectMetadata;

/// Builds [`Recipe`] documents for one target configuration
pub struct RecipeBuilder {
    config: TargetConfig,
    normalizer: RequirementNormalizer,
}

impl RecipeBuilder {
    /// Builder using the default PyPI mapper plus the configured name overrides
    #[must_use]
    pub fn new(config: TargetConfig) -> Self {
        let mapper = PypiToCondaMapper::with_overrides(&config.name_mappings);
        Self::with_mapper(config, Box::new(mapper))
    }

    /// Builder with a custom mapper
    #[must_use]
    pub fn with_mapper(config: TargetConfig, mapper: Box<dyn PackageMapper>) -> Self {
        Self {
            config,
            normalizer: RequirementNormalizer::new(mapper),
        }
    }

    /// Replace the normalizer, e.g. to change the self-reference
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: RequirementNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Report dropped requirements and markers on `tx`
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.normalizer = self.normalizer.with_event_sender(tx);
        self
    }

    #[must_use]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Normalize the project's requirements
    ///
    /// # Errors
    ///
    /// Returns an error if any requirement cannot be normalized.
    pub fn requirements(&self, metadata: &ProjectMetadata) -> Result<Requirements, Error> {
        self.normalizer.requirements(metadata, &self.config)
    }

    /// Assemble the recipe from metadata and already-normalized requirements
    ///
    /// # Errors
    ///
    /// Returns an error if the project root cannot be made absolute.
    pub fn assemble(
        &self,
        metadata: &ProjectMetadata,
        requirements: Requirements,
    ) -> Result<Recipe, Error> {
        let root = std::path::absolute(&metadata.root)
            .map_err(|e| Error::io_with_path(&e, &metadata.root))?;

        Ok(Recipe {
            package: Package {
                name: metadata.name.clone(),
                version: metadata.version.clone(),
            },
            source: Source { path: root },
            build: Build::default(),
            requirements,
            test: Test::default(),
            about: About {
                home: metadata.homepage.clone(),
                summary: metadata.description.clone(),
            },
        })
    }

    /// Normalize and assemble in one step
    ///
    /// # Errors
    ///
    /// Returns an error if normalization or assembly fails.
    pub fn build(&self, metadata: &ProjectMetadata) -> Result<Recipe, Error> {
        let requirements = self.requirements(metadata)?;
        self.assemble(metadata, requirements)
    }
}
