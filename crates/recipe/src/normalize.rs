//! Requirement normalization into conda host/run/run_constrained lists

use crate::mapping::{conda_constraint, MatchSpec, PackageMapper, PypiToCondaMapper};
use crate::requirement::{canonicalize_name, Requirement};
use hcb_config::constants::PLUGIN_PACKAGE;
use hcb_config::TargetConfig;
use hcb_errors::{Error, RecipeError};
use hcb_events::{EventEmitter, EventSender};
use hcb_metadata::ProjectMetadata;
use pep440_rs::VersionSpecifiers;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Requirement lists of a conda recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// Compilers and build tools; a `noarch: python` recipe needs none
    pub build: Vec<String>,
    pub host: Vec<String>,
    pub run: Vec<String>,
    pub run_constrained: Vec<String>,
}

/// Converts declared PyPI requirements into conda match specs
///
/// Order is preserved, the build plugin's own package is filtered out and
/// the actual name/version translation is left to the [`PackageMapper`].
pub struct RequirementNormalizer {
    mapper: Box<dyn PackageMapper>,
    self_reference: String,
    event_tx: Option<EventSender>,
}

impl RequirementNormalizer {
    /// Normalizer that strips [`PLUGIN_PACKAGE`] and maps with `mapper`
    #[must_use]
    pub fn new(mapper: Box<dyn PackageMapper>) -> Self {
        Self {
            mapper,
            self_reference: canonicalize_name(PLUGIN_PACKAGE),
            event_tx: None,
        }
    }

    /// Report dropped requirements and markers on `tx`
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Override the package treated as a self-reference
    #[must_use]
    pub fn with_self_reference(mut self, name: &str) -> Self {
        self.self_reference = canonicalize_name(name);
        self
    }

    /// Whether a requirement names the build plugin itself
    #[must_use]
    pub fn is_self_reference(&self, requirement: &Requirement) -> bool {
        requirement.canonical_name() == self.self_reference
    }

    /// Normalize an ordered list of PEP 508 specifiers
    ///
    /// Self-references and extra-only requirements are dropped. Other
    /// environment markers cannot be expressed in a noarch recipe; they are
    /// dropped with a warning and the requirement is kept.
    ///
    /// # Errors
    ///
    /// Returns an error on the first specifier that does not parse or that
    /// the mapper rejects.
    pub fn normalize<S: AsRef<str>>(&self, specifiers: &[S]) -> Result<Vec<MatchSpec>, Error> {
        let mut normalized = Vec::with_capacity(specifiers.len());
        for raw in specifiers {
            let raw = raw.as_ref();
            let requirement = Requirement::from_str(raw)?;

            if self.is_self_reference(&requirement) {
                tracing::debug!(requirement = raw, "dropping self-reference");
                self.event_tx.emit_debug(format!("dropping self-reference `{raw}`"));
                continue;
            }
            if requirement.is_extra_only() {
                tracing::debug!(requirement = raw, "skipping optional extra dependency");
                self.event_tx
                    .emit_debug(format!("skipping optional extra dependency `{raw}`"));
                continue;
            }
            if let Some(marker) = &requirement.marker {
                tracing::warn!(
                    requirement = raw,
                    marker = %marker,
                    "environment marker cannot be expressed in a noarch recipe, ignoring it"
                );
                self.event_tx.emit_warning(format!(
                    "ignoring environment marker `{marker}` of `{}`",
                    requirement.name
                ));
            }

            normalized.push(self.mapper.map_specifier(&requirement)?);
        }
        Ok(normalized)
    }

    /// Assemble the recipe requirement lists for a project
    ///
    /// - host: interpreter, `pip`, then `[build-system].requires`
    /// - run: interpreter, then the declared dependencies, then the
    ///   configured extra run specifiers verbatim
    /// - `run_constrained`: configured verbatim
    ///
    /// # Errors
    ///
    /// Returns an error if `requires-python` or any dependency cannot be
    /// normalized.
    pub fn requirements(
        &self,
        metadata: &ProjectMetadata,
        config: &TargetConfig,
    ) -> Result<Requirements, Error> {
        let python = python_spec(metadata.requires_python.as_deref())?.to_string();

        let mut host = vec![python.clone(), "pip".to_string()];
        host.extend(
            self.normalize(&metadata.build_requires)?
                .iter()
                .map(ToString::to_string),
        );

        let mut run = vec![python];
        run.extend(
            self.normalize(&metadata.dependencies)?
                .iter()
                .map(ToString::to_string),
        );
        run.extend(config.run.iter().cloned());

        Ok(Requirements {
            build: Vec::new(),
            host,
            run,
            run_constrained: config.run_constrained.clone(),
        })
    }
}

impl Default for RequirementNormalizer {
    fn default() -> Self {
        Self::new(Box::new(PypiToCondaMapper::new()))
    }
}

/// Interpreter match spec from a `requires-python` constraint
///
/// # Errors
///
/// Returns an error if the constraint is not valid PEP 440.
pub fn python_spec(requires_python: Option<&str>) -> Result<MatchSpec, Error> {
    let constraint = match requires_python.map(str::trim).filter(|c| !c.is_empty()) {
        Some(raw) => {
            let specifiers =
                VersionSpecifiers::from_str(raw).map_err(|e| RecipeError::InvalidRequirement {
                    requirement: format!("requires-python {raw}"),
                    message: e.to_string(),
                })?;
            conda_constraint(&specifiers)
        }
        None => None,
    };
    Ok(MatchSpec::new("python", constraint))
}
