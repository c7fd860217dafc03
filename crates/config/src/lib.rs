#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for hcb
//!
//! The conda target is configured from, in increasing precedence:
//! - Default values (hard-coded)
//! - The `[tool.hatch.build.targets.conda]` table of `pyproject.toml`
//! - Environment variables (`HCB_*`)
//! - CLI flags
//!
//! The resulting [`TargetConfig`] is passed explicitly to the recipe builder
//! and the conda build driver; nothing reads configuration from global state.

pub mod constants;

use hcb_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tokio::fs;

/// Serialization used for the recipe file handed to conda-build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeFormat {
    /// JSON content written to `meta.yaml`; conda-build reads it with its
    /// YAML loader
    #[default]
    Json,
    /// Plain YAML
    Yaml,
}

impl FromStr for RecipeFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::InvalidValue {
                field: "recipe_format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecipeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Conda target configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Channels passed to conda-build, in order
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,

    /// Extra run requirements appended verbatim after the mapped dependencies
    #[serde(default)]
    pub run: Vec<String>,

    /// Run-constrained specifiers, copied verbatim
    #[serde(default)]
    pub run_constrained: Vec<String>,

    /// Passed as `--numpy` when set
    #[serde(default)]
    pub default_numpy_version: Option<String>,

    #[serde(default)]
    pub recipe_format: RecipeFormat,

    #[serde(default = "default_conda_executable")]
    pub conda_executable: String,

    /// PyPI name to conda name overrides, applied after the built-in table
    #[serde(default)]
    pub name_mappings: BTreeMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            run: Vec::new(),
            run_constrained: Vec::new(),
            default_numpy_version: None,
            recipe_format: RecipeFormat::default(),
            conda_executable: default_conda_executable(),
            name_mappings: BTreeMap::new(),
        }
    }
}

// Default value functions for serde
fn default_channels() -> Vec<String> {
    vec![constants::DEFAULT_CHANNEL.to_string()]
}

fn default_conda_executable() -> String {
    constants::DEFAULT_CONDA_EXECUTABLE.to_string()
}

/// Just enough of `pyproject.toml` to reach the target table
#[derive(Deserialize, Default)]
struct PyProjectToml {
    #[serde(default)]
    tool: Option<ToolTable>,
}

#[derive(Deserialize)]
struct ToolTable {
    #[serde(default)]
    hatch: Option<HatchTable>,
}

#[derive(Deserialize)]
struct HatchTable {
    #[serde(default)]
    build: Option<HatchBuildTable>,
}

#[derive(Deserialize)]
struct HatchBuildTable {
    #[serde(default)]
    targets: Option<BTreeMap<String, toml::Value>>,
}

impl TargetConfig {
    /// Parse the conda target table out of `pyproject.toml` contents
    ///
    /// A project without the table gets the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid TOML or the target
    /// table has fields of the wrong type.
    pub fn from_pyproject_str(contents: &str) -> Result<Self, Error> {
        let pyproject: PyProjectToml =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;

        let table = pyproject
            .tool
            .and_then(|tool| tool.hatch)
            .and_then(|hatch| hatch.build)
            .and_then(|build| build.targets)
            .and_then(|mut targets| targets.remove(constants::TARGET_NAME));

        match table {
            Some(value) => value.try_into().map_err(|e: toml::de::Error| {
                ConfigError::ParseError {
                    message: format!("[tool.hatch.build.targets.{}]: {e}", constants::TARGET_NAME),
                }
                .into()
            }),
            None => {
                tracing::debug!("no conda target table, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the conda target configuration from a `pyproject.toml` file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if its contents
    /// cannot be parsed.
    pub async fn load_from_pyproject(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        Self::from_pyproject_str(&contents)
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        // HCB_CHANNELS
        if let Some(channels) = lookup("HCB_CHANNELS") {
            let parsed: Vec<String> = channels
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ToString::to_string)
                .collect();
            if parsed.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "HCB_CHANNELS".to_string(),
                    value: channels,
                }
                .into());
            }
            self.channels = parsed;
        }

        // HCB_NUMPY_VERSION
        if let Some(numpy) = lookup("HCB_NUMPY_VERSION") {
            let numpy = numpy.trim().to_string();
            self.default_numpy_version = if numpy.is_empty() { None } else { Some(numpy) };
        }

        // HCB_CONDA_EXE
        if let Some(exe) = lookup("HCB_CONDA_EXE") {
            if exe.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "HCB_CONDA_EXE".to_string(),
                    value: exe,
                }
                .into());
            }
            self.conda_executable = exe;
        }

        // HCB_RECIPE_FORMAT
        if let Some(format) = lookup("HCB_RECIPE_FORMAT") {
            self.recipe_format = format.parse().map_err(|_| ConfigError::InvalidValue {
                field: "HCB_RECIPE_FORMAT".to_string(),
                value: format,
            })?;
        }

        Ok(())
    }
}
