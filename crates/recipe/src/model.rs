//! conda-build recipe document
//!
//! Mirrors the subset of the `meta.yaml` schema that hcb produces. Field
//! order in the structs is the key order of the rendered document.

use crate::normalize::Requirements;
use hcb_config::RecipeFormat;
use hcb_errors::{Error, RecipeError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build number of every recipe hcb produces
pub const BUILD_NUMBER: u32 = 0;

/// Install step run by conda-build; dependencies come only from the recipe
pub const INSTALL_SCRIPT: &str = "{{ PYTHON }} -m pip install --no-deps --ignore-installed . -vv";

/// Complete recipe document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub package: Package,
    pub source: Source,
    pub build: Build,
    pub requirements: Requirements,
    pub test: Test,
    pub about: About,
}

/// Package identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

/// Local source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub path: PathBuf,
}

/// Build section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub number: u32,
    pub noarch: Noarch,
    pub script: String,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            number: BUILD_NUMBER,
            noarch: Noarch::Python,
            script: INSTALL_SCRIPT.to_string(),
        }
    }
}

/// noarch flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Noarch {
    Python,
}

/// Test section, always empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {}

/// About section; absent fields are omitted, never written as empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct About {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Recipe {
    /// File name conda-build gives the package built from this recipe
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}-{}-py_{}.tar.bz2",
            self.package.name, self.package.version, self.build.number
        )
    }

    /// Serialize the recipe for `meta.yaml`
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized, e.g. when the
    /// source path is not valid UTF-8.
    pub fn render(&self, format: RecipeFormat) -> Result<String, Error> {
        let rendered = match format {
            RecipeFormat::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            RecipeFormat::Yaml => serde_yml::to_string(self).map_err(|e| e.to_string()),
        };

        rendered.map_err(|message| {
            RecipeError::SerializeFailed {
                format: format.to_string(),
                message,
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(about: About) -> Recipe {
        Recipe {
            package: Package {
                name: "project-a".into(),
                version: "0.1.0".into(),
            },
            source: Source {
                path: PathBuf::from("/src/project-a"),
            },
            build: Build::default(),
            requirements: Requirements {
                build: vec![],
                host: vec!["python".into(), "pip".into()],
                run: vec!["python".into(), "requests".into()],
                run_constrained: vec![],
            },
            test: Test::default(),
            about,
        }
    }

    #[test]
    fn json_layout() {
        let json = sample(About::default()).render(RecipeFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["build"]["number"], 0);
        assert_eq!(value["build"]["noarch"], "python");
        assert_eq!(value["build"]["script"], INSTALL_SCRIPT);
        assert_eq!(value["source"]["path"], "/src/project-a");
        assert_eq!(value["test"], serde_json::json!({}));
        assert_eq!(value["about"], serde_json::json!({}));
        assert_eq!(value["requirements"]["run_constrained"], serde_json::json!([]));
        assert_eq!(value["requirements"]["build"], serde_json::json!([]));
    }

    #[test]
    fn json_keys_in_schema_order() {
        let json = sample(About::default()).render(RecipeFormat::Json).unwrap();
        let keys = [
            "\"package\"",
            "\"source\"",
            "\"build\"",
            "\"requirements\"",
            "\"test\"",
            "\"about\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|key| json.find(key).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn yaml_render_round_trips() {
        let recipe = sample(About {
            home: Some("https://example.com".into()),
            summary: None,
        });
        let yaml = recipe.render(RecipeFormat::Yaml).unwrap();
        assert!(yaml.contains("noarch: python"));
        assert!(!yaml.contains("summary"));
        let parsed: Recipe = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed, recipe);
    }

    #[test]
    fn artifact_file_name() {
        assert_eq!(
            sample(About::default()).artifact_file_name(),
            "project-a-0.1.0-py_0.tar.bz2"
        );
    }
}
