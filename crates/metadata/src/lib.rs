#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Project metadata extraction for hcb
//!
//! Reads the PEP 621 `[project]` table and the `[build-system]` table of a
//! Python project's `pyproject.toml`. Only the fields the conda recipe needs
//! are kept; everything else in the file is ignored.

use hcb_config::constants::PYPROJECT_FILE;
use hcb_errors::{Error, MetadataError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Type alias for results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Declared metadata of a Python project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// Project name as declared
    pub name: String,
    /// Project version as declared
    pub version: String,
    /// `requires-python` constraint
    pub requires_python: Option<String>,
    /// PEP 508 runtime dependencies, in declaration order
    pub dependencies: Vec<String>,
    /// PEP 508 build requirements from `[build-system].requires`
    pub build_requires: Vec<String>,
    /// Homepage from `[project.urls]`
    pub homepage: Option<String>,
    /// One-line description
    pub description: Option<String>,
    /// Absolute path to the project root
    pub root: PathBuf,
}

impl ProjectMetadata {
    /// Metadata with only the required identity fields set
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            requires_python: None,
            dependencies: Vec::new(),
            build_requires: Vec::new(),
            homepage: None,
            description: None,
            root: root.into(),
        }
    }

    /// Load metadata from `<root>/pyproject.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the project file is missing, unreadable or not
    /// valid TOML, or if the name or a static version is missing.
    pub async fn load(root: &Path) -> Result<Self> {
        let pyproject_path = root.join(PYPROJECT_FILE);
        if !pyproject_path.exists() {
            return Err(MetadataError::ProjectFileNotFound {
                path: pyproject_path.display().to_string(),
            }
            .into());
        }

        let contents =
            fs::read_to_string(&pyproject_path)
                .await
                .map_err(|e| MetadataError::ReadFailed {
                    path: pyproject_path.display().to_string(),
                    message: e.to_string(),
                })?;

        let root = std::path::absolute(root).map_err(|e| Error::io_with_path(&e, root))?;
        Self::from_pyproject_str(&contents, root).map_err(|e| match e {
            Error::Metadata(MetadataError::Parse { message, .. }) => MetadataError::Parse {
                path: pyproject_path.display().to_string(),
                message,
            }
            .into(),
            other => other,
        })
    }

    /// Parse metadata from `pyproject.toml` contents
    ///
    /// `root` is recorded as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the contents are not valid TOML or lack the
    /// required `[project]` fields.
    pub fn from_pyproject_str(contents: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let pyproject: PyProjectToml =
            toml::from_str(contents).map_err(|e| MetadataError::Parse {
                path: PYPROJECT_FILE.to_string(),
                message: e.to_string(),
            })?;

        let project = pyproject.project.ok_or_else(|| MetadataError::MissingField {
            field: "project".to_string(),
        })?;

        let name = project.name.ok_or_else(|| MetadataError::MissingField {
            field: "project.name".to_string(),
        })?;

        let version = match project.version {
            Some(version) => version,
            None if project.dynamic.iter().any(|d| d == "version") => {
                return Err(MetadataError::DynamicVersion { name }.into());
            }
            None => {
                return Err(MetadataError::MissingField {
                    field: "project.version".to_string(),
                }
                .into());
            }
        };

        let homepage = project.urls.as_ref().and_then(homepage_url);

        let build_requires = pyproject
            .build_system
            .map(|build_system| build_system.requires)
            .unwrap_or_default();

        tracing::debug!(
            name = %name,
            version = %version,
            dependencies = project.dependencies.len(),
            build_requires = build_requires.len(),
            "parsed project metadata"
        );

        Ok(Self {
            name,
            version,
            requires_python: project.requires_python,
            dependencies: project.dependencies,
            build_requires,
            homepage,
            description: project.description,
            root: root.into(),
        })
    }
}

/// The `homepage` entry of `[project.urls]`
///
/// An exact `homepage` key wins; otherwise the first key, in sorted order,
/// that matches case-insensitively.
fn homepage_url(urls: &BTreeMap<String, String>) -> Option<String> {
    urls.get("homepage")
        .or_else(|| {
            urls.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("homepage"))
                .map(|(_, url)| url)
        })
        .cloned()
}

/// pyproject.toml metadata
#[derive(Deserialize)]
struct PyProjectToml {
    project: Option<PyProject>,
    #[serde(rename = "build-system")]
    build_system: Option<BuildSystemTable>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PyProject {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    requires_python: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    dynamic: Vec<String>,
    urls: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct BuildSystemTable {
    #[serde(default)]
    requires: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[build-system]
requires = ["hatchling", "hatch-conda-build"]
build-backend = "hatchling.build"

[project]
name = "project-a"
version = "0.1.0"
description = "A small example project"
requires-python = ">=3.10"
dependencies = ["requests", "pydantic[email]<2"]

[project.urls]
Homepage = "https://example.com/project-a"
Source = "https://github.com/example/project-a"
"#;

    #[test]
    fn parses_all_recipe_fields() {
        let meta = ProjectMetadata::from_pyproject_str(FULL, "/src/project-a").unwrap();
        assert_eq!(meta.name, "project-a");
        assert_eq!(meta.version, "0.1.0");
        assert_eq!(meta.requires_python.as_deref(), Some(">=3.10"));
        assert_eq!(meta.dependencies, vec!["requests", "pydantic[email]<2"]);
        assert_eq!(meta.build_requires, vec!["hatchling", "hatch-conda-build"]);
        assert_eq!(meta.homepage.as_deref(), Some("https://example.com/project-a"));
        assert_eq!(meta.description.as_deref(), Some("A small example project"));
        assert_eq!(meta.root, PathBuf::from("/src/project-a"));
    }

    #[test]
    fn exact_homepage_key_wins() {
        let contents = r#"
[project]
name = "urls"
version = "1.0"

[project.urls]
Homepage = "https://example.com/capitalized"
homepage = "https://example.com/exact"
HOMEPAGE = "https://example.com/shouting"
"#;
        for _ in 0..8 {
            let meta = ProjectMetadata::from_pyproject_str(contents, "/src/urls").unwrap();
            assert_eq!(meta.homepage.as_deref(), Some("https://example.com/exact"));
        }

        let urls = BTreeMap::from([
            ("Homepage".to_string(), "https://example.com/a".to_string()),
            ("HOMEPAGE".to_string(), "https://example.com/b".to_string()),
        ]);
        assert_eq!(homepage_url(&urls).as_deref(), Some("https://example.com/b"));
    }

    #[test]
    fn optional_fields_stay_absent() {
        let meta = ProjectMetadata::from_pyproject_str(
            "[project]\nname = \"bare\"\nversion = \"1.0\"\n",
            "/src/bare",
        )
        .unwrap();
        assert_eq!(meta, ProjectMetadata::new("bare", "1.0", "/src/bare"));
    }

    #[test]
    fn dynamic_version_is_rejected() {
        let err = ProjectMetadata::from_pyproject_str(
            "[project]\nname = \"dyn\"\ndynamic = [\"version\"]\n",
            "/src/dyn",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Metadata(MetadataError::DynamicVersion { .. })
        ));
    }

    #[test]
    fn missing_project_table() {
        let err = ProjectMetadata::from_pyproject_str("[tool.black]\n", "/src").unwrap_err();
        assert!(matches!(
            err,
            Error::Metadata(MetadataError::MissingField { ref field }) if field == "project"
        ));
    }

    #[test]
    fn invalid_toml() {
        let err = ProjectMetadata::from_pyproject_str("[project\nname=", "/src").unwrap_err();
        assert!(matches!(err, Error::Metadata(MetadataError::Parse { .. })));
    }
}
