//! PyPI to conda specifier mapping

use crate::requirement::{canonicalize_name, Requirement};
use hcb_errors::Error;
use pep440_rs::{Operator, VersionSpecifiers};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A conda match spec: `<name>` or `<name> <constraint>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchSpec {
    pub name: String,
    pub constraint: Option<String>,
}

impl MatchSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, constraint: Option<String>) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// Unconstrained match spec
    #[must_use]
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }
}

impl fmt::Display for MatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{} {constraint}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Maps a source-ecosystem dependency to a conda match spec
///
/// The normalizer only handles ordering, filtering and category assembly;
/// naming and version conventions belong to the mapper.
pub trait PackageMapper: Send + Sync {
    /// Map a single parsed requirement
    ///
    /// # Errors
    ///
    /// Returns an error if the requirement cannot be expressed as a match spec.
    fn map_specifier(&self, requirement: &Requirement) -> Result<MatchSpec, Error>;
}

/// PyPI projects published on conda channels under a different name.
/// Keys are PEP 503 normalized.
const PYPI_TO_CONDA: &[(&str, &str)] = &[
    ("art", "ascii-art"),
    ("build", "python-build"),
    ("docker", "docker-py"),
    ("duckdb", "python-duckdb"),
    ("flatbuffers", "python-flatbuffers"),
    ("graphviz", "python-graphviz"),
    ("jupyter-client", "jupyter_client"),
    ("jupyter-core", "jupyter_core"),
    ("kaleido", "python-kaleido"),
    ("lmdb", "python-lmdb"),
    ("matplotlib", "matplotlib-base"),
    ("msgpack", "msgpack-python"),
    ("opencv-python", "opencv"),
    ("opencv-python-headless", "opencv"),
    ("prompt-toolkit", "prompt_toolkit"),
    ("psycopg2-binary", "psycopg2"),
    ("pyqt5", "pyqt"),
    ("ruamel-yaml", "ruamel.yaml"),
    ("tables", "pytables"),
    ("torch", "pytorch"),
    ("typing-extensions", "typing_extensions"),
    ("xxhash", "python-xxhash"),
];

/// Default mapper from PyPI requirements to conda-forge style match specs
///
/// Names are PEP 503 normalized and then looked up in the built-in synonym
/// table and any configured overrides. Extras are dropped, a direct
/// reference keeps only the name, and each PEP 440 clause is rendered
/// without inner whitespace, joined by `,`.
#[derive(Debug, Clone)]
pub struct PypiToCondaMapper {
    names: HashMap<String, String>,
}

impl PypiToCondaMapper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            names: PYPI_TO_CONDA
                .iter()
                .map(|(pypi, conda)| ((*pypi).to_string(), (*conda).to_string()))
                .collect(),
        }
    }

    /// Built-in table plus overrides; overrides win
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut mapper = Self::new();
        for (pypi, conda) in overrides {
            mapper.names.insert(canonicalize_name(pypi), conda.clone());
        }
        mapper
    }

    /// Conda package name for a PyPI name
    #[must_use]
    pub fn conda_name(&self, pypi_name: &str) -> String {
        let canonical = canonicalize_name(pypi_name);
        self.names.get(&canonical).cloned().unwrap_or(canonical)
    }
}

impl Default for PypiToCondaMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageMapper for PypiToCondaMapper {
    fn map_specifier(&self, requirement: &Requirement) -> Result<MatchSpec, Error> {
        let constraint = requirement
            .specifiers
            .as_ref()
            .and_then(conda_constraint);
        Ok(MatchSpec::new(self.conda_name(&requirement.name), constraint))
    }
}

/// Render PEP 440 specifiers in conda's compact form
///
/// `>=1.0, <2` becomes `>=1.0,<2`; arbitrary equality `===` is an exact pin.
#[must_use]
pub fn conda_constraint(specifiers: &VersionSpecifiers) -> Option<String> {
    let clauses: Vec<String> = specifiers
        .iter()
        .map(|spec| match spec.operator() {
            Operator::ExactEqual => format!("=={}", spec.version()),
            _ => spec.to_string().split_whitespace().collect(),
        })
        .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(","))
    }
}
