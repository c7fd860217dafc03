#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Conda recipe construction for hcb
//!
//! Turns a Python project's declared metadata into a conda-build recipe:
//! PEP 508 requirements are parsed, mapped to conda match specs and sorted
//! into the host, run and `run_constrained` lists of a fixed `noarch: python`
//! recipe that installs from the local source tree.

mod builder;
mod mapping;
mod model;
mod normalize;
mod requirement;

pub use builder::RecipeBuilder;
pub use mapping::{conda_constraint, MatchSpec, PackageMapper, PypiToCondaMapper};
pub use model::{About, Build, Noarch, Package, Recipe, Source, Test, BUILD_NUMBER, INSTALL_SCRIPT};
pub use normalize::{python_spec, RequirementNormalizer, Requirements};
pub use requirement::{canonicalize_name, Requirement};
