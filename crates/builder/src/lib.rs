#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Conda package building for hcb
//!
//! Writes the recipe produced by `hcb-recipe` into a scratch directory and
//! drives `conda build` over it. The external command sits behind
//! [`BuildRunner`] so it can be replaced in tests.

mod builder;
mod command;
mod runner;

pub use builder::{artifact_path, CondaBuilder, NOARCH_SUBDIR};
pub use command::CondaBuildCommand;
pub use runner::{BuildCommandResult, BuildRunner, ProcessRunner};
