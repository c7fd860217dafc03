//! Fixed names shared across hcb crates
//!
//! These are part of the contract with hatch and conda-build and are not
//! exposed through configuration.

/// Name of the Python project file read for metadata and configuration
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Build target name; configuration lives under `[tool.hatch.build.targets.conda]`
/// and packages are written to `<output-dir>/conda`
pub const TARGET_NAME: &str = "conda";

/// Package name of the build plugin itself, stripped from host requirements
pub const PLUGIN_PACKAGE: &str = "hatch-conda-build";

/// Channel used when none are configured
pub const DEFAULT_CHANNEL: &str = "defaults";

/// Executable invoked for `conda build`
pub const DEFAULT_CONDA_EXECUTABLE: &str = "conda";

/// File name conda-build looks for in the recipe directory
pub const RECIPE_FILE_NAME: &str = "meta.yaml";
