//! Command line interface definition

use clap::{Parser, Subcommand};
use hcb_config::RecipeFormat;
use std::path::PathBuf;

/// hcb - build conda packages from Python projects
#[derive(Parser, Debug)]
#[command(name = "hcb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build conda packages from pyproject.toml metadata")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser, Debug)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Target configuration overrides
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Channel to search, in priority order (repeatable; replaces configured channels)
    #[arg(long = "channel", short = 'c', value_name = "CHANNEL")]
    pub channels: Vec<String>,

    /// NumPy version passed to conda-build
    #[arg(long, value_name = "VERSION")]
    pub numpy: Option<String>,

    /// Conda executable to run
    #[arg(long, value_name = "PATH")]
    pub conda: Option<String>,

    /// Recipe serialization format (json or yaml)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<RecipeFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a conda package for a Python project
    Build {
        /// Project directory containing pyproject.toml
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Output directory; packages land in <DIR>/conda
        #[arg(short, long, value_name = "DIR", default_value = "dist")]
        output_dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the recipe that would be built
    Recipe {
        /// Project directory containing pyproject.toml
        #[arg(default_value = ".")]
        project: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Remove previously built conda packages
    Clean {
        /// Output directory used for builds
        #[arg(short, long, value_name = "DIR", default_value = "dist")]
        output_dir: PathBuf,
    },
}
