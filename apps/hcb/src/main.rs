#![deny(clippy::pedantic, unsafe_code)]

//! hcb - conda packages from Python project metadata
//!
//! Reads `pyproject.toml`, assembles a conda recipe and drives `conda build`
//! through the library crates.

mod cli;
mod error;
mod events;

use crate::cli::{Cli, Commands, ConfigArgs};
use crate::error::CliError;
use clap::Parser;
use hcb_builder::CondaBuilder;
use hcb_config::constants::{PYPROJECT_FILE, TARGET_NAME};
use hcb_config::TargetConfig;
use hcb_events::EventReceiver;
use hcb_metadata::ProjectMetadata;
use std::future::Future;
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting hcb v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Build {
            project,
            output_dir,
            config,
        } => {
            let (metadata, config) = load_project(&project, &config).await?;
            let (event_sender, event_receiver) = hcb_events::channel();
            let builder = CondaBuilder::new(config).with_event_sender(event_sender);
            let target_dir = output_dir.join(TARGET_NAME);

            let artifact =
                with_events(event_receiver, builder.build(&metadata, &target_dir)).await?;
            println!("{}", artifact.display());
        }
        Commands::Recipe { project, config } => {
            let (metadata, config) = load_project(&project, &config).await?;
            let format = config.recipe_format;
            let recipe = CondaBuilder::new(config).recipe(&metadata)?;
            println!("{}", recipe.render(format)?);
        }
        Commands::Clean { output_dir } => {
            let (event_sender, event_receiver) = hcb_events::channel();
            let builder =
                CondaBuilder::new(TargetConfig::default()).with_event_sender(event_sender);
            let target_dir = output_dir.join(TARGET_NAME);
            with_events(event_receiver, builder.clean(&target_dir)).await?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Load project metadata and its target configuration
///
/// Precedence: pyproject.toml, then environment, then command line flags.
async fn load_project(
    project: &Path,
    args: &ConfigArgs,
) -> Result<(ProjectMetadata, TargetConfig), CliError> {
    let metadata = ProjectMetadata::load(project).await?;

    let mut config = TargetConfig::load_from_pyproject(&project.join(PYPROJECT_FILE)).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, args);

    Ok((metadata, config))
}

/// Apply command line overrides (highest precedence)
fn apply_cli_config(config: &mut TargetConfig, args: &ConfigArgs) {
    if !args.channels.is_empty() {
        config.channels.clone_from(&args.channels);
    }
    if let Some(numpy) = &args.numpy {
        config.default_numpy_version = Some(numpy.clone());
    }
    if let Some(conda) = &args.conda {
        config.conda_executable.clone_from(conda);
    }
    if let Some(format) = args.format {
        config.recipe_format = format;
    }
}

/// Drive `operation` while logging the events it emits
async fn with_events<T, F>(
    mut event_receiver: EventReceiver,
    operation: F,
) -> Result<T, hcb_errors::Error>
where
    F: Future<Output = Result<T, hcb_errors::Error>>,
{
    let mut operation = Box::pin(operation);

    loop {
        select! {
            result = &mut operation => {
                while let Ok(event) = event_receiver.try_recv() {
                    events::log_event(&event);
                }
                return result;
            }

            Some(event) = event_receiver.recv() => {
                events::log_event(&event);
            }
        }
    }
}

fn init_tracing(debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "debug"
    } else {
        "info"
    };

    let filter = if debug_enabled {
        tracing_subscriber::EnvFilter::new(default_filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
