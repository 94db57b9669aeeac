//! Application runner logic
//!
//! Handles --new-config and dispatches pipeline commands

use crate::core::cli::CliArgs;
use crate::core::config_file::{ConfigFile, CONFIG_FILE_NAME};
use crate::core::pipeline::Pipeline;
use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::info;

/// Run the application with already validated CLI arguments
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // Handle --new-config flag specially
    if cli_args.new_config {
        let path = cli_args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        ConfigFile::initialize(&path)?;
        return Ok(());
    }

    let command = cli_args
        .command
        .as_ref()
        .ok_or_else(|| anyhow!("No command given"))?;

    let config_path = ConfigFile::locate(cli_args.config.as_deref()).ok_or_else(|| {
        anyhow!(
            "No configuration found in ./{} or {}\nRun with --new-config to create one.",
            CONFIG_FILE_NAME,
            ConfigFile::user_config_path().display()
        )
    })?;
    let config = ConfigFile::load(&config_path)?;
    let sizes = cli_args.resolve_sizes(&config).map_err(|e| anyhow!(e))?;
    let ctx = config.load_context()?;

    info!(
        "Running {} for {:?}px using {}",
        command.name(),
        sizes,
        config_path.display()
    );
    Pipeline::new(&config, &ctx).run(command, &sizes)
}
