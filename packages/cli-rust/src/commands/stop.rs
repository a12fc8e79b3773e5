//! Stop command implementation
//!
//! Stops the bot container with a graceful 30-second timeout.

use crate::output::{CommandSpinner, show_docker_error};
use anyhow::Result;
use botpack_core::docker::{
    DEFAULT_STOP_TIMEOUT_SECS, bot_container_name, container_exists, container_is_running,
    remove_container, stop_container,
};
use botpack_core::load_config_or_default;
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the stop command
#[derive(Args, Default)]
pub struct StopArgs {
    /// Also remove the stopped container
    #[arg(long)]
    pub remove: bool,
}

/// Stop the bot container
///
/// Idempotent: exits 0 when the bot is already stopped.
pub async fn cmd_stop(args: &StopArgs, build_root: &Path, quiet: bool) -> Result<()> {
    let config = load_config_or_default(build_root)?;
    let name = bot_container_name(&config.image);

    let client = super::connect_docker().await?;

    if !container_is_running(&client, &name).await? {
        if !quiet {
            println!("{}", style("Bot is already stopped").dim());
        }
        if args.remove && container_exists(&client, &name).await? {
            remove_container(&client, &name, false).await?;
            if !quiet {
                println!("{} Removed container {}", style("Success:").green().bold(), name);
            }
        }
        return Ok(());
    }

    let spinner = CommandSpinner::new_maybe("Stopping bot...", quiet);
    spinner.update(&format!("Stopping bot ({DEFAULT_STOP_TIMEOUT_SECS}s timeout)..."));

    match stop_container(&client, &name, None).await {
        Ok(()) => {
            spinner.success("Bot stopped");
        }
        Err(e) => {
            spinner.fail("Failed to stop");
            show_docker_error(&e);
            return Err(e.into());
        }
    }

    if args.remove {
        remove_container(&client, &name, false).await?;
        if !quiet {
            println!("{} Removed container {}", style("Success:").green().bold(), name);
        }
    }

    Ok(())
}
