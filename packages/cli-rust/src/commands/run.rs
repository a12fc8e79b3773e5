//! Run command implementation
//!
//! Starts the bot container in the foreground and streams its output.
//! The bot's exit code is passed through to the shell unchanged.

use crate::output::{log_level_style, show_docker_error};
use anyhow::Result;
use botpack_core::docker::{bot_container_name, image_exists, run_bot};
use botpack_core::{RuntimeEnv, load_config_or_default};
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the run command
#[derive(Args, Default)]
pub struct RunArgs {
    /// Environment overrides for the bot process (KEY=VALUE, repeatable)
    #[arg(short, long, value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Build the image first if it does not exist
    #[arg(long)]
    pub build: bool,
}

/// Run the bot container and stream its output until it exits
pub async fn cmd_run(args: &RunArgs, build_root: &Path, quiet: bool, verbose: u8) -> Result<()> {
    for pair in &args.env {
        if !pair.contains('=') {
            anyhow::bail!("Invalid --env value '{pair}': expected KEY=VALUE");
        }
    }

    let config = load_config_or_default(build_root)?;
    let client = super::connect_docker().await?;

    if args.build && !image_exists(&client, &config.image, &config.tag).await? {
        super::build::build_project(&config, build_root, quiet, verbose, false, false).await?;
    }

    let image_ref = config.image_ref();
    let name = bot_container_name(&config.image);
    let runtime_env = RuntimeEnv::default();

    if !quiet {
        println!(
            "{} Running {} as container {}",
            style("Info:").cyan().bold(),
            style(&image_ref).cyan(),
            style(&name).cyan()
        );
    }

    let result = run_bot(
        &client,
        &image_ref,
        &name,
        &runtime_env,
        &args.env,
        |line| println!("{}", log_level_style(line)),
    )
    .await;

    match result {
        Ok(0) => {
            if !quiet {
                println!("{} Bot exited cleanly.", style("Success:").green().bold());
            }
            Ok(())
        }
        Ok(code) => {
            if !quiet {
                eprintln!(
                    "{} Bot exited with code {}.",
                    style("Error:").red().bold(),
                    code
                );
            }
            std::process::exit(code as i32);
        }
        Err(e) => {
            show_docker_error(&e);
            Err(e.into())
        }
    }
}
