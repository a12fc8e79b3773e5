//! Clean command implementation
//!
//! Removes the bot container, the built image, and the local digest store.

use crate::output::show_docker_error;
use anyhow::Result;
use botpack_core::docker::{bot_container_name, container_exists, remove_container, remove_image};
use botpack_core::load_config_or_default;
use botpack_core::plan::DigestStore;
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the clean command
#[derive(Args, Default)]
pub struct CleanArgs {
    /// Remove the image even if a container still references it
    #[arg(long)]
    pub force: bool,
}

/// Remove the bot container, image, and cached layer digests
pub async fn cmd_clean(args: &CleanArgs, build_root: &Path, quiet: bool) -> Result<()> {
    let config = load_config_or_default(build_root)?;
    let name = bot_container_name(&config.image);

    let client = super::connect_docker().await?;

    if container_exists(&client, &name).await? {
        remove_container(&client, &name, args.force).await?;
        if !quiet {
            println!("Removed container {}", style(&name).cyan());
        }
    }

    if let Err(e) = remove_image(&client, &config.image, &config.tag, args.force).await {
        show_docker_error(&e);
        return Err(e.into());
    }
    if !quiet {
        println!("Removed image {}", style(config.image_ref()).cyan());
    }

    let store_path = DigestStore::default_path(build_root);
    if store_path.exists() {
        std::fs::remove_file(&store_path)?;
        if !quiet {
            println!("Removed {}", style(store_path.display()).cyan());
        }
    }

    if !quiet {
        println!("{} Clean complete.", style("Success:").green().bold());
    }
    Ok(())
}
