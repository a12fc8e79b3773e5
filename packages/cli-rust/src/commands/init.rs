//! Init command implementation
//!
//! Writes a default botpack.json to the build root.

use anyhow::{Result, anyhow};
use botpack_core::{BotpackConfig, config_path, save_config};
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Default)]
pub struct InitArgs {
    /// Overwrite an existing botpack.json
    #[arg(long)]
    pub force: bool,
}

/// Write a default botpack.json to the build root
pub fn cmd_init(args: &InitArgs, build_root: &Path, quiet: bool) -> Result<()> {
    let path = config_path(build_root);
    if path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        ));
    }

    save_config(build_root, &BotpackConfig::default())?;

    if !quiet {
        println!(
            "{} Wrote {}",
            style("Success:").green().bold(),
            style(path.display()).cyan()
        );
        println!();
        println!("Next steps:");
        println!("  1. Put your dependency manifest at requirements.txt");
        println!("  2. Put your bot entrypoint at bot.py");
        println!("  3. Run {} to build the image", style("botpack build").green());
    }

    Ok(())
}
