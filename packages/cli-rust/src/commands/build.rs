//! Build command implementation
//!
//! Assembles the build context, computes the cache plan, and runs the image
//! build. The digest store is persisted only after the daemon reports
//! success, so a failed build leaves the previous cache plan intact.

use crate::output::show_docker_error;
use anyhow::Result;
use botpack_core::docker::{
    DockerError, ProgressReporter, build_image, create_build_context, image_exists, render_recipe,
};
use botpack_core::plan::{CacheOutcome, CachePlan, DigestStore, bot_graph, read_build_inputs};
use botpack_core::{BotpackConfig, RuntimeEnv, load_config_or_default};
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the build command
#[derive(Args, Default)]
pub struct BuildArgs {
    /// Build without using the daemon layer cache
    #[arg(long)]
    pub no_cache: bool,

    /// Rebuild even when every layer is cached
    #[arg(long)]
    pub force: bool,
}

/// Build the bot image
pub async fn cmd_build(args: &BuildArgs, build_root: &Path, quiet: bool, verbose: u8) -> Result<()> {
    let config = load_config_or_default(build_root)?;
    build_project(&config, build_root, quiet, verbose, args.no_cache, args.force).await
}

/// Shared build flow, also used by `run --build`
pub(crate) async fn build_project(
    config: &BotpackConfig,
    build_root: &Path,
    quiet: bool,
    verbose: u8,
    no_cache: bool,
    force: bool,
) -> Result<()> {
    let runtime_env = RuntimeEnv::default();

    // Inputs are gathered manifest-first; a missing manifest fails here
    // before any image work starts
    let inputs = read_build_inputs(build_root, config)?;
    let graph = bot_graph(config, &runtime_env, &inputs);

    let store_path = DigestStore::default_path(build_root);
    let store = DigestStore::load(&store_path)?;
    let plan = CachePlan::compute(&graph, &store)?;

    if !quiet {
        for entry in plan.entries() {
            let outcome = match entry.outcome {
                CacheOutcome::Hit => style("cached").green(),
                CacheOutcome::Miss => style("rebuild").yellow(),
            };
            println!("  {:<14} {}", entry.node_id, outcome);
        }
    }

    let client = super::connect_docker().await?;

    let image_ref = config.image_ref();
    if plan.fully_cached()
        && !no_cache
        && !force
        && image_exists(&client, &config.image, &config.tag).await?
    {
        if !quiet {
            println!(
                "{} Image {} is up to date.",
                style("Success:").green().bold(),
                style(&image_ref).cyan()
            );
        }
        return Ok(());
    }

    let recipe = render_recipe(config, &runtime_env);
    if verbose > 0 {
        eprintln!("{} Rendered Dockerfile:", style("[info]").cyan());
        for line in recipe.dockerfile().lines() {
            eprintln!("    {line}");
        }
    }

    let context = create_build_context(&recipe.dockerfile(), config, &inputs)
        .map_err(|e| DockerError::Context(e.to_string()))?;

    let mut progress = ProgressReporter::new();

    match build_image(&client, &image_ref, context, &mut progress, no_cache).await {
        Ok(image_id) => {
            // Persist digests only for a fully successful build
            plan.to_store().save(&store_path)?;
            if !quiet {
                println!(
                    "{} Built {}",
                    style("Success:").green().bold(),
                    style(&image_ref).cyan()
                );
            }
            if verbose > 0 {
                eprintln!("{} Image id: {}", style("[info]").cyan(), image_id);
            }
            Ok(())
        }
        Err(e) => {
            show_docker_error(&e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_use_cache() {
        let args = BuildArgs::default();
        assert!(!args.no_cache);
        assert!(!args.force);
    }
}
