//! Plan command implementation
//!
//! Computes the layer graph and cache plan without touching the Docker
//! daemon. Useful to see what a build would re-execute before running it.

use anyhow::Result;
use botpack_core::plan::{CacheOutcome, CachePlan, DigestStore, bot_graph, read_build_inputs};
use botpack_core::docker::render_recipe;
use botpack_core::{RuntimeEnv, load_config_or_default};
use clap::Args;
use console::style;
use std::path::Path;

/// Arguments for the plan command
#[derive(Args, Default)]
pub struct PlanArgs {
    /// Also print the rendered Dockerfile
    #[arg(long)]
    pub dockerfile: bool,
}

/// Show the layer graph, cache plan, and optionally the rendered Dockerfile
pub fn cmd_plan(args: &PlanArgs, build_root: &Path, quiet: bool) -> Result<()> {
    let config = load_config_or_default(build_root)?;
    let runtime_env = RuntimeEnv::default();

    let inputs = read_build_inputs(build_root, &config)?;
    let graph = bot_graph(&config, &runtime_env, &inputs);

    let store = DigestStore::load(&DigestStore::default_path(build_root))?;
    let plan = CachePlan::compute(&graph, &store)?;

    if !quiet {
        println!("Image: {}", style(config.image_ref()).cyan());
        println!("Base:  {}", style(config.base_image()).cyan());
        println!();
        for entry in plan.entries() {
            let outcome = match entry.outcome {
                CacheOutcome::Hit => style("cached").green(),
                CacheOutcome::Miss => style("rebuild").yellow(),
            };
            println!(
                "  {:<14} {}  {}",
                entry.node_id,
                outcome,
                style(&entry.digest[..12]).dim()
            );
        }
        println!();
        if plan.fully_cached() {
            println!("{}", style("All layers cached; nothing to rebuild.").dim());
        }
    }

    if args.dockerfile {
        let recipe = render_recipe(&config, &runtime_env);
        if !quiet {
            println!();
        }
        print!("{}", recipe.dockerfile());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plan_succeeds_for_complete_project() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "requests\n").unwrap();
        std::fs::write(dir.path().join("bot.py"), "print('hi')\n").unwrap();
        cmd_plan(&PlanArgs::default(), dir.path(), true).unwrap();
    }

    #[test]
    fn plan_fails_without_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bot.py"), "print('hi')\n").unwrap();
        let err = cmd_plan(&PlanArgs::default(), dir.path(), true).unwrap_err();
        assert!(err.to_string().contains("manifest"));
    }
}
