//! botpack CLI - Package a long-running bot into a reproducible container image
//!
//! This module contains the shared CLI implementation used by both binaries.

mod commands;
mod output;

use anyhow::Result;
use botpack_core::get_version;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing::debug;

/// Package a long-running bot into a reproducible container image
#[derive(Parser)]
#[command(name = "botpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Package a long-running bot into a reproducible container image", long_about = None)]
#[command(after_help = get_banner())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Build root directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default botpack.json to the build root
    Init(commands::InitArgs),
    /// Show the layer graph, cache plan, and rendered Dockerfile
    Plan(commands::PlanArgs),
    /// Build the bot image
    Build(commands::BuildArgs),
    /// Run the bot container and stream its output
    Run(commands::RunArgs),
    /// Stop the bot container
    Stop(commands::StopArgs),
    /// Remove the bot container, image, and cached layer digests
    Clean(commands::CleanArgs),
}

/// Get the ASCII banner for help display
fn get_banner() -> &'static str {
    r#"
 _           _                   _
| |__   ___ | |_ _ __   __ _  __| | __
| '_ \ / _ \| __| '_ \ / _` |/ _| |/ /
| |_) | (_) | |_| |_) | (_| | (_| |  <
|_.__/ \___/ \__| .__/ \__,_|\___|_|\_\
                |_|
"#
}

pub fn run() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let build_root = cli
        .project
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    debug!("Build root: {}", build_root.display());

    match cli.command {
        Some(Commands::Init(args)) => commands::cmd_init(&args, &build_root, cli.quiet),
        Some(Commands::Plan(args)) => commands::cmd_plan(&args, &build_root, cli.quiet),
        Some(Commands::Build(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_build(
                &args,
                &build_root,
                cli.quiet,
                cli.verbose,
            ))
        }
        Some(Commands::Run(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_run(
                &args,
                &build_root,
                cli.quiet,
                cli.verbose,
            ))
        }
        Some(Commands::Stop(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_stop(&args, &build_root, cli.quiet))
        }
        Some(Commands::Clean(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_clean(&args, &build_root, cli.quiet))
        }
        None => {
            if !cli.quiet {
                print_help_hint();
            }
            Ok(())
        }
    }
}

fn print_help_hint() {
    println!(
        "{} {}",
        style("botpack").cyan().bold(),
        style(get_version()).dim()
    );
    println!();
    println!("Run {} for available commands.", style("--help").green());
}
