//! Docker operations module
//!
//! This module provides the Docker-facing half of botpack:
//! - Docker client wrapper with connection handling
//! - Docker-specific error types
//! - Dockerfile rendering from the project config and layer graph
//! - Build-context assembly (Dockerfile + manifest + entrypoint only)
//! - Image build with streaming progress
//! - Bot container lifecycle (create, start, logs, wait, stop, remove)

mod client;
pub mod container;
pub mod context;
pub mod dockerfile;
mod error;
pub mod image;
pub mod progress;

// Core types
pub use client::DockerClient;
pub use error::DockerError;
pub use progress::ProgressReporter;

// Dockerfile rendering
pub use dockerfile::{RenderedRecipe, render_recipe};

// Build context assembly
pub use context::create_build_context;

// Image operations
pub use image::{build_image, image_exists, remove_image};

// Container lifecycle
pub use container::{
    DEFAULT_STOP_TIMEOUT_SECS, bot_container_name, container_exists, container_is_running,
    remove_container, run_bot, stop_container,
};
