//! CLI command implementations
//!
//! One module per command; each exposes an `Args` struct and a `cmd_*`
//! entry point.

mod build;
mod clean;
mod init;
mod plan;
mod run;
mod stop;

pub use build::{BuildArgs, cmd_build};
pub use clean::{CleanArgs, cmd_clean};
pub use init::{InitArgs, cmd_init};
pub use plan::{PlanArgs, cmd_plan};
pub use run::{RunArgs, cmd_run};
pub use stop::{StopArgs, cmd_stop};

use crate::output::format_docker_error_anyhow;
use anyhow::Result;
use botpack_core::docker::DockerClient;

/// Connect to Docker with actionable error messages
pub(crate) async fn connect_docker() -> Result<DockerClient> {
    DockerClient::connect()
        .await
        .map_err(|e| format_docker_error_anyhow(&e))
}
