//! Bot container lifecycle
//!
//! Runs the single bot process from a built image: create, start, stream
//! logs, wait for exit. The container exposes no ports and mounts nothing;
//! the bot's exit code is passed through untranslated, and restart policy is
//! left entirely to the container runtime.

use super::{DockerClient, DockerError};
use crate::runtime_env::RuntimeEnv;
use bollard::container::LogOutput;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    CreateContainerOptions, LogsOptions, RemoveContainerOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use futures_util::StreamExt;
use tracing::debug;

/// Default graceful shutdown timeout in seconds
pub const DEFAULT_STOP_TIMEOUT_SECS: i64 = 30;

/// Container name derived from the image repository
///
/// `acme/aoc-bot` runs as `aoc-bot`.
pub fn bot_container_name(image: &str) -> String {
    image
        .rsplit('/')
        .next()
        .unwrap_or(image)
        .to_string()
}

/// Check if the bot container exists
pub async fn container_exists(client: &DockerClient, name: &str) -> Result<bool, DockerError> {
    debug!("Checking if container exists: {}", name);

    match client.inner().inspect_container(name, None).await {
        Ok(_) => Ok(true),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Ok(false),
        Err(e) => Err(DockerError::Container(format!(
            "Failed to inspect container {name}: {e}"
        ))),
    }
}

/// Check if the bot container is running
pub async fn container_is_running(client: &DockerClient, name: &str) -> Result<bool, DockerError> {
    debug!("Checking if container is running: {}", name);

    match client.inner().inspect_container(name, None).await {
        Ok(info) => {
            let running = info.state.and_then(|s| s.running).unwrap_or(false);
            Ok(running)
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Ok(false),
        Err(e) => Err(DockerError::Container(format!(
            "Failed to inspect container {name}: {e}"
        ))),
    }
}

/// Stop a running bot container with graceful shutdown
pub async fn stop_container(
    client: &DockerClient,
    name: &str,
    timeout_secs: Option<i64>,
) -> Result<(), DockerError> {
    let timeout = timeout_secs.unwrap_or(DEFAULT_STOP_TIMEOUT_SECS) as i32;
    debug!("Stopping container {} with {}s timeout", name, timeout);

    let options = StopContainerOptions {
        signal: None,
        t: Some(timeout),
    };

    client
        .inner()
        .stop_container(name, Some(options))
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("is not running") || msg.contains("304") {
                debug!("Container {} was already stopped", name);
                return DockerError::Container(format!("Container '{name}' is not running"));
            }
            DockerError::Container(format!("Failed to stop container {name}: {e}"))
        })?;

    debug!("Container {} stopped", name);
    Ok(())
}

/// Remove a bot container
pub async fn remove_container(
    client: &DockerClient,
    name: &str,
    force: bool,
) -> Result<(), DockerError> {
    debug!("Removing container {} (force={})", name, force);

    let options = RemoveContainerOptions {
        force,
        v: false,
        link: false,
    };

    client
        .inner()
        .remove_container(name, Some(options))
        .await
        .map_err(|e| DockerError::Container(format!("Failed to remove container {name}: {e}")))?;

    debug!("Container {} removed", name);
    Ok(())
}

/// Run the bot from a built image and wait for it to exit
///
/// Creates the container with the image's baked environment plus operator
/// overrides, starts it, streams stdout/stderr line-by-line through
/// `on_line`, and returns the bot's exit code unchanged. A stale container
/// with the same name from a previous run is removed first.
pub async fn run_bot<F>(
    client: &DockerClient,
    image_ref: &str,
    name: &str,
    runtime_env: &RuntimeEnv,
    env_overrides: &[String],
    mut on_line: F,
) -> Result<i64, DockerError>
where
    F: FnMut(&str),
{
    let (image_repo, image_tag) = split_image_ref(image_ref);
    if !super::image::image_exists(client, image_repo, image_tag).await? {
        return Err(DockerError::Container(format!(
            "Image '{image_ref}' not found. Run 'botpack build' first to build the image."
        )));
    }

    if container_exists(client, name).await? {
        if container_is_running(client, name).await? {
            return Err(DockerError::Container(format!(
                "Container '{name}' is already running. Stop it first with 'botpack stop'."
            )));
        }
        remove_container(client, name, false).await?;
    }

    let env = runtime_env.apply_overrides(env_overrides);
    debug!("Creating container {} from image {}", name, image_ref);

    let config = ContainerCreateBody {
        image: Some(image_ref.to_string()),
        env: if env.is_empty() { None } else { Some(env) },
        ..Default::default()
    };

    let options = CreateContainerOptions {
        name: Some(name.to_string()),
        platform: String::new(),
    };

    client
        .inner()
        .create_container(Some(options), config)
        .await
        .map_err(|e| DockerError::Container(format!("Failed to create container: {e}")))?;

    client
        .inner()
        .start_container(name, None::<StartContainerOptions>)
        .await
        .map_err(|e| DockerError::Container(format!("Failed to start container {name}: {e}")))?;

    debug!("Container {} started, streaming logs", name);

    let log_options = LogsOptions {
        stdout: true,
        stderr: true,
        follow: true,
        ..Default::default()
    };
    let mut logs = client.inner().logs(name, Some(log_options));
    while let Some(result) = logs.next().await {
        match result {
            Ok(output) => {
                if let Some(line) = log_output_to_line(output) {
                    on_line(&line);
                }
            }
            // The stream ends when the process exits; the wait below decides
            Err(_) => break,
        }
    }

    let mut wait = client
        .inner()
        .wait_container(name, None::<WaitContainerOptions>);
    let mut exit_code = 0i64;
    while let Some(result) = wait.next().await {
        match result {
            Ok(response) => exit_code = response.status_code,
            Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => {
                exit_code = code;
            }
            Err(e) => {
                return Err(DockerError::Container(format!(
                    "Failed waiting for container {name}: {e}"
                )));
            }
        }
    }

    debug!("Container {} exited with code {}", name, exit_code);
    Ok(exit_code)
}

/// Convert a log chunk to trimmed text, skipping non-output frames
fn log_output_to_line(output: LogOutput) -> Option<String> {
    match output {
        LogOutput::StdOut { message } | LogOutput::StdErr { message } => {
            let text = String::from_utf8_lossy(&message);
            let trimmed = text.trim_end_matches(['\r', '\n']);
            Some(trimmed.to_string())
        }
        _ => None,
    }
}

fn split_image_ref(image_ref: &str) -> (&str, &str) {
    match image_ref.rsplit_once(':') {
        Some((repo, tag)) if !tag.contains('/') => (repo, tag),
        _ => (image_ref, "latest"),
    }
}
