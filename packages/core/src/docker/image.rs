//! Docker image build operations
//!
//! Builds the bot image from an assembled build context with streaming
//! progress. A build either completes fully and produces a usable image, or
//! fails fatally with recent build output attached for context; there is no
//! retry and no partial image.

use super::progress::ProgressReporter;
use super::{DockerClient, DockerError};
use bollard::moby::buildkit::v1::StatusResponse as BuildkitStatusResponse;
use bollard::models::BuildInfoAux;
use bollard::query_parameters::{BuildImageOptions, BuilderVersion, RemoveImageOptionsBuilder};
use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::{Either, Full};
use std::collections::{HashMap, VecDeque};
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Default number of recent build log lines to capture for error context
const DEFAULT_BUILD_LOG_BUFFER_SIZE: usize = 20;

/// Default number of error lines to capture separately
const DEFAULT_ERROR_LOG_BUFFER_SIZE: usize = 10;

/// Read a log buffer size from env with bounds
fn read_log_buffer_size(var_name: &str, default: usize) -> usize {
    let Ok(value) = env::var(var_name) else {
        return default;
    };
    let Ok(parsed) = value.trim().parse::<usize>() else {
        return default;
    };
    parsed.clamp(5, 500)
}

/// Check if a line looks like an error message
fn is_error_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("error")
        || lower.contains("failed")
        || lower.contains("cannot")
        || lower.contains("unable to")
        || lower.contains("not found")
        || lower.contains("could not find a version")
}

/// Check if an image exists locally
pub async fn image_exists(
    client: &DockerClient,
    image: &str,
    tag: &str,
) -> Result<bool, DockerError> {
    let full_name = format!("{image}:{tag}");
    debug!("Checking if image exists: {}", full_name);

    match client.inner().inspect_image(&full_name).await {
        Ok(_) => Ok(true),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Ok(false),
        Err(e) => Err(DockerError::from(e)),
    }
}

/// Remove a locally built bot image
pub async fn remove_image(
    client: &DockerClient,
    image: &str,
    tag: &str,
    force: bool,
) -> Result<(), DockerError> {
    let full_name = format!("{image}:{tag}");
    debug!("Removing image: {}", full_name);

    let options = RemoveImageOptionsBuilder::new().force(force).build();
    match client
        .inner()
        .remove_image(&full_name, Some(options), None)
        .await
    {
        Ok(_) => Ok(()),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Image already removed: {}", full_name);
            Ok(())
        }
        Err(e) => Err(DockerError::Image(format!(
            "Failed to remove image {full_name}: {e}"
        ))),
    }
}

/// Build the bot image from an assembled build context
///
/// Streams build output into the progress reporter. Returns the image id
/// reported by the daemon on success.
///
/// # Arguments
/// * `client` - Docker client
/// * `image_ref` - Full `image:tag` to label the result with
/// * `context` - Gzipped tar build context
/// * `progress` - Progress reporter for build feedback
/// * `no_cache` - If true, build without using the daemon layer cache
pub async fn build_image(
    client: &DockerClient,
    image_ref: &str,
    context: Vec<u8>,
    progress: &mut ProgressReporter,
    no_cache: bool,
) -> Result<String, DockerError> {
    debug!("Building image: {} (no_cache: {})", image_ref, no_cache);

    // BuildKit requires a unique session id per build
    let session_id = format!(
        "botpack-build-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    );
    let options = BuildImageOptions {
        t: Some(image_ref.to_string()),
        dockerfile: "Dockerfile".to_string(),
        version: BuilderVersion::BuilderBuildKit,
        session: Some(session_id),
        rm: true,
        nocache: no_cache,
        platform: String::new(),
        target: String::new(),
        ..Default::default()
    };

    let body: Either<Full<Bytes>, _> = Either::Left(Full::new(Bytes::from(context)));
    let mut stream = client.inner().build_image(options, None, Some(body));

    progress.add_spinner("build", "Initializing...");

    let mut maybe_image_id = None;
    let mut log_state = BuildLogState::new();

    while let Some(result) = stream.next().await {
        let info = match result {
            Ok(info) => info,
            Err(e) => {
                progress.abandon_all("Build failed");
                return Err(DockerError::Build(format_build_error_with_context(
                    &e.to_string(),
                    &log_state,
                )));
            }
        };

        if let Some(stream_msg) = info.stream.as_deref() {
            log_state.record(stream_msg);
            let msg = stream_msg.trim();
            if !msg.is_empty() {
                progress.update_spinner("build", msg);
            }
        }

        if let Some(error_detail) = &info.error_detail
            && let Some(error_msg) = &error_detail.message
        {
            progress.abandon_all(error_msg);
            return Err(DockerError::Build(format_build_error_with_context(
                error_msg, &log_state,
            )));
        }

        if let Some(aux) = info.aux {
            match aux {
                BuildInfoAux::Default(image_id) => {
                    if let Some(id) = image_id.id {
                        maybe_image_id = Some(id);
                    }
                }
                BuildInfoAux::BuildKit(status) => {
                    handle_buildkit_status(&status, progress, &mut log_state);
                }
            }
        }
    }

    let image_id = maybe_image_id.unwrap_or_else(|| "unknown".to_string());
    progress.finish("build", &format!("Build complete: {image_ref}"));

    Ok(image_id)
}

/// Ring buffers of recent and error-looking build output
struct BuildLogState {
    recent_logs: VecDeque<String>,
    error_logs: VecDeque<String>,
    build_log_buffer_size: usize,
    error_log_buffer_size: usize,
    vertex_name_by_id: HashMap<String, String>,
}

impl BuildLogState {
    fn new() -> Self {
        let build_log_buffer_size =
            read_log_buffer_size("BOTPACK_BUILD_LOG_TAIL", DEFAULT_BUILD_LOG_BUFFER_SIZE);
        let error_log_buffer_size =
            read_log_buffer_size("BOTPACK_BUILD_ERROR_TAIL", DEFAULT_ERROR_LOG_BUFFER_SIZE);
        Self {
            recent_logs: VecDeque::with_capacity(build_log_buffer_size),
            error_logs: VecDeque::with_capacity(error_log_buffer_size),
            build_log_buffer_size,
            error_log_buffer_size,
            vertex_name_by_id: HashMap::new(),
        }
    }

    fn record(&mut self, line: &str) {
        let msg = line.trim();
        if msg.is_empty() {
            return;
        }
        if self.recent_logs.len() >= self.build_log_buffer_size {
            self.recent_logs.pop_front();
        }
        self.recent_logs.push_back(msg.to_string());

        if is_error_line(msg) {
            if self.error_logs.len() >= self.error_log_buffer_size {
                self.error_logs.pop_front();
            }
            self.error_logs.push_back(msg.to_string());
        }
    }
}

fn handle_buildkit_status(
    status: &BuildkitStatusResponse,
    progress: &mut ProgressReporter,
    state: &mut BuildLogState,
) {
    for vertex in &status.vertexes {
        if vertex.name.is_empty() {
            continue;
        }
        state
            .vertex_name_by_id
            .entry(vertex.digest.clone())
            .or_insert_with(|| vertex.name.clone());
        if !vertex.name.starts_with("[internal]") {
            progress.update_spinner("build", &vertex.name);
        }
    }

    for log in &status.logs {
        let message = String::from_utf8_lossy(&log.msg);
        let name = state
            .vertex_name_by_id
            .get(&log.vertex)
            .cloned()
            .unwrap_or_else(|| "buildkit".to_string());
        for line in message.lines() {
            state.record(&format!("[{name}] {line}"));
        }
    }
}

/// Format a build error with recent log context for actionable debugging
fn format_build_error_with_context(error: &str, state: &BuildLogState) -> String {
    let mut message = String::new();
    message.push_str(error);

    if !state.error_logs.is_empty() {
        let recent_set: std::collections::HashSet<_> = state.recent_logs.iter().collect();
        let unique_errors: Vec<_> = state
            .error_logs
            .iter()
            .filter(|line| !recent_set.contains(line))
            .collect();
        if !unique_errors.is_empty() {
            message.push_str("\n\nPotential errors detected during build:");
            for line in unique_errors {
                message.push_str("\n  ");
                message.push_str(line);
            }
        }
    }

    if !state.recent_logs.is_empty() {
        message.push_str("\n\nRecent build output:");
        for line in &state.recent_logs {
            message.push_str("\n  ");
            message.push_str(line);
        }
    } else {
        message.push_str("\n\nNo build output was received from the Docker daemon.");
        message.push_str("\nThis usually means the build failed before any logs were streamed.");
    }

    let error_lower = error.to_lowercase();
    if error_lower.contains("network")
        || error_lower.contains("connection")
        || error_lower.contains("timeout")
    {
        message.push_str(
            "\n\nSuggestion: Check your network connection and Docker's ability to reach the package index.",
        );
    } else if error_lower.contains("could not find a version")
        || error_lower.contains("no matching distribution")
    {
        message.push_str(
            "\n\nSuggestion: A manifest version constraint is unsatisfiable. Check the pinned versions in your dependency manifest.",
        );
    } else if error_lower.contains("no space") || error_lower.contains("disk") {
        message.push_str(
            "\n\nSuggestion: Free up disk space with 'docker system prune' or check available storage.",
        );
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(lines: &[&str]) -> BuildLogState {
        let mut state = BuildLogState::new();
        for line in lines {
            state.record(line);
        }
        state
    }

    #[test]
    fn format_build_error_includes_recent_logs() {
        let state = state_with(&[
            "FROM python:3.12-slim",
            "RUN pip install -r requirements.txt",
            "ERROR: Could not find a version that satisfies the requirement nosuchpkg==9.9",
        ]);
        let result = format_build_error_with_context("Build failed: exit code 1", &state);
        assert!(result.contains("Build failed: exit code 1"));
        assert!(result.contains("Recent build output:"));
        assert!(result.contains("pip install"));
    }

    #[test]
    fn format_build_error_handles_empty_logs() {
        let state = BuildLogState::new();
        let result = format_build_error_with_context("Stream error", &state);
        assert!(result.contains("Stream error"));
        assert!(result.contains("No build output was received"));
    }

    #[test]
    fn format_build_error_suggests_manifest_fix_for_resolution_failures() {
        let state = BuildLogState::new();
        let result = format_build_error_with_context(
            "ERROR: Could not find a version that satisfies the requirement foo==0.0.0",
            &state,
        );
        assert!(result.contains("version constraint is unsatisfiable"));
    }

    #[test]
    fn format_build_error_adds_network_suggestion() {
        let state = BuildLogState::new();
        let result = format_build_error_with_context("connection timeout", &state);
        assert!(result.contains("Check your network connection"));
    }

    #[test]
    fn error_lines_scrolled_off_are_kept_separately() {
        let mut state = BuildLogState::new();
        state.record("error: resolution failed early");
        for i in 0..DEFAULT_BUILD_LOG_BUFFER_SIZE + 5 {
            state.record(&format!("Collecting package-{i}"));
        }
        let result = format_build_error_with_context("Build failed", &state);
        assert!(result.contains("Potential errors detected during build:"));
        assert!(result.contains("resolution failed early"));
    }

    #[test]
    fn is_error_line_detects_errors() {
        assert!(is_error_line("error: something failed"));
        assert!(is_error_line("ERROR: build failed"));
        assert!(is_error_line("Could not find a version that satisfies"));
        assert!(is_error_line("Unable to locate package"));
        assert!(!is_error_line("Collecting requests"));
        assert!(!is_error_line("Successfully installed requests-2.31.0"));
    }

    #[test]
    fn log_buffer_size_is_bounded() {
        let mut state = BuildLogState::new();
        for i in 0..100 {
            state.record(&format!("line {i}"));
        }
        assert!(state.recent_logs.len() <= DEFAULT_BUILD_LOG_BUFFER_SIZE.max(500));
        assert_eq!(state.recent_logs.len(), state.build_log_buffer_size);
    }
}
