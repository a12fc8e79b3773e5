//! Centralized Docker error formatting
//!
//! Turns daemon-level failures into actionable messages so every command
//! reports connectivity problems the same way.

use anyhow::anyhow;
use botpack_core::docker::DockerError;
use console::style;

/// Render a heading plus indented guidance lines
///
/// Lines starting with `$ ` are rendered as commands in cyan.
fn guidance(heading: &str, lines: &[&str]) -> String {
    let mut out = format!("{}\n", style(heading).red().bold());
    for line in lines {
        out.push('\n');
        if let Some(cmd) = line.strip_prefix("$ ") {
            out.push_str(&format!("    {}", style(cmd).cyan()));
        } else {
            out.push_str(&format!("  {line}"));
        }
    }
    out
}

/// Format Docker errors with actionable guidance
pub fn format_docker_error(e: &DockerError) -> String {
    match e {
        DockerError::NotRunning => guidance(
            "Docker is not responding",
            &[
                "Start or restart the Docker daemon:",
                "$ sudo systemctl start docker",
            ],
        ),
        DockerError::SocketNotFound => guidance(
            "Docker socket not found",
            &[
                "Docker may not be installed or the service isn't running:",
                "$ sudo apt-get install docker.io",
                "$ sudo systemctl enable --now docker",
                "Then verify the socket exists at /var/run/docker.sock.",
            ],
        ),
        DockerError::PermissionDenied => guidance(
            "Permission denied accessing Docker",
            &[
                "Your user likely lacks access to the Docker socket:",
                "$ sudo usermod -aG docker $USER",
                "Then log out and back in (or run: newgrp docker).",
            ],
        ),
        DockerError::Connection(msg) => guidance("Cannot connect to Docker", &[msg]),
        DockerError::Image(msg) if msg.contains("not found") => {
            guidance("Image not found", &[msg, "$ botpack build"])
        }
        _ => e.to_string(),
    }
}

/// Format Docker errors as anyhow::Error
pub fn format_docker_error_anyhow(e: &DockerError) -> anyhow::Error {
    anyhow!("{}", format_docker_error(e))
}

/// Show a Docker error on stderr, separated from prior output
pub fn show_docker_error(e: &DockerError) {
    eprintln!();
    eprintln!("{}", format_docker_error(e));
}
