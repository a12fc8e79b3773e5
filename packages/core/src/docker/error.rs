//! Docker-specific error types

use thiserror::Error;

/// Errors from Docker operations
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("Docker daemon is not running")]
    NotRunning,

    #[error("Docker socket not found")]
    SocketNotFound,

    #[error("permission denied accessing Docker")]
    PermissionDenied,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("build context error: {0}")]
    Context(String),

    #[error("build error: {0}")]
    Build(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("container error: {0}")]
    Container(String),
}

impl From<bollard::errors::Error> for DockerError {
    fn from(e: bollard::errors::Error) -> Self {
        let msg = e.to_string();
        if msg.contains("permission denied") || msg.contains("Permission denied") {
            DockerError::PermissionDenied
        } else if msg.contains("No such file or directory") && msg.contains("docker.sock") {
            DockerError::SocketNotFound
        } else if msg.contains("connection refused") || msg.contains("Connection refused") {
            DockerError::NotRunning
        } else {
            DockerError::Connection(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_stable() {
        assert_eq!(
            DockerError::NotRunning.to_string(),
            "Docker daemon is not running"
        );
        assert_eq!(
            DockerError::Build("step failed".to_string()).to_string(),
            "build error: step failed"
        );
        assert_eq!(
            DockerError::Context("manifest missing".to_string()).to_string(),
            "build context error: manifest missing"
        );
    }
}
