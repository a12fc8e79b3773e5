//! Docker client wrapper with connection handling

use super::DockerError;
use bollard::Docker;
use tracing::debug;

/// Wrapper around the bollard Docker client
///
/// Holds a verified connection to the local Docker daemon.
#[derive(Clone)]
pub struct DockerClient {
    inner: Docker,
}

impl DockerClient {
    /// Connect to the local Docker daemon and verify it responds
    pub async fn connect() -> Result<Self, DockerError> {
        let inner = Docker::connect_with_local_defaults().map_err(DockerError::from)?;
        let client = Self { inner };
        client.verify_connection().await?;
        Ok(client)
    }

    /// Ping the daemon to confirm the connection is usable
    pub async fn verify_connection(&self) -> Result<(), DockerError> {
        debug!("Pinging Docker daemon");
        self.inner.ping().await.map_err(DockerError::from)?;
        Ok(())
    }

    /// Access the underlying bollard client
    pub fn inner(&self) -> &Docker {
        &self.inner
    }
}
