//! Runtime environment configuration baked into built images
//!
//! Two process-wide settings are fixed at build time for every process
//! started from a botpack image: output streams are unbuffered (log lines
//! are observable immediately, which external log collection depends on),
//! and the package installer's local cache is disabled (keeps the image
//! minimal). They are modeled as an immutable record rather than ambient
//! state; operators can still override them at container start through the
//! runtime's normal environment injection.

use serde::{Deserialize, Serialize};

/// Environment variable forcing unbuffered interpreter output
pub const ENV_UNBUFFERED: &str = "PYTHONUNBUFFERED";

/// Environment variable disabling the installer's package cache
pub const ENV_NO_CACHE: &str = "PIP_NO_CACHE_DIR";

/// Immutable environment settings attached to the image artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnv {
    /// Force immediate flush of output streams
    pub unbuffered_output: bool,
    /// Suppress persistence of the package-manager cache between installs
    pub cache_disabled: bool,
}

impl Default for RuntimeEnv {
    fn default() -> Self {
        Self {
            unbuffered_output: true,
            cache_disabled: true,
        }
    }
}

impl RuntimeEnv {
    /// The `KEY=VALUE` pairs this record bakes into the image
    ///
    /// Order is stable so that rendered Dockerfiles (and therefore layer
    /// digests) are deterministic.
    pub fn env_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.unbuffered_output {
            lines.push(format!("{ENV_UNBUFFERED}=1"));
        }
        if self.cache_disabled {
            lines.push(format!("{ENV_NO_CACHE}=1"));
        }
        lines
    }

    /// Merge operator-provided overrides on top of the baked defaults
    ///
    /// Overrides use the container runtime's standard `KEY=VALUE` injection;
    /// an operator value for a baked key replaces it. Returns the final env
    /// list to hand to the container runtime.
    pub fn apply_overrides(&self, overrides: &[String]) -> Vec<String> {
        let mut env = self.env_lines();
        for entry in overrides {
            let key = entry.split('=').next().unwrap_or(entry);
            env.retain(|existing| {
                existing.split('=').next().unwrap_or(existing) != key
            });
            env.push(entry.clone());
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bake_both_settings() {
        let env = RuntimeEnv::default();
        assert_eq!(env.env_lines(), vec!["PYTHONUNBUFFERED=1", "PIP_NO_CACHE_DIR=1"]);
    }

    #[test]
    fn disabled_settings_emit_nothing() {
        let env = RuntimeEnv {
            unbuffered_output: false,
            cache_disabled: false,
        };
        assert!(env.env_lines().is_empty());
    }

    #[test]
    fn operator_override_wins_for_baked_key() {
        let env = RuntimeEnv::default();
        let merged = env.apply_overrides(&["PYTHONUNBUFFERED=0".to_string()]);
        assert_eq!(merged, vec!["PIP_NO_CACHE_DIR=1", "PYTHONUNBUFFERED=0"]);
    }

    #[test]
    fn unrelated_overrides_append() {
        let env = RuntimeEnv::default();
        let merged = env.apply_overrides(&["TZ=Europe/Berlin".to_string()]);
        assert_eq!(
            merged,
            vec!["PYTHONUNBUFFERED=1", "PIP_NO_CACHE_DIR=1", "TZ=Europe/Berlin"]
        );
    }

    #[test]
    fn later_override_replaces_earlier() {
        let env = RuntimeEnv::default();
        let merged = env.apply_overrides(&[
            "TZ=UTC".to_string(),
            "TZ=Europe/Berlin".to_string(),
        ]);
        assert_eq!(merged.iter().filter(|e| e.starts_with("TZ=")).count(), 1);
        assert!(merged.contains(&"TZ=Europe/Berlin".to_string()));
    }
}
