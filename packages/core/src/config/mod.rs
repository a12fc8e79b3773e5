//! Project configuration for botpack
//!
//! A botpack project is a build root directory holding `botpack.json`,
//! a dependency manifest, and the bot entrypoint. This module defines the
//! config schema, JSONC-tolerant loading, and validation.

mod schema;
mod validation;

pub use schema::BotpackConfig;
pub use validation::validate_config;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project config file inside the build root
pub const CONFIG_FILE_NAME: &str = "botpack.json";

/// Errors raised while loading or saving the project config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("invalid config:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

/// Path of the config file for a given build root
pub fn config_path(build_root: &Path) -> PathBuf {
    build_root.join(CONFIG_FILE_NAME)
}

/// Load and validate the project config from the build root
///
/// The file is parsed as JSONC, so comments and trailing commas are allowed.
pub fn load_config(build_root: &Path) -> Result<BotpackConfig, ConfigError> {
    let path = config_path(build_root);
    if !path.exists() {
        return Err(ConfigError::NotFound(path));
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let config = parse_config(&raw)?;

    let issues = validate_config(&config);
    if !issues.is_empty() {
        return Err(ConfigError::Validation(issues));
    }

    Ok(config)
}

/// Load the project config, falling back to defaults when the file is absent
///
/// A present-but-invalid file is still an error; only a missing file falls
/// back silently.
pub fn load_config_or_default(build_root: &Path) -> Result<BotpackConfig, ConfigError> {
    match load_config(build_root) {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) => Ok(BotpackConfig::default()),
        Err(e) => Err(e),
    }
}

/// Write the project config to the build root as pretty-printed JSON
pub fn save_config(build_root: &Path, config: &BotpackConfig) -> Result<(), ConfigError> {
    let path = config_path(build_root);
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Parse(format!("failed to serialize config: {e}")))?;
    std::fs::write(&path, json + "\n").map_err(|source| ConfigError::Io { path, source })
}

fn parse_config(raw: &str) -> Result<BotpackConfig, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(raw, &Default::default())
        .map_err(|e| ConfigError::Parse(e.to_string()))?
        .ok_or_else(|| ConfigError::Parse("config file is empty".to_string()))?;

    serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
}
