//! Configuration schema for botpack
//!
//! Defines the structure and defaults for the botpack.json file.

use serde::{Deserialize, Serialize};

/// Main configuration structure for a botpack project
///
/// Serialized to/from `<build-root>/botpack.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BotpackConfig {
    /// Config file version for migrations
    pub version: u32,

    /// Pinned interpreter version, MAJOR.MINOR (default: "3.12")
    ///
    /// Fixed at build time; the base image is derived from it and never
    /// mutated after the build completes.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Base image distribution variant (default: "slim")
    #[serde(default = "default_base_variant")]
    pub base_variant: String,

    /// Dependency manifest path, relative to the build root (default: "requirements.txt")
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Bot entrypoint path, relative to the build root (default: "bot.py")
    #[serde(default = "default_entrypoint")]
    pub entrypoint: String,

    /// Working directory inside the image (default: "/app")
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Image repository name (default: "botpack-bot")
    #[serde(default = "default_image")]
    pub image: String,

    /// Image tag (default: "latest")
    #[serde(default = "default_tag")]
    pub tag: String,
}

fn default_interpreter() -> String {
    "3.12".to_string()
}

fn default_base_variant() -> String {
    "slim".to_string()
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_entrypoint() -> String {
    "bot.py".to_string()
}

fn default_workdir() -> String {
    "/app".to_string()
}

fn default_image() -> String {
    "botpack-bot".to_string()
}

fn default_tag() -> String {
    "latest".to_string()
}

impl Default for BotpackConfig {
    fn default() -> Self {
        Self {
            version: 1,
            interpreter: default_interpreter(),
            base_variant: default_base_variant(),
            manifest: default_manifest(),
            entrypoint: default_entrypoint(),
            workdir: default_workdir(),
            image: default_image(),
            tag: default_tag(),
        }
    }
}

impl BotpackConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Base image reference derived from the pinned interpreter
    ///
    /// e.g. `python:3.12-slim`
    pub fn base_image(&self) -> String {
        format!("python:{}-{}", self.interpreter, self.base_variant)
    }

    /// Full image reference, `image:tag`
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotpackConfig::default();
        assert_eq!(config.version, 1);
        assert_eq!(config.interpreter, "3.12");
        assert_eq!(config.base_variant, "slim");
        assert_eq!(config.manifest, "requirements.txt");
        assert_eq!(config.entrypoint, "bot.py");
        assert_eq!(config.workdir, "/app");
        assert_eq!(config.image, "botpack-bot");
        assert_eq!(config.tag, "latest");
    }

    #[test]
    fn test_base_image_from_pin() {
        let config = BotpackConfig::default();
        assert_eq!(config.base_image(), "python:3.12-slim");
    }

    #[test]
    fn test_image_ref() {
        let config = BotpackConfig {
            image: "acme/aoc-bot".to_string(),
            tag: "v2".to_string(),
            ..BotpackConfig::default()
        };
        assert_eq!(config.image_ref(), "acme/aoc-bot:v2");
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let config = BotpackConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: BotpackConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"version": 1}"#;
        let config: BotpackConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, BotpackConfig::default());
    }

    #[test]
    fn test_reject_unknown_fields() {
        let json = r#"{"version": 1, "unknown_field": "value"}"#;
        let result: Result<BotpackConfig, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
