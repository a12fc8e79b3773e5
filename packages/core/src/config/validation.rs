//! Config validation
//!
//! Field-level checks for botpack.json beyond what serde enforces.

use super::BotpackConfig;
use std::path::Path;

/// Validate a config, returning a list of human-readable issues
///
/// An empty list means the config is valid.
pub fn validate_config(config: &BotpackConfig) -> Vec<String> {
    let mut issues = Vec::new();

    if config.version != 1 {
        issues.push(format!(
            "version: unsupported config version {} (expected 1)",
            config.version
        ));
    }

    if !is_valid_interpreter_pin(&config.interpreter) {
        issues.push(format!(
            "interpreter: '{}' is not a MAJOR.MINOR version pin (e.g. \"3.12\")",
            config.interpreter
        ));
    }

    if config.base_variant.is_empty()
        || !config
            .base_variant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        issues.push(format!(
            "base_variant: '{}' is not a valid image tag component",
            config.base_variant
        ));
    }

    if let Some(issue) = check_relative_path("manifest", &config.manifest) {
        issues.push(issue);
    }
    if let Some(issue) = check_relative_path("entrypoint", &config.entrypoint) {
        issues.push(issue);
    }

    if !config.workdir.starts_with('/') {
        issues.push(format!(
            "workdir: '{}' must be an absolute path",
            config.workdir
        ));
    }

    if !is_valid_repository(&config.image) {
        issues.push(format!(
            "image: '{}' is not a valid image repository name",
            config.image
        ));
    }

    if config.tag.is_empty()
        || !config
            .tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
    {
        issues.push(format!("tag: '{}' is not a valid image tag", config.tag));
    }

    issues
}

/// Interpreter pins are MAJOR.MINOR, both numeric
fn is_valid_interpreter_pin(pin: &str) -> bool {
    let mut parts = pin.split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !major.is_empty()
        && !minor.is_empty()
        && major.chars().all(|c| c.is_ascii_digit())
        && minor.chars().all(|c| c.is_ascii_digit())
}

/// Manifest and entrypoint must stay inside the build root
fn check_relative_path(field: &str, value: &str) -> Option<String> {
    if value.is_empty() {
        return Some(format!("{field}: path must not be empty"));
    }
    let path = Path::new(value);
    if path.is_absolute() {
        return Some(format!(
            "{field}: '{value}' must be relative to the build root"
        ));
    }
    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Some(format!("{field}: '{value}' must not escape the build root"));
    }
    None
}

/// Repository names: lowercase alphanumerics with separators, optional namespace
fn is_valid_repository(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.split('/').all(|component| {
        !component.is_empty()
            && component
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c))
            && component.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BotpackConfig::default()).is_empty());
    }

    #[test]
    fn interpreter_pin_must_be_major_minor() {
        assert!(is_valid_interpreter_pin("3.12"));
        assert!(is_valid_interpreter_pin("3.9"));
        assert!(!is_valid_interpreter_pin("3"));
        assert!(!is_valid_interpreter_pin("3.12.1"));
        assert!(!is_valid_interpreter_pin("latest"));
        assert!(!is_valid_interpreter_pin("3.x"));
    }

    #[test]
    fn absolute_manifest_path_rejected() {
        let config = BotpackConfig {
            manifest: "/etc/requirements.txt".to_string(),
            ..BotpackConfig::default()
        };
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.starts_with("manifest:")));
    }

    #[test]
    fn parent_dir_entrypoint_rejected() {
        let config = BotpackConfig {
            entrypoint: "../bot.py".to_string(),
            ..BotpackConfig::default()
        };
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.contains("escape the build root")));
    }

    #[test]
    fn relative_workdir_rejected() {
        let config = BotpackConfig {
            workdir: "app".to_string(),
            ..BotpackConfig::default()
        };
        let issues = validate_config(&config);
        assert!(issues.iter().any(|i| i.starts_with("workdir:")));
    }

    #[test]
    fn repository_names() {
        assert!(is_valid_repository("botpack-bot"));
        assert!(is_valid_repository("acme/aoc-bot"));
        assert!(is_valid_repository("ghcr.io/acme/bot"));
        assert!(!is_valid_repository(""));
        assert!(!is_valid_repository("Bot"));
        assert!(!is_valid_repository("acme//bot"));
    }

    #[test]
    fn multiple_issues_are_collected() {
        let config = BotpackConfig {
            interpreter: "latest".to_string(),
            workdir: "app".to_string(),
            ..BotpackConfig::default()
        };
        assert_eq!(validate_config(&config).len(), 2);
    }
}
