//! Color utilities for CLI output
//!
//! Styles streamed bot log lines by detected log level.

use console::{Style, StyledObject};

const ERROR_MARKERS: [&str; 2] = ["ERROR", "error"];
const WARN_MARKERS: [&str; 2] = ["WARN", "warn"];
const INFO_MARKERS: [&str; 2] = ["INFO", "info"];
const DEBUG_MARKERS: [&str; 2] = ["DEBUG", "debug"];

fn has_marker(line: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| line.contains(m))
}

/// Style a streamed bot log line based on detected log level
///
/// Errors render red, warnings yellow, info cyan, debug dim. Lines with
/// no recognizable level pass through unstyled.
pub fn log_level_style(line: &str) -> StyledObject<&str> {
    let style = if has_marker(line, &ERROR_MARKERS) {
        Style::new().red()
    } else if has_marker(line, &WARN_MARKERS) {
        Style::new().yellow()
    } else if has_marker(line, &INFO_MARKERS) {
        Style::new().cyan()
    } else if has_marker(line, &DEBUG_MARKERS) {
        Style::new().dim()
    } else {
        Style::new()
    };
    style.apply_to(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_lines_detected() {
        let styled = log_level_style("2026-08-30 ERROR: webhook post failed");
        assert!(styled.to_string().contains("ERROR"));
    }

    #[test]
    fn warn_lines_detected() {
        let styled = log_level_style("2026-08-30 WARN: retrying fetch");
        assert!(styled.to_string().contains("WARN"));
    }

    #[test]
    fn info_lines_detected() {
        let styled = log_level_style("2026-08-30 INFO: scheduler started");
        assert!(styled.to_string().contains("INFO"));
    }

    #[test]
    fn plain_lines_pass_through() {
        let styled = log_level_style("plain log line");
        assert_eq!(styled.to_string(), "plain log line");
    }
}
