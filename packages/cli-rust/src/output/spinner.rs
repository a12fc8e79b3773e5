//! Spinner helpers for long-running commands
//!
//! Wraps indicatif with a quiet-aware constructor so commands do not have
//! to branch on the quiet flag at every call site.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A single spinner for a command-level operation
///
/// When constructed with `new_maybe(.., true)` the spinner is inert and all
/// methods are no-ops.
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
}

impl CommandSpinner {
    /// Create a spinner unless quiet mode is enabled
    pub fn new_maybe(message: &str, quiet: bool) -> Self {
        if quiet {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Update the spinner message
    pub fn update(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Finish with a success checkmark
    pub fn success(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("✓ {message}"));
        }
    }

    /// Finish with a failure mark
    pub fn fail(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("✗ {message}"));
        }
    }
}
