//! Output utilities for CLI commands
//!
//! Terminal output helpers: spinners for long-running operations, color
//! utilities for log level styling, and centralized Docker error
//! formatting with actionable guidance.

pub mod colors;
pub mod errors;
pub mod spinner;

pub use colors::log_level_style;
pub use errors::{format_docker_error, format_docker_error_anyhow, show_docker_error};
pub use spinner::CommandSpinner;
