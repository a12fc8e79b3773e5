//! botpack-core - Core library for botpack
//!
//! botpack packages a single long-running bot process, together with its
//! dependency manifest, into a reproducible container image. This crate
//! provides:
//! - Project configuration (`botpack.json` schema, loading, validation)
//! - The immutable runtime environment record baked into built images
//! - The content-addressed layer graph and cache planning
//! - Docker operations (context assembly, image build, container run)

pub mod config;
pub mod docker;
pub mod plan;
pub mod runtime_env;

// Re-exported for CLI access to bollard types
pub use bollard;

pub use config::{
    BotpackConfig, ConfigError, config_path, load_config, load_config_or_default, save_config,
};
pub use runtime_env::RuntimeEnv;

/// Get the botpack version string
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
