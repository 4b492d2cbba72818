//! Configuration system for the Horizon world runtime.
//!
//! World, streaming, navigation, collision and meshing parameters persist to
//! disk as a RON file. Values are validated once at startup, may be overridden
//! from the command line via clap, and are treated as read-only afterwards:
//! changing them requires an explicit regeneration of the world.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CollisionConfig, Config, DebugConfig, MeshConfig, NavigationConfig, SearchAlgorithm,
    StreamingConfig, WorldConfig,
};
pub use error::ConfigError;

/// Default configuration directory (`<platform config dir>/horizon`), if the
/// platform exposes one.
pub fn default_config_dir() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("horizon"))
}
