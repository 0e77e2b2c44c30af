//! Craft configuration management using Figment
//!
//! Loads [`CraftConfig`] from layered sources with a clear precedence:
//! defaults → `craft.{toml,yaml,yml,json}` in the configuration directory →
//! `CRAFT_*` environment variables.
//!
//! ```no_run
//! use craft_config::ConfigProvider;
//!
//! let config = ConfigProvider::new().with_dir("config").load()?;
//! println!("edition: {}", config.edition);
//! # Ok::<(), craft_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

pub use discovery::{ConfigFile, ConfigFormat, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use types::{CraftConfig, DEFAULT_LANGUAGE, DEFAULT_PAGE_TRIGGER};

/// Load configuration from `dir` plus the environment.
pub fn load_configuration(dir: impl Into<std::path::PathBuf>) -> ConfigResult<CraftConfig> {
    ConfigProvider::new().with_dir(dir).load()
}
