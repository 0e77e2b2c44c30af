//! Configuration provider using Figment

use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::error::{ConfigError, ConfigResult};
use crate::types::CraftConfig;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Prefix of environment variables that override configuration.
pub const ENV_PREFIX: &str = "CRAFT_";

/// Loads [`CraftConfig`] from layered sources.
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. `craft.*` files discovered in the configuration directory
/// 3. `CRAFT_`-prefixed environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    dir: Option<PathBuf>,
    use_env: bool,
}

impl ConfigProvider {
    /// Provider reading defaults and environment variables only.
    pub fn new() -> Self {
        Self {
            dir: None,
            use_env: true,
        }
    }

    /// Also read configuration files from `dir`.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Skip environment variables (useful when embedding).
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load and validate the configuration.
    pub fn load(&self) -> ConfigResult<CraftConfig> {
        let figment = self.build_figment()?;
        let config: CraftConfig = figment.extract()?;
        validate(&config)?;
        info!(
            edition = %config.edition,
            language = %config.language,
            "loaded configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::from(Serialized::defaults(CraftConfig::default()));

        if let Some(dir) = &self.dir {
            if !dir.is_dir() {
                return Err(ConfigError::DirectoryNotFound { path: dir.clone() });
            }
            for file in FileDiscovery::new(dir).discover_all() {
                figment = figment.merge(load_config_file(&file));
            }
        }

        if self.use_env {
            trace!("Merging {}* environment variables", ENV_PREFIX);
            figment = figment.merge(Env::prefixed(ENV_PREFIX));
        }

        Ok(figment)
    }
}

fn load_config_file(config_file: &ConfigFile) -> Figment {
    let path = &config_file.path;
    trace!("Loading config file: {}", path.display());
    match config_file.format {
        ConfigFormat::Toml => Figment::from(Toml::file(path)),
        ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
        ConfigFormat::Json => Figment::from(Json::file(path)),
    }
}

fn validate(config: &CraftConfig) -> ConfigResult<()> {
    if config.page_trigger.is_empty() {
        return Err(ConfigError::invalid_value("page_trigger", "must not be empty"));
    }
    if config.page_trigger.contains('/') {
        return Err(ConfigError::invalid_value(
            "page_trigger",
            "must not contain '/'",
        ));
    }
    if config.language.trim().is_empty() {
        return Err(ConfigError::invalid_value("language", "must not be empty"));
    }
    Ok(())
}
