//! Configuration file discovery
//!
//! Looks for `craft.{toml,yaml,yml,json}` in a configuration directory and
//! returns the files that exist in merge order (later files override earlier
//! ones when merged by figment).

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Base name of configuration files.
pub const CONFIG_FILE_STEM: &str = "craft";

/// Extensions searched, in merge order.
const SEARCH_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (.toml extension)
    Toml,
    /// YAML format (.yaml or .yml extensions)
    Yaml,
    /// JSON format (.json extension)
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
}

/// Finds configuration files in one directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    dir: PathBuf,
}

impl FileDiscovery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory being searched.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Existing configuration files in merge order.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let mut files = Vec::new();
        for ext in SEARCH_EXTENSIONS {
            let path = self.dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
            if !path.is_file() {
                continue;
            }
            if let Some(format) = ConfigFormat::from_extension(ext) {
                trace!("Found config: {} ({:?})", path.display(), format);
                files.push(ConfigFile { path, format });
            }
        }
        debug!(
            dir = %self.dir.display(),
            count = files.len(),
            "discovered configuration files"
        );
        files
    }
}
