//! Configuration types

use craft_common::Edition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default language when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default URL segment prefix for page numbers (`/news/p2`).
pub const DEFAULT_PAGE_TRIGGER: &str = "p";

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    /// Licensed edition; gates which template services exist.
    pub edition: Edition,
    /// Language of the current request.
    pub language: String,
    /// Locales the site is published in.
    pub locales: Vec<String>,
    /// Prefix of the page-number URI segment.
    pub page_trigger: String,
    pub dev_mode: bool,
    /// Directory of site templates, if any.
    pub templates_path: Option<PathBuf>,
    /// Directory holding persisted field definitions.
    pub fields_path: Option<PathBuf>,
    /// Any other keys, exposed read-only to templates.
    #[serde(flatten)]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            edition: Edition::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            locales: Vec::new(),
            page_trigger: DEFAULT_PAGE_TRIGGER.to_string(),
            dev_mode: false,
            templates_path: None,
            fields_path: None,
            custom: BTreeMap::new(),
        }
    }
}

impl CraftConfig {
    /// Whether the site is published in more than one locale.
    pub fn is_localized(&self) -> bool {
        self.locales.len() > 1
    }

    /// Look up a configuration value by key, including custom keys.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        if let Some(value) = self.custom.get(key) {
            return Some(value.clone());
        }
        match serde_json::to_value(self).ok()? {
            serde_json::Value::Object(map) => map.get(key).cloned(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults() {
        let config = CraftConfig::default();
        assert_eq!(config.edition, Edition::Personal);
        assert_eq!(config.language, "en-US");
        assert_eq!(config.page_trigger, "p");
        assert!(!config.is_localized());
    }

    #[test]
    fn localized_needs_two_locales() {
        let mut config = CraftConfig {
            locales: vec!["en-US".into()],
            ..Default::default()
        };
        assert!(!config.is_localized());
        config.locales.push("de".into());
        assert!(config.is_localized());
    }

    #[test]
    fn get_reads_known_and_custom_keys() {
        let mut config = CraftConfig::default();
        config.custom.insert("siteName".into(), json!("Happy Lager"));
        assert_eq!(config.get("language"), Some(json!("en-US")));
        assert_eq!(config.get("edition"), Some(json!("personal")));
        assert_eq!(config.get("siteName"), Some(json!("Happy Lager")));
        assert_eq!(config.get("missing"), None);
    }
}
