//! Licensing tiers.
//!
//! Editions are ordered: every tier includes the features of the tiers below
//! it. Consumers that gate features by edition walk [`Edition::tiers`] and
//! merge each tier's additions, so cumulativeness is explicit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A licensing level gating which services and fields are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Personal,
    Client,
    Pro,
}

impl Edition {
    /// All editions, lowest tier first.
    pub const ALL: [Edition; 3] = [Edition::Personal, Edition::Client, Edition::Pro];

    /// Tiers included by this edition, lowest first (always ends with `self`).
    pub fn tiers(self) -> impl Iterator<Item = Edition> {
        Self::ALL.into_iter().filter(move |tier| *tier <= self)
    }

    /// Lower-case name, as used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Edition::Personal => "personal",
            Edition::Client => "client",
            Edition::Pro => "pro",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown edition name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEdition(pub String);

impl fmt::Display for UnknownEdition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown edition: {}", self.0)
    }
}

impl std::error::Error for UnknownEdition {}

impl FromStr for Edition {
    type Err = UnknownEdition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "personal" => Ok(Edition::Personal),
            "client" => Ok(Edition::Client),
            "pro" => Ok(Edition::Pro),
            _ => Err(UnknownEdition(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_cumulative() {
        assert_eq!(Edition::Personal.tiers().collect::<Vec<_>>(), vec![Edition::Personal]);
        assert_eq!(
            Edition::Client.tiers().collect::<Vec<_>>(),
            vec![Edition::Personal, Edition::Client]
        );
        assert_eq!(
            Edition::Pro.tiers().collect::<Vec<_>>(),
            vec![Edition::Personal, Edition::Client, Edition::Pro]
        );
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Pro".parse::<Edition>().unwrap(), Edition::Pro);
        assert_eq!(" client ".parse::<Edition>().unwrap(), Edition::Client);
        assert!("enterprise".parse::<Edition>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Edition::Client).unwrap();
        assert_eq!(json, "\"client\"");
        let parsed: Edition = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(parsed, Edition::Pro);
    }
}
