//! Built-in services and the edition tiers that unlock them.

use craft_common::Edition;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::service::ServiceDefinition;
use crate::variable::{ConfigVariable, DeprecatorVariable, ElementsVariable};

/// Services available in every edition, as `(name, implementation)`.
pub const CORE_COMPONENTS: &[(&str, &str)] = &[
    ("app", "App"),
    ("config", "Config"),
    ("elements", "Elements"),
    ("cp", "Cp"),
    ("dashboard", "Dashboard"),
    ("deprecator", "Deprecator"),
    ("fields", "Fields"),
    ("feeds", "Feeds"),
    ("globals", "Globals"),
    ("plugins", "Plugins"),
    ("request", "HttpRequest"),
    ("routes", "Routes"),
    ("sections", "Sections"),
    ("systemSettings", "SystemSettings"),
    ("tasks", "Tasks"),
    ("updates", "Updates"),
    ("session", "UserSession"),
    ("i18n", "I18n"),
];

const CLIENT_COMPONENTS: &[(&str, &str)] = &[
    ("emailMessages", "EmailMessages"),
    ("entryRevisions", "EntryRevisions"),
    ("rebrand", "Rebrand"),
];

const PRO_COMPONENTS: &[(&str, &str)] = &[
    ("userGroups", "UserGroups"),
    ("userPermissions", "UserPermissions"),
];

/// Services a tier adds on top of the tiers below it.
pub fn tier_components(edition: Edition) -> &'static [(&'static str, &'static str)] {
    match edition {
        Edition::Personal => &[],
        Edition::Client => CLIENT_COMPONENTS,
        Edition::Pro => PRO_COMPONENTS,
    }
}

/// Every service name available to `edition`: core first, then each tier's
/// additions from the lowest tier up.
pub fn component_names(edition: Edition) -> Vec<&'static str> {
    CORE_COMPONENTS
        .iter()
        .chain(edition.tiers().flat_map(|tier| tier_components(tier).iter()))
        .map(|(name, _)| *name)
        .collect()
}

/// Definitions for every service available to `edition`.
pub fn component_definitions(edition: Edition) -> IndexMap<String, ServiceDefinition> {
    let mut definitions = IndexMap::new();
    for (name, implementation) in CORE_COMPONENTS
        .iter()
        .chain(edition.tiers().flat_map(|tier| tier_components(tier).iter()))
    {
        definitions.insert(name.to_string(), definition_for(name, implementation));
    }
    definitions
}

fn definition_for(name: &str, implementation: &str) -> ServiceDefinition {
    match name {
        "config" => ServiceDefinition::new(implementation, |ctx| {
            Arc::new(ConfigVariable::new(ctx.config.clone()))
        }),
        "deprecator" => ServiceDefinition::new(implementation, |ctx| {
            Arc::new(DeprecatorVariable::new(Arc::clone(ctx.deprecator)))
        }),
        "elements" => ServiceDefinition::new(implementation, |ctx| {
            Arc::new(ElementsVariable::new(
                Arc::clone(ctx.store),
                Arc::clone(ctx.resolver),
            ))
        }),
        _ => ServiceDefinition::core(implementation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personal_has_core_only() {
        let names = component_names(Edition::Personal);
        assert_eq!(names.len(), CORE_COMPONENTS.len());
        assert!(!names.contains(&"emailMessages"));
        assert!(!names.contains(&"userGroups"));
    }

    #[test]
    fn test_client_adds_client_services() {
        let names = component_names(Edition::Client);
        assert!(names.contains(&"rebrand"));
        assert!(!names.contains(&"userPermissions"));
    }

    #[test]
    fn test_pro_includes_every_lower_tier() {
        let names = component_names(Edition::Pro);
        for name in ["app", "i18n", "emailMessages", "entryRevisions", "rebrand", "userGroups", "userPermissions"] {
            assert!(names.contains(&name), "{name}");
        }
        assert_eq!(names.len(), CORE_COMPONENTS.len() + 5);
    }

    #[test]
    fn test_definitions_match_names() {
        for edition in Edition::ALL {
            let definitions = component_definitions(edition);
            let keys: Vec<&str> = definitions.keys().map(String::as_str).collect();
            assert_eq!(keys, component_names(edition));
        }
        let definitions = component_definitions(Edition::Personal);
        assert_eq!(definitions["request"].implementation(), "HttpRequest");
    }
}
