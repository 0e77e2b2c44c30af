//! Element kinds and their queryable attributes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ElementsError;

/// Attributes every element kind can be queried by.
pub const COMMON_ATTRIBUTES: &[&str] = &[
    "id",
    "uid",
    "slug",
    "title",
    "status",
    "dateCreated",
    "dateUpdated",
    "locale",
];

/// Criteria keys with special meaning that are never attribute constraints.
pub const RESERVED_CRITERIA_KEYS: &[&str] = &["limit", "offset", "orderBy", "relatedTo"];

const ASSET_ATTRIBUTES: &[&str] = &[
    "volumeId", "folderId", "filename", "kind", "width", "height", "size",
];
const CATEGORY_ATTRIBUTES: &[&str] = &["groupId", "group", "level"];
const ENTRY_ATTRIBUTES: &[&str] = &[
    "sectionId",
    "section",
    "type",
    "authorId",
    "postDate",
    "expiryDate",
];
const TAG_ATTRIBUTES: &[&str] = &["groupId", "group"];
const USER_ATTRIBUTES: &[&str] = &[
    "email",
    "username",
    "firstName",
    "lastName",
    "groupId",
    "group",
    "admin",
    "lastLoginDate",
];

/// A typed content record kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Asset,
    Category,
    Entry,
    Tag,
    User,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Asset,
        ElementKind::Category,
        ElementKind::Entry,
        ElementKind::Tag,
        ElementKind::User,
    ];

    /// Singular lower-case handle, e.g. `entry`.
    pub fn handle(self) -> &'static str {
        match self {
            ElementKind::Asset => "asset",
            ElementKind::Category => "category",
            ElementKind::Entry => "entry",
            ElementKind::Tag => "tag",
            ElementKind::User => "user",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ElementKind::Asset => "Asset",
            ElementKind::Category => "Category",
            ElementKind::Entry => "Entry",
            ElementKind::Tag => "Tag",
            ElementKind::User => "User",
        }
    }

    /// Backing table for SQL rendering.
    pub fn table(self) -> &'static str {
        match self {
            ElementKind::Asset => "assets",
            ElementKind::Category => "categories",
            ElementKind::Entry => "entries",
            ElementKind::Tag => "tags",
            ElementKind::User => "users",
        }
    }

    /// Attributes specific to this kind (excluding [`COMMON_ATTRIBUTES`]).
    pub fn own_attributes(self) -> &'static [&'static str] {
        match self {
            ElementKind::Asset => ASSET_ATTRIBUTES,
            ElementKind::Category => CATEGORY_ATTRIBUTES,
            ElementKind::Entry => ENTRY_ATTRIBUTES,
            ElementKind::Tag => TAG_ATTRIBUTES,
            ElementKind::User => USER_ATTRIBUTES,
        }
    }

    /// All native queryable attributes, common ones first.
    pub fn attributes(self) -> impl Iterator<Item = &'static str> {
        COMMON_ATTRIBUTES
            .iter()
            .chain(self.own_attributes().iter())
            .copied()
    }

    /// Whether `name` is a native (non custom field) attribute of this kind.
    pub fn is_native_attribute(self, name: &str) -> bool {
        COMMON_ATTRIBUTES.contains(&name) || self.own_attributes().contains(&name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handle())
    }
}

impl FromStr for ElementKind {
    type Err = ElementsError;

    /// Accepts singular or plural handles in any case (`entry`, `Entries`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.handle() == lower || kind.table() == lower)
            .ok_or_else(|| ElementsError::UnknownElementKind {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singular_and_plural() {
        assert_eq!("entry".parse::<ElementKind>().unwrap(), ElementKind::Entry);
        assert_eq!("Categories".parse::<ElementKind>().unwrap(), ElementKind::Category);
        assert!("globalset".parse::<ElementKind>().is_err());
    }

    #[test]
    fn native_attributes_include_common_and_own() {
        assert!(ElementKind::Asset.is_native_attribute("title"));
        assert!(ElementKind::Asset.is_native_attribute("filename"));
        assert!(!ElementKind::Entry.is_native_attribute("filename"));
        assert!(ElementKind::User.is_native_attribute("email"));
    }

    #[test]
    fn attributes_list_common_first() {
        let attrs: Vec<_> = ElementKind::Tag.attributes().collect();
        assert_eq!(attrs[0], "id");
        assert_eq!(attrs.last(), Some(&"group"));
    }

    #[test]
    fn no_attribute_collides_with_reserved_keys() {
        for kind in ElementKind::ALL {
            for attr in kind.attributes() {
                assert!(!RESERVED_CRITERIA_KEYS.contains(&attr), "{kind}: {attr}");
            }
        }
    }
}
