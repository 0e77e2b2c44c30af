//! FieldStore: persisted field definitions.
//!
//! Definitions live as YAML files, one per field, named after the handle:
//!
//! ```text
//! fields/
//!   accentColor.yaml
//!   summary.yaml
//! ```
//!
//! Writes go to a temp file and are renamed into place. The store keeps
//! in-memory indexes by handle and by ULID.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{FieldsError, Result};
use crate::registry::FieldRegistry;
use crate::schema::ContentSchema;
use crate::types::{validate_handle, FieldDef};

/// Definitions written when a store is first opened.
///
/// Matched by ULID: a default whose id is already on disk is skipped, even if
/// the stored copy has since been renamed or edited. A default whose handle
/// belongs to another stored definition is skipped as well.
#[derive(Debug, Clone, Default)]
pub struct FieldDefaults {
    fields: Vec<FieldDef>,
}

impl FieldDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// Builder returned by [`FieldStore::open`].
#[derive(Debug)]
pub struct FieldStoreBuilder {
    root: PathBuf,
    defaults: Option<FieldDefaults>,
}

impl FieldStoreBuilder {
    pub fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Create the directory, seed defaults, load from disk.
    pub async fn build(self) -> Result<FieldStore> {
        fs::create_dir_all(&self.root).await?;

        if let Some(defaults) = &self.defaults {
            seed_defaults(&self.root, defaults).await?;
        }

        let mut store = FieldStore {
            root: self.root,
            fields: Vec::new(),
            handle_index: HashMap::new(),
            id_index: HashMap::new(),
        };
        store.load_definitions().await?;

        debug!(fields = store.fields.len(), root = ?store.root, "field store opened");
        Ok(store)
    }
}

async fn seed_defaults(root: &Path, defaults: &FieldDefaults) -> Result<()> {
    let mut existing = collect_existing(root).await?;
    for def in defaults.fields() {
        if existing.contains_key(&def.id) {
            continue;
        }
        let owner = existing
            .iter()
            .find_map(|(id, handle)| (*handle == def.handle).then_some(*id));
        if let Some(owner) = owner {
            warn!(
                handle = %def.handle,
                id = %def.id,
                owner = %owner,
                "default field handle already in use, skipping"
            );
            continue;
        }
        validate_handle(&def.handle)?;
        let yaml = serde_yaml::to_string(def)?;
        atomic_write(&definition_path(root, &def.handle), yaml.as_bytes()).await?;
        existing.insert(def.id, def.handle.clone());
        debug!(handle = %def.handle, id = %def.id, "seeded default field");
    }
    Ok(())
}

/// ULID to handle for every readable definition on disk.
async fn collect_existing(root: &Path) -> Result<HashMap<Ulid, String>> {
    let mut existing = HashMap::new();
    let mut entries = fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !is_yaml(&path) {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path).await {
            if let Ok(def) = serde_yaml::from_str::<FieldDef>(&content) {
                existing.insert(def.id, def.handle);
            }
        }
    }
    Ok(existing)
}

/// Persisted field definitions with lookup by handle and ULID.
#[derive(Debug)]
pub struct FieldStore {
    root: PathBuf,
    fields: Vec<FieldDef>,
    handle_index: HashMap<String, usize>,
    id_index: HashMap<Ulid, usize>,
}

impl FieldStore {
    /// Open or create a fields directory.
    ///
    /// ```rust,ignore
    /// let store = FieldStore::open(dir)
    ///     .with_defaults(FieldDefaults::new().field(accent_color()))
    ///     .build()
    ///     .await?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> FieldStoreBuilder {
        FieldStoreBuilder {
            root: root.into(),
            defaults: None,
        }
    }

    pub fn get_field(&self, handle: &str) -> Option<&FieldDef> {
        self.handle_index.get(handle).map(|&i| &self.fields[i])
    }

    pub fn get_field_by_id(&self, id: &Ulid) -> Option<&FieldDef> {
        self.id_index.get(id).map(|&i| &self.fields[i])
    }

    /// Like [`get_field`](Self::get_field) but failing with `FieldNotFound`.
    pub fn require_field(&self, handle: &str) -> Result<&FieldDef> {
        self.get_field(handle).ok_or_else(|| FieldsError::FieldNotFound {
            handle: handle.to_string(),
        })
    }

    /// All definitions, sorted by handle.
    pub fn all_fields(&self) -> Vec<&FieldDef> {
        let mut fields: Vec<&FieldDef> = self.fields.iter().collect();
        fields.sort_by(|a, b| a.handle.cmp(&b.handle));
        fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create or update a definition and persist it.
    ///
    /// Updates are matched by ULID; a changed handle renames the file. A
    /// handle already used by a different definition is rejected.
    pub async fn write_field(&mut self, def: &FieldDef) -> Result<()> {
        validate_handle(&def.handle)?;
        if let Some(&idx) = self.handle_index.get(&def.handle) {
            if self.fields[idx].id != def.id {
                return Err(FieldsError::DuplicateFieldHandle {
                    handle: def.handle.clone(),
                });
            }
        }

        let path = definition_path(&self.root, &def.handle);
        let yaml = serde_yaml::to_string(def)?;
        atomic_write(&path, yaml.as_bytes()).await?;

        if let Some(&idx) = self.id_index.get(&def.id) {
            let old_handle = self.fields[idx].handle.clone();
            if old_handle != def.handle {
                if let Err(e) = remove_definition(&definition_path(&self.root, &old_handle)).await {
                    // Leave the old file as the only copy.
                    if let Err(undo) = remove_definition(&path).await {
                        warn!(?path, %undo, "failed to roll back renamed field definition");
                    }
                    return Err(e);
                }
                self.handle_index.remove(&old_handle);
                debug!(from = %old_handle, to = %def.handle, "renamed field");
            }
            self.fields[idx] = def.clone();
            self.handle_index.insert(def.handle.clone(), idx);
        } else {
            let idx = self.fields.len();
            self.fields.push(def.clone());
            self.handle_index.insert(def.handle.clone(), idx);
            self.id_index.insert(def.id, idx);
            debug!(handle = %def.handle, id = %def.id, "created field");
        }
        Ok(())
    }

    /// Delete a definition by ULID.
    pub async fn delete_field(&mut self, id: &Ulid) -> Result<()> {
        let idx = self
            .id_index
            .get(id)
            .copied()
            .ok_or_else(|| FieldsError::FieldNotFoundById { id: id.to_string() })?;

        let handle = self.fields[idx].handle.clone();
        remove_definition(&definition_path(&self.root, &handle)).await?;
        self.handle_index.remove(&handle);
        self.id_index.remove(id);

        self.fields.swap_remove(idx);
        if idx < self.fields.len() {
            let moved = &self.fields[idx];
            self.handle_index.insert(moved.handle.clone(), idx);
            self.id_index.insert(moved.id, idx);
        }
        debug!(handle = %handle, id = %id, "deleted field");
        Ok(())
    }

    /// Instantiate every stored definition, in handle order.
    pub fn load_schema(&self, registry: &FieldRegistry) -> Result<ContentSchema> {
        let mut schema = ContentSchema::new();
        for def in self.all_fields() {
            schema.add(registry.create(def)?)?;
        }
        Ok(schema)
    }

    async fn load_definitions(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_yaml(&path) {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_yaml::from_str::<FieldDef>(&content) {
                Ok(def) if self.handle_index.contains_key(&def.handle) => {
                    warn!(?path, handle = %def.handle, "skipping field definition with duplicate handle");
                }
                Ok(def) if self.id_index.contains_key(&def.id) => {
                    warn!(?path, id = %def.id, "skipping field definition with duplicate id");
                }
                Ok(def) => {
                    let idx = self.fields.len();
                    self.handle_index.insert(def.handle.clone(), idx);
                    self.id_index.insert(def.id, idx);
                    self.fields.push(def);
                }
                Err(e) => {
                    warn!(?path, %e, "skipping invalid field definition");
                }
            }
        }
        Ok(())
    }
}

fn definition_path(root: &Path, handle: &str) -> PathBuf {
    root.join(format!("{handle}.yaml"))
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml" | "yml"))
}

/// Remove a definition file; a file that is already gone is not an error.
async fn remove_definition(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn accent_color() -> FieldDef {
        FieldDef::new("Accent Color", "accentColor", "Color")
            .with_id(Ulid::from_string("00000000000000000000000001").unwrap())
    }

    #[tokio::test]
    async fn open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("fields");
        let store = FieldStore::open(&root).build().await.unwrap();
        assert!(root.is_dir());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn write_and_read_field() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();

        let def = accent_color();
        store.write_field(&def).await.unwrap();
        assert!(tmp.path().join("accentColor.yaml").exists());
        assert_eq!(store.get_field("accentColor"), Some(&def));
        assert_eq!(store.get_field_by_id(&def.id).unwrap().handle, "accentColor");

        let reopened = FieldStore::open(tmp.path()).build().await.unwrap();
        assert_eq!(reopened.get_field("accentColor"), Some(&def));
    }

    #[tokio::test]
    async fn rename_moves_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();

        let mut def = accent_color();
        store.write_field(&def).await.unwrap();
        def.handle = "brandColor".into();
        store.write_field(&def).await.unwrap();

        assert!(!tmp.path().join("accentColor.yaml").exists());
        assert!(tmp.path().join("brandColor.yaml").exists());
        assert!(store.get_field("accentColor").is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_handle_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        store.write_field(&accent_color()).await.unwrap();

        let other = FieldDef::new("Other", "accentColor", "PlainText");
        let err = store.write_field(&other).await.unwrap_err();
        assert!(matches!(err, FieldsError::DuplicateFieldHandle { .. }));
    }

    #[tokio::test]
    async fn invalid_handle_rejected_before_write() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let err = store
            .write_field(&FieldDef::new("Slug", "slug", "PlainText"))
            .await
            .unwrap_err();
        assert!(matches!(err, FieldsError::Configuration { .. }));
        assert!(!tmp.path().join("slug.yaml").exists());
    }

    #[tokio::test]
    async fn delete_field() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let def = accent_color();
        let summary = FieldDef::new("Summary", "summary", "PlainText");
        store.write_field(&def).await.unwrap();
        store.write_field(&summary).await.unwrap();

        store.delete_field(&def.id).await.unwrap();
        assert!(store.get_field("accentColor").is_none());
        assert_eq!(store.get_field("summary"), Some(&summary));
        assert!(!tmp.path().join("accentColor.yaml").exists());

        let err = store.delete_field(&def.id).await.unwrap_err();
        assert!(matches!(err, FieldsError::FieldNotFoundById { .. }));
    }

    #[tokio::test]
    async fn defaults_seed_once_and_preserve_edits() {
        let tmp = TempDir::new().unwrap();
        let defaults = FieldDefaults::new().field(accent_color());

        let mut store = FieldStore::open(tmp.path())
            .with_defaults(defaults.clone())
            .build()
            .await
            .unwrap();
        let mut edited = accent_color();
        edited.name = "Brand".into();
        store.write_field(&edited).await.unwrap();

        let reopened = FieldStore::open(tmp.path())
            .with_defaults(defaults)
            .build()
            .await
            .unwrap();
        assert_eq!(reopened.require_field("accentColor").unwrap().name, "Brand");
    }

    #[tokio::test]
    async fn default_does_not_replace_field_with_same_handle() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let user = FieldDef::new("Accent", "accentColor", "PlainText");
        store.write_field(&user).await.unwrap();

        let reopened = FieldStore::open(tmp.path())
            .with_defaults(FieldDefaults::new().field(accent_color()))
            .build()
            .await
            .unwrap();
        let got = reopened.require_field("accentColor").unwrap();
        assert_eq!(got.id, user.id);
        assert_eq!(got.type_, "PlainText");
        assert!(reopened.get_field_by_id(&accent_color().id).is_none());
        assert_eq!(reopened.len(), 1);
    }

    #[tokio::test]
    async fn delete_failure_keeps_field() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let def = accent_color();
        store.write_field(&def).await.unwrap();

        // A directory in place of the file makes removal fail, even as root.
        let path = tmp.path().join("accentColor.yaml");
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = store.delete_field(&def.id).await.unwrap_err();
        assert!(matches!(err, FieldsError::Io(_)));
        assert_eq!(store.get_field("accentColor"), Some(&def));
        assert_eq!(store.get_field_by_id(&def.id), Some(&def));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let def = accent_color();
        store.write_field(&def).await.unwrap();
        std::fs::remove_file(tmp.path().join("accentColor.yaml")).unwrap();

        store.delete_field(&def.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rename_failure_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        let mut def = accent_color();
        store.write_field(&def).await.unwrap();

        let old = tmp.path().join("accentColor.yaml");
        std::fs::remove_file(&old).unwrap();
        std::fs::create_dir(&old).unwrap();

        def.handle = "brandColor".into();
        let err = store.write_field(&def).await.unwrap_err();
        assert!(matches!(err, FieldsError::Io(_)));
        assert!(!tmp.path().join("brandColor.yaml").exists());
        assert_eq!(store.get_field("accentColor").unwrap().id, def.id);
        assert!(store.get_field("brandColor").is_none());
    }

    #[tokio::test]
    async fn duplicate_id_on_disk_indexed_once() {
        let tmp = TempDir::new().unwrap();
        let def = accent_color();
        let mut copy = def.clone();
        copy.handle = "brandColor".into();
        for d in [&def, &copy] {
            std::fs::write(
                tmp.path().join(format!("{}.yaml", d.handle)),
                serde_yaml::to_string(d).unwrap(),
            )
            .unwrap();
        }

        let store = FieldStore::open(tmp.path()).build().await.unwrap();
        assert_eq!(store.len(), 1);
        let by_id = store.get_field_by_id(&def.id).unwrap();
        assert_eq!(store.get_field(&by_id.handle), Some(by_id));
    }

    #[tokio::test]
    async fn invalid_yaml_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("broken.yaml"), "id: [unterminated").unwrap();
        let store = FieldStore::open(tmp.path()).build().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn load_schema_in_handle_order() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        store
            .write_field(&FieldDef::new("Summary", "summary", "PlainText"))
            .await
            .unwrap();
        store.write_field(&accent_color()).await.unwrap();

        let schema = store.load_schema(&FieldRegistry::with_core_types()).unwrap();
        let handles: Vec<&str> = schema.handles().collect();
        assert_eq!(handles, vec!["accentColor", "summary"]);
    }

    #[tokio::test]
    async fn load_schema_fails_on_unknown_type() {
        let tmp = TempDir::new().unwrap();
        let mut store = FieldStore::open(tmp.path()).build().await.unwrap();
        store
            .write_field(&FieldDef::new("Body", "body", "RichText"))
            .await
            .unwrap();
        let err = store.load_schema(&FieldRegistry::with_core_types()).unwrap_err();
        assert!(matches!(err, FieldsError::UnknownFieldType { .. }));
    }
}
