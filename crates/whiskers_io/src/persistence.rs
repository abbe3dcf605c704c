//! Storage of named cat collections.
//!
//! The core never touches storage; it only hands out [`CatSnapshot`]s. A
//! [`CatStore`] keeps those under a collection name, either in memory or as
//! files on disk in one of the [`StoreFormat`]s.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, to_json};
use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rkyv::de::deserializers::SharedDeserializeMap;
use rkyv::ser::serializers::AllocSerializer;
use rkyv::ser::Serializer;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use whiskers_core::cat::CatSettings;
use whiskers_core::registry::CatRegistry;
use whiskers_core::render::RenderTarget;
use whiskers_data::CatSnapshot;

/// On-disk encoding of a [`FileStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreFormat {
    #[default]
    GzipJson,
    /// Validated rkyv archive.
    Rkyv,
}

impl StoreFormat {
    pub fn suffix(self) -> &'static str {
        match self {
            StoreFormat::GzipJson => ".json.gz",
            StoreFormat::Rkyv => ".rkyv",
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct CatCollection {
    pub name: String,
    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
    pub cats: Vec<CatSnapshot>,
}

impl CatCollection {
    pub fn new(name: impl Into<String>, cats: Vec<CatSnapshot>) -> Self {
        Self {
            name: name.into(),
            saved_at: Utc::now().to_rfc3339(),
            cats,
        }
    }
}

pub trait CatStore {
    fn save_collection(&mut self, name: &str, cats: &[CatSnapshot]) -> Result<()>;
    fn load_collection(&self, name: &str) -> Result<CatCollection>;
    /// Collection names in ascending order.
    fn list_collections(&self) -> Result<Vec<String>>;
    /// Returns `false` when there was nothing to delete.
    fn delete_collection(&mut self, name: &str) -> Result<bool>;
}

/// Collection names double as file names, so keep them tame.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(IoError::validation(format!(
            "Invalid collection name {:?}: use 1-64 letters, digits, '-' or '_'",
            name
        )))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: BTreeMap<String, CatCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatStore for MemoryStore {
    fn save_collection(&mut self, name: &str, cats: &[CatSnapshot]) -> Result<()> {
        validate_collection_name(name)?;
        self.collections
            .insert(name.to_string(), CatCollection::new(name, cats.to_vec()));
        Ok(())
    }

    fn load_collection(&self, name: &str) -> Result<CatCollection> {
        self.collections
            .get(name)
            .cloned()
            .ok_or_else(|| IoError::not_found(name))
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        Ok(self.collections.keys().cloned().collect())
    }

    fn delete_collection(&mut self, name: &str) -> Result<bool> {
        Ok(self.collections.remove(name).is_some())
    }
}

/// One file per collection under a root directory. Only files in the
/// store's own format are visible to it.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    format: StoreFormat,
}

impl FileStore {
    /// Gzip JSON store. Creates the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_format(root, StoreFormat::GzipJson)
    }

    pub fn open_with_format(root: impl Into<PathBuf>, format: StoreFormat) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating store at {:?}", root))
        })?;
        Ok(Self { root, format })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}{}", self.format.suffix()))
    }

    fn write_gzip_json(path: &Path, collection: &CatCollection) -> Result<()> {
        let json = to_json(collection)?;
        let file = File::create(path)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("saving {:?}", path)))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder
            .write_all(json.as_bytes())
            .map_err(|e| IoError::compression(e.to_string()))?;
        encoder
            .finish()
            .and_then(|mut w| w.flush())
            .map_err(|e| IoError::compression(e.to_string()))
    }

    fn read_gzip_json(path: &Path) -> Result<CatCollection> {
        let file = File::open(path)
            .map_err(|e| IoError::FileSystem(e).with_context(format!("loading {:?}", path)))?;
        let mut json = String::new();
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut json)
            .map_err(|e| IoError::compression(e.to_string()).with_context(format!("{:?}", path)))?;
        from_json(&json)
    }
}

impl CatStore for FileStore {
    fn save_collection(&mut self, name: &str, cats: &[CatSnapshot]) -> Result<()> {
        validate_collection_name(name)?;
        let path = self.path_for(name);
        let collection = CatCollection::new(name, cats.to_vec());
        match self.format {
            StoreFormat::GzipJson => Self::write_gzip_json(&path, &collection)?,
            StoreFormat::Rkyv => save_rkyv(&collection, &path)?,
        }

        tracing::info!(
            collection = name,
            cats = cats.len(),
            format = ?self.format,
            "Saved collection"
        );
        Ok(())
    }

    fn load_collection(&self, name: &str) -> Result<CatCollection> {
        validate_collection_name(name)?;
        let path = self.path_for(name);
        if !path.exists() {
            return Err(IoError::not_found(name));
        }

        match self.format {
            StoreFormat::GzipJson => Self::read_gzip_json(&path),
            StoreFormat::Rkyv => load_rkyv(&path),
        }
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(self.format.suffix())) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_collection(&mut self, name: &str) -> Result<bool> {
        validate_collection_name(name)?;
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Saves every cat in the registry and clears their dirty flags.
pub fn save_registry(
    store: &mut dyn CatStore,
    name: &str,
    registry: &mut CatRegistry,
) -> Result<usize> {
    let snapshots: Vec<CatSnapshot> = registry.list().map(|c| c.snapshot()).collect();
    store.save_collection(name, &snapshots)?;
    for id in registry.ids() {
        if let Some(cat) = registry.get_mut(id) {
            cat.mark_clean();
        }
    }
    Ok(snapshots.len())
}

/// Recreates a stored collection in the registry. Cats that fail validation
/// are skipped; the count of restored cats is returned.
pub fn restore_collection(
    store: &dyn CatStore,
    name: &str,
    registry: &mut CatRegistry,
    render: &mut dyn RenderTarget,
) -> Result<usize> {
    let collection = store.load_collection(name)?;
    let template = registry.settings();
    let mut restored = 0;
    for snapshot in collection.cats {
        let settings = CatSettings {
            position: Some(snapshot.position),
            boundaries: template.boundaries,
            brain: template.brain.clone(),
            movement: template.movement,
            detection: template.detection.clone(),
            ..CatSettings::from_definition(snapshot.definition)
        };
        match registry.create(settings, render) {
            Ok(_) => restored += 1,
            Err(err) => tracing::warn!(%err, collection = name, "Skipping stored cat"),
        }
    }
    Ok(restored)
}

fn save_rkyv<T, P>(data: &T, path: P) -> Result<()>
where
    T: RkyvSerialize<AllocSerializer<4096>>,
    T: Archive,
    P: AsRef<Path>,
{
    let mut serializer = AllocSerializer::<4096>::default();
    serializer
        .serialize_value(data)
        .map_err(|e| IoError::rkyv(format!("serialization failed: {:?}", e)))?;
    let bytes = serializer.into_serializer().into_inner();
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    Ok(())
}

fn load_rkyv<T, P>(path: P) -> Result<T>
where
    T: Archive,
    T::Archived: RkyvDeserialize<T, SharedDeserializeMap>
        + for<'a> rkyv::CheckBytes<rkyv::validation::validators::DefaultValidator<'a>>,
    P: AsRef<Path>,
{
    let bytes = std::fs::read(path)?;
    let archived = rkyv::check_archived_root::<T>(&bytes)
        .map_err(|e| IoError::rkyv(format!("validation failed: {:?}", e)))?;
    let mut deserializer = SharedDeserializeMap::default();
    archived
        .deserialize(&mut deserializer)
        .map_err(|e| IoError::rkyv(format!("deserialization failed: {:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiskers_core::render::NullRenderTarget;

    fn registry_with(seeds: &[&str]) -> CatRegistry {
        let mut registry = CatRegistry::default();
        for seed in seeds {
            registry.create_from_seed(seed, &mut NullRenderTarget).unwrap();
        }
        registry
    }

    fn snapshots(registry: &CatRegistry) -> Vec<CatSnapshot> {
        registry.list().map(|c| c.snapshot()).collect()
    }

    #[test]
    fn test_memory_store_collections() {
        let registry = registry_with(&["a", "b"]);
        let mut store = MemoryStore::new();
        store.save_collection("house", &snapshots(&registry)).unwrap();
        store.save_collection("alley", &[]).unwrap();

        assert_eq!(store.list_collections().unwrap(), vec!["alley", "house"]);
        assert_eq!(store.load_collection("house").unwrap().cats.len(), 2);
        assert!(store.delete_collection("alley").unwrap());
        assert!(!store.delete_collection("alley").unwrap());
        assert!(store.load_collection("alley").unwrap_err().is_not_found());
    }

    #[test]
    fn test_bad_collection_names_rejected() {
        let mut store = MemoryStore::new();
        for name in ["", "../escape", "with space", "dots.gz"] {
            assert!(store.save_collection(name, &[]).is_err(), "{name}");
        }
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("cats")).unwrap();
        let registry = registry_with(&["tom", "felix", "garfield"]);
        let saved = snapshots(&registry);

        store.save_collection("favourites", &saved).unwrap();
        assert_eq!(store.list_collections().unwrap(), vec!["favourites"]);

        let loaded = store.load_collection("favourites").unwrap();
        assert_eq!(loaded.name, "favourites");
        assert_eq!(loaded.cats, saved);

        assert!(store.delete_collection("favourites").unwrap());
        assert!(store.list_collections().unwrap().is_empty());
        assert!(store.load_collection("favourites").unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("broken.json.gz"), b"not gzip").unwrap();
        assert!(store.load_collection("broken").is_err());
    }

    #[test]
    fn test_save_registry_clears_dirty_flags() {
        let mut registry = registry_with(&["one", "two"]);
        assert!(registry.list().all(|c| c.is_dirty()));

        let mut store = MemoryStore::new();
        assert_eq!(save_registry(&mut store, "snap", &mut registry).unwrap(), 2);
        assert!(registry.list().all(|c| !c.is_dirty()));
        assert!(store.load_collection("snap").unwrap().cats.iter().all(|s| s.dirty));
    }

    #[test]
    fn test_restore_collection_recreates_cats() {
        let mut source = registry_with(&["luna", "milo"]);
        let mut store = MemoryStore::new();
        save_registry(&mut store, "pair", &mut source).unwrap();

        let mut target = CatRegistry::default();
        let restored =
            restore_collection(&store, "pair", &mut target, &mut NullRenderTarget).unwrap();
        assert_eq!(restored, 2);
        for cat in source.list() {
            let copy = target.get(cat.id()).unwrap();
            assert_eq!(copy.definition(), cat.definition());
            assert_eq!(copy.position(), cat.position());
        }
    }

    #[test]
    fn test_rkyv_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open_with_format(dir.path(), StoreFormat::Rkyv).unwrap();
        let mut registry = registry_with(&["oscar", "tigger"]);

        assert_eq!(save_registry(&mut store, "archive", &mut registry).unwrap(), 2);
        assert!(dir.path().join("archive.rkyv").exists());

        let loaded = store.load_collection("archive").unwrap();
        assert_eq!(loaded.name, "archive");
        assert_eq!(loaded.cats.len(), 2);
        for cat in registry.list() {
            let stored = loaded.cats.iter().find(|s| s.id() == cat.id()).unwrap();
            assert_eq!(&stored.definition, cat.definition());
        }
    }

    #[test]
    fn test_formats_do_not_see_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let mut json = FileStore::open(dir.path()).unwrap();
        let mut rkyv = FileStore::open_with_format(dir.path(), StoreFormat::Rkyv).unwrap();
        json.save_collection("gz", &[]).unwrap();
        rkyv.save_collection("rk", &[]).unwrap();

        assert_eq!(json.list_collections().unwrap(), vec!["gz"]);
        assert_eq!(rkyv.list_collections().unwrap(), vec!["rk"]);
        assert!(rkyv.load_collection("gz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_corrupt_rkyv_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open_with_format(dir.path(), StoreFormat::Rkyv).unwrap();
        std::fs::write(dir.path().join("broken.rkyv"), b"definitely not an archive").unwrap();
        assert!(matches!(
            store.load_collection("broken"),
            Err(IoError::Rkyv(_))
        ));
    }
}
