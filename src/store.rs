//! Local record store backed by a single JSON file.
//!
//! The file holds one JSON object whose keys are display titles and whose
//! values are [`MovieRecord`]s. It is written with two-space indentation
//! and non-ASCII text left unescaped. Insertion order survives a
//! load/save cycle.
//!
//! Lookups never consult the keys: [`find_by_title`] matches the record's
//! own `title` field case-insensitively, so a record stored under
//! `"Dune (2021)"` is found by the query `"dune"` when its title is
//! `"Dune"`.
//!
//! Writes from one process are serialized: [`RecordStore::insert`] holds a
//! write lock across the whole reload → insert → save sequence. The lock
//! belongs to the backing path, not the handle, so every handle opened on
//! the same path in this process shares it. Paths are compared as given;
//! two different spellings of one file get separate locks. Separate
//! processes sharing the same file remain last-writer-wins.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::StoreError;
use crate::models::MovieRecord;

/// Display key → record, in insertion order.
pub type RecordMap = IndexMap<String, MovieRecord>;

/// Display key → stored JSON, decoded or not.
type RawMap = IndexMap<String, serde_json::Value>;

/// Why the backing file could not be read as a JSON object.
enum RawLoadError {
    /// The file exists but could not be read.
    Io(StoreError),
    /// The file was read but is not a JSON object.
    Parse(StoreError),
}

impl From<RawLoadError> for StoreError {
    fn from(e: RawLoadError) -> Self {
        match e {
            RawLoadError::Io(e) | RawLoadError::Parse(e) => e,
        }
    }
}

/// Handle to the backing file of the record store.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

/// Write lock shared by every handle on `path`.
fn write_lock_for(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(path.to_path_buf()).or_default().clone()
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = write_lock_for(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records, recovering from a missing or corrupt file.
    ///
    /// A missing file is an empty store. An unreadable or unparsable file
    /// is reported on stderr and also treated as empty; see
    /// [`RecordStore::try_load`] for the fallible form.
    pub fn load(&self) -> RecordMap {
        match self.try_load() {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Warning: {}; starting with an empty store", e);
                RecordMap::new()
            }
        }
    }

    /// Load all records, returning an error for an unreadable or
    /// unparsable file. Individual entries that are not record objects are
    /// skipped with a warning; they stay in the file.
    pub fn try_load(&self) -> Result<RecordMap, StoreError> {
        let raw = self.read_raw()?;

        let mut map = RecordMap::with_capacity(raw.len());
        for (key, value) in raw {
            match serde_json::from_value::<MovieRecord>(value) {
                Ok(record) => {
                    map.insert(key, record);
                }
                Err(e) => {
                    eprintln!("Warning: skipping stored entry '{}': {}", key, e);
                }
            }
        }
        Ok(map)
    }

    /// Write the full mapping back to the backing file.
    ///
    /// The content goes to a sibling temporary file first and is renamed
    /// over the target, so a failed write leaves the previous file intact.
    pub fn save(&self, map: &RecordMap) -> Result<(), StoreError> {
        self.write_json(map)
    }

    /// Find a record by title, returning its display key alongside it.
    pub fn find(&self, query: &str) -> Option<(String, MovieRecord)> {
        let map = self.load();
        find_by_title(&map, query).map(|(k, r)| (k.clone(), r.clone()))
    }

    /// Add or replace the record under `key` and persist immediately.
    ///
    /// The file is reloaded under the write lock so records added by other
    /// lookups since this one started are kept. Entries that do not decode
    /// as records are written back unchanged. A file that no longer parses
    /// is renamed to `<name>.corrupt` first; if that rename fails, or the
    /// file cannot be read at all, nothing is written.
    pub fn insert(&self, key: &str, record: MovieRecord) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut raw = match self.read_raw() {
            Ok(raw) => raw,
            Err(RawLoadError::Io(e)) => return Err(e),
            Err(RawLoadError::Parse(e)) => {
                let backup = self.sibling_path(".corrupt");
                eprintln!("Warning: {}; moving it aside to {}", e, backup.display());
                std::fs::rename(&self.path, &backup).map_err(|e| StoreError::Write {
                    path: self.path.clone(),
                    reason: format!("could not move it aside to {}: {}", backup.display(), e),
                })?;
                RawMap::new()
            }
        };
        let value = serde_json::to_value(&record).map_err(|e| self.write_error(e))?;
        raw.insert(key.to_string(), value);
        self.write_json(&raw)
    }

    fn read_raw(&self) -> Result<RawMap, RawLoadError> {
        if !self.path.exists() {
            return Ok(RawMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| RawLoadError::Io(self.read_error(e)))?;
        serde_json::from_str(&content).map_err(|e| RawLoadError::Parse(self.read_error(e)))
    }

    fn write_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|e| self.write_error(e))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
            }
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, json.as_bytes()).map_err(|e| self.write_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            self.write_error(e)
        })?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    /// The backing path with `suffix` appended to its file name.
    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn read_error(&self, e: impl std::fmt::Display) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    fn write_error(&self, e: impl std::fmt::Display) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

/// First record (in insertion order) whose `title` equals `query`
/// ignoring case.
pub fn find_by_title<'a>(
    map: &'a RecordMap,
    query: &str,
) -> Option<(&'a String, &'a MovieRecord)> {
    map.iter().find(|(_, record)| record.title_matches(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;
    use tempfile::TempDir;

    fn sample(title: &str) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            year: "2010".to_string(),
            rating: "8.8".to_string(),
            genres: vec!["Action".to_string(), "Sci-Fi".to_string()],
            directors: vec!["Christopher Nolan".to_string()],
            writers: vec!["Christopher Nolan".to_string()],
            cast: vec!["Leonardo DiCaprio".to_string()],
            certificate: "PG-13".to_string(),
            description: NOT_AVAILABLE.to_string(),
        }
    }

    fn store_in(tmp: &TempDir) -> RecordStore {
        RecordStore::new(tmp.path().join("data").join("movies.json"))
    }

    #[test]
    fn load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        assert!(store.load().is_empty());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StoreError::Read { .. })));
    }

    #[test]
    fn load_skips_malformed_entries() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"Heat": {"title": "Heat"}, "Broken": 42, "Up": {"title": "Up", "genres": null}}"#,
        )
        .unwrap();

        let map = store.load();
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Heat", "Up"]);
        assert!(map["Up"].genres.is_empty());
        assert_eq!(map["Heat"].rating, NOT_AVAILABLE);
    }

    #[test]
    fn load_coerces_loosely_typed_fields() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"Heat": {"title": "Heat", "year": 1995, "genres": "Drama"}}"#,
        )
        .unwrap();

        let map = store.load();
        assert_eq!(map["Heat"].year, "1995");
        assert!(map["Heat"].genres.is_empty());
    }

    #[test]
    fn insert_keeps_entries_it_cannot_decode() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"Broken": 42, "Heat": {"title": "Heat", "year": 1995, "genres": "Drama"}}"#,
        )
        .unwrap();

        store.insert("Up", sample("Up")).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        let on_disk: IndexMap<String, serde_json::Value> = serde_json::from_str(&content).unwrap();
        let keys: Vec<&str> = on_disk.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Broken", "Heat", "Up"]);
        assert_eq!(on_disk["Broken"], serde_json::json!(42));
        assert_eq!(on_disk["Heat"]["year"], serde_json::json!(1995));
        assert_eq!(on_disk["Heat"]["genres"], serde_json::json!("Drama"));
        assert_eq!(on_disk["Up"]["title"], serde_json::json!("Up"));
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let mut map = RecordMap::new();
        map.insert("Zodiac".to_string(), sample("Zodiac"));
        map.insert("Amélie".to_string(), sample("Amélie"));
        map.insert("Inception".to_string(), sample("Inception"));

        store.save(&map).unwrap();
        let loaded = store.load();

        assert_eq!(loaded, map);
        let keys: Vec<&String> = loaded.keys().collect();
        assert_eq!(keys, vec!["Zodiac", "Amélie", "Inception"]);
    }

    #[test]
    fn save_is_indented_and_keeps_non_ascii() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let mut map = RecordMap::new();
        map.insert("Amélie".to_string(), sample("Amélie"));
        store.save(&map).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("Amélie"));
        assert!(!content.contains("\\u00e9"));
        assert!(content.contains("\n  \"Amélie\": {\n    \"title\""));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn find_by_title_ignores_case_and_key() {
        let mut map = RecordMap::new();
        map.insert("Dune (2021)".to_string(), sample("Dune"));
        map.insert("Inception".to_string(), sample("Inception"));

        let (key, record) = find_by_title(&map, "DUNE").unwrap();
        assert_eq!(key, "Dune (2021)");
        assert_eq!(record.title, "Dune");

        assert!(find_by_title(&map, "Dune (2021)").is_none());
        assert!(find_by_title(&map, "Heat").is_none());
    }

    #[test]
    fn find_by_title_returns_first_in_insertion_order() {
        let mut map = RecordMap::new();
        map.insert("first".to_string(), sample("Heat"));
        map.insert("second".to_string(), sample("HEAT"));

        let (key, _) = find_by_title(&map, "heat").unwrap();
        assert_eq!(key, "first");
    }

    #[test]
    fn insert_persists_and_keeps_existing_records() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.insert("Heat", sample("Heat")).unwrap();
        store.insert("Up", sample("Up")).unwrap();

        let reopened = RecordStore::new(store.path());
        let map = reopened.load();
        assert_eq!(map.len(), 2);
        assert_eq!(reopened.find("up").unwrap().0, "Up");
    }

    #[test]
    fn insert_moves_corrupt_file_aside() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2").unwrap();

        store.insert("Heat", sample("Heat")).unwrap();

        let backup = store.sibling_path(".corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "[1, 2");
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn insert_leaves_corrupt_file_when_it_cannot_move_it() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.sibling_path(".corrupt").join("occupied")).unwrap();
        std::fs::write(store.path(), "{ corrupt but precious").unwrap();

        let err = store.insert("Up", sample("Up")).unwrap_err();

        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "{ corrupt but precious"
        );
    }

    #[test]
    fn insert_does_not_move_unreadable_store_aside() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.path()).unwrap();

        let err = store.insert("Up", sample("Up")).unwrap_err();

        assert!(matches!(err, StoreError::Read { .. }));
        assert!(store.path().is_dir());
        assert!(!store.sibling_path(".corrupt").exists());
    }

    #[test]
    fn handles_on_one_path_serialize_inserts() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("movies.json");

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let path = path.clone();
                scope.spawn(move || {
                    let store = RecordStore::new(path);
                    for n in 0..5 {
                        let key = format!("movie {}-{}", worker, n);
                        store.insert(&key, sample(&key)).unwrap();
                    }
                });
            }
        });

        assert_eq!(RecordStore::new(&path).load().len(), 40);
    }

    #[test]
    fn save_into_unwritable_location_reports_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let store = RecordStore::new(blocker.join("movies.json"));

        let err = store.save(&RecordMap::new()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
