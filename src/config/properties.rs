//! Flat key/value property store
//!
//! Capture configuration persists as a flat string-keyed map, one JSON object
//! per world. Boolean values are stored as the literal strings `"true"` and
//! `"false"`. Readers supply their own defaults for missing keys; unknown
//! keys are ignored on read but preserved across a save.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::core::CaptureResult;

/// Persistent string-keyed property map
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl PropertyStore {
    /// Create an empty, in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store bound to a file path without reading it
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            values: BTreeMap::new(),
            path: Some(path.into()),
        }
    }

    /// Load a store from disk
    ///
    /// A missing file yields an empty store bound to the same path, so the
    /// first save creates it.
    pub fn load(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::with_path(path));
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let values: BTreeMap<String, String> = serde_json::from_reader(reader)?;

        Ok(Self {
            values,
            path: Some(path.to_path_buf()),
        })
    }

    /// Save the store to its bound path; a pathless store is a no-op
    pub fn save(&self) -> CaptureResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.values)?;

        tracing::debug!("[PropertyStore] Saved {} properties to {:?}", self.values.len(), path);
        Ok(())
    }

    /// Get a raw property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// Get a raw property value, or a default when the key is missing
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a boolean property
    ///
    /// Only the literal `"true"` and `"false"` are recognised; anything else
    /// (including a missing key) is `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        }
    }

    /// Get an integer property; unparseable values read as missing
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Set a property value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Set a boolean property as a `"true"`/`"false"` literal
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }

    /// Number of stored properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the store holds no properties
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_set_defaults() {
        let mut store = PropertyStore::new();
        assert!(store.get("Entity.Trader.Enabled").is_none());
        assert_eq!(store.get_or("Entity.Trader.Enabled", "true"), "true");

        store.set_bool("Entity.Trader.Enabled", false);
        assert_eq!(store.get_bool("Entity.Trader.Enabled"), Some(false));
        assert_eq!(store.get_or("Entity.Trader.Enabled", "true"), "false");
    }

    #[test]
    fn test_bool_literals_only() {
        let mut store = PropertyStore::new();
        store.set("Flag", "yes");
        assert_eq!(store.get_bool("Flag"), None);

        store.set("Flag", "true");
        assert_eq!(store.get_bool("Flag"), Some(true));
    }

    #[test]
    fn test_i32_parsing() {
        let mut store = PropertyStore::new();
        store.set("Entity.Trader.TrackDistance", "96");
        assert_eq!(store.get_i32("Entity.Trader.TrackDistance"), Some(96));

        store.set("Entity.Trader.TrackDistance", "far");
        assert_eq!(store.get_i32("Entity.Trader.TrackDistance"), None);
    }

    #[test]
    fn test_roundtrip_preserves_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("world.properties.json");

        let mut store = PropertyStore::with_path(&path);
        store.set("Entity.TrackDistanceMode", "user");
        store.set("SomeFutureKey", "whatever");
        store.save().unwrap();

        let reloaded = PropertyStore::load(&path).unwrap();
        assert_eq!(reloaded.get("Entity.TrackDistanceMode"), Some("user"));
        // Keys this version does not understand survive a load/save cycle.
        assert_eq!(reloaded.get("SomeFutureKey"), Some("whatever"));
        reloaded.save().unwrap();
        assert_eq!(
            PropertyStore::load(&path).unwrap().get("SomeFutureKey"),
            Some("whatever")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.json");

        let store = PropertyStore::load(&path).unwrap();
        assert!(store.is_empty());

        // Bound to the path, so a save creates the file.
        store.save().unwrap();
        assert!(path.exists());
    }
}
