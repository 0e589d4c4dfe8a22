//! Entity type catalog
//!
//! The host registers every capturable entity type here at startup, together
//! with its category and built-in default track distance. The catalog is the
//! source for `Default`-mode distance resolution and for the category half of
//! the capture check.

use std::collections::BTreeMap;

/// Track distance for types the catalog does not know
pub const UNKNOWN_TRACK_DISTANCE: i32 = -1;

/// Catalog entry for one entity type
#[derive(Debug, Clone)]
pub struct EntityTypeInfo {
    /// Category the type belongs to, e.g. "Hostile"
    pub category: String,
    /// Built-in default track distance in blocks
    pub default_track_distance: i32,
}

/// Registry of entity types, grouped into categories
#[derive(Debug, Clone, Default)]
pub struct EntityCatalog {
    types: BTreeMap<String, EntityTypeInfo>,
}

impl EntityCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity type
    ///
    /// Re-registering a type overwrites the previous entry.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        category: impl Into<String>,
        default_track_distance: i32,
    ) {
        let type_name = type_name.into();
        tracing::debug!("[EntityCatalog] Registering entity type: {}", type_name);
        self.types.insert(
            type_name,
            EntityTypeInfo {
                category: category.into(),
                default_track_distance,
            },
        );
    }

    /// Look up a registered type
    pub fn get(&self, type_name: &str) -> Option<&EntityTypeInfo> {
        self.types.get(type_name)
    }

    /// Category of a type, `None` for unregistered types
    pub fn category(&self, type_name: &str) -> Option<&str> {
        self.types.get(type_name).map(|info| info.category.as_str())
    }

    /// Built-in default track distance for a type
    ///
    /// Unregistered types resolve to [`UNKNOWN_TRACK_DISTANCE`].
    pub fn default_track_distance(&self, type_name: &str) -> i32 {
        self.types
            .get(type_name)
            .map(|info| info.default_track_distance)
            .unwrap_or(UNKNOWN_TRACK_DISTANCE)
    }

    /// Iterate over `(type, info)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityTypeInfo)> {
        self.types.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// All distinct categories, in name order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> =
            self.types.values().map(|info| info.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
