//! Entity capture policy
//!
//! Decides which entity types get captured and how far out they are tracked.
//! Enable flags exist at two levels (category and type); the track distance
//! comes from one of three modes:
//!
//! | Mode | `resolve_distance` source |
//! |------|---------------------------|
//! | `Default` | built-in constant from the catalog |
//! | `Server` | range advertised by the remote peer, catalog fallback |
//! | `User` | per-type override stored in the property store |
//!
//! All flags and the mode persist in the [`PropertyStore`] under the keys
//! `EntityGroup.<category>.Enabled`, `Entity.<type>.Enabled`,
//! `Entity.<type>.TrackDistance` and `Entity.TrackDistanceMode`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PropertyStore;

use super::catalog::EntityCatalog;

/// Property key holding the global track distance mode
const MODE_KEY: &str = "Entity.TrackDistanceMode";

/// Upper bound for operator-set track distances
const MAX_TRACK_DISTANCE: i32 = 256;

/// How per-type track distance is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackDistanceMode {
    /// Built-in per-type constants
    Default,
    /// Ranges advertised by the remote peer
    Server,
    /// Operator-set per-type overrides
    User,
}

impl TrackDistanceMode {
    /// The persisted string form (`default` / `server` / `user`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackDistanceMode::Default => "default",
            TrackDistanceMode::Server => "server",
            TrackDistanceMode::User => "user",
        }
    }

    /// Parse the persisted form; anything unrecognised reads as `Default`
    pub fn parse(value: &str) -> Self {
        match value {
            "server" => TrackDistanceMode::Server,
            "user" => TrackDistanceMode::User,
            _ => TrackDistanceMode::Default,
        }
    }
}

impl fmt::Display for TrackDistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category and per-type capture flags plus distance resolution
#[derive(Debug, Default)]
pub struct EntityCapturePolicy {
    catalog: EntityCatalog,
    props: PropertyStore,
    server_ranges: HashMap<String, i32>,
}

impl EntityCapturePolicy {
    /// Create a policy over a catalog and a property store
    pub fn new(catalog: EntityCatalog, props: PropertyStore) -> Self {
        Self {
            catalog,
            props,
            server_ranges: HashMap::new(),
        }
    }

    /// The entity type catalog
    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// The backing property store
    pub fn properties(&self) -> &PropertyStore {
        &self.props
    }

    /// Mutable access to the backing property store
    pub fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.props
    }

    // === Enable flags ===

    /// Whether a single entity type is enabled (missing key reads `true`)
    pub fn enabled(&self, type_name: &str) -> bool {
        self.props
            .get_bool(&format!("Entity.{}.Enabled", type_name))
            .unwrap_or(true)
    }

    /// Toggle a single entity type
    pub fn set_enabled(&mut self, type_name: &str, enabled: bool) {
        self.props
            .set_bool(format!("Entity.{}.Enabled", type_name), enabled);
    }

    /// Whether a whole category is enabled (missing key reads `true`)
    pub fn group_enabled(&self, category: &str) -> bool {
        self.props
            .get_bool(&format!("EntityGroup.{}.Enabled", category))
            .unwrap_or(true)
    }

    /// Toggle a whole category
    pub fn set_group_enabled(&mut self, category: &str, enabled: bool) {
        self.props
            .set_bool(format!("EntityGroup.{}.Enabled", category), enabled);
    }

    /// Whether an entity type is effectively captured
    ///
    /// Both the type flag and its category flag must be enabled. Types the
    /// catalog does not know have no category, so only the type flag counts.
    pub fn is_captured(&self, type_name: &str) -> bool {
        let group_ok = match self.catalog.category(type_name) {
            Some(category) => self.group_enabled(category),
            None => true,
        };
        group_ok && self.enabled(type_name)
    }

    // === Track distance modes ===

    /// The current mode (missing or unrecognised value reads `Default`)
    pub fn mode(&self) -> TrackDistanceMode {
        TrackDistanceMode::parse(self.props.get_or(MODE_KEY, "default"))
    }

    /// Request a mode change, returning the mode that actually took effect
    ///
    /// `Server` is only available while the peer has advertised at least one
    /// range; an unavailable request silently stores `Default` instead.
    pub fn set_mode(&mut self, mode: TrackDistanceMode) -> TrackDistanceMode {
        let effective = match mode {
            TrackDistanceMode::Server if !self.has_server_ranges() => {
                tracing::debug!(
                    "[EntityCapturePolicy] Server mode unavailable, falling back to default"
                );
                TrackDistanceMode::Default
            }
            other => other,
        };
        self.props.set(MODE_KEY, effective.as_str());
        effective
    }

    /// Advance to the next mode: `Default -> (Server | User) -> User -> Default`
    ///
    /// `Server` is skipped when the peer has not advertised ranges.
    pub fn cycle_mode(&mut self) -> TrackDistanceMode {
        let next = match self.mode() {
            TrackDistanceMode::Default => {
                if self.has_server_ranges() {
                    TrackDistanceMode::Server
                } else {
                    TrackDistanceMode::User
                }
            }
            TrackDistanceMode::Server => TrackDistanceMode::User,
            TrackDistanceMode::User => TrackDistanceMode::Default,
        };
        self.set_mode(next)
    }

    // === Peer-advertised ranges ===

    /// Record a range advertised by the remote peer for one type
    pub fn advertise_server_range(&mut self, type_name: impl Into<String>, distance: i32) {
        self.server_ranges.insert(type_name.into(), distance);
    }

    /// Whether the peer has advertised any ranges
    pub fn has_server_ranges(&self) -> bool {
        !self.server_ranges.is_empty()
    }

    /// Drop all advertised ranges (disconnect / world change)
    pub fn clear_server_ranges(&mut self) {
        self.server_ranges.clear();
    }

    // === Distance resolution ===

    /// Resolve the effective track distance for a type under the current mode
    pub fn resolve_distance(&self, type_name: &str) -> i32 {
        let built_in = self.catalog.default_track_distance(type_name);
        match self.mode() {
            TrackDistanceMode::Default => built_in,
            TrackDistanceMode::Server => self
                .server_ranges
                .get(type_name)
                .copied()
                .unwrap_or(built_in),
            TrackDistanceMode::User => self
                .props
                .get_i32(&format!("Entity.{}.TrackDistance", type_name))
                .unwrap_or(built_in),
        }
    }

    /// Store a per-type override, clamped to `0..=256`
    ///
    /// Only effective while the mode is `User`; otherwise nothing is stored
    /// and `false` is returned. Existing overrides are never erased by mode
    /// changes, they just stop being consulted.
    pub fn set_track_distance(&mut self, type_name: &str, distance: i32) -> bool {
        if self.mode() != TrackDistanceMode::User {
            return false;
        }
        let distance = distance.clamp(0, MAX_TRACK_DISTANCE);
        self.props
            .set(format!("Entity.{}.TrackDistance", type_name), distance.to_string());
        true
    }

    /// One-line summary for diagnostic reports
    pub fn debug_info(&self) -> String {
        format!(
            "mode={}; catalog types={}; advertised ranges={}; stored properties={}",
            self.mode(),
            self.catalog.len(),
            self.server_ranges.len(),
            self.props.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy() -> EntityCapturePolicy {
        let mut catalog = EntityCatalog::new();
        catalog.register("Creeper", "Hostile", 80);
        catalog.register("Trader", "Passive", 48);
        EntityCapturePolicy::new(catalog, PropertyStore::new())
    }

    #[test]
    fn test_default_mode_ignores_overrides() {
        let mut policy = test_policy();

        // Store an override while in user mode, then leave user mode.
        policy.set_mode(TrackDistanceMode::User);
        assert!(policy.set_track_distance("Creeper", 16));
        policy.set_mode(TrackDistanceMode::Default);

        assert_eq!(policy.resolve_distance("Creeper"), 80);
    }

    #[test]
    fn test_user_mode_returns_last_override() {
        let mut policy = test_policy();
        policy.set_mode(TrackDistanceMode::User);

        assert!(policy.set_track_distance("Trader", 100));
        assert!(policy.set_track_distance("Trader", 32));
        assert_eq!(policy.resolve_distance("Trader"), 32);
    }

    #[test]
    fn test_user_mode_falls_back_to_built_in() {
        let mut policy = test_policy();
        policy.set_mode(TrackDistanceMode::User);
        assert_eq!(policy.resolve_distance("Creeper"), 80);
    }

    #[test]
    fn test_override_rejected_outside_user_mode() {
        let mut policy = test_policy();
        assert_eq!(policy.mode(), TrackDistanceMode::Default);
        assert!(!policy.set_track_distance("Creeper", 16));

        policy.set_mode(TrackDistanceMode::User);
        assert_eq!(policy.resolve_distance("Creeper"), 80);
    }

    #[test]
    fn test_override_clamped() {
        let mut policy = test_policy();
        policy.set_mode(TrackDistanceMode::User);
        policy.set_track_distance("Creeper", 9999);
        assert_eq!(policy.resolve_distance("Creeper"), 256);
    }

    #[test]
    fn test_server_mode_unavailable_falls_back() {
        let mut policy = test_policy();
        let effective = policy.set_mode(TrackDistanceMode::Server);

        assert_eq!(effective, TrackDistanceMode::Default);
        assert_eq!(policy.mode(), TrackDistanceMode::Default);
        assert_eq!(policy.resolve_distance("Creeper"), 80);
    }

    #[test]
    fn test_server_mode_with_ranges() {
        let mut policy = test_policy();
        policy.advertise_server_range("Creeper", 64);
        assert_eq!(policy.set_mode(TrackDistanceMode::Server), TrackDistanceMode::Server);

        assert_eq!(policy.resolve_distance("Creeper"), 64);
        // No advertised range for this type: built-in constant.
        assert_eq!(policy.resolve_distance("Trader"), 48);
    }

    #[test]
    fn test_cycle_with_server_available() {
        let mut policy = test_policy();
        policy.advertise_server_range("Creeper", 64);

        assert_eq!(policy.cycle_mode(), TrackDistanceMode::Server);
        assert_eq!(policy.cycle_mode(), TrackDistanceMode::User);
        assert_eq!(policy.cycle_mode(), TrackDistanceMode::Default);
    }

    #[test]
    fn test_cycle_without_server() {
        let mut policy = test_policy();
        assert_eq!(policy.cycle_mode(), TrackDistanceMode::User);
        assert_eq!(policy.cycle_mode(), TrackDistanceMode::Default);
    }

    #[test]
    fn test_group_flag_dominates() {
        let mut policy = test_policy();
        assert!(policy.is_captured("Creeper"));

        policy.set_group_enabled("Hostile", false);
        assert!(policy.is_captured("Trader"));
        assert!(!policy.is_captured("Creeper"));

        // The type flag cannot re-enable a disabled category.
        policy.set_enabled("Creeper", true);
        assert!(!policy.is_captured("Creeper"));
    }

    #[test]
    fn test_type_flag() {
        let mut policy = test_policy();
        policy.set_enabled("Trader", false);
        assert!(!policy.is_captured("Trader"));
        assert!(policy.is_captured("Creeper"));
    }

    #[test]
    fn test_unknown_type_captured_by_default() {
        let policy = test_policy();
        assert!(policy.is_captured("Dragon"));
        assert_eq!(policy.resolve_distance("Dragon"), -1);
    }
}
