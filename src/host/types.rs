//! Opaque host value types
//!
//! The host application owns the real world, container, and entity state.
//! The core only reads through the handle types here; it never mutates them.
//! World and container handles are compared by identity (`Arc::ptr_eq`), so
//! the host must hand the same `Arc` back for as long as the object lives.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A block position in the host world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Identifier of a block type, e.g. `"chest"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque map-item payload delivered by the host
///
/// The wire format is the host's business; the core only forwards it.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    bytes: Vec<u8>,
}

impl MapData {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An entity reference as exposed by the host
#[derive(Debug, Clone)]
pub struct Entity {
    id: i32,
    type_name: String,
    carries_inventory: bool,
}

impl Entity {
    /// Create an entity reference with a host-assigned id and type name
    pub fn new(id: i32, type_name: impl Into<String>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            carries_inventory: false,
        }
    }

    /// Mark this entity as carrying an openable inventory (trader, mount, ...)
    pub fn with_inventory(mut self) -> Self {
        self.carries_inventory = true;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn carries_inventory(&self) -> bool {
        self.carries_inventory
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}

/// What kind of container a handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The player's own inventory; open whenever nothing custom is
    Inventory,
    /// Any custom container GUI (chest, trader, furnace, ...)
    Custom,
}

/// A container handle, identity-compared between ticks
#[derive(Debug)]
pub struct Container {
    name: String,
    kind: ContainerKind,
}

impl Container {
    /// Create the player-inventory container
    pub fn inventory() -> Self {
        Self {
            name: "inventory".to_string(),
            kind: ContainerKind::Inventory,
        }
    }

    /// Create a custom container with a display name
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ContainerKind::Custom,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn is_inventory(&self) -> bool {
        self.kind == ContainerKind::Inventory
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A world handle
///
/// Holds the lookups the capture core needs (entities by id, block entities
/// by position). Identity, not content, decides whether two handles are the
/// same world.
#[derive(Debug)]
pub struct World {
    name: String,
    entities: HashMap<i32, Arc<Entity>>,
    block_entities: HashMap<BlockPos, String>,
}

impl World {
    /// Create an empty world handle with a display name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: HashMap::new(),
            block_entities: HashMap::new(),
        }
    }

    /// Add an entity (builder style, used when the host assembles the handle)
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.insert(entity.id(), Arc::new(entity));
        self
    }

    /// Add a block entity descriptor at a position
    pub fn with_block_entity(mut self, pos: BlockPos, descriptor: impl Into<String>) -> Self {
        self.block_entities.insert(pos, descriptor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an entity by its host id
    pub fn entity_by_id(&self, id: i32) -> Option<&Arc<Entity>> {
        self.entities.get(&id)
    }

    /// Descriptor of the block entity occupying a position, if any
    pub fn block_entity_at(&self, pos: BlockPos) -> Option<&str> {
        self.block_entities.get(&pos).map(|s| s.as_str())
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_lookups() {
        let world = World::new("overworld")
            .with_entity(Entity::new(7, "Trader").with_inventory())
            .with_block_entity(BlockPos::new(1, 64, -3), "chest");

        let entity = world.entity_by_id(7).unwrap();
        assert_eq!(entity.type_name(), "Trader");
        assert!(entity.carries_inventory());
        assert!(world.entity_by_id(8).is_none());

        assert_eq!(world.block_entity_at(BlockPos::new(1, 64, -3)), Some("chest"));
        assert!(world.block_entity_at(BlockPos::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_container_kinds() {
        assert!(Container::inventory().is_inventory());
        assert!(!Container::custom("chest").is_inventory());
        assert_eq!(Container::custom("chest").name(), "chest");
    }

    #[test]
    fn test_display() {
        assert_eq!(BlockPos::new(1, 2, 3).to_string(), "(1, 2, 3)");
        assert_eq!(Entity::new(4, "Golem").to_string(), "Golem#4");
        assert_eq!(BlockId::new("furnace").to_string(), "furnace");
    }
}
