//! Built-in capture boundary

use std::sync::Arc;

use crate::core::CaptureResult;
use crate::host::{BlockId, BlockPos, Container, Entity, MapData, World};

/// The built-in capture logic the dispatcher drives
///
/// One method per lifecycle event, invoked before any extension chain runs.
/// Implementations decide what to persist; the dispatcher only routes.
/// Returned errors are promoted to the fatal path at the dispatcher
/// boundary, so implementations should reserve `Err` for genuine faults.
pub trait CaptureSink {
    /// A new world became current (session start or world swap)
    fn on_world_load(&mut self, world: &Arc<World>) -> CaptureResult<()>;

    /// A GUI closed and the last interaction targeted an entity
    ///
    /// Returns `true` when the built-in logic captured the entity's
    /// contents; `false` hands the event to the extension chain.
    fn on_entity_gui_closed(
        &mut self,
        world: &Arc<World>,
        entity: &Arc<Entity>,
        container: &Arc<Container>,
    ) -> CaptureResult<bool>;

    /// A GUI closed and the last interaction targeted a block position
    fn on_block_gui_closed(
        &mut self,
        world: &Arc<World>,
        pos: BlockPos,
        container: &Arc<Container>,
    ) -> CaptureResult<bool>;

    /// A custom container GUI opened
    fn on_container_opened(&mut self, container: &Arc<Container>) -> CaptureResult<()>;

    /// The host is about to drop a chunk it no longer needs
    fn on_chunk_no_longer_needed(
        &mut self,
        world: &Arc<World>,
        chunk_x: i32,
        chunk_z: i32,
    ) -> CaptureResult<()>;

    /// An entity is being removed from the world
    ///
    /// `entity` is `None` when the host no longer resolves the removed id.
    fn on_entity_removed(&mut self, entity: Option<&Arc<Entity>>) -> CaptureResult<()>;

    /// A chat line was delivered
    fn on_chat(&mut self, text: &str) -> CaptureResult<()>;

    /// Map-item data arrived
    fn on_map_data(&mut self, map_id: i32, data: &MapData) -> CaptureResult<()>;

    /// A side-channel payload arrived
    fn on_plugin_payload(&mut self, channel: &str, payload: &[u8]) -> CaptureResult<()>;

    /// A block-state notification arrived
    fn on_block_event(
        &mut self,
        pos: BlockPos,
        block: &BlockId,
        data1: i32,
        data2: i32,
    ) -> CaptureResult<()>;

    /// Free-text summary for diagnostic reports
    fn debug_info(&self) -> String;
}
