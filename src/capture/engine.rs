//! Standard capture engine
//!
//! The default `CaptureSink`: consults the entity capture policy, claims the
//! built-in cases, and keeps a running ledger of everything it saw. Actual
//! persistence of world data belongs to the host-side saver and stays out of
//! this crate; the ledger and structured logs are the observable surface.

use std::sync::Arc;

use crate::core::CaptureResult;
use crate::host::{BlockId, BlockPos, Container, Entity, MapData, World};
use crate::policy::EntityCapturePolicy;

use super::sink::CaptureSink;

/// Counters for every event category the engine handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Worlds adopted via load or swap
    pub worlds_loaded: u64,
    /// Entity GUIs captured by built-in logic
    pub entity_guis_captured: u64,
    /// Block GUIs captured by built-in logic
    pub block_guis_captured: u64,
    /// Custom containers seen opening
    pub containers_opened: u64,
    /// Chunks released by the host
    pub chunks_released: u64,
    /// Entities kept at removal because the policy captures their type
    pub entities_kept: u64,
    /// Chat lines observed
    pub chat_messages: u64,
    /// Map-item payloads observed
    pub map_updates: u64,
    /// Side-channel payloads observed
    pub plugin_payloads: u64,
    /// Block-state notifications observed
    pub block_events: u64,
}

/// Built-in capture logic backed by the entity capture policy
#[derive(Debug, Default)]
pub struct CaptureEngine {
    policy: EntityCapturePolicy,
    stats: CaptureStats,
}

impl CaptureEngine {
    /// Create an engine over a policy
    pub fn new(policy: EntityCapturePolicy) -> Self {
        Self {
            policy,
            stats: CaptureStats::default(),
        }
    }

    /// The entity capture policy
    pub fn policy(&self) -> &EntityCapturePolicy {
        &self.policy
    }

    /// Mutable access to the policy (operator configuration surfaces)
    pub fn policy_mut(&mut self) -> &mut EntityCapturePolicy {
        &mut self.policy
    }

    /// The event ledger
    pub fn stats(&self) -> CaptureStats {
        self.stats
    }
}

impl CaptureSink for CaptureEngine {
    fn on_world_load(&mut self, world: &Arc<World>) -> CaptureResult<()> {
        self.stats.worlds_loaded += 1;
        tracing::info!("[CaptureEngine] World '{}' loaded", world.name());
        Ok(())
    }

    fn on_entity_gui_closed(
        &mut self,
        _world: &Arc<World>,
        entity: &Arc<Entity>,
        container: &Arc<Container>,
    ) -> CaptureResult<bool> {
        // Only inventory-carrying entities of captured types are ours;
        // everything else is offered to the extension chain.
        if !entity.carries_inventory() || !self.policy.is_captured(entity.type_name()) {
            return Ok(false);
        }

        self.stats.entity_guis_captured += 1;
        tracing::debug!(
            "[CaptureEngine] Captured contents of '{}' for {}",
            container.name(),
            entity
        );
        Ok(true)
    }

    fn on_block_gui_closed(
        &mut self,
        world: &Arc<World>,
        pos: BlockPos,
        container: &Arc<Container>,
    ) -> CaptureResult<bool> {
        // Claim positions occupied by a known block entity.
        if world.block_entity_at(pos).is_none() {
            return Ok(false);
        }

        self.stats.block_guis_captured += 1;
        tracing::debug!(
            "[CaptureEngine] Captured contents of '{}' at {}",
            container.name(),
            pos
        );
        Ok(true)
    }

    fn on_container_opened(&mut self, container: &Arc<Container>) -> CaptureResult<()> {
        self.stats.containers_opened += 1;
        tracing::debug!("[CaptureEngine] Container '{}' opened", container.name());
        Ok(())
    }

    fn on_chunk_no_longer_needed(
        &mut self,
        world: &Arc<World>,
        chunk_x: i32,
        chunk_z: i32,
    ) -> CaptureResult<()> {
        self.stats.chunks_released += 1;
        tracing::debug!(
            "[CaptureEngine] Chunk ({}, {}) of '{}' released",
            chunk_x,
            chunk_z,
            world.name()
        );
        Ok(())
    }

    fn on_entity_removed(&mut self, entity: Option<&Arc<Entity>>) -> CaptureResult<()> {
        let Some(entity) = entity else {
            return Ok(());
        };

        if self.policy.is_captured(entity.type_name()) {
            self.stats.entities_kept += 1;
            tracing::debug!("[CaptureEngine] Keeping removed entity {}", entity);
        }
        Ok(())
    }

    fn on_chat(&mut self, text: &str) -> CaptureResult<()> {
        self.stats.chat_messages += 1;
        tracing::trace!("[CaptureEngine] Chat: {}", text);
        Ok(())
    }

    fn on_map_data(&mut self, map_id: i32, data: &MapData) -> CaptureResult<()> {
        self.stats.map_updates += 1;
        tracing::debug!("[CaptureEngine] Map {} updated ({} bytes)", map_id, data.len());
        Ok(())
    }

    fn on_plugin_payload(&mut self, channel: &str, payload: &[u8]) -> CaptureResult<()> {
        self.stats.plugin_payloads += 1;
        tracing::trace!(
            "[CaptureEngine] Side-channel payload on '{}' ({} bytes)",
            channel,
            payload.len()
        );
        Ok(())
    }

    fn on_block_event(
        &mut self,
        pos: BlockPos,
        block: &BlockId,
        data1: i32,
        data2: i32,
    ) -> CaptureResult<()> {
        self.stats.block_events += 1;
        tracing::trace!(
            "[CaptureEngine] Block event at {}: {} ({}, {})",
            pos,
            block,
            data1,
            data2
        );
        Ok(())
    }

    fn debug_info(&self) -> String {
        format!(
            "policy: {}\nworlds loaded: {}; entity GUIs: {}; block GUIs: {}; containers opened: {}\nchunks released: {}; entities kept: {}; chat: {}; maps: {}; payloads: {}; block events: {}",
            self.policy.debug_info(),
            self.stats.worlds_loaded,
            self.stats.entity_guis_captured,
            self.stats.block_guis_captured,
            self.stats.containers_opened,
            self.stats.chunks_released,
            self.stats.entities_kept,
            self.stats.chat_messages,
            self.stats.map_updates,
            self.stats.plugin_payloads,
            self.stats.block_events,
        )
    }
}
