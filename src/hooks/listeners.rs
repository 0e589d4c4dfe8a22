//! Extension capability interfaces
//!
//! Four typed extension points, one trait per capability. Argument shapes
//! are deliberately concrete - there is no generic callback type - so an
//! extension implementing `ChatListener` can never be handed a block event.
//!
//! GUI-close handling is claim-based: the first handler returning `true`
//! ends the chain. The other three capabilities are observational: every
//! registered listener sees every event.

use std::fmt;
use std::sync::Arc;

use crate::host::{BlockId, BlockPos, Container, Entity, World};

/// The four extension-point categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Claim-based handling of closed container GUIs
    GuiClose,
    /// Observation of delivered chat lines
    Chat,
    /// Observation of side-channel payloads
    PluginChannel,
    /// Observation of block-state notifications
    BlockEvent,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::GuiClose => write!(f, "GuiCloseHandler"),
            Capability::Chat => write!(f, "ChatListener"),
            Capability::PluginChannel => write!(f, "PluginChannelListener"),
            Capability::BlockEvent => write!(f, "BlockEventListener"),
        }
    }
}

/// Claims container GUIs the built-in capture logic did not recognise
pub trait GuiCloseHandler {
    /// A GUI closed whose interaction targeted an entity
    ///
    /// Return `true` to claim the event and stop the chain.
    fn on_entity_closed(
        &self,
        world: &Arc<World>,
        entity: &Arc<Entity>,
        container: &Arc<Container>,
    ) -> bool;

    /// A GUI closed whose interaction targeted a block position
    fn on_position_closed(
        &self,
        world: &Arc<World>,
        pos: BlockPos,
        container: &Arc<Container>,
    ) -> bool;
}

/// Observes chat lines delivered to the player
pub trait ChatListener {
    fn on_chat(&self, world: &Arc<World>, text: &str);
}

/// Observes side-channel payloads from the remote peer
pub trait PluginChannelListener {
    fn on_payload(&self, world: &Arc<World>, channel: &str, payload: &[u8]);
}

/// Observes block-state notifications
pub trait BlockEventListener {
    fn on_block_event(
        &self,
        world: &Arc<World>,
        pos: BlockPos,
        block: &BlockId,
        data1: i32,
        data2: i32,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::GuiClose.to_string(), "GuiCloseHandler");
        assert_eq!(Capability::Chat.to_string(), "ChatListener");
        assert_eq!(Capability::PluginChannel.to_string(), "PluginChannelListener");
        assert_eq!(Capability::BlockEvent.to_string(), "BlockEventListener");
    }
}
