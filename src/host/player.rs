//! Player collaborator seam

use std::sync::Arc;

use super::types::Container;

/// Narrow view of the host player the dispatcher polls each tick
///
/// The only thing the core needs from the player is which container is
/// currently open. `None` means no player exists yet (e.g. during a world
/// transition), in which case the container check is skipped.
pub trait PlayerView {
    /// The container the player currently has open
    fn open_container(&self) -> Option<Arc<Container>>;
}
