//! Host-facing value types and collaborator seams
//!
//! Everything the host application shares with the capture core lives here:
//! - `World`, `Container`, `Entity`, `BlockPos`, `BlockId`, `MapData` - opaque
//!   value types the core reads but never mutates
//! - `PlayerView` - the narrow player interface polled by the dispatcher

mod player;
mod types;

pub use player::PlayerView;
pub use types::{BlockId, BlockPos, Container, ContainerKind, Entity, MapData, World};
