//! Built-in capture logic
//!
//! - `CaptureSink` - the seam between the dispatcher and built-in capture
//! - `CaptureEngine` - the standard sink, backed by the entity capture policy
//! - `CaptureStats` - the engine's running event ledger

mod engine;
mod sink;

pub use engine::{CaptureEngine, CaptureStats};
pub use sink::CaptureSink;
