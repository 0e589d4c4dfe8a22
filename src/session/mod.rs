//! Session state tracking
//!
//! - `SessionTracker` - the per-session state machine the dispatcher drives
//! - `SessionState` - `Inactive` / `Active` / `Suspended`
//! - `InteractionTarget` - entity or block position behind a GUI close

mod tracker;

pub use tracker::{InteractionTarget, SessionState, SessionTracker};
