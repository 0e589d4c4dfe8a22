//! Persisted configuration
//!
//! - `PropertyStore` - flat string-keyed property map backing the entity
//!   capture policy and any operator-facing configuration surface

mod properties;

pub use properties::PropertyStore;
