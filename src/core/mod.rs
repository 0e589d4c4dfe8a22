//! Core types for the capture SDK
//!
//! This module provides the fundamental types used throughout the crate:
//! - `CaptureError` - Error taxonomy
//! - `CaptureResult` - Result alias

pub mod error;

pub use error::{CaptureError, CaptureResult};
