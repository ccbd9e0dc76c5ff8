//! Quadcam Common Utilities
//!
//! Shared infrastructure for all Quadcam crates:
//! - Error types and result aliases
//! - Cooperative cancellation token
//! - Tracing/logging initialization
//! - Durable append-only run log
//! - Configuration loading

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;
pub mod runlog;

pub use cancel::*;
pub use config::*;
pub use error::*;
pub use runlog::*;
