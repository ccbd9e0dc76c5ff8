//! Quadcam Session Scanner
//!
//! Filesystem-only discovery layer:
//! - Session enumeration under a source root (most recent first)
//! - Grouping of clip files by capture timestamp and camera role
//! - Per-session, per-layout processed markers

pub mod groups;
pub mod markers;
pub mod sessions;

pub use groups::*;
pub use markers::*;
pub use sessions::*;
