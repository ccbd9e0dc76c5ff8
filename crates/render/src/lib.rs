//! Quadcam Render Stages
//!
//! The boundary to the external encoder and the two per-unit render stages
//! built on it:
//!
//! ```text
//! TimestampGroup ──┐
//!                  ├── Composite Stage ──► combined_<ts>_<layout>.mp4  (staging)
//! Layout ──────────┘                               │
//!                                                  ▼  (all groups, one layout)
//!                               Concatenation Stage ──► <session>_<layout>.mp4
//! ```
//!
//! The encoder itself is a black box behind the [`Encoder`] trait; the ffmpeg
//! implementation drives one subprocess per invocation and streams its
//! diagnostics into the run log.

pub mod composite;
pub mod concat;
pub mod encoder;

pub use composite::*;
pub use concat::*;
pub use encoder::*;
