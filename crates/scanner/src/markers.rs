//! Per-session, per-layout processed markers.
//!
//! A marker's presence means that layout's session output was produced by a
//! prior (or the current) run. Absence means nothing more than "not yet
//! processed". Markers are written only after a successful concatenation and
//! are never deleted by the pipeline; cleanup is manual.

use std::path::{Path, PathBuf};

use quadcam_common::QuadcamResult;
use quadcam_layout::LayoutId;

/// Sentinel file path for a session/layout pair.
pub fn marker_path(session_dir: &Path, id: LayoutId) -> PathBuf {
    session_dir.join(format!(".processed_{id}"))
}

/// Non-blocking existence check; false on any access error.
pub fn is_marked(session_dir: &Path, id: LayoutId) -> bool {
    marker_path(session_dir, id).exists()
}

/// Record successful processing of a session/layout pair. Must only be
/// called once the session output file exists on disk.
pub fn mark(session_dir: &Path, id: LayoutId) -> QuadcamResult<()> {
    std::fs::write(marker_path(session_dir, id), format!("processed_{id}"))?;
    Ok(())
}
