//! Session discovery under a source root.

use std::path::{Path, PathBuf};

use quadcam_common::QuadcamResult;

/// One directory representing a single multi-camera recording event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Absolute directory path.
    pub path: PathBuf,
    /// Directory basename, used for output naming.
    pub name: String,
}

/// Minimum number of eligible clip files for a session to be processable
/// (one clip per camera).
pub const MIN_CLIPS_PER_SESSION: usize = 4;

/// List candidate sessions under `root`, sorted by directory name
/// descending so the most recent recordings are scheduled first.
pub fn list_sessions(root: &Path) -> QuadcamResult<Vec<Session>> {
    let mut sessions = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        sessions.push(Session {
            path: entry.path(),
            name,
        });
    }

    sessions.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(sessions)
}

/// Clip files eligible for grouping: `.mp4` extension, case-insensitive.
pub fn eligible_clips(session_dir: &Path) -> QuadcamResult<Vec<PathBuf>> {
    let mut clips = Vec::new();
    for entry in std::fs::read_dir(session_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_mp4 = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);
        if is_mp4 {
            clips.push(path);
        }
    }
    Ok(clips)
}
