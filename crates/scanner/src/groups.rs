//! Grouping of clip files by capture timestamp.
//!
//! Clip names follow `<timestamp>-<camera>.mp4`; the timestamp key is the
//! stem with the trailing camera token stripped. Groups are keyed in a
//! `BTreeMap`, so iteration order is the natural key order regardless of the
//! directory listing order. The timestamp keys are chronologically
//! formatted, which makes key order chronological order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quadcam_layout::CameraRole;

/// The set of same-moment clips across cameras within one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampGroup {
    /// Shared capture timestamp key.
    pub key: String,
    clips: BTreeMap<CameraRole, PathBuf>,
}

impl TimestampGroup {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            clips: BTreeMap::new(),
        }
    }

    /// Bind a clip to a camera role. The first clip wins if two files in the
    /// same group claim the same role.
    pub fn bind(&mut self, role: CameraRole, path: PathBuf) -> bool {
        if self.clips.contains_key(&role) {
            return false;
        }
        self.clips.insert(role, path);
        true
    }

    pub fn clip(&self, role: CameraRole) -> Option<&Path> {
        self.clips.get(&role).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Eligible for compositing only with all four cameras bound.
    pub fn is_complete(&self) -> bool {
        self.clips.len() == CameraRole::ALL.len()
    }

    /// Re-check that every bound clip still exists on disk. Scan-time
    /// existence may be stale by dispatch time.
    pub fn all_present(&self) -> bool {
        self.clips.values().all(|path| path.exists())
    }
}

/// Derive the timestamp key for a clip file: the file stem with the trailing
/// `-<camera>` token stripped. Returns `None` when there is no token to
/// strip.
pub fn timestamp_key(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let (key, _camera) = stem.rsplit_once('-')?;
    if key.is_empty() {
        return None;
    }
    Some(key.to_string())
}

/// Group clip files by timestamp key, binding each to its inferred camera
/// role. Files with no recognizable role or timestamp are skipped with a
/// diagnostic; grouping is stable across runs for identical directory
/// contents.
pub fn group_by_timestamp(files: &[PathBuf]) -> BTreeMap<String, TimestampGroup> {
    let mut groups: BTreeMap<String, TimestampGroup> = BTreeMap::new();

    for path in files {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => {
                tracing::debug!(path = %path.display(), "Skipping clip with non-UTF-8 name");
                continue;
            }
        };

        let Some(key) = timestamp_key(path) else {
            tracing::debug!(clip = name, "Skipping clip without a timestamp key");
            continue;
        };
        let Some(role) = CameraRole::infer(name) else {
            tracing::debug!(clip = name, "Skipping clip with no camera role in its name");
            continue;
        };

        let group = groups
            .entry(key.clone())
            .or_insert_with(|| TimestampGroup::new(key));
        if !group.bind(role, path.clone()) {
            tracing::warn!(clip = name, role = %role, "Duplicate camera role in group, keeping first");
        }
    }

    groups
}
