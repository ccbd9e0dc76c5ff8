//! Durable append-only run log.
//!
//! One log file is created per batch run next to the outputs. Every status
//! message, skip decision, failure, and encoder stderr line lands here for
//! post-mortem diagnosis. Writes are best-effort: a failing log write is
//! reported through tracing and never aborts the pipeline.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::QuadcamResult;

/// Timestamped line sink shared across the whole run.
#[derive(Clone)]
pub struct RunLog {
    writer: Arc<Mutex<BufWriter<File>>>,
    path: PathBuf,
}

impl RunLog {
    /// Open (or create) the log file in append mode.
    pub fn open(path: impl Into<PathBuf>) -> QuadcamResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            writer: Arc::new(Mutex::new(BufWriter::new(file))),
            path,
        })
    }

    /// Append one timestamped line.
    pub fn line(&self, message: &str) {
        let stamped = format!("[{}] {}", chrono::Utc::now().to_rfc3339(), message);
        let Ok(mut writer) = self.writer.lock() else {
            tracing::warn!(path = %self.path.display(), "Run log lock poisoned, dropping line");
            return;
        };
        if let Err(e) = writeln!(writer, "{stamped}").and_then(|_| writer.flush()) {
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to write run log line");
        }
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog").field("path", &self.path).finish()
    }
}
