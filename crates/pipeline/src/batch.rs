//! Batch Scheduler: all discovered sessions under a bounded concurrency
//! limit, with cooperative cancellation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use quadcam_common::{CancelToken, QuadcamResult, RunLog};
use quadcam_layout::{layout_for, Layout, LayoutId};
use quadcam_render::Encoder;
use quadcam_scanner::list_sessions;

use crate::progress::Reporter;
use crate::session::{process_session, SessionJob, SessionStatus};

/// Caller-supplied parameters for one batch run. The caller validates them
/// (known layout identifiers, concurrency >= 1) before reaching the core.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Root containing one subdirectory per recording session.
    pub source_root: PathBuf,
    /// Root receiving the final `<session>/<session>_<layout>.mp4` outputs.
    pub export_root: PathBuf,
    /// Selected layouts.
    pub layouts: Vec<LayoutId>,
    /// Maximum number of sessions processed concurrently.
    pub concurrency: usize,
}

/// Run-scoped filesystem state: the staging directory for composites and the
/// durable run log, both named after the batch start time and living under
/// the export root.
#[derive(Debug)]
pub struct RunPaths {
    pub staging_dir: PathBuf,
    pub log: RunLog,
}

impl RunPaths {
    /// Create the staging directory (emptied of any leftovers) and open the
    /// run log for this batch.
    pub fn prepare(export_root: &Path) -> QuadcamResult<Self> {
        let stamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S").to_string();
        let staging_dir = export_root.join(format!("{stamp}-processing"));

        std::fs::create_dir_all(&staging_dir)?;
        empty_dir(&staging_dir)?;

        let log = RunLog::open(export_root.join(format!("{stamp}-log.txt")))?;
        Ok(Self { staging_dir, log })
    }
}

/// Aggregated outcome of one batch run. Individual session failures do not
/// fail the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub sessions: usize,
    pub completed: usize,
    pub already_processed: usize,
    pub underpopulated: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Durable run log for this batch.
    pub log_path: PathBuf,
}

impl BatchSummary {
    fn record(&mut self, status: SessionStatus) {
        match status {
            SessionStatus::Completed => self.completed += 1,
            SessionStatus::AlreadyProcessed => self.already_processed += 1,
            SessionStatus::Underpopulated => self.underpopulated += 1,
            SessionStatus::CompletedWithFailures | SessionStatus::Failed => self.failed += 1,
            SessionStatus::Cancelled => self.cancelled += 1,
        }
    }
}

/// Run the batch: discover sessions under the source root and drive one
/// session pipeline per session, at most `concurrency` at a time.
///
/// Waits for every scheduled pipeline to settle; one session's encoder error
/// never cancels its siblings. On cancellation the staging directory is
/// cleared once in-flight work has settled, so the next run never resumes
/// from half-written composites.
pub async fn run_batch<E: Encoder + 'static>(
    encoder: Arc<E>,
    options: BatchOptions,
    paths: RunPaths,
    cancel: CancelToken,
    messages: mpsc::UnboundedSender<String>,
) -> QuadcamResult<BatchSummary> {
    let reporter = Reporter::new(messages, paths.log.clone());
    reporter.say(format!(
        "Batch run started: source {}, export {}, layouts [{}], concurrency {}.",
        options.source_root.display(),
        options.export_root.display(),
        options
            .layouts
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        options.concurrency
    ));

    let layouts: Arc<Vec<Layout>> =
        Arc::new(options.layouts.iter().map(|id| layout_for(*id)).collect());
    let sessions = list_sessions(&options.source_root)?;

    let mut summary = BatchSummary {
        sessions: sessions.len(),
        log_path: paths.log.path().to_path_buf(),
        ..Default::default()
    };

    let limiter = Arc::new(Semaphore::new(options.concurrency));
    let staging = Arc::new(paths.staging_dir.clone());
    let export_root = Arc::new(options.export_root.clone());

    let mut handles = Vec::with_capacity(sessions.len());
    for session in sessions {
        let limiter = limiter.clone();
        let encoder = encoder.clone();
        let cancel = cancel.clone();
        let reporter = reporter.clone();
        let layouts = layouts.clone();
        let staging = staging.clone();
        let export_root = export_root.clone();

        handles.push(tokio::spawn(async move {
            let _permit = match limiter.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return SessionStatus::Cancelled,
            };
            process_session(
                encoder.as_ref(),
                &cancel,
                &reporter,
                SessionJob {
                    session: &session,
                    layouts: layouts.as_slice(),
                    staging_dir: staging.as_path(),
                    export_root: export_root.as_path(),
                },
            )
            .await
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(status) => summary.record(status),
            Err(e) => {
                tracing::error!(error = %e, "Session task panicked");
                summary.failed += 1;
            }
        }
    }

    if cancel.is_cancelled() {
        if let Err(e) = empty_dir(&paths.staging_dir) {
            tracing::warn!(error = %e, dir = %paths.staging_dir.display(), "Failed to clear staging directory");
        }
        reporter.say(
            "Processing cancelled. In-flight work has settled and the staging directory was \
             cleared; unfinished sessions will be redone on the next run.",
        );
    } else {
        reporter.say(format!(
            "All sessions processed: {} completed, {} already processed, {} under-populated, {} failed.",
            summary.completed, summary.already_processed, summary.underpopulated, summary.failed
        ));
    }

    Ok(summary)
}

/// Remove every entry inside `dir`, leaving the directory itself in place.
pub fn empty_dir(dir: &Path) -> QuadcamResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}
