//! Session Pipeline: all groups of one session, then per-layout
//! concatenation and marking.

use std::path::{Path, PathBuf};

use quadcam_common::{CancelToken, QuadcamError};
use quadcam_layout::Layout;
use quadcam_render::{composite, concatenate, Encoder};
use quadcam_scanner::{
    eligible_clips, group_by_timestamp, is_marked, mark, Session, MIN_CLIPS_PER_SESSION,
};

use crate::progress::Reporter;

/// Terminal state of one session pipeline run; the unit of progress
/// aggregation for the batch scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Every selected, unmarked layout produced its output and marker.
    Completed,
    /// At least one layout failed; the others finished normally.
    CompletedWithFailures,
    /// Every selected layout was already marked; nothing was touched.
    AlreadyProcessed,
    /// Fewer than four eligible clips; skipped with no side effects.
    Underpopulated,
    /// The session directory could not be scanned.
    Failed,
    /// The cancellation token tripped at a checkpoint.
    Cancelled,
}

/// Inputs for one session pipeline run.
pub struct SessionJob<'a> {
    pub session: &'a Session,
    /// Selected layouts, in the caller's order.
    pub layouts: &'a [Layout],
    /// Scratch directory for composite artifacts and concat manifests.
    pub staging_dir: &'a Path,
    /// Root under which `<session>/<session>_<layout>.mp4` is produced.
    pub export_root: &'a Path,
}

struct LayoutRun<'a> {
    layout: &'a Layout,
    artifacts: Vec<PathBuf>,
    failed: bool,
}

/// Run the full pipeline for one session.
///
/// Encoder and filesystem failures abort only the affected layout's work;
/// the session continues with its remaining layouts and reports
/// [`SessionStatus::CompletedWithFailures`]. Cancellation aborts the whole
/// session at the next checkpoint, leaving markers untouched.
pub async fn process_session<E: Encoder>(
    encoder: &E,
    cancel: &CancelToken,
    reporter: &Reporter,
    job: SessionJob<'_>,
) -> SessionStatus {
    if cancel.is_cancelled() {
        return SessionStatus::Cancelled;
    }

    let session = job.session;
    reporter.say(format!(
        "Starting processing for session: {}",
        session.path.display()
    ));

    let files = match eligible_clips(&session.path) {
        Ok(files) => files,
        Err(e) => {
            reporter.say(format!(
                "Failed to scan session {}: {e}",
                session.path.display()
            ));
            return SessionStatus::Failed;
        }
    };

    if files.len() < MIN_CLIPS_PER_SESSION {
        reporter.say(format!(
            "Not enough videos found in {}; at least one clip per camera is required.",
            session.path.display()
        ));
        return SessionStatus::Underpopulated;
    }

    let groups = group_by_timestamp(&files);

    // Marker state is snapshotted once per session, not re-read per group.
    let mut runs: Vec<LayoutRun<'_>> = Vec::with_capacity(job.layouts.len());
    let mut marked: Vec<&Layout> = Vec::new();
    for layout in job.layouts {
        if is_marked(&session.path, layout.id) {
            marked.push(layout);
        } else {
            runs.push(LayoutRun {
                layout,
                artifacts: Vec::new(),
                failed: false,
            });
        }
    }

    if runs.is_empty() {
        reporter.say(format!(
            "Session {} has already been processed for all selected layouts. Skipping.",
            session.name
        ));
        return SessionStatus::AlreadyProcessed;
    }
    for layout in marked {
        reporter.say(format!(
            "Session {} already processed for layout {}, skipping that layout.",
            session.name, layout.id
        ));
    }

    for (key, group) in &groups {
        if cancel.is_cancelled() {
            return SessionStatus::Cancelled;
        }

        if !group.is_complete() {
            reporter.say(format!(
                "Skipping group {key} in {}: only {} of 4 cameras present.",
                session.name,
                group.len()
            ));
            continue;
        }
        // Scan-time existence may be stale by now.
        if !group.all_present() {
            reporter.say(format!(
                "Skipping group {key} in {}: a clip disappeared since scanning.",
                session.name
            ));
            continue;
        }

        for run in runs.iter_mut().filter(|run| !run.failed) {
            let output = job.staging_dir.join(format!(
                "combined_{}_{key}_{}.mp4",
                session.name, run.layout.id
            ));
            match composite(encoder, cancel, group, run.layout, output).await {
                Ok(path) => run.artifacts.push(path),
                Err(QuadcamError::Cancelled) => return SessionStatus::Cancelled,
                Err(e) => {
                    reporter.say(format!(
                        "Composite failed for group {key} layout {} in {}: {e}",
                        run.layout.id, session.name
                    ));
                    run.failed = true;
                }
            }
        }
    }

    let out_dir = job.export_root.join(&session.name);
    for run in runs.iter_mut().filter(|run| !run.failed) {
        if run.artifacts.is_empty() {
            reporter.say(format!(
                "No complete timestamp groups in {} for layout {}; nothing to concatenate.",
                session.name, run.layout.id
            ));
            continue;
        }

        if let Err(e) = std::fs::create_dir_all(&out_dir) {
            reporter.say(format!(
                "Failed to create output directory {}: {e}",
                out_dir.display()
            ));
            run.failed = true;
            continue;
        }

        let output = out_dir.join(format!("{}_{}.mp4", session.name, run.layout.id));
        match concatenate(
            encoder,
            cancel,
            run.artifacts.clone(),
            job.staging_dir,
            output,
        )
        .await
        {
            Ok(path) => {
                reporter.say(format!("Concatenation completed: {}", path.display()));
                // The output exists on disk; marking is the last action for
                // this layout.
                if let Err(e) = mark(&session.path, run.layout.id) {
                    reporter.say(format!(
                        "Failed to write marker for {} layout {}: {e}",
                        session.name, run.layout.id
                    ));
                    run.failed = true;
                }
            }
            Err(QuadcamError::Cancelled) => return SessionStatus::Cancelled,
            Err(e) => {
                reporter.say(format!(
                    "Concatenation failed for {} layout {}: {e}",
                    session.name, run.layout.id
                ));
                run.failed = true;
            }
        }
    }

    reporter.say(format!("Finished processing session: {}", session.name));

    if runs.iter().any(|run| run.failed) {
        SessionStatus::CompletedWithFailures
    } else {
        SessionStatus::Completed
    }
}
