//! End-to-end batch runs against a mock encoder.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use quadcam_common::{CancelToken, QuadcamError, QuadcamResult};
use quadcam_layout::{CameraRole, LayoutId};
use quadcam_pipeline::{run_batch, BatchOptions, BatchSummary, RunPaths};
use quadcam_render::Encoder;

/// Records every invocation, tracks peak concurrency, and writes stub
/// output files so downstream stages see real paths.
#[derive(Default)]
struct MockEncoder {
    combines: Mutex<Vec<PathBuf>>,
    concat_manifests: Mutex<Vec<String>>,
    active: AtomicUsize,
    peak: AtomicUsize,
    work_delay: Option<Duration>,
    /// Fail any combine whose output path contains this substring.
    fail_output_containing: Option<String>,
    /// Trip this token from inside the first combine call.
    cancel_during_combine: Option<CancelToken>,
}

impl MockEncoder {
    fn combine_count(&self) -> usize {
        self.combines.lock().unwrap().len()
    }

    fn concat_count(&self) -> usize {
        self.concat_manifests.lock().unwrap().len()
    }

    fn enter(&self) {
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(active, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Encoder for MockEncoder {
    async fn combine(
        &self,
        _inputs: &[PathBuf],
        _filter_graph: &str,
        output: &Path,
    ) -> QuadcamResult<()> {
        self.enter();
        if let Some(delay) = self.work_delay {
            tokio::time::sleep(delay).await;
        }

        self.combines.lock().unwrap().push(output.to_path_buf());
        if let Some(token) = &self.cancel_during_combine {
            token.cancel();
        }

        let result = match &self.fail_output_containing {
            Some(needle) if output.display().to_string().contains(needle) => {
                Err(QuadcamError::encode(output, "simulated encoder failure"))
            }
            _ => std::fs::write(output, b"composite").map_err(Into::into),
        };
        self.exit();
        result
    }

    async fn concat_copy(&self, manifest: &Path, output: &Path) -> QuadcamResult<()> {
        self.enter();
        let content = std::fs::read_to_string(manifest)?;
        self.concat_manifests.lock().unwrap().push(content);
        let result = std::fs::write(output, b"session output").map_err(Into::into);
        self.exit();
        result
    }
}

/// Create a session directory with one clip per camera for each timestamp.
fn write_session(source_root: &Path, name: &str, timestamps: &[&str]) -> PathBuf {
    let dir = source_root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    for ts in timestamps {
        for role in CameraRole::ALL {
            std::fs::write(dir.join(format!("{ts}-{role}.mp4")), b"clip").unwrap();
        }
    }
    dir
}

fn options(source: &Path, export: &Path, layouts: Vec<LayoutId>, jobs: usize) -> BatchOptions {
    BatchOptions {
        source_root: source.to_path_buf(),
        export_root: export.to_path_buf(),
        layouts,
        concurrency: jobs,
    }
}

async fn run(
    encoder: Arc<MockEncoder>,
    options: BatchOptions,
    cancel: CancelToken,
) -> (BatchSummary, Vec<String>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let paths = RunPaths::prepare(&options.export_root).unwrap();
    let summary = run_batch(encoder, options, paths, cancel, tx).await.unwrap();
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    (summary, messages)
}

fn staging_dir(export_root: &Path) -> PathBuf {
    std::fs::read_dir(export_root)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.is_dir() && p.to_string_lossy().ends_with("-processing"))
        .expect("staging directory should exist")
}

#[tokio::test]
async fn end_to_end_single_session() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let session = write_session(
        source.path(),
        "2024-01-01",
        &["2024-01-01_10-00-00", "2024-01-01_10-10-00"],
    );

    let encoder = Arc::new(MockEncoder::default());
    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.sessions, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(encoder.combine_count(), 2);
    assert_eq!(encoder.concat_count(), 1);

    assert!(export
        .path()
        .join("2024-01-01")
        .join("2024-01-01_2x2.mp4")
        .exists());
    assert!(session.join(".processed_2x2").exists());

    let log = std::fs::read_to_string(&summary.log_path).unwrap();
    assert!(log.contains("Starting processing for session"));
    assert!(log.contains("Finished processing session: 2024-01-01"));
    assert!(messages.iter().any(|m| m.contains("All sessions processed")));
}

#[tokio::test]
async fn underpopulated_session_is_a_no_op() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let dir = source.path().join("2024-01-01");
    std::fs::create_dir_all(&dir).unwrap();
    for role in ["front", "back", "left"] {
        std::fs::write(dir.join(format!("2024-01-01_10-00-00-{role}.mp4")), b"clip").unwrap();
    }

    let encoder = Arc::new(MockEncoder::default());
    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.underpopulated, 1);
    assert_eq!(encoder.combine_count(), 0);
    assert_eq!(encoder.concat_count(), 0);
    assert!(!dir.join(".processed_2x2").exists());
    assert!(!export.path().join("2024-01-01").exists());
    assert_eq!(
        std::fs::read_dir(staging_dir(export.path())).unwrap().count(),
        0
    );
    assert!(messages.iter().any(|m| m.contains("Not enough videos")));
}

#[tokio::test]
async fn fully_marked_session_skips_the_encoder() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let session = write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);
    std::fs::write(session.join(".processed_2x2"), b"processed_2x2").unwrap();

    let encoder = Arc::new(MockEncoder::default());
    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.already_processed, 1);
    assert_eq!(encoder.combine_count(), 0);
    assert_eq!(encoder.concat_count(), 0);
    assert!(!export.path().join("2024-01-01").exists());
    assert_eq!(
        std::fs::read_dir(staging_dir(export.path())).unwrap().count(),
        0
    );
    assert!(messages
        .iter()
        .any(|m| m.contains("already been processed for all selected layouts")));
}

#[tokio::test]
async fn partially_marked_session_processes_only_unmarked_layouts() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let session = write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);
    std::fs::write(session.join(".processed_2x2"), b"processed_2x2").unwrap();

    let encoder = Arc::new(MockEncoder::default());
    let (summary, _) = run(
        encoder.clone(),
        options(
            source.path(),
            export.path(),
            vec![LayoutId::TwoByTwo, LayoutId::FrontBig],
            1,
        ),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.completed, 1);
    let combines = encoder.combines.lock().unwrap().clone();
    assert_eq!(combines.len(), 1);
    assert!(combines[0].to_string_lossy().contains("frontbig"));
    assert!(session.join(".processed_frontbig").exists());
    assert!(export
        .path()
        .join("2024-01-01")
        .join("2024-01-01_frontbig.mp4")
        .exists());
}

#[tokio::test]
async fn incomplete_groups_are_excluded_from_concatenation() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let session = write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);
    // Second group misses the right camera.
    for role in ["front", "back", "left"] {
        std::fs::write(
            session.join(format!("2024-01-01_10-10-00-{role}.mp4")),
            b"clip",
        )
        .unwrap();
    }

    let encoder = Arc::new(MockEncoder::default());
    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.completed, 1);
    assert_eq!(encoder.combine_count(), 1);

    let manifests = encoder.concat_manifests.lock().unwrap().clone();
    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].lines().count(), 1);
    assert!(manifests[0].contains("2024-01-01_10-00-00"));
    assert!(messages
        .iter()
        .any(|m| m.contains("Skipping group 2024-01-01_10-10-00")));
}

#[tokio::test]
async fn concatenation_manifest_is_in_ascending_timestamp_order() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    write_session(
        source.path(),
        "2024-01-01",
        &[
            "2024-01-01_10-20-00",
            "2024-01-01_10-00-00",
            "2024-01-01_10-10-00",
        ],
    );

    let encoder = Arc::new(MockEncoder::default());
    run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    let manifests = encoder.concat_manifests.lock().unwrap().clone();
    let lines: Vec<&str> = manifests[0].lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("10-00-00"));
    assert!(lines[1].contains("10-10-00"));
    assert!(lines[2].contains("10-20-00"));
}

#[tokio::test]
async fn marking_is_monotonic_across_runs() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);

    let encoder = Arc::new(MockEncoder::default());
    let opts = options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1);

    let (first, _) = run(encoder.clone(), opts.clone(), CancelToken::new()).await;
    assert_eq!(first.completed, 1);
    assert_eq!(encoder.combine_count(), 1);

    let (second, _) = run(encoder.clone(), opts, CancelToken::new()).await;
    assert_eq!(second.already_processed, 1);
    assert_eq!(encoder.combine_count(), 1);
    assert_eq!(encoder.concat_count(), 1);
}

#[tokio::test]
async fn cancellation_stops_unstarted_sessions_and_clears_staging() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    for name in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        let ts = format!("{name}_10-00-00");
        write_session(source.path(), name, &[ts.as_str()]);
    }

    let cancel = CancelToken::new();
    let encoder = Arc::new(MockEncoder {
        cancel_during_combine: Some(cancel.clone()),
        ..Default::default()
    });

    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        cancel,
    )
    .await;

    // The in-flight composite finished; the next checkpoint observed the
    // flag, and no further session started.
    assert_eq!(encoder.combine_count(), 1);
    assert_eq!(encoder.concat_count(), 0);
    assert_eq!(summary.cancelled, 3);
    assert_eq!(
        std::fs::read_dir(staging_dir(export.path())).unwrap().count(),
        0
    );
    for name in ["2024-01-01", "2024-01-02", "2024-01-03"] {
        assert!(!source.path().join(name).join(".processed_2x2").exists());
    }
    assert!(messages.iter().any(|m| m.contains("cancelled")));
}

#[tokio::test]
async fn concurrency_limit_bounds_active_sessions() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    for name in ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"] {
        let ts = format!("{name}_10-00-00");
        write_session(source.path(), name, &[ts.as_str()]);
    }

    let encoder = Arc::new(MockEncoder {
        work_delay: Some(Duration::from_millis(25)),
        ..Default::default()
    });

    let (summary, _) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 2),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.completed, 4);
    assert!(encoder.peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn one_failing_session_does_not_cancel_its_siblings() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);
    write_session(source.path(), "2024-01-02", &["2024-01-02_10-00-00"]);

    let encoder = Arc::new(MockEncoder {
        fail_output_containing: Some("2024-01-02".to_string()),
        ..Default::default()
    });

    let (summary, messages) = run(
        encoder.clone(),
        options(source.path(), export.path(), vec![LayoutId::TwoByTwo], 1),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);
    assert!(!source
        .path()
        .join("2024-01-02")
        .join(".processed_2x2")
        .exists());
    assert!(source
        .path()
        .join("2024-01-01")
        .join(".processed_2x2")
        .exists());
    assert!(messages.iter().any(|m| m.contains("Composite failed")));
}

#[tokio::test]
async fn failed_layout_does_not_block_other_layouts_in_the_session() {
    let source = tempfile::tempdir().unwrap();
    let export = tempfile::tempdir().unwrap();
    let session = write_session(source.path(), "2024-01-01", &["2024-01-01_10-00-00"]);

    let encoder = Arc::new(MockEncoder {
        fail_output_containing: Some("_2x2".to_string()),
        ..Default::default()
    });

    let (summary, _) = run(
        encoder.clone(),
        options(
            source.path(),
            export.path(),
            vec![LayoutId::TwoByTwo, LayoutId::BackBig],
            1,
        ),
        CancelToken::new(),
    )
    .await;

    assert_eq!(summary.failed, 1);
    assert!(!session.join(".processed_2x2").exists());
    assert!(session.join(".processed_backbig").exists());
    assert!(export
        .path()
        .join("2024-01-01")
        .join("2024-01-01_backbig.mp4")
        .exists());
}
