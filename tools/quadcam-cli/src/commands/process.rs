//! Process every session under a source root.

use std::path::PathBuf;
use std::sync::Arc;

use quadcam_common::config::AppConfig;
use quadcam_common::CancelToken;
use quadcam_layout::LayoutId;
use quadcam_pipeline::{run_batch, BatchOptions, RunPaths};
use quadcam_render::FfmpegEncoder;

pub async fn run(
    config: AppConfig,
    source: PathBuf,
    dest: PathBuf,
    layout_args: Vec<String>,
    jobs: Option<usize>,
) -> anyhow::Result<()> {
    let jobs = jobs.unwrap_or(config.jobs);
    if jobs < 1 {
        anyhow::bail!("--jobs must be at least 1");
    }

    let mut layouts: Vec<LayoutId> = Vec::new();
    for arg in &layout_args {
        let id: LayoutId = arg
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}. Use: 2x2, frontbig, backbig, leftbig, rightbig"))?;
        if !layouts.contains(&id) {
            layouts.push(id);
        }
    }

    if !FfmpegEncoder::is_available(&config.encoder.binary) {
        anyhow::bail!(
            "encoder binary '{}' not found; install ffmpeg or adjust the config",
            config.encoder.binary
        );
    }

    println!("Processing sessions under: {}", source.display());
    println!("  Export root: {}", dest.display());
    println!(
        "  Layouts: {}",
        layouts
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Concurrency: {jobs}");
    println!();

    let paths = RunPaths::prepare(&dest)?;
    let encoder = Arc::new(FfmpegEncoder::new(config.encoder.clone(), paths.log.clone()));

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("\nCancellation requested; finishing in-flight work...");
                cancel.cancel();
            }
        });
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            println!("{message}");
        }
    });

    let options = BatchOptions {
        source_root: source,
        export_root: dest,
        layouts,
        concurrency: jobs,
    };
    let summary = run_batch(encoder, options, paths, cancel, tx).await?;
    let _ = printer.await;

    println!();
    println!(
        "Batch finished: {} session(s): {} completed, {} already processed, {} under-populated, {} failed, {} cancelled.",
        summary.sessions,
        summary.completed,
        summary.already_processed,
        summary.underpopulated,
        summary.failed,
        summary.cancelled
    );
    println!("Run log: {}", summary.log_path.display());

    Ok(())
}
