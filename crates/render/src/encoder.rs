//! External encoder boundary.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use quadcam_common::{EncoderConfig, QuadcamError, QuadcamResult, RunLog};

/// How many trailing stderr lines are retained as the failure diagnostic.
const DIAGNOSTIC_TAIL_LINES: usize = 12;

/// The external audio/video engine, invoked once per unit of work.
///
/// Implementations must not retry: a failed invocation is surfaced as
/// `EncodeFailed` and the affected work is redone on a later run because its
/// marker stays unset.
pub trait Encoder: Send + Sync {
    /// Composite `inputs` through `filter_graph` into `output`.
    ///
    /// Input order is the layout's declared role order.
    fn combine(
        &self,
        inputs: &[PathBuf],
        filter_graph: &str,
        output: &Path,
    ) -> impl Future<Output = QuadcamResult<()>> + Send;

    /// Stream-copy concatenate the files listed in `manifest` into `output`.
    fn concat_copy(
        &self,
        manifest: &Path,
        output: &Path,
    ) -> impl Future<Output = QuadcamResult<()>> + Send;
}

/// ffmpeg-backed [`Encoder`] implementation.
pub struct FfmpegEncoder {
    config: EncoderConfig,
    log: RunLog,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig, log: RunLog) -> Self {
        Self { config, log }
    }

    /// Check whether the configured encoder binary can be executed.
    pub fn is_available(binary: &str) -> bool {
        std::process::Command::new(binary)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn combine_args(&self, inputs: &[PathBuf], filter_graph: &str, output: &Path) -> Vec<String> {
        let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
        for input in inputs {
            args.push("-i".to_string());
            args.push(input.display().to_string());
        }
        args.push("-filter_complex".to_string());
        args.push(filter_graph.to_string());
        args.push("-r".to_string());
        args.push(self.config.fps.to_string());
        args.push("-preset".to_string());
        args.push(self.config.preset.clone());
        args.push("-b:v".to_string());
        args.push(self.config.video_bitrate.clone());
        args.push("-crf".to_string());
        args.push(self.config.crf.to_string());
        args.push("-g".to_string());
        args.push(self.config.keyframe_interval.to_string());
        args.push("-profile:v".to_string());
        args.push(self.config.profile.clone());
        args.push("-level".to_string());
        args.push(self.config.level.clone());
        args.push(output.display().to_string());
        args
    }

    fn concat_args(&self, manifest: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            manifest.display().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ]
    }

    /// Run one encoder subprocess to completion, streaming every stderr line
    /// into the run log and keeping a tail for the failure diagnostic.
    async fn run(&self, args: Vec<String>, output: &Path) -> QuadcamResult<()> {
        tracing::debug!(binary = %self.config.binary, ?args, "Running encoder");

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                QuadcamError::encode(output, format!("failed to start {}: {e}", self.config.binary))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| QuadcamError::encode(output, "failed to capture encoder stderr"))?;

        let mut tail: VecDeque<String> = VecDeque::with_capacity(DIAGNOSTIC_TAIL_LINES);
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            self.log.line(&format!("ffmpeg: {line}"));
            if tail.len() == DIAGNOSTIC_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        let status = child.wait().await.map_err(|e| {
            QuadcamError::encode(output, format!("failed to wait on encoder: {e}"))
        })?;

        if !status.success() {
            let diagnostic = if tail.is_empty() {
                format!("encoder exited with {status}")
            } else {
                format!(
                    "encoder exited with {status}: {}",
                    tail.make_contiguous().join(" | ")
                )
            };
            return Err(QuadcamError::encode(output, diagnostic));
        }

        Ok(())
    }
}

impl Encoder for FfmpegEncoder {
    async fn combine(
        &self,
        inputs: &[PathBuf],
        filter_graph: &str,
        output: &Path,
    ) -> QuadcamResult<()> {
        let args = self.combine_args(inputs, filter_graph, output);
        self.run(args, output).await
    }

    async fn concat_copy(&self, manifest: &Path, output: &Path) -> QuadcamResult<()> {
        let args = self.concat_args(manifest, output);
        self.run(args, output).await
    }
}
