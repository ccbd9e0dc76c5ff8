//! Concatenation Stage: chronological stream-copy join of one session's
//! composites for one layout.

use std::path::{Path, PathBuf};

use quadcam_common::{CancelToken, QuadcamResult};

use crate::encoder::Encoder;

/// Build the encoder's concat manifest: one `file '<path>'` line per input.
pub fn concat_manifest(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("file '{}'", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Concatenate `inputs` into `output` in stream-copy mode.
///
/// Inputs are re-sorted by basename before the manifest is written; callers
/// pass chronological order already, but the re-sort makes the result
/// deterministic regardless of the caller. The transient manifest is written
/// into `manifest_dir`, deleted on success, and left behind on encoder
/// failure for diagnosis.
pub async fn concatenate<E: Encoder>(
    encoder: &E,
    cancel: &CancelToken,
    mut inputs: Vec<PathBuf>,
    manifest_dir: &Path,
    output: PathBuf,
) -> QuadcamResult<PathBuf> {
    cancel.checkpoint()?;

    inputs.sort_by_key(|p| basename(p));

    let manifest_name = format!(
        "concat_{}.txt",
        output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string())
    );
    let manifest = manifest_dir.join(manifest_name);
    std::fs::write(&manifest, concat_manifest(&inputs))?;

    tracing::debug!(
        inputs = inputs.len(),
        manifest = %manifest.display(),
        output = %output.display(),
        "Concatenating composites"
    );

    encoder.concat_copy(&manifest, &output).await?;

    // Keep the manifest for post-mortem when the encoder failed above.
    if let Err(e) = std::fs::remove_file(&manifest) {
        tracing::warn!(error = %e, manifest = %manifest.display(), "Failed to remove concat manifest");
    }

    Ok(output)
}
