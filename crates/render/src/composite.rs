//! Composite Stage: one timestamp group, one layout, one encoder invocation.

use std::path::{Path, PathBuf};

use quadcam_common::{CancelToken, QuadcamResult};
use quadcam_layout::Layout;
use quadcam_scanner::TimestampGroup;

use crate::encoder::Encoder;

/// Render the composite for `group` under `layout` into `output`.
///
/// Clips are bound to the layout's input slots in declared role order. If the
/// group lacks a declared role the encoder receives fewer inputs than the
/// filter template expects and rejects the invocation; that failure is
/// surfaced unchanged as `EncodeFailed`.
pub async fn composite<E: Encoder>(
    encoder: &E,
    cancel: &CancelToken,
    group: &TimestampGroup,
    layout: &Layout,
    output: PathBuf,
) -> QuadcamResult<PathBuf> {
    cancel.checkpoint()?;

    let inputs: Vec<PathBuf> = layout
        .roles
        .iter()
        .filter_map(|role| group.clip(*role).map(Path::to_path_buf))
        .collect();

    tracing::debug!(
        group = %group.key,
        layout = %layout.id,
        inputs = inputs.len(),
        output = %output.display(),
        "Compositing group"
    );

    encoder
        .combine(&inputs, &layout.filter_graph(), &output)
        .await?;
    Ok(output)
}
