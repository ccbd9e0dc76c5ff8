//! Error types shared across Quadcam crates.

use std::path::PathBuf;

/// Top-level error type for Quadcam operations.
#[derive(Debug, thiserror::Error)]
pub enum QuadcamError {
    /// Cooperative abort. Not a defect; halts the current session's
    /// remaining work only.
    #[error("operation cancelled")]
    Cancelled,

    /// A layout identifier outside the fixed enumerated set.
    #[error("unknown layout: {id}")]
    UnknownLayout { id: String },

    /// The external encoder exited nonzero or failed internally.
    /// Carries the encoder's diagnostic text; never retried.
    #[error("encoder failed for {output}: {diagnostic}")]
    EncodeFailed { output: PathBuf, diagnostic: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using QuadcamError.
pub type QuadcamResult<T> = Result<T, QuadcamError>;

impl QuadcamError {
    pub fn unknown_layout(id: impl Into<String>) -> Self {
        Self::UnknownLayout { id: id.into() }
    }

    pub fn encode(output: impl Into<PathBuf>, diagnostic: impl Into<String>) -> Self {
        Self::EncodeFailed {
            output: output.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Whether this error is the cooperative cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
