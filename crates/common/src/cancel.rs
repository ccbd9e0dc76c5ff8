//! Cooperative cancellation token.
//!
//! Cancellation is not preemptive: every stage-level operation calls
//! [`CancelToken::checkpoint`] before doing work, and an in-flight encoder
//! invocation runs to completion before the next checkpoint observes the
//! flag. The token is passed explicitly into every stage rather than living
//! in ambient mutable state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{QuadcamError, QuadcamResult};

/// Shared cancellation flag, cheap to clone across tasks.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Fail with [`QuadcamError::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&self) -> QuadcamResult<()> {
        if self.is_cancelled() {
            Err(QuadcamError::Cancelled)
        } else {
            Ok(())
        }
    }
}
