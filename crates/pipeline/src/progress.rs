//! Progress reporting.
//!
//! The pipeline talks to the outside world through two sinks at once: a live
//! message channel consumed by whatever front end is attached, and the
//! durable run log. The core assumes nothing about how the channel side is
//! displayed.

use quadcam_common::RunLog;
use tokio::sync::mpsc;

/// Fans each status message out to the live channel and the run log.
#[derive(Debug, Clone)]
pub struct Reporter {
    tx: mpsc::UnboundedSender<String>,
    log: RunLog,
}

impl Reporter {
    pub fn new(tx: mpsc::UnboundedSender<String>, log: RunLog) -> Self {
        Self { tx, log }
    }

    /// Emit one human-readable status message. A closed channel only drops
    /// the live copy; the log line is always written.
    pub fn say(&self, message: impl Into<String>) {
        let message = message.into();
        self.log.line(&message);
        let _ = self.tx.send(message);
    }

    /// The durable log behind this reporter.
    pub fn log(&self) -> &RunLog {
        &self.log
    }
}
