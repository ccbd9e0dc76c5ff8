//! Quadcam Orchestration Pipeline
//!
//! The coordination layer over many long-running, failure-prone encoder
//! subprocesses:
//!
//! ```text
//! Batch Scheduler ──(≤ limit concurrent)──► Session Pipeline (one per session)
//!                                                 │ groups, sequential
//!                                                 ├── Composite Stage ──► encoder
//!                                                 │ per layout, after all groups
//!                                                 ├── Concatenation Stage ──► encoder
//!                                                 └── Marker Store
//! ```
//!
//! Ordering within a session is by timestamp key; across sessions completion
//! order is nondeterministic. Cancellation is cooperative: every stage checks
//! the token before doing work, in-flight encoder invocations run to their
//! own completion, and the scheduler clears the staging directory once the
//! batch settles after a cancellation.

pub mod batch;
pub mod progress;
pub mod session;

pub use batch::*;
pub use progress::*;
pub use session::*;
