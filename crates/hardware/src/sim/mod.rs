//! Trace replay.
//!
//! Provides what is needed to run the prefetcher outside a full simulator:
//! a loader for text access traces, a small cache model that answers the
//! prefetcher's probes, and a driver that replays a trace through both.

/// Fully associative cache model with a demand miss queue.
pub mod host;

/// Drives a trace through a prefetcher and the cache model.
pub mod replay;

/// Text access trace parsing.
pub mod trace;

pub use self::host::{DemandOutcome, ReplayCache};
pub use self::replay::Replayer;
