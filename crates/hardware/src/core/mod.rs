//! Delta-correlating prefetcher core.
//!
//! This module contains the prediction machinery, leaf first: the bounded
//! FIFO every structure is built on, stride deltas and their history, the
//! per-instruction entries and the table holding them, the correlator, the
//! admission filter, and the engine that ties them together.

/// Stride projection from repeated delta pairs.
pub mod correlator;

/// Stride deltas, the storable window, and per-entry history.
pub mod delta;

/// The prefetch pipeline and its owned state.
pub mod engine;

/// Per-instruction prediction entries and stride recording.
pub mod entry;

/// Bounded oldest-first-eviction collection.
pub mod fifo;

/// Admission filter and in-flight queue.
pub mod filter;

/// Prediction table keyed by instruction address.
pub mod table;

/// Host-facing probe and sink traits.
pub mod traits;

pub use self::correlator::{Candidates, correlate};
pub use self::delta::{Delta, DeltaBuffer, DeltaWindow};
pub use self::engine::PrefetchEngine;
pub use self::entry::{DeltaOutcome, PredictionEntry, StrideEncoding};
pub use self::fifo::BoundedFifo;
pub use self::filter::{Admission, AdmissionFilter, InFlightTracker, Verdict};
pub use self::table::PredictionTable;
pub use self::traits::{CacheProbe, ColdCache, PrefetchSink};
