//! Delta-Correlating Prediction Table (DCPT) prefetcher.
//!
//! This crate models the predictive core of a hardware data prefetcher:
//! 1. **Core:** Per-instruction delta history, delta correlation, admission filtering, and the engine tying them together.
//! 2. **Configuration:** Table geometry and stride encoding, deserializable from JSON.
//! 3. **Simulation:** Access trace loading and replay against a simple resident-block cache model.
//! 4. **Statistics:** Prefetcher and replay counters with a printable report.
//!
//! # Examples
//!
//! ```
//! use dcpt_core::{AccessEvent, PrefetchEngine};
//! use dcpt_core::core::ColdCache;
//!
//! let mut engine = PrefetchEngine::default();
//! let mut issued = Vec::new();
//! for i in 0..8u64 {
//!     engine.access(AccessEvent::new(0x400, 0x1_0000 + i * 256), &ColdCache, &mut issued);
//! }
//! assert!(issued.contains(&(0x1_0000 + 7 * 256 + 2 * 64)));
//! ```

/// Common types and constants (access events, geometry defaults, errors).
pub mod common;
/// Prefetcher configuration (defaults, validation, JSON loading).
pub mod config;
/// Prediction core (delta history, table, correlator, filter, engine).
pub mod core;
/// Trace loading and replay against a model cache.
pub mod sim;
/// Prefetcher and replay statistics.
pub mod stats;

/// Single memory access delivered by the host.
pub use crate::common::AccessEvent;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The prefetcher; construct with `PrefetchEngine::new` or `PrefetchEngine::try_new`.
pub use crate::core::PrefetchEngine;
