//! Common types shared across the prefetcher, the replay harness, and the CLI.
//!
//! This module provides the building blocks every other component depends on:
//! 1. **Access Events:** The `{ pc, addr }` pair delivered by the host for each memory access.
//! 2. **Constants:** Default table geometry and stride window parameters.
//! 3. **Error Handling:** Configuration and trace errors for the outer surfaces.

/// Access event and address helpers.
pub mod addr;

/// Default geometry constants for the prediction tables.
pub mod constants;

/// Error types for configuration and trace loading.
pub mod error;

pub use addr::{AccessEvent, Addr};
pub use constants::{DELTA_BITFIELD_WIDTH, DELTAS_ENTRY, ENTRY_LIMIT, INFLIGHT_ELEMENTS};
pub use error::{ConfigError, TraceError};
