//! Prefetcher Geometry Constants.
//!
//! These are the table dimensions a prefetcher is built with when no
//! configuration overrides them. They are the fixed sizes of the hardware
//! structures being modeled:
//! 1. **Prediction table:** Number of tracked instruction addresses.
//! 2. **Delta buffer:** Stride history depth and stored stride width.
//! 3. **In-flight queue:** Outstanding prefetches remembered for deduplication.

/// Maximum number of prediction entries (one per instruction address).
pub const ENTRY_LIMIT: usize = 100;

/// Number of deltas remembered per prediction entry.
pub const DELTAS_ENTRY: usize = 6;

/// Width in bits of a stored delta; the largest storable stride is
/// `2^(DELTA_BITFIELD_WIDTH - 1) - 1`.
pub const DELTA_BITFIELD_WIDTH: u32 = 10;

/// Number of issued prefetches remembered for deduplication.
pub const INFLIGHT_ELEMENTS: usize = 32;

/// Cache block size in bytes.
pub const BLOCK_SIZE: u64 = 64;

/// Right shift applied to the block distance before it is stored.
pub const STRIDE_SHIFT: u32 = 1;

/// Smallest storable delta. Also the marker recorded for strides that fall
/// outside the storable window.
pub const MIN_DELTA: i64 = 0;

/// Largest storable delta for the default bit-field width.
pub const MAX_DELTA: i64 = (1 << (DELTA_BITFIELD_WIDTH - 1)) - 1;

/// Stride the delta buffer of a freshly created entry is seeded with.
pub const SEED_DELTA: i64 = 1;
