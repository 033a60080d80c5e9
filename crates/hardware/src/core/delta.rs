//! Stride deltas and per-instruction delta history.
//!
//! A delta is the block-granularity distance between two consecutive
//! accesses issued by the same instruction, compressed by a fixed right shift
//! and stored in a narrow bit field. This module provides:
//! 1. **`Delta`:** A stored stride, guaranteed to lie inside its window.
//! 2. **`DeltaWindow`:** The storable range for a bit-field width, and the
//!    conversion that maps out-of-range strides to the sentinel.
//! 3. **`DeltaBuffer`:** The bounded history of deltas for one instruction.

use std::fmt;

use super::fifo::BoundedFifo;
use crate::common::Addr;
use crate::common::constants::{MIN_DELTA, SEED_DELTA};

/// A stored stride value.
///
/// Only a [`DeltaWindow`] can build one from a raw stride, so every stored
/// delta lies in `[MIN_DELTA, window.max()]`. `MIN_DELTA` doubles as the
/// marker for strides that did not fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Delta(i64);

impl Delta {
    /// The sentinel recorded for a stride outside the storable window.
    pub const UNKNOWN: Self = Self(MIN_DELTA);

    /// The stride every new delta buffer is seeded with.
    pub const SEED: Self = Self(SEED_DELTA);

    /// Returns the stored stride.
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the out-of-window sentinel.
    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == MIN_DELTA
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Range of strides a delta bit field can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeltaWindow {
    max: i64,
}

impl DeltaWindow {
    /// Builds the window for a signed bit field of `width` bits.
    ///
    /// The upper bound is `2^(width - 1) - 1`. Widths are clamped into
    /// `2..=63`; configurations are validated to `2..=32` before use.
    pub const fn from_bitfield_width(width: u32) -> Self {
        let width = if width < 2 {
            2
        } else if width > 63 {
            63
        } else {
            width
        };
        Self {
            max: (1_i64 << (width - 1)) - 1,
        }
    }

    /// Smallest storable stride.
    #[inline]
    pub const fn min(&self) -> i64 {
        MIN_DELTA
    }

    /// Largest storable stride.
    #[inline]
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Whether `raw` is storable without clamping.
    #[inline]
    pub const fn contains(&self, raw: i64) -> bool {
        raw >= self.min() && raw <= self.max
    }

    /// Converts a raw stride to a stored delta.
    ///
    /// Strides outside the window become [`Delta::UNKNOWN`] rather than
    /// saturating at the nearest bound.
    #[inline]
    pub const fn encode(&self, raw: i64) -> Delta {
        if self.contains(raw) {
            Delta(raw)
        } else {
            Delta::UNKNOWN
        }
    }
}

impl Default for DeltaWindow {
    fn default() -> Self {
        Self::from_bitfield_width(crate::common::constants::DELTA_BITFIELD_WIDTH)
    }
}

/// Computes the raw stride between two accesses.
///
/// The byte distance is divided by the block size (truncating toward zero)
/// and then arithmetically shifted right by `shift`. Negative distances
/// therefore stay negative and are later clamped by the window.
///
/// # Arguments
///
/// * `last` - Address of the previous access from the same instruction.
/// * `addr` - Address of the current access.
/// * `block_size` - Cache block size in bytes (non-zero).
/// * `shift` - Compression shift applied to the block distance.
#[inline]
pub fn raw_stride(last: Addr, addr: Addr, block_size: u64, shift: u32) -> i64 {
    let distance = (addr as i64).wrapping_sub(last as i64);
    distance.wrapping_div(block_size as i64) >> shift
}

/// Bounded history of deltas for one instruction address, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeltaBuffer {
    deltas: BoundedFifo<Delta>,
}

impl DeltaBuffer {
    /// Creates an empty buffer.
    pub fn new(capacity: usize) -> Self {
        Self {
            deltas: BoundedFifo::new(capacity),
        }
    }

    /// Creates a buffer holding the single seed stride.
    pub fn seeded(capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        buffer.push(Delta::SEED);
        buffer
    }

    /// Appends a delta, dropping the oldest one if full.
    pub fn push(&mut self, delta: Delta) {
        let _ = self.deltas.push(delta);
    }

    /// Returns `(second newest, newest)`, the pattern the correlator matches.
    ///
    /// `None` while fewer than two deltas are held.
    pub fn signature(&self) -> Option<(Delta, Delta)> {
        let newest = *self.deltas.nth_newest(0)?;
        let previous = *self.deltas.nth_newest(1)?;
        Some((previous, newest))
    }

    /// Returns the delta at `index`, counting from the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Delta> {
        self.deltas.get(index).copied()
    }

    /// Iterates from the oldest to the newest delta.
    pub fn iter(&self) -> impl Iterator<Item = Delta> + '_ {
        self.deltas.iter().copied()
    }

    /// Copies the history into a vector of raw strides, oldest first.
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().map(Delta::get).collect()
    }

    /// Number of held deltas.
    #[inline]
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Whether no deltas are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Maximum number of held deltas.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.deltas.capacity()
    }
}
