//! Prediction table entry.
//!
//! One entry tracks a single instruction address: the last address it touched,
//! the last address prefetched on its behalf, and its recent stride history.

use tracing::trace;

use super::delta::{Delta, DeltaBuffer, DeltaWindow, raw_stride};
use crate::common::Addr;

/// Stride encoding parameters shared by every entry of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrideEncoding {
    /// Cache block size in bytes.
    pub block_size: u64,
    /// Right shift applied to the block distance.
    pub shift: u32,
    /// Storable delta range.
    pub window: DeltaWindow,
}

/// What an access did to an entry's delta history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// The stride fit the window and was recorded.
    Recorded(Delta),
    /// The stride fell outside the window; the sentinel was recorded.
    Clamped {
        /// The stride before clamping.
        raw: i64,
    },
    /// The stride compressed to zero; nothing was recorded and the last
    /// address was left as it was.
    Unchanged,
}

/// Per-instruction prediction state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionEntry {
    pc: Addr,
    pub(crate) last_address: Addr,
    pub(crate) last_prefetch: Addr,
    pub(crate) deltas: DeltaBuffer,
}

impl PredictionEntry {
    /// Creates the entry for an instruction seen for the first time.
    ///
    /// The delta history starts with one seed stride of 1 and the last
    /// prefetch is 0.
    ///
    /// # Arguments
    ///
    /// * `pc` - Instruction address this entry is keyed by.
    /// * `addr` - Address of the first access.
    /// * `history` - Delta buffer capacity.
    pub fn new(pc: Addr, addr: Addr, history: usize) -> Self {
        Self {
            pc,
            last_address: addr,
            last_prefetch: 0,
            deltas: DeltaBuffer::seeded(history),
        }
    }

    /// Instruction address this entry is keyed by.
    #[inline]
    pub fn pc(&self) -> Addr {
        self.pc
    }

    /// Address of the last access whose stride was recorded.
    #[inline]
    pub fn last_address(&self) -> Addr {
        self.last_address
    }

    /// Last address admitted for prefetch on behalf of this instruction.
    #[inline]
    pub fn last_prefetch(&self) -> Addr {
        self.last_prefetch
    }

    /// Stride history, oldest first.
    #[inline]
    pub fn deltas(&self) -> &DeltaBuffer {
        &self.deltas
    }

    /// Records the stride from the last address to `addr`.
    ///
    /// A stride that compresses to zero leaves the entry untouched. Any other
    /// stride is stored (as the sentinel if it does not fit the window) and
    /// `addr` becomes the last address.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address of the current access.
    /// * `encoding` - Block size, shift, and window of the owning table.
    ///
    /// # Returns
    ///
    /// What was recorded.
    pub fn record(&mut self, addr: Addr, encoding: &StrideEncoding) -> DeltaOutcome {
        let raw = raw_stride(self.last_address, addr, encoding.block_size, encoding.shift);
        if raw == 0 {
            return DeltaOutcome::Unchanged;
        }

        let delta = encoding.window.encode(raw);
        self.deltas.push(delta);
        self.last_address = addr;
        trace!(pc = self.pc, addr, raw, delta = delta.get(), "delta recorded");

        if encoding.window.contains(raw) {
            DeltaOutcome::Recorded(delta)
        } else {
            DeltaOutcome::Clamped { raw }
        }
    }
}
