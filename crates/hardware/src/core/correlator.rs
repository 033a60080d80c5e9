//! Delta Correlator.
//!
//! Turns an entry's stride history into candidate prefetch addresses. The two
//! newest deltas form the current signature. Every earlier place in the
//! history where the same pair of deltas occurred in the same order is taken
//! as a previous occurrence of the current motion, and the deltas that
//! followed it are replayed forward from the entry's last address.
//!
//! For a history `[a, b, c, a, b]` the signature is `(a, b)`, which matches
//! at position 0; the continuation `c, a, b` projects
//! `last + c*B`, `last + (c+a)*B`, `last + (c+a+b)*B` for block size `B`.
//! The final pair always matches itself but has no continuation, so it
//! contributes nothing.
//!
//! Candidates are produced lazily: nothing is computed until the admission
//! filter pulls the next address.

use std::iter::FusedIterator;

use super::delta::{Delta, DeltaBuffer};
use super::entry::PredictionEntry;
use crate::common::Addr;

/// Continuation being replayed after a signature match.
#[derive(Clone, Copy, Debug)]
struct Projection {
    /// Index of the next delta to apply.
    next: usize,
    /// Last projected address.
    address: Addr,
}

/// Lazy, finite sequence of candidate prefetch addresses.
///
/// Multiple matches each contribute their own continuation, in history
/// order, and each continuation restarts from the entry's last address.
/// Histories with fewer than two deltas produce nothing.
#[derive(Clone, Debug)]
pub struct Candidates<'a> {
    deltas: &'a DeltaBuffer,
    signature: Option<(Delta, Delta)>,
    origin: Addr,
    block_size: u64,
    /// Start index of the next adjacent pair to compare.
    scan: usize,
    projection: Option<Projection>,
}

impl<'a> Candidates<'a> {
    /// Starts correlating `deltas`, projecting from `origin`.
    ///
    /// # Arguments
    ///
    /// * `deltas` - Stride history, oldest first.
    /// * `origin` - Address the projections start from (the entry's last address).
    /// * `block_size` - Cache block size in bytes.
    pub fn new(deltas: &'a DeltaBuffer, origin: Addr, block_size: u64) -> Self {
        Self {
            deltas,
            signature: deltas.signature(),
            origin,
            block_size,
            scan: 0,
            projection: None,
        }
    }

    /// Advances the pair scan to the next occurrence of the signature.
    ///
    /// # Returns
    ///
    /// The index just past the matched pair, or `None` once the history is
    /// exhausted.
    fn next_match(&mut self) -> Option<usize> {
        let (previous, newest) = self.signature?;
        while self.scan + 1 < self.deltas.len() {
            let i = self.scan;
            self.scan += 1;
            if self.deltas.get(i) == Some(previous) && self.deltas.get(i + 1) == Some(newest) {
                return Some(i + 2);
            }
        }
        None
    }
}

impl Iterator for Candidates<'_> {
    type Item = Addr;

    fn next(&mut self) -> Option<Addr> {
        loop {
            if let Some(projection) = self.projection.as_mut() {
                if let Some(delta) = self.deltas.get(projection.next) {
                    projection.next += 1;
                    let step = (delta.get() as u64).wrapping_mul(self.block_size);
                    projection.address = projection.address.wrapping_add(step);
                    return Some(projection.address);
                }
                self.projection = None;
            }

            let next = self.next_match()?;
            self.projection = Some(Projection {
                next,
                address: self.origin,
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.signature.is_none() {
            return (0, Some(0));
        }
        // Every remaining pair could match and replay the rest of the history.
        let len = self.deltas.len();
        let pending = self
            .projection
            .map_or(0, |p| len.saturating_sub(p.next));
        let upper = (self.scan..len.saturating_sub(1))
            .map(|i| len.saturating_sub(i + 2))
            .sum::<usize>();
        (pending, Some(pending + upper))
    }
}

impl FusedIterator for Candidates<'_> {}

/// Correlates an entry's history, projecting from its last address.
///
/// # Arguments
///
/// * `entry` - The entry whose history is scanned.
/// * `block_size` - Cache block size in bytes.
pub fn correlate(entry: &PredictionEntry, block_size: u64) -> Candidates<'_> {
    Candidates::new(entry.deltas(), entry.last_address(), block_size)
}
