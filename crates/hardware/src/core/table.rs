//! Delta-Correlating Prediction Table.
//!
//! Holds one [`PredictionEntry`] per instruction address, up to a fixed
//! capacity. When a new instruction arrives at capacity, the entry that was
//! *inserted* earliest is evicted. Hits never promote an entry, so eviction
//! order is pure insertion order rather than recency of use.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find_or_create()`: O(1) average
//!   - `get()`: O(1) average
//! - **Space Complexity:** O(E * D) where E is the entry limit and D the deltas per entry
//! - **Hardware Cost:** Modest - a small fully associative table with a FIFO victim pointer

use std::collections::HashMap;

use tracing::debug;

use super::entry::PredictionEntry;
use super::fifo::BoundedFifo;
use crate::common::Addr;

/// Prediction table keyed by instruction address.
#[derive(Clone, Debug)]
pub struct PredictionTable {
    entries: HashMap<Addr, PredictionEntry>,
    /// Keys in insertion order; the front is the next victim.
    order: BoundedFifo<Addr>,
    history: usize,
}

impl PredictionTable {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of entries (at least one is kept).
    /// * `history` - Delta buffer capacity of each new entry.
    pub fn new(capacity: usize, history: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: BoundedFifo::new(capacity),
            history,
        }
    }

    /// Returns the entry for `pc`, creating it if this is the first sighting.
    ///
    /// A new entry starts at `addr` with a seeded history. If the table is
    /// full, the oldest-inserted entry is evicted first.
    ///
    /// # Arguments
    ///
    /// * `pc` - Instruction address of the access.
    /// * `addr` - Memory address of the access.
    ///
    /// # Returns
    ///
    /// The entry and whether it was just created.
    pub fn find_or_create(&mut self, pc: Addr, addr: Addr) -> (&mut PredictionEntry, bool) {
        let created = !self.entries.contains_key(&pc);
        if created {
            let entries = &mut self.entries;
            self.order.push_with(pc, |victim| {
                if entries.remove(&victim).is_some() {
                    debug!(pc = victim, "prediction entry evicted");
                }
            });
        }

        let history = self.history;
        let entry = self
            .entries
            .entry(pc)
            .or_insert_with(|| PredictionEntry::new(pc, addr, history));
        (entry, created)
    }

    /// Looks up the entry for `pc` without touching insertion order.
    pub fn get(&self, pc: Addr) -> Option<&PredictionEntry> {
        self.entries.get(&pc)
    }

    /// Whether `pc` currently has an entry.
    pub fn contains(&self, pc: Addr) -> bool {
        self.entries.contains_key(&pc)
    }

    /// Instruction addresses in insertion order, oldest first.
    pub fn pcs(&self) -> impl Iterator<Item = Addr> + '_ {
        self.order.iter().copied()
    }

    /// The entry that the next insertion at capacity would evict.
    pub fn oldest(&self) -> Option<&PredictionEntry> {
        self.order.oldest().and_then(|pc| self.entries.get(pc))
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the next new instruction will evict an entry.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.order.is_full()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.order.capacity()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
