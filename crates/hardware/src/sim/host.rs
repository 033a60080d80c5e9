//! Replay Cache Model.
//!
//! A deliberately small stand-in for the host cache, just detailed enough to
//! answer the prefetcher's probes and to judge whether prefetches helped:
//! 1. **Residency:** A fully associative set of blocks with FIFO replacement.
//! 2. **Miss queue:** Demand misses stay outstanding for a fixed number of accesses before their block becomes resident.
//! 3. **Prefetch tags:** Blocks installed by a prefetch are tagged until their first demand touch.
//!
//! Prefetches are installed immediately; only demand misses pay latency.

use std::collections::HashSet;

use crate::common::Addr;
use crate::config::ReplayConfig;
use crate::core::fifo::BoundedFifo;
use crate::core::traits::CacheProbe;

/// Outcome of a demand access against the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemandOutcome {
    /// The block was resident.
    Hit {
        /// Whether this is the first touch of a prefetched block.
        prefetched: bool,
    },
    /// The block was outstanding or absent.
    Miss {
        /// Whether the block already had a miss outstanding.
        merged: bool,
    },
}

/// Demand miss waiting to complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingMiss {
    block: u64,
    ready_at: u64,
}

/// Fully associative FIFO cache model with a demand miss queue.
#[derive(Clone, Debug)]
pub struct ReplayCache {
    block_size: u64,
    miss_latency: u64,
    /// Demand accesses seen so far; the model's notion of time.
    now: u64,
    resident: BoundedFifo<u64>,
    resident_set: HashSet<u64>,
    prefetched: HashSet<u64>,
    pending: BoundedFifo<PendingMiss>,
}

impl ReplayCache {
    /// Creates an empty model cache.
    ///
    /// # Arguments
    ///
    /// * `config` - Resident capacity, miss queue depth, and miss latency.
    /// * `block_size` - Cache block size in bytes (zero is treated as one).
    pub fn new(config: &ReplayConfig, block_size: u64) -> Self {
        Self {
            block_size: block_size.max(1),
            miss_latency: config.miss_latency,
            now: 0,
            resident: BoundedFifo::new(config.cache_blocks),
            resident_set: HashSet::new(),
            prefetched: HashSet::new(),
            pending: BoundedFifo::new(config.miss_queue_entries),
        }
    }

    #[inline]
    fn block(&self, addr: Addr) -> u64 {
        addr / self.block_size
    }

    /// Installs a block, evicting the oldest resident block if full.
    ///
    /// # Returns
    ///
    /// `false` if the block was already resident.
    fn install(&mut self, block: u64) -> bool {
        if !self.resident_set.insert(block) {
            return false;
        }
        let resident_set = &mut self.resident_set;
        let prefetched = &mut self.prefetched;
        self.resident.push_with(block, |victim| {
            let _ = resident_set.remove(&victim);
            let _ = prefetched.remove(&victim);
        });
        true
    }

    /// Moves completed demand misses into the cache.
    fn retire(&mut self) {
        while self.pending.oldest().is_some_and(|m| m.ready_at <= self.now) {
            if let Some(miss) = self.pending.pop_oldest() {
                let _ = self.install(miss.block);
            }
        }
    }

    /// Performs a demand access.
    ///
    /// Advances the model clock by one access, retires completed misses,
    /// then looks the block up. An absent block is queued as a new miss;
    /// when the miss queue is full its oldest miss completes early.
    pub fn demand(&mut self, addr: Addr) -> DemandOutcome {
        self.now += 1;
        self.retire();

        let block = self.block(addr);
        if self.resident_set.contains(&block) {
            let prefetched = self.prefetched.remove(&block);
            return DemandOutcome::Hit { prefetched };
        }
        if self.pending.iter().any(|m| m.block == block) {
            return DemandOutcome::Miss { merged: true };
        }

        let miss = PendingMiss {
            block,
            ready_at: self.now.saturating_add(self.miss_latency),
        };
        if let Some(early) = self.pending.push(miss) {
            let _ = self.install(early.block);
        }
        self.retire();
        DemandOutcome::Miss { merged: false }
    }

    /// Installs a prefetched block and tags it.
    ///
    /// # Returns
    ///
    /// `true` if the block was not yet resident.
    pub fn install_prefetch(&mut self, addr: Addr) -> bool {
        let block = self.block(addr);
        if !self.install(block) {
            return false;
        }
        let _ = self.prefetched.insert(block);
        true
    }

    /// Number of resident blocks.
    pub fn resident_blocks(&self) -> usize {
        self.resident.len()
    }

    /// Number of outstanding demand misses.
    pub fn pending_misses(&self) -> usize {
        self.pending.len()
    }
}

impl CacheProbe for ReplayCache {
    fn is_cached(&self, addr: Addr) -> bool {
        self.resident_set.contains(&self.block(addr))
    }

    fn is_pending_miss(&self, addr: Addr) -> bool {
        let block = self.block(addr);
        self.pending.iter().any(|m| m.block == block)
    }
}
