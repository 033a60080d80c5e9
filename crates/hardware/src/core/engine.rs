//! DCPT Prefetch Engine.
//!
//! The engine owns every piece of prefetcher state (the prediction table, the
//! in-flight queue, and the counters) and drives one access event at a time
//! through the pipeline:
//! 1. **Lookup:** Find or create the prediction entry for the instruction address.
//! 2. **Record:** Append the new stride to the entry's delta history.
//! 3. **Correlate:** Project candidate addresses from an earlier occurrence of the newest two strides.
//! 4. **Filter:** Drop candidates already in flight, pending, or cached.
//! 5. **Issue:** Hand the admitted addresses to the host, in order.
//!
//! The engine is a plain value; independent engines share nothing. It has no
//! internal locking, so a multi-threaded host must serialize calls itself.

use tracing::{debug, trace};

use super::correlator::Candidates;
use super::entry::{PredictionEntry, StrideEncoding};
use super::filter::{AdmissionFilter, InFlightTracker};
use super::table::PredictionTable;
use super::traits::{CacheProbe, PrefetchSink};
use crate::common::constants::BLOCK_SIZE;
use crate::common::error::ConfigError;
use crate::common::{AccessEvent, Addr};
use crate::config::PrefetcherConfig;
use crate::stats::PrefetchStats;

/// Delta-correlating prefetcher state and pipeline.
#[derive(Clone, Debug)]
pub struct PrefetchEngine {
    config: PrefetcherConfig,
    encoding: StrideEncoding,
    table: PredictionTable,
    filter: AdmissionFilter,
    stats: PrefetchStats,
}

impl PrefetchEngine {
    /// Creates a prefetcher with the given geometry.
    ///
    /// The configuration is not validated; a block size that is not a power
    /// of two falls back to the default block size and zero capacities are
    /// raised to one. Use [`PrefetchEngine::try_new`] to reject such
    /// configurations instead.
    ///
    /// # Arguments
    ///
    /// * `config` - Table geometry and stride encoding.
    pub fn new(config: PrefetcherConfig) -> Self {
        let block_size = if config.block_size.is_power_of_two() {
            config.block_size
        } else {
            BLOCK_SIZE
        };
        let encoding = StrideEncoding {
            block_size,
            shift: config.stride_shift.min(62),
            window: config.window(),
        };

        debug!(
            entries = config.entry_limit,
            deltas = config.deltas_per_entry,
            in_flight = config.inflight_elements,
            block_size,
            max_delta = encoding.window.max(),
            "DCPT prefetcher init"
        );

        Self {
            config,
            encoding,
            table: PredictionTable::new(config.entry_limit, config.deltas_per_entry),
            filter: AdmissionFilter::new(config.inflight_elements),
            stats: PrefetchStats::default(),
        }
    }

    /// Validates `config` and creates a prefetcher from it.
    pub fn try_new(config: PrefetcherConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Processes one memory access.
    ///
    /// The first access from an instruction address only creates its entry.
    /// Every later access records the new stride (if non-zero), correlates,
    /// filters, and issues the admitted addresses to `sink` in order.
    ///
    /// # Arguments
    ///
    /// * `event` - The instruction and memory address of the access.
    /// * `probe` - Host cache and miss-queue state.
    /// * `sink` - Receiver of admitted prefetches.
    ///
    /// # Returns
    ///
    /// The number of prefetches issued.
    pub fn access<P, S>(&mut self, event: AccessEvent, probe: &P, sink: &mut S) -> usize
    where
        P: CacheProbe + ?Sized,
        S: PrefetchSink + ?Sized,
    {
        self.stats.accesses += 1;

        let evicts = self.table.is_full() && !self.table.contains(event.pc);
        let (entry, created) = self.table.find_or_create(event.pc, event.addr);
        if created {
            self.stats.entries_created += 1;
            if evicts {
                self.stats.entries_evicted += 1;
            }
            return 0;
        }

        let outcome = entry.record(event.addr, &self.encoding);
        self.stats.note_delta(outcome);

        let PredictionEntry {
            last_address,
            last_prefetch,
            deltas,
            ..
        } = entry;
        let candidates = Candidates::new(deltas, *last_address, self.encoding.block_size);
        let admission = self.filter.admit(last_prefetch, candidates, probe);
        self.stats.note_admission(&admission);

        for &addr in &admission.admitted {
            trace!(pc = event.pc, addr, "prefetch issued");
            sink.issue_prefetch(addr);
        }
        admission.admitted.len()
    }

    /// Notes that a prefetch for `addr` has completed.
    ///
    /// Only counted and logged; the in-flight queue ages addresses out on
    /// its own.
    pub fn complete(&mut self, addr: Addr) {
        self.stats.completions += 1;
        trace!(addr, "prefetch complete");
    }

    /// Forgets all learned history and counters, keeping the configuration.
    pub fn reset(&mut self) {
        self.table.clear();
        self.filter.clear();
        self.stats = PrefetchStats::default();
    }

    /// The prediction table.
    #[inline]
    pub fn table(&self) -> &PredictionTable {
        &self.table
    }

    /// The in-flight queue.
    #[inline]
    pub fn in_flight(&self) -> &InFlightTracker {
        self.filter.in_flight()
    }

    /// Block size the engine encodes strides with.
    #[inline]
    pub fn block_size(&self) -> u64 {
        self.encoding.block_size
    }

    /// The configuration this engine was built with.
    #[inline]
    pub fn config(&self) -> &PrefetcherConfig {
        &self.config
    }

    /// Activity counters.
    #[inline]
    pub fn stats(&self) -> &PrefetchStats {
        &self.stats
    }
}

impl Default for PrefetchEngine {
    fn default() -> Self {
        Self::new(PrefetcherConfig::default())
    }
}
