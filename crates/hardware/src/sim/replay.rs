//! Trace Replayer.
//!
//! Feeds access events, in order, to the cache model and then to the
//! prefetcher. Each access is a demand access against the model first, so
//! the prefetcher observes the miss queue and residency the access left
//! behind. Every issued prefetch is installed in the model and immediately
//! reported back to the prefetcher as complete.

use tracing::info;

use super::host::{DemandOutcome, ReplayCache};
use crate::common::AccessEvent;
use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::PrefetchEngine;
use crate::stats::{Report, ReplayStats};

/// Replays access events through a prefetcher and a model cache.
#[derive(Debug)]
pub struct Replayer {
    engine: PrefetchEngine,
    cache: ReplayCache,
    stats: ReplayStats,
    /// Reused buffer for the prefetches issued by one access.
    issued: Vec<u64>,
}

impl Replayer {
    /// Creates a replayer without validating `config`.
    pub fn new(config: &Config) -> Self {
        let engine = PrefetchEngine::new(config.prefetcher);
        let cache = ReplayCache::new(&config.replay, engine.block_size());
        Self {
            engine,
            cache,
            stats: ReplayStats::default(),
            issued: Vec::new(),
        }
    }

    /// Validates `config` and creates a replayer from it.
    pub fn try_new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replays one access.
    ///
    /// # Returns
    ///
    /// The number of prefetches the access issued.
    pub fn step(&mut self, event: AccessEvent) -> usize {
        self.stats.accesses += 1;
        match self.cache.demand(event.addr) {
            DemandOutcome::Hit { prefetched } => {
                self.stats.hits += 1;
                if prefetched {
                    self.stats.useful_prefetches += 1;
                }
            }
            DemandOutcome::Miss { .. } => self.stats.misses += 1,
        }

        self.issued.clear();
        let count = self.engine.access(event, &self.cache, &mut self.issued);
        for &addr in &self.issued {
            if self.cache.install_prefetch(addr) {
                self.stats.prefetches += 1;
            }
            self.engine.complete(addr);
        }
        count
    }

    /// Replays every event in order.
    ///
    /// # Returns
    ///
    /// The report after the last event.
    pub fn run<I>(&mut self, events: I) -> Report
    where
        I: IntoIterator<Item = AccessEvent>,
    {
        for event in events {
            let _ = self.step(event);
        }
        info!(
            accesses = self.stats.accesses,
            hits = self.stats.hits,
            prefetches = self.stats.prefetches,
            "replay finished"
        );
        self.report()
    }

    /// Snapshot of the replay and prefetcher counters.
    pub fn report(&self) -> Report {
        Report {
            replay: self.stats.clone(),
            prefetcher: self.engine.stats().clone(),
        }
    }

    /// The prefetcher being driven.
    pub fn engine(&self) -> &PrefetchEngine {
        &self.engine
    }

    /// The model cache.
    pub fn cache(&self) -> &ReplayCache {
        &self.cache
    }

    /// Replay counters.
    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }
}
