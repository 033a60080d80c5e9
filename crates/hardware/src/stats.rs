//! Prefetcher statistics collection and reporting.
//!
//! This module tracks what the prefetcher and the replay harness did. It provides:
//! 1. **Table activity:** Accesses, entry creations, and evictions.
//! 2. **Delta history:** Recorded, clamped, and dropped (zero) strides.
//! 3. **Filtering:** Candidates proposed, admitted, and dropped by reason.
//! 4. **Replay:** Demand hits and misses, and how many prefetches proved useful.

use std::fmt;

use serde::Serialize;

use crate::core::entry::DeltaOutcome;
use crate::core::filter::Admission;

/// Counters maintained by a [`PrefetchEngine`](crate::core::engine::PrefetchEngine).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrefetchStats {
    /// Access events observed.
    pub accesses: u64,
    /// Prediction entries created (first sightings).
    pub entries_created: u64,
    /// Prediction entries evicted to make room.
    pub entries_evicted: u64,
    /// Strides recorded as-is.
    pub deltas_recorded: u64,
    /// Strides outside the window, recorded as the sentinel.
    pub deltas_clamped: u64,
    /// Strides that compressed to zero and were not recorded.
    pub deltas_dropped: u64,
    /// Candidate addresses proposed by correlation.
    pub candidates: u64,
    /// Prefetches admitted and issued.
    pub issued: u64,
    /// Candidates dropped because they were already in flight.
    pub rejected_in_flight: u64,
    /// Candidates dropped because of an outstanding demand miss.
    pub rejected_pending: u64,
    /// Candidates dropped because they were already cached.
    pub rejected_cached: u64,
    /// Completion notifications received.
    pub completions: u64,
}

impl PrefetchStats {
    /// Counts one delta recording outcome.
    pub(crate) fn note_delta(&mut self, outcome: DeltaOutcome) {
        match outcome {
            DeltaOutcome::Recorded(_) => self.deltas_recorded += 1,
            DeltaOutcome::Clamped { .. } => self.deltas_clamped += 1,
            DeltaOutcome::Unchanged => self.deltas_dropped += 1,
        }
    }

    /// Counts one filtered batch.
    pub(crate) fn note_admission(&mut self, admission: &Admission) {
        let admitted = admission.admitted.len() as u64;
        self.candidates += admitted + admission.rejected();
        self.issued += admitted;
        self.rejected_in_flight += admission.in_flight;
        self.rejected_pending += admission.pending;
        self.rejected_cached += admission.cached;
    }

    /// Fraction of proposed candidates that were issued, in percent.
    pub fn admission_rate(&self) -> f64 {
        percent(self.issued, self.candidates)
    }
}

impl fmt::Display for PrefetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PREFETCHER")?;
        writeln!(f, "  pf.accesses            {}", self.accesses)?;
        writeln!(f, "  pf.entries.created     {}", self.entries_created)?;
        writeln!(f, "  pf.entries.evicted     {}", self.entries_evicted)?;
        writeln!(f, "  pf.deltas.recorded     {}", self.deltas_recorded)?;
        writeln!(f, "  pf.deltas.clamped      {}", self.deltas_clamped)?;
        writeln!(f, "  pf.deltas.dropped      {}", self.deltas_dropped)?;
        writeln!(f, "  pf.candidates          {}", self.candidates)?;
        writeln!(
            f,
            "  pf.issued              {} ({:.2}%)",
            self.issued,
            self.admission_rate()
        )?;
        writeln!(f, "  pf.drop.in_flight      {}", self.rejected_in_flight)?;
        writeln!(f, "  pf.drop.pending        {}", self.rejected_pending)?;
        writeln!(f, "  pf.drop.cached         {}", self.rejected_cached)?;
        write!(f, "  pf.completions         {}", self.completions)
    }
}

/// Counters maintained by the trace replay harness.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Demand accesses replayed.
    pub accesses: u64,
    /// Demand accesses that found their block resident.
    pub hits: u64,
    /// Demand accesses that missed.
    pub misses: u64,
    /// Prefetches installed by the model cache.
    pub prefetches: u64,
    /// Demand hits on a block brought in by a prefetch (first touch only).
    pub useful_prefetches: u64,
}

impl ReplayStats {
    /// Demand hit rate, in percent.
    pub fn hit_rate(&self) -> f64 {
        percent(self.hits, self.accesses)
    }

    /// Fraction of prefetches that were later touched by a demand access, in percent.
    pub fn accuracy(&self) -> f64 {
        percent(self.useful_prefetches, self.prefetches)
    }

    /// Fraction of would-be misses that prefetching turned into hits, in percent.
    pub fn coverage(&self) -> f64 {
        percent(self.useful_prefetches, self.useful_prefetches + self.misses)
    }
}

impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REPLAY")?;
        writeln!(f, "  demand.accesses        {}", self.accesses)?;
        writeln!(
            f,
            "  demand.hits            {} ({:.2}%)",
            self.hits,
            self.hit_rate()
        )?;
        writeln!(f, "  demand.misses          {}", self.misses)?;
        writeln!(f, "  pf.installed           {}", self.prefetches)?;
        writeln!(f, "  pf.useful              {}", self.useful_prefetches)?;
        writeln!(f, "  pf.accuracy            {:.2}%", self.accuracy())?;
        write!(f, "  pf.coverage            {:.2}%", self.coverage())
    }
}

/// Combined report printed at the end of a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Replay harness counters.
    pub replay: ReplayStats,
    /// Prefetcher counters.
    pub prefetcher: PrefetchStats,
}

impl Report {
    /// Prints the report to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "DCPT PREFETCHER STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "{}", self.replay)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "{}", self.prefetcher)?;
        write!(f, "==========================================================")
    }
}

/// `part / whole` in percent; zero when `whole` is zero.
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
