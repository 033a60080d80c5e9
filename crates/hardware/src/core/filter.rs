//! Prefetch admission filter and in-flight tracking.
//!
//! Correlation happily proposes the same block many times, and many of its
//! proposals are already on their way. The filter drops a candidate when it:
//! 1. **Is in flight:** It was admitted recently and is still in the in-flight queue.
//! 2. **Is pending:** The host already has a demand miss outstanding for it.
//! 3. **Is cached:** The host already holds the block.
//!
//! Admitted candidates enter the in-flight queue, which forgets its oldest
//! address once full. The queue is never told when a prefetch resolves; it
//! only approximates what is outstanding.

use tracing::trace;

use super::fifo::BoundedFifo;
use super::traits::CacheProbe;
use crate::common::Addr;

/// Why a candidate was or was not admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Passed every check.
    Admitted,
    /// Already in the in-flight queue.
    InFlight,
    /// Already an outstanding demand miss.
    PendingMiss,
    /// Already resident in the cache.
    Cached,
}

/// Bounded FIFO of recently admitted prefetch addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InFlightTracker {
    queue: BoundedFifo<Addr>,
}

impl InFlightTracker {
    /// Creates an empty tracker remembering up to `capacity` addresses.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: BoundedFifo::new(capacity),
        }
    }

    /// Whether `addr` is still tracked.
    #[inline]
    pub fn contains(&self, addr: Addr) -> bool {
        self.queue.contains(&addr)
    }

    /// Tracks `addr`, returning the address forgotten to make room.
    pub fn insert(&mut self, addr: Addr) -> Option<Addr> {
        self.queue.push(addr)
    }

    /// Tracked addresses, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Addr> + '_ {
        self.queue.iter().copied()
    }

    /// Number of tracked addresses.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of tracked addresses.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Forgets every tracked address.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Result of filtering one batch of candidates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Admission {
    /// Admitted addresses, in candidate order.
    pub admitted: Vec<Addr>,
    /// Candidates dropped because they were already in flight.
    pub in_flight: u64,
    /// Candidates dropped because of an outstanding demand miss.
    pub pending: u64,
    /// Candidates dropped because they were already cached.
    pub cached: u64,
}

impl Admission {
    /// Total number of dropped candidates.
    pub fn rejected(&self) -> u64 {
        self.in_flight + self.pending + self.cached
    }

    fn note(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Admitted => {}
            Verdict::InFlight => self.in_flight += 1,
            Verdict::PendingMiss => self.pending += 1,
            Verdict::Cached => self.cached += 1,
        }
    }
}

/// Admission filter owning the in-flight queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmissionFilter {
    in_flight: InFlightTracker,
}

impl AdmissionFilter {
    /// Creates a filter with an in-flight queue of `capacity` addresses.
    pub fn new(capacity: usize) -> Self {
        Self {
            in_flight: InFlightTracker::new(capacity),
        }
    }

    /// The in-flight queue.
    #[inline]
    pub fn in_flight(&self) -> &InFlightTracker {
        &self.in_flight
    }

    /// Classifies one candidate without recording anything.
    ///
    /// Checks run in order: in flight, pending miss, cached.
    pub fn check<P: CacheProbe + ?Sized>(&self, addr: Addr, probe: &P) -> Verdict {
        if self.in_flight.contains(addr) {
            Verdict::InFlight
        } else if probe.is_pending_miss(addr) {
            Verdict::PendingMiss
        } else if probe.is_cached(addr) {
            Verdict::Cached
        } else {
            Verdict::Admitted
        }
    }

    /// Filters a candidate sequence.
    ///
    /// Each admitted address is tracked as in flight before the next
    /// candidate is checked, so a candidate repeated within one batch is
    /// admitted at most once. The last admitted address is written to
    /// `last_prefetch`.
    ///
    /// # Arguments
    ///
    /// * `last_prefetch` - The owning entry's last prefetched address.
    /// * `candidates` - Candidate addresses, in projection order.
    /// * `probe` - Host cache and miss-queue state.
    ///
    /// # Returns
    ///
    /// The admitted addresses and the rejection counts.
    pub fn admit<I, P>(&mut self, last_prefetch: &mut Addr, candidates: I, probe: &P) -> Admission
    where
        I: IntoIterator<Item = Addr>,
        P: CacheProbe + ?Sized,
    {
        let mut admission = Admission::default();
        for addr in candidates {
            let verdict = self.check(addr, probe);
            admission.note(verdict);
            if verdict != Verdict::Admitted {
                trace!(addr, ?verdict, "prefetch candidate dropped");
                continue;
            }

            if let Some(forgotten) = self.in_flight.insert(addr) {
                trace!(addr = forgotten, "in-flight address forgotten");
            }
            *last_prefetch = addr;
            admission.admitted.push(addr);
        }
        admission
    }

    /// Forgets every in-flight address.
    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}
