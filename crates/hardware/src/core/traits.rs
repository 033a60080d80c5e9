//! Host interfaces for the prefetcher.
//!
//! The prefetcher does not own a cache. It asks the host about cache and
//! miss-queue state through [`CacheProbe`] and hands admitted addresses back
//! through [`PrefetchSink`]:
//! 1. **Probing:** Whether an address is already resident or already has an outstanding miss.
//! 2. **Issuing:** Delivery of admitted prefetch addresses, in admission order.

use crate::common::Addr;

/// Read-only view of the host's cache and miss-queue state.
pub trait CacheProbe {
    /// Returns `true` if the block holding `addr` is already resident.
    fn is_cached(&self, addr: Addr) -> bool;
    /// Returns `true` if `addr` already has an outstanding demand miss.
    fn is_pending_miss(&self, addr: Addr) -> bool;
}

/// Receiver of admitted prefetch addresses.
pub trait PrefetchSink {
    /// Issues a prefetch for `addr`.
    fn issue_prefetch(&mut self, addr: Addr);
}

impl<P: CacheProbe + ?Sized> CacheProbe for &P {
    fn is_cached(&self, addr: Addr) -> bool {
        (**self).is_cached(addr)
    }

    fn is_pending_miss(&self, addr: Addr) -> bool {
        (**self).is_pending_miss(addr)
    }
}

impl<S: PrefetchSink + ?Sized> PrefetchSink for &mut S {
    fn issue_prefetch(&mut self, addr: Addr) {
        (**self).issue_prefetch(addr);
    }
}

/// Collects issued addresses in order.
impl PrefetchSink for Vec<Addr> {
    fn issue_prefetch(&mut self, addr: Addr) {
        self.push(addr);
    }
}

/// A probe for a host with an empty cache and no outstanding misses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColdCache;

impl CacheProbe for ColdCache {
    fn is_cached(&self, _addr: Addr) -> bool {
        false
    }

    fn is_pending_miss(&self, _addr: Addr) -> bool {
        false
    }
}
