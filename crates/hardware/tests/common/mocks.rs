use std::collections::HashSet;

use dcpt_core::core::CacheProbe;
use mockall::mock;

mock! {
    pub Probe {}

    impl CacheProbe for Probe {
        fn is_cached(&self, addr: u64) -> bool;
        fn is_pending_miss(&self, addr: u64) -> bool;
    }
}

/// A probe backed by explicit sets of cached and pending addresses.
#[derive(Debug, Default)]
pub struct SetProbe {
    pub cached: HashSet<u64>,
    pub pending: HashSet<u64>,
}

impl SetProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cached(mut self, addrs: impl IntoIterator<Item = u64>) -> Self {
        self.cached.extend(addrs);
        self
    }

    pub fn with_pending(mut self, addrs: impl IntoIterator<Item = u64>) -> Self {
        self.pending.extend(addrs);
        self
    }
}

impl CacheProbe for SetProbe {
    fn is_cached(&self, addr: u64) -> bool {
        self.cached.contains(&addr)
    }

    fn is_pending_miss(&self, addr: u64) -> bool {
        self.pending.contains(&addr)
    }
}
