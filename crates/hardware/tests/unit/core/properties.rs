//! Property Tests.
//!
//! Structural bounds that must hold for arbitrary access streams.

use std::collections::HashSet;

use dcpt_core::AccessEvent;
use dcpt_core::config::PrefetcherConfig;
use dcpt_core::core::{CacheProbe, PrefetchEngine};
use proptest::prelude::*;

use crate::common::harness::BLOCK;
use crate::common::mocks::SetProbe;

fn small_config() -> PrefetcherConfig {
    PrefetcherConfig {
        entry_limit: 8,
        inflight_elements: 8,
        ..PrefetcherConfig::default()
    }
}

fn access_stream() -> impl Strategy<Value = Vec<AccessEvent>> {
    prop::collection::vec(
        (0u64..24, 0u64..0x4_0000).prop_map(|(pc, addr)| AccessEvent::new(pc * 4, addr)),
        1..200,
    )
}

proptest! {
    #[test]
    fn table_never_exceeds_limit_and_holds_newest(events in access_stream()) {
        let mut engine = PrefetchEngine::new(small_config());
        let mut issued = Vec::new();
        for event in events {
            let _ = engine.access(event, &SetProbe::new(), &mut issued);
            prop_assert!(engine.table().len() <= 8);
            prop_assert!(engine.table().contains(event.pc));
        }
    }

    #[test]
    fn histories_stay_bounded_and_in_window(events in access_stream()) {
        let config = small_config();
        let mut engine = PrefetchEngine::new(config);
        let mut issued = Vec::new();
        for event in events {
            let _ = engine.access(event, &SetProbe::new(), &mut issued);
        }
        for pc in engine.table().pcs() {
            let entry = engine.table().get(pc).expect("listed pc has an entry");
            prop_assert!(entry.deltas().len() <= config.deltas_per_entry);
            for delta in entry.deltas().iter() {
                prop_assert!((0..=config.max_delta()).contains(&delta.get()));
            }
        }
        prop_assert!(engine.in_flight().len() <= config.inflight_elements);
    }

    #[test]
    fn cached_or_pending_blocks_are_never_issued(
        events in access_stream(),
        cached in prop::collection::hash_set((0u64..0x1000).prop_map(|b| b * BLOCK), 0..64),
        pending in prop::collection::hash_set((0u64..0x1000).prop_map(|b| b * BLOCK), 0..64),
    ) {
        let probe = SetProbe::new().with_cached(cached).with_pending(pending);
        let mut engine = PrefetchEngine::new(small_config());
        for event in events {
            let mut issued = Vec::new();
            let in_flight: HashSet<u64> = engine.in_flight().iter().collect();
            let _ = engine.access(event, &probe, &mut issued);
            for addr in issued {
                prop_assert!(!probe.is_cached(addr));
                prop_assert!(!probe.is_pending_miss(addr));
                prop_assert!(!in_flight.contains(&addr));
            }
        }
    }

    /// A steady stride of `s` blocks (halved) is eventually projected one stride ahead.
    #[test]
    fn steady_stride_projects_one_step(pc in 0u64..0x1000, base in 0u64..0x10_0000, half in 1u64..64) {
        let stride = 2 * half * BLOCK;
        let mut engine = PrefetchEngine::default();
        let mut issued = Vec::new();
        for i in 0..8 {
            let _ = engine.access(AccessEvent::new(pc, base + i * stride), &SetProbe::new(), &mut issued);
        }
        let last = base + 7 * stride;
        prop_assert!(issued.contains(&(last + half * BLOCK)));
    }
}
