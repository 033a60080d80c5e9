//! Trace Replay Tests.
//!
//! Drives whole traces through the model cache and the prefetcher and checks
//! that the accounting adds up and that strided streams benefit.

use dcpt_core::AccessEvent;
use dcpt_core::common::ConfigError;
use dcpt_core::config::{Config, ReplayConfig};
use dcpt_core::core::CacheProbe;
use dcpt_core::sim::{DemandOutcome, ReplayCache, Replayer, trace};
use pretty_assertions::assert_eq;

use crate::common::harness::{BLOCK, init_tracing, strided, unshifted};

#[test]
fn strided_stream_gets_useful_prefetches() {
    init_tracing();
    let mut replayer = Replayer::new(&Config::default());
    let report = replayer.run(strided(0x400, 0x10_0000, 4 * BLOCK, 200));

    let replay = &report.replay;
    assert_eq!(replay.accesses, 200);
    assert_eq!(replay.hits + replay.misses, replay.accesses);
    assert!(replay.useful_prefetches > 0);
    assert!(replay.useful_prefetches <= replay.prefetches);
    assert!(replay.hit_rate() > 50.0);
    assert_eq!(report.prefetcher.accesses, 200);
    assert_eq!(report.prefetcher.completions, report.prefetcher.issued);
}

/// Every issued prefetch reaches the model cache, and only new blocks count as installed.
#[test]
fn issued_prefetches_are_installed() {
    let mut replayer = Replayer::new(&Config::default());
    let report = replayer.run(strided(0x400, 0, 4 * BLOCK, 50));
    assert!(report.replay.prefetches > 0);
    assert!(report.replay.prefetches <= report.prefetcher.issued);

    let last = 49 * 4 * BLOCK;
    assert!(replayer.cache().is_cached(last + 2 * BLOCK));
}

/// Single-block strides are fully predictable without halving.
#[test]
fn unit_stride_is_covered() {
    let config = Config {
        prefetcher: unshifted(),
        ..Config::default()
    };
    let mut replayer = Replayer::new(&config);
    let report = replayer.run(strided(0x400, 0, BLOCK, 100));
    assert!(report.replay.coverage() > 50.0);
}

/// Without prediction, an access stream touching each block once misses every time.
#[test]
fn random_pcs_only_miss() {
    let mut replayer = Replayer::new(&Config::default());
    let events = (0..50u64).map(|i| AccessEvent::new(i, i * 0x1_0000));
    let report = replayer.run(events);
    assert_eq!(report.replay.misses, 50);
    assert_eq!(report.replay.prefetches, 0);
    assert_eq!(report.prefetcher.entries_created, 50);
}

#[test]
fn trace_text_replays_end_to_end() {
    let text = "\
0x400 0x1000
0x400 0x1100
0x400 0x1200
0x400 0x1300
0x400 0x1400
0x400 0x1500
0x400 0x1600
0x400 0x1700
";
    let events = trace::parse_str(text).expect("trace");
    let mut replayer = Replayer::try_new(&Config::default()).expect("valid config");
    let report = replayer.run(events);
    assert_eq!(report, replayer.report());
    assert_eq!(replayer.stats().accesses, 8);
    assert!(replayer.engine().table().contains(0x400));
    assert!(replayer.cache().resident_blocks() > 0);
}

#[test]
fn try_new_rejects_zero_cache() {
    let config = Config {
        replay: ReplayConfig {
            cache_blocks: 0,
            ..ReplayConfig::default()
        },
        ..Config::default()
    };
    assert!(matches!(
        Replayer::try_new(&config),
        Err(ConfigError::ZeroCapacity { .. })
    ));
}

// ══════════════════════════════════════════════════════════
// Model cache
// ══════════════════════════════════════════════════════════

#[test]
fn repeated_miss_merges_until_latency_elapses() {
    let config = ReplayConfig {
        miss_latency: 3,
        ..ReplayConfig::default()
    };
    let mut cache = ReplayCache::new(&config, BLOCK);
    assert_eq!(cache.demand(0x40), DemandOutcome::Miss { merged: false });
    assert!(cache.is_pending_miss(0x7f));
    assert_eq!(cache.demand(0x40), DemandOutcome::Miss { merged: true });
    assert_eq!(cache.demand(0x40), DemandOutcome::Miss { merged: true });
    assert_eq!(cache.demand(0x40), DemandOutcome::Hit { prefetched: false });
    assert_eq!(cache.pending_misses(), 0);
}

#[test]
fn full_miss_queue_completes_oldest_early() {
    let config = ReplayConfig {
        cache_blocks: 16,
        miss_queue_entries: 2,
        miss_latency: 100,
    };
    let mut cache = ReplayCache::new(&config, BLOCK);
    for block in 0..3 {
        let _ = cache.demand(block * BLOCK);
    }
    assert_eq!(cache.pending_misses(), 2);
    assert!(cache.is_cached(0));
    assert!(!cache.is_cached(BLOCK));
}

#[test]
fn prefetched_block_is_tagged_on_first_hit() {
    let mut cache = ReplayCache::new(&ReplayConfig::default(), BLOCK);
    assert!(cache.install_prefetch(0x2000));
    assert_eq!(cache.resident_blocks(), 1);
    assert_eq!(cache.demand(0x2010), DemandOutcome::Hit { prefetched: true });
}
