//! # Configuration Tests
//!
//! Defaults, JSON deserialization with omitted fields, and validation.

use std::io::Write;

use dcpt_core::AccessEvent;
use dcpt_core::common::ConfigError;
use dcpt_core::config::*;
use dcpt_core::sim::Replayer;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_prefetcher_defaults() {
    let config = PrefetcherConfig::default();
    assert_eq!(config.entry_limit, 100);
    assert_eq!(config.deltas_per_entry, 6);
    assert_eq!(config.delta_bitfield_width, 10);
    assert_eq!(config.inflight_elements, 32);
    assert_eq!(config.block_size, 64);
    assert_eq!(config.stride_shift, 1);
    assert_eq!(config.max_delta(), 511);
    assert!(config.validate().is_ok());
}

#[test]
fn test_replay_defaults() {
    let replay = ReplayConfig::default();
    assert_eq!(replay.cache_blocks, 512);
    assert_eq!(replay.miss_queue_entries, 16);
    assert_eq!(replay.miss_latency, 8);
    assert!(replay.validate().is_ok());
}

#[test]
fn test_empty_document_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "prefetcher": { "delta_bitfield_width": 6 } }"#).unwrap();
    assert_eq!(config.prefetcher.delta_bitfield_width, 6);
    assert_eq!(config.prefetcher.max_delta(), 31);
    assert_eq!(config.prefetcher.entry_limit, 100);
    assert_eq!(config.replay, ReplayConfig::default());
}

#[test]
fn test_round_trip_through_json() {
    let mut config = Config::default();
    config.prefetcher.inflight_elements = 8;
    config.replay.miss_latency = 0;
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(Config::from_json(&json).unwrap(), config);
}

#[rstest]
#[case::zero_entries(r#"{"prefetcher": {"entry_limit": 0}}"#)]
#[case::zero_deltas(r#"{"prefetcher": {"deltas_per_entry": 0}}"#)]
#[case::zero_in_flight(r#"{"prefetcher": {"inflight_elements": 0}}"#)]
#[case::zero_cache(r#"{"replay": {"cache_blocks": 0}}"#)]
#[case::zero_miss_queue(r#"{"replay": {"miss_queue_entries": 0}}"#)]
fn test_zero_capacity_rejected(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(ConfigError::ZeroCapacity { .. })
    ));
}

#[rstest]
#[case::huge_in_flight(r#"{"prefetcher": {"inflight_elements": 18446744073709551615}}"#)]
#[case::huge_entries(r#"{"prefetcher": {"entry_limit": 1048577}}"#)]
#[case::huge_deltas(r#"{"prefetcher": {"deltas_per_entry": 4294967296}}"#)]
#[case::huge_cache(r#"{"replay": {"cache_blocks": 18446744073709551615}}"#)]
#[case::huge_miss_queue(r#"{"replay": {"miss_queue_entries": 1048577}}"#)]
fn test_oversized_capacity_rejected(#[case] json: &str) {
    assert!(matches!(
        Config::from_json(json),
        Err(ConfigError::CapacityTooLarge { max: MAX_CAPACITY, .. })
    ));
}

#[test]
fn test_capacity_limit_is_inclusive() {
    let config = PrefetcherConfig {
        inflight_elements: MAX_CAPACITY,
        ..PrefetcherConfig::default()
    };
    assert!(config.validate().is_ok());
}

/// Every configuration that validates can build a replayer.
#[test]
fn test_validated_maximum_builds_replayer() {
    let json = format!(
        r#"{{ "prefetcher": {{ "inflight_elements": {MAX_CAPACITY}, "entry_limit": {MAX_CAPACITY} }},
            "replay": {{ "cache_blocks": {MAX_CAPACITY}, "miss_queue_entries": {MAX_CAPACITY} }} }}"#
    );
    let config = Config::from_json(&json).unwrap();
    let mut replayer = Replayer::try_new(&config).unwrap();
    let _ = replayer.step(AccessEvent::new(0x400, 0x1000));
    assert_eq!(replayer.stats().accesses, 1);
}

#[rstest]
#[case(0)]
#[case(48)]
#[case(100)]
fn test_block_size_must_be_power_of_two(#[case] block_size: u64) {
    let config = PrefetcherConfig {
        block_size,
        ..PrefetcherConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidBlockSize(b)) if b == block_size
    ));
}

#[rstest]
#[case(0, false)]
#[case(1, false)]
#[case(2, true)]
#[case(32, true)]
#[case(33, false)]
fn test_delta_width_range(#[case] width: u32, #[case] ok: bool) {
    let config = PrefetcherConfig {
        delta_bitfield_width: width,
        ..PrefetcherConfig::default()
    };
    assert_eq!(config.validate().is_ok(), ok);
}

#[test]
fn test_stride_shift_limit() {
    let config = PrefetcherConfig {
        stride_shift: 63,
        ..PrefetcherConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidStrideShift(63))
    ));
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        Config::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "prefetcher": {{ "stride_shift": 0 }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.prefetcher.stride_shift, 0);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}
