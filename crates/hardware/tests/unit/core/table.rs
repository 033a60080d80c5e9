//! Prediction Table Tests.
//!
//! Verifies first-sighting creation, insertion-order eviction at the entry
//! limit, and that hits neither reset nor promote an entry.

use dcpt_core::common::constants::ENTRY_LIMIT;
use dcpt_core::AccessEvent;
use dcpt_core::core::{ColdCache, PredictionEntry, PredictionTable, PrefetchEngine};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// 1. Creation
// ══════════════════════════════════════════════════════════

#[test]
fn new_entry_starts_at_first_address() {
    let mut table = PredictionTable::new(4, 6);
    let (entry, created) = table.find_or_create(0x400, 0x8000);
    assert!(created);
    assert_eq!(entry.pc(), 0x400);
    assert_eq!(entry.last_address(), 0x8000);
    assert_eq!(entry.last_prefetch(), 0);
    assert_eq!(entry.deltas().to_vec(), vec![1]);
}

/// A second lookup returns the existing entry and ignores the new address.
#[test]
fn repeat_lookup_does_not_recreate() {
    let mut table = PredictionTable::new(4, 6);
    let _ = table.find_or_create(0x400, 0x8000);
    let (entry, created) = table.find_or_create(0x400, 0x9000);
    assert!(!created);
    assert_eq!(entry.last_address(), 0x8000);
    assert_eq!(table.len(), 1);
}

#[test]
fn entries_carry_configured_history() {
    let mut table = PredictionTable::new(4, 3);
    let (entry, _) = table.find_or_create(0x10, 0);
    assert_eq!(entry.deltas().capacity(), 3);
}

// ══════════════════════════════════════════════════════════
// 2. Eviction
// ══════════════════════════════════════════════════════════

#[test]
fn oldest_inserted_entry_is_evicted() {
    let mut table = PredictionTable::new(3, 6);
    for pc in [1, 2, 3] {
        let _ = table.find_or_create(pc, pc * 0x1000);
    }
    assert!(table.is_full());
    assert_eq!(table.oldest().map(PredictionEntry::pc), Some(1));

    let _ = table.find_or_create(4, 0x4000);
    assert_eq!(table.len(), 3);
    assert!(!table.contains(1));
    assert_eq!(table.pcs().collect::<Vec<_>>(), vec![2, 3, 4]);
}

/// Hits do not refresh an entry's position: the most used entry still goes first.
#[test]
fn hits_do_not_promote() {
    let mut table = PredictionTable::new(2, 6);
    let _ = table.find_or_create(1, 0);
    let _ = table.find_or_create(2, 0);
    for _ in 0..10 {
        let _ = table.find_or_create(1, 0);
    }
    let _ = table.find_or_create(3, 0);
    assert!(!table.contains(1));
    assert!(table.contains(2));
    assert!(table.contains(3));
}

/// An evicted instruction comes back as a fresh entry.
#[test]
fn evicted_pc_is_recreated_fresh() {
    let mut table = PredictionTable::new(1, 6);
    let _ = table.find_or_create(1, 0);
    let _ = table.find_or_create(2, 0);
    let (entry, created) = table.find_or_create(1, 0x5000);
    assert!(created);
    assert_eq!(entry.last_address(), 0x5000);
    assert!(!table.contains(2));
}

#[test]
fn default_engine_holds_entry_limit_entries() {
    let mut engine = PrefetchEngine::default();
    let mut issued = Vec::new();
    for pc in 0..=ENTRY_LIMIT as u64 {
        let _ = engine.access(AccessEvent::new(pc, 0x1000), &ColdCache, &mut issued);
    }

    assert_eq!(engine.table().len(), ENTRY_LIMIT);
    assert!(!engine.table().contains(0));
    assert!(engine.table().contains(ENTRY_LIMIT as u64));
    assert_eq!(engine.stats().entries_created, ENTRY_LIMIT as u64 + 1);
    assert_eq!(engine.stats().entries_evicted, 1);
    assert!(issued.is_empty());
}

#[test]
fn clear_empties_table() {
    let mut table = PredictionTable::new(2, 6);
    let _ = table.find_or_create(1, 0);
    table.clear();
    assert!(table.is_empty());
    assert!(table.oldest().is_none());
}
