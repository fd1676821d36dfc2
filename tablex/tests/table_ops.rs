//! End-to-end exercises of the table surface

use std::collections::HashMap;
use tablex::{Error, Handle, RootTable, Tracking};

/// Shorthand for non-reserved test keys.
fn h(raw: usize) -> Handle {
    Handle::from_raw(raw)
}

#[test]
fn reserved_keys_fail_loudly_and_change_nothing() {
    let mut table = RootTable::new(Tracking::None);
    assert!(matches!(
        table.insert(Handle::NULL, h(1)),
        Err(Error::ReservedKey)
    ));
    assert!(matches!(
        table.insert(Handle::TOMBSTONE, h(1)),
        Err(Error::ReservedKey)
    ));
    assert!(matches!(
        table.replace(Handle::NULL, h(1)),
        Err(Error::ReservedKey)
    ));
    assert!(table.is_empty());
    assert_eq!(table.stats().tombstones, 0);
}

#[test]
fn capacity_follows_the_spaced_prime_schedule() {
    let mut table = RootTable::new(Tracking::None);
    assert_eq!(table.capacity(), 11);
    for i in 1..=1000_usize {
        table.insert(h(i), h(i)).expect("plain key");
    }
    assert_eq!(table.len(), 1000);
    assert_eq!(table.capacity(), 1861);
}

#[test]
fn churn_against_a_model() {
    // Deliberately terrible hash: everything lands in seven buckets,
    // so every operation exercises probing, tombstones, and reuse.
    let mut table = RootTable::builder()
        .hash_fn(|k| (k.into_raw() % 7) as u64)
        .build();
    let mut model: HashMap<usize, usize> = HashMap::new();

    for round in 0..4_usize {
        for i in 0..200_usize {
            let k = round * 1000 + i;
            table.insert(h(k + 1), h(k * 3 + 1)).expect("plain key");
            model.insert(k + 1, k * 3 + 1);
        }
        // Drop every third key from this round.
        for i in (0..200_usize).step_by(3) {
            let k = round * 1000 + i;
            assert!(table.remove(h(k + 1)));
            model.remove(&(k + 1));
        }
    }

    assert_eq!(table.len(), model.len());
    for (&k, &v) in &model {
        assert_eq!(table.lookup(h(k)), Some(h(v)), "key {k}");
    }
    let mut seen: Vec<(usize, usize)> = table
        .iter()
        .map(|(k, v)| (k.into_raw(), v.into_raw()))
        .collect();
    seen.sort_unstable();
    let mut expected: Vec<(usize, usize)> = model.iter().map(|(&k, &v)| (k, v)).collect();
    expected.sort_unstable();
    assert_eq!(seen, expected);
}

#[test]
fn removed_keys_can_come_back() {
    let mut table = RootTable::new(Tracking::None);
    for i in 1..=50_usize {
        table.insert(h(i), h(i)).expect("plain key");
    }
    for i in 1..=50_usize {
        assert!(table.remove(h(i)));
    }
    assert!(table.is_empty());
    for i in 1..=50_usize {
        table.insert(h(i), h(i + 500)).expect("plain key");
    }
    assert_eq!(table.len(), 50);
    for i in 1..=50_usize {
        assert_eq!(table.lookup(h(i)), Some(h(i + 500)));
    }
}

#[test]
fn retain_compacts_a_mostly_dead_table() {
    let mut table = RootTable::new(Tracking::None);
    for i in 1..=500_usize {
        table.insert(h(i), h(i)).expect("plain key");
    }
    let before = table.capacity();
    let removed = table.retain(|key, _| key.into_raw() <= 5);
    assert_eq!(removed, 495);
    assert_eq!(table.len(), 5);
    // Five survivors in an 823-slot array is far below the minimum
    // load factor, so retain compacted back to the smallest capacity.
    assert!(before > 11);
    assert_eq!(table.capacity(), 11);
    assert_eq!(table.stats().tombstones, 0);
    for i in 1..=5_usize {
        assert_eq!(table.lookup(h(i)), Some(h(i)));
    }
}

#[test]
fn debug_output_names_the_root() {
    let table = RootTable::builder()
        .tracking(Tracking::Key)
        .root(tablex::RootSource::Jit, "method cache")
        .build();
    let rendered = format!("{table:?}");
    assert!(rendered.contains("method cache"));
    assert!(rendered.contains("Key"));
}
