//! The collector contract, exercised through whole tables

use std::cell::Cell;
use std::rc::Rc;
use strum::IntoEnumIterator;
use tablex::{Barrier, Handle, RootSource, RootTable, TracedRef, Tracer, Tracking};

/// Shorthand for non-reserved test keys.
fn h(raw: usize) -> Handle {
    Handle::from_raw(raw)
}

/// Tracer that only counts the words it is shown.
struct Counter(usize);

impl Tracer for Counter {
    fn visit(&mut self, _reference: &mut TracedRef) {
        self.0 += 1;
    }
}

#[test]
fn mark_visits_exactly_the_live_traced_words() {
    for tracking in Tracking::iter() {
        let mut table = RootTable::new(tracking);
        for i in 1..=20_usize {
            table.insert(h(i), h(1000 + i)).expect("plain key");
        }
        for i in 1..=5_usize {
            assert!(table.remove(h(i)));
        }
        let mut counter = Counter(0);
        table.mark(&mut counter);
        // 15 live entries, each contributing one visit per traced word;
        // tombstones contribute nothing.
        assert_eq!(counter.0, 15 * tracking.ref_offsets().len(), "{tracking}");
    }
}

#[test]
fn null_values_are_not_shown_to_the_tracer() {
    let mut table = RootTable::new(Tracking::KeyValue);
    table.insert(h(1), Handle::NULL).expect("plain key");
    table.insert(h(2), h(20)).expect("plain key");
    let mut counter = Counter(0);
    table.mark(&mut counter);
    // Two live keys, but only one live value word.
    assert_eq!(counter.0, 3);
}

/// A moving collector: relocates every referent by a fixed distance.
struct Evacuator {
    /// Distance every referent moves.
    delta: usize,
}

impl Tracer for Evacuator {
    fn visit(&mut self, reference: &mut TracedRef) {
        let moved = reference.into_handle().into_raw() + self.delta;
        *reference = TracedRef::from_handle(Handle::from_raw(moved));
    }
}

/// Hash on the identity bits of a key, which survive relocation.
fn id_hash(key: Handle) -> u64 {
    (key.into_raw() & 0xffff) as u64
}

/// Equality on the identity bits of a key.
fn id_eq(a: Handle, b: Handle) -> bool {
    a.into_raw() & 0xffff == b.into_raw() & 0xffff
}

#[test]
fn moving_pass_rewrites_words_in_place() {
    // Keys and values are "addresses" whose identity lives in the low
    // 16 bits; the collector relocates objects by a fixed offset that
    // leaves identity intact, as any identity-preserving move must.
    let mut table = RootTable::builder()
        .tracking(Tracking::KeyValue)
        .hash_fn(id_hash)
        .eq_fn(id_eq)
        .root(RootSource::GcHandle, "pinned objects")
        .build();
    for i in 1..=10_usize {
        table
            .insert(h(0x10_0000 + i), h(0x20_0000 + i))
            .expect("plain key");
    }
    table.mark(&mut Evacuator { delta: 0x100_0000 });
    assert_eq!(table.len(), 10);
    for i in 1..=10_usize {
        let (key, value) = table.lookup_entry(h(i)).expect("identity still matches");
        assert_eq!(key, h(0x110_0000 + i));
        assert_eq!(value, h(0x210_0000 + i));
    }
}

/// Barrier that counts traced stores while performing them.
#[derive(Clone, Default)]
struct CountingBarrier(Rc<Cell<usize>>);

impl Barrier for CountingBarrier {
    fn store(&self, field: &mut TracedRef, value: TracedRef) {
        self.0.set(self.0.get() + 1);
        *field = value;
    }
}

#[test]
fn barrier_sees_only_traced_stores() {
    let stores = Rc::new(Cell::new(0_usize));
    let mut table = RootTable::builder()
        .tracking(Tracking::Value)
        .barrier(CountingBarrier(Rc::clone(&stores)))
        .build();

    // Keys are untraced here: only the value half of each operation
    // passes through the barrier.
    table.insert(h(1), h(10)).expect("plain key");
    table.insert(h(2), h(20)).expect("plain key");
    assert_eq!(stores.get(), 2);

    // A value update is one traced store.
    table.insert(h(1), h(11)).expect("plain key");
    assert_eq!(stores.get(), 3);

    // Clearing an entry stores the null marker through the barrier.
    assert!(table.remove(h(1)));
    assert_eq!(stores.get(), 4);

    // Growth replays every surviving value store through the barrier.
    for i in 3..=12_usize {
        table.insert(h(i), h(i * 10)).expect("plain key");
    }
    // Ten fresh inserts plus eight live entries rewritten by the
    // rehash that fired partway through.
    assert_eq!(stores.get(), 22);
}

#[test]
fn untraced_tables_never_touch_the_barrier() {
    let stores = Rc::new(Cell::new(0_usize));
    let mut table = RootTable::builder()
        .tracking(Tracking::None)
        .barrier(CountingBarrier(Rc::clone(&stores)))
        .build();
    for i in 1..=30_usize {
        table.insert(h(i), h(i)).expect("plain key");
    }
    table.retain(|_, _| false);
    assert_eq!(stores.get(), 0);
}
