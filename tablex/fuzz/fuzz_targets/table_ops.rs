//! Differential fuzzer for the table against a std HashMap model.
//!
//! The slot array, tombstone bookkeeping, and rehash paths all carry
//! hand-rolled invariants, so every operation is mirrored into a
//! known-good map and the two are compared continuously.

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;
use tablex::{Handle, RootTable, TracedRef, Tracer, Tracking};

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(u16, u16),
    Replace(u16, u16),
    Remove(u16),
    Lookup(u16),
    RetainEven,
    Mark,
}

struct Counter(usize);

impl Tracer for Counter {
    fn visit(&mut self, _reference: &mut TracedRef) {
        self.0 += 1;
    }
}

// Shift by one so no fuzz input can produce a reserved pattern.
fn key(k: u16) -> Handle {
    Handle::from_raw(k as usize + 1)
}

fn value(v: u16) -> Handle {
    Handle::from_raw(v as usize + 1)
}

fuzz_target!(|input: (u8, Vec<Op>)| {
    let (mode, ops) = input;
    let tracking = match mode % 4 {
        0 => Tracking::None,
        1 => Tracking::Key,
        2 => Tracking::Value,
        _ => Tracking::KeyValue,
    };
    let mut table = RootTable::new(tracking);
    let mut model: HashMap<u16, u16> = HashMap::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                table.insert(key(k), value(v)).expect("shifted keys are never reserved");
                model.insert(k, v);
            }
            Op::Replace(k, v) => {
                table.replace(key(k), value(v)).expect("shifted keys are never reserved");
                model.insert(k, v);
            }
            Op::Remove(k) => {
                assert_eq!(table.remove(key(k)), model.remove(&k).is_some());
            }
            Op::Lookup(k) => {
                assert_eq!(table.lookup(key(k)), model.get(&k).map(|&v| value(v)));
            }
            Op::RetainEven => {
                let removed = table.retain(|k, _| k.into_raw() % 2 == 0);
                let before = model.len();
                model.retain(|&k, _| (k as usize + 1) % 2 == 0);
                assert_eq!(removed, before - model.len());
            }
            Op::Mark => {
                let mut counter = Counter(0);
                table.mark(&mut counter);
                assert_eq!(counter.0, model.len() * tracking.ref_offsets().len());
            }
        }
        assert_eq!(table.len(), model.len());
    }

    let mut entries: Vec<(usize, usize)> = table
        .iter()
        .map(|(k, v)| (k.into_raw(), v.into_raw()))
        .collect();
    entries.sort_unstable();
    let mut expected: Vec<(usize, usize)> = model
        .iter()
        .map(|(&k, &v)| (k as usize + 1, v as usize + 1))
        .collect();
    expected.sort_unstable();
    assert_eq!(entries, expected);
});
