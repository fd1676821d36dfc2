use criterion::{
    BenchmarkId, Criterion, Throughput, {criterion_group, criterion_main},
};
use std::hint::black_box;
use tablex::{Handle, RootTable, Tracking};

fn table_churn(entries: u64) {
    let mut table = RootTable::new(Tracking::KeyValue);
    for i in 0..entries {
        let key = Handle::from_raw((i.wrapping_mul(2654435761).wrapping_add(1)) as usize);
        table.insert(key, Handle::from_raw((i + 1) as usize)).ok();
    }
    for i in 0..entries {
        let key = Handle::from_raw((i.wrapping_mul(2654435761).wrapping_add(1)) as usize);
        black_box(table.lookup(key));
    }
}

fn different_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("roottable");
    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| table_churn(size as u64))
        });
    }
    group.finish();
}

criterion_group!(benches, different_sizes);
criterion_main!(benches);
