//! Benchmarks comparing the skip list against `BTreeMap`.
//!
//! Run with: cargo bench
//!
//! Storage is pre-allocated once and reused via clear().

use std::collections::BTreeMap;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use nexus_skipmap::{SkipArena, SkipList};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const COUNT: usize = 10_000;

type Storage = SkipArena<u64, u64>;
type List = SkipList<u64, u64, Storage, SmallRng>;

fn random_keys(n: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(42);
    (0..n).map(|_| rng.random_range(0..u64::MAX)).collect()
}

fn filled(keys: &[u64]) -> (Storage, List) {
    let mut storage = SkipArena::with_capacity(keys.len());
    let mut list = SkipList::new(SmallRng::seed_from_u64(7));
    for &k in keys {
        list.insert(&mut storage, k, k).unwrap();
    }
    (storage, list)
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(COUNT as u64));
    let keys = random_keys(COUNT);

    let mut storage: Storage = SkipArena::with_capacity(COUNT);
    let mut list: List = SkipList::new(SmallRng::seed_from_u64(7));

    group.bench_function("skiplist", |b| {
        b.iter(|| {
            for &k in &keys {
                black_box(list.insert(&mut storage, k, k)).unwrap();
            }
            list.clear(&mut storage, |_, _| {});
        });
    });

    group.bench_function("skiplist/ratio4", |b| {
        let mut list: List = SkipList::with_level_ratio(SmallRng::seed_from_u64(7), 4);
        b.iter(|| {
            for &k in &keys {
                black_box(list.insert(&mut storage, k, k)).unwrap();
            }
            list.clear(&mut storage, |_, _| {});
        });
    });

    group.bench_function("btreemap", |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                black_box(map.insert(k, k));
            }
            map
        });
    });

    group.finish();
}

// ============================================================================
// Get Benchmarks
// ============================================================================

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(COUNT as u64));
    let keys = random_keys(COUNT);

    let (storage, list) = filled(&keys);
    let map: BTreeMap<_, _> = keys.iter().map(|&k| (k, k)).collect();

    group.bench_function("skiplist", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(list.get(&storage, k));
            }
        });
    });

    group.bench_function("btreemap", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(map.get(k));
            }
        });
    });

    group.finish();
}

// ============================================================================
// Pop / Delete Benchmarks
// ============================================================================

fn bench_pop_first(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop_first");
    group.throughput(Throughput::Elements(COUNT as u64));
    let keys = random_keys(COUNT);

    group.bench_function("skiplist", |b| {
        b.iter_batched(
            || filled(&keys),
            |(mut storage, mut list)| {
                while let Some(entry) = list.pop_first(&mut storage) {
                    black_box(entry);
                }
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("btreemap", |b| {
        b.iter_batched(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>(),
            |mut map| {
                while let Some(entry) = map.pop_first() {
                    black_box(entry);
                }
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    group.throughput(Throughput::Elements(COUNT as u64));
    let keys = random_keys(COUNT);

    group.bench_function("skiplist", |b| {
        b.iter_batched(
            || filled(&keys),
            |(mut storage, mut list)| {
                for k in &keys {
                    black_box(list.delete(&mut storage, k));
                }
                (storage, list)
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_get, bench_pop_first, bench_delete);
criterion_main!(benches);
