#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::{collections::HashMap, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    collection::vec,
    prelude::any,
    strategy::{Strategy, ValueTree},
    test_runner::TestRunner,
};
use quadmap::{ChainedHashMap, OpenAddressingMap, WeightedCodePointSum};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;
const INITIAL_CAPACITY: usize = 64;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = vec(any::<(String, u64)>(), ITEMS_AMOUNT).new_tree(&mut runner).unwrap().current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    let mut open_map = OpenAddressingMap::with_hasher(INITIAL_CAPACITY, WeightedCodePointSum);
    let mut chained_map = ChainedHashMap::with_hasher(INITIAL_CAPACITY, WeightedCodePointSum);
    let mut rust_map = HashMap::with_capacity(INITIAL_CAPACITY);
    group.bench_function("open addressing put", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                let _ = black_box(open_map.put(key, value));
            }
        });
    });
    group.bench_function("chaining put", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                let _ = black_box(chained_map.put(key, value));
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                let _ = black_box(rust_map.insert(key, value));
            }
        });
    });
    group.bench_function("open addressing get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = black_box(open_map.get(key.as_str()));
            }
        });
    });
    group.bench_function("chaining get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = black_box(chained_map.get(key.as_str()));
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = black_box(rust_map.get(key));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
