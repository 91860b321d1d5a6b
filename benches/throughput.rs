//! Throughput Benchmark for emberkv
//!
//! Measures the store's basic operations and the expiration-index hot
//! paths under various workloads.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use emberkv::storage::ExpirationIndex;
use emberkv::{Store, SweepConfig};
use std::time::{Duration, Instant};

/// Builds a runtime and a store whose sweep stays quiet during the run.
fn bench_store() -> (tokio::runtime::Runtime, Store) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let store = {
        let _guard = rt.enter();
        Store::with_config(SweepConfig {
            interval: Duration::from_secs(3600),
        })
    };
    (rt, store)
}

/// Benchmark SET operations
fn bench_set(c: &mut Criterion) {
    let (_rt, store) = bench_store();

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i);
            store.set(key, "small_value");
            i += 1;
        });
    });

    group.bench_function("set_medium", |b| {
        let mut i = 0u64;
        let value = "x".repeat(1024); // 1KB value
        b.iter(|| {
            let key = format!("key:{}", i);
            store.set(key, value.clone());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let (_rt, store) = bench_store();

    // Pre-populate with data
    for i in 0..100_000 {
        store.set(format!("key:{}", i), format!("value:{}", i));
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(store.get(&key));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark INCR operations
fn bench_incr(c: &mut Criterion) {
    let (_rt, store) = bench_store();

    let mut group = c.benchmark_group("incr");
    group.throughput(Throughput::Elements(1));

    group.bench_function("incr_single_counter", |b| {
        b.iter(|| {
            black_box(store.incr("counter").unwrap());
        });
    });

    group.finish();
}

/// Benchmark TTL registration through the store
fn bench_expire(c: &mut Criterion) {
    let (_rt, store) = bench_store();

    for i in 0..100_000 {
        store.set(format!("key:{}", i), "value");
    }

    let mut group = c.benchmark_group("expire");
    group.throughput(Throughput::Elements(1));

    group.bench_function("expire_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(store.expire(&key, Duration::from_secs(3600)));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark the expiration index directly
fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("expiration_index");
    group.throughput(Throughput::Elements(1));

    group.bench_function("insert_fresh", |b| {
        let mut index = ExpirationIndex::new();
        let base = Instant::now();
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i);
            index.insert(&key, base + Duration::from_secs(i % 10_000));
            i += 1;
        });
    });

    group.bench_function("insert_overwrite", |b| {
        let mut index = ExpirationIndex::new();
        let base = Instant::now();
        for i in 0..10_000u64 {
            index.insert(&format!("key:{}", i), base + Duration::from_secs(i));
        }
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 10_000);
            index.insert(&key, base + Duration::from_secs((i * 7) % 10_000));
            i += 1;
        });
    });

    group.bench_function("insert_then_remove", |b| {
        let mut index = ExpirationIndex::new();
        let base = Instant::now();
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i);
            index.insert(&key, base + Duration::from_secs(i % 1_000));
            index.remove(&key);
            i += 1;
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_set,
    bench_get,
    bench_incr,
    bench_expire,
    bench_index
);
criterion_main!(benches);
