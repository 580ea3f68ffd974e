//! Basic benchmarks for the `recycle_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use recycle_pool::{FrameScheduler, LocalPool, Pool};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

type TestItem = [u8; 64];
const TEST_VALUE: TestItem = [0xAB; 64];

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("rp_fill");

    group.bench_function("empty", |b| {
        b.iter(|| {
            drop(black_box(Pool::from_fn(0, || TEST_VALUE)));
        });
    });

    group.bench_function("preload_thousand", |b| {
        b.iter(|| black_box(Pool::from_fn(1_000, || TEST_VALUE)));
    });

    group.bench_function("grow_thousand", |b| {
        b.iter(|| {
            let mut pool = Pool::from_fn(0, || TEST_VALUE);
            for _ in 0..1_000 {
                black_box(pool.acquire());
            }
            pool
        });
    });

    group.finish();

    let mut group = c.benchmark_group("rp_recycle");

    group.bench_function("acquire_release", |b| {
        let mut pool = Pool::from_fn(1, || TEST_VALUE);

        b.iter(|| {
            let key = pool.acquire();
            pool.release(black_box(key)).unwrap();
        });
    });

    group.bench_function("acquire_release_hundred", |b| {
        let mut pool = Pool::from_fn(100, || TEST_VALUE);
        let mut keys = Vec::with_capacity(100);

        b.iter(|| {
            keys.extend((0..100).map(|_| pool.acquire()));
            for key in keys.drain(..) {
                pool.release(key).unwrap();
            }
        });
    });

    group.finish();

    let mut group = c.benchmark_group("rp_handles");

    group.bench_function("return_now", |b| {
        let pool = LocalPool::from(Pool::from_fn(1, || TEST_VALUE));

        b.iter(|| {
            let handle = pool.acquire_handle();
            handle.return_to_pool().unwrap();
        });
    });

    group.bench_function("return_after_frame", |b| {
        let pool = LocalPool::from(Pool::from_fn(1, || TEST_VALUE));
        let scheduler = FrameScheduler::new();

        b.iter(|| {
            let handle = pool.acquire_handle();
            handle.return_to_pool_after(Duration::from_millis(16), &scheduler);
            black_box(scheduler.advance(Duration::from_millis(16)));
        });
    });

    group.finish();
}
