use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use conjecturing::{Granularity, SearchDriver};
use std::num::NonZeroUsize;

fn collatz_steps(mut x: u64) -> u32 {
    let mut steps = 0;
    while x > 1 {
        x = if x % 2 == 0 { x / 2 } else { 3 * x + 1 };
        steps += 1;
    }
    steps
}

fn below_two_hundred_steps(x: &u64) -> bool {
    collatz_steps(*x) < 200
}

fn bench_strategies(c: &mut Criterion) {
    let driver = SearchDriver::default();
    let n = 100_000;

    let mut group = c.benchmark_group("Strategies");
    group.bench_function("find_first_clean", |b| {
        b.iter(|| black_box(driver.find_first(n, |x: &u64| *x < u64::MAX, 0u64..).unwrap()));
    });
    group.bench_function("count_all", |b| {
        b.iter(|| black_box(driver.count_all(n, below_two_hundred_steps, 1u64..).unwrap()));
    });
    group.bench_function("find_min", |b| {
        b.iter(|| {
            black_box(
                driver
                    .find_min(n, below_two_hundred_steps, |x: &u64| collatz_steps(*x), 1u64..)
                    .unwrap(),
            )
        });
    });
    group.bench_function("find_max", |b| {
        b.iter(|| {
            black_box(
                driver
                    .find_max(n, below_two_hundred_steps, |x: &u64| collatz_steps(*x), 1u64..)
                    .unwrap(),
            )
        });
    });
    group.finish();
}

fn bench_granularity(c: &mut Criterion) {
    let n = 10_000;
    let mut group = c.benchmark_group("Granularity");
    for count in [1usize, 100, 10_000] {
        let driver = SearchDriver::new(Granularity::Fixed(NonZeroUsize::new(count).unwrap()));
        group.bench_with_input(BenchmarkId::new("count_all", count), &driver, |b, driver| {
            b.iter(|| black_box(driver.count_all(n, |x: &u64| x % 3 != 0, 0u64..).unwrap()));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_strategies, bench_granularity
}

criterion_main!(benches);
