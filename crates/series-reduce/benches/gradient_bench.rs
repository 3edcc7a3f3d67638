use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, black_box};
use series_reduce::{CancelToken, DistanceSimplifier, EngineConfig, GradientSimplifier, Series, Simplifier};

fn gen_series(count: usize, n: usize) -> Vec<Series> {
    (0..count)
        .map(|s| {
            // waveform with drift, one sample per second
            Series::from_pairs(
                format!("s{s}"),
                (0..n).map(|i| (i as i64 * 1_000, (i as f64 * 0.01 + s as f64).sin() * 10.0 + i as f64 * 0.0001)),
            )
        })
        .collect()
}

fn bench_gradient(c: &mut Criterion) {
    let gradient = GradientSimplifier::new(&EngineConfig::default()).expect("pool");
    let cancel = CancelToken::new();
    let mut group = c.benchmark_group("gradient");
    for &(count, n) in &[(1usize, 200_000usize), (8, 50_000), (64, 10_000)] {
        let data = gen_series(count, n);
        for &threshold in &[1_000i64, 10_000] {
            group.bench_with_input(BenchmarkId::from_parameter(format!("s{count}_n{n}_t{threshold}")), &threshold, |b, &t| {
                b.iter_batched(
                    || data.clone(),
                    |mut d| { let _ = black_box(gradient.simplify(&mut d, t, &cancel)); },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_distance(c: &mut Criterion) {
    let distance = DistanceSimplifier::default();
    let cancel = CancelToken::new();
    let mut group = c.benchmark_group("distance");
    for &n in &[20_000usize, 50_000usize] {
        let data = gen_series(4, n);
        group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}")), &n, |b, _| {
            b.iter_batched(
                || data.clone(),
                |mut d| { let _ = black_box(distance.simplify(&mut d, 2_000, &cancel)); },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gradient, bench_distance);
criterion_main!(benches);
