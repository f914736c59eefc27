//! Criterion benchmarks for the exposure engine and aggregator.
//!
//! Benchmarks cover:
//! - Full simulation of a swap and an FX forward
//! - Per-date reduction of the exposure matrix
//! - PFE quantiles

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::curves::CurveEnum;
use pricer_models::models::rates::HullWhiteParams;
use pricer_models::schedules::SimulationDates;
use pricer_xva::{
    EngineConfig, ExposureAggregator, ExposureEngine, ExposureMatrix, FxForward, InterestRateSwap,
    ModelMap, SwapDirection,
};

const FX_CORRELATION: [f64; 9] = [1.0, -0.5, 0.5, -0.5, 1.0, -0.5, 0.5, -0.5, 1.0];

/// Quarterly schedule over `years`.
fn quarterly(years: usize) -> SimulationDates {
    SimulationDates::uniform(0.0, 0.25, 4 * years + 1).unwrap()
}

/// Synthetic exposure matrix: peaks mid-life with deterministic noise.
fn synthetic_matrix(n_dates: usize, n_paths: usize) -> ExposureMatrix {
    let grid = (0..n_dates).map(|i| i as f64 * 0.25).collect();
    let mid = n_dates as f64 / 2.0;
    let rows = (0..n_dates)
        .map(|t| {
            let base = 100.0 * (1.0 - (t as f64 - mid).abs() / mid);
            (0..n_paths)
                .map(|s| base + (((s * 17 + t * 13) % 100) as f64 - 50.0) * 3.0)
                .collect()
        })
        .collect();
    ExposureMatrix::from_rows(grid, rows).unwrap()
}

/// Benchmark a 10y quarterly payer swap.
fn bench_swap_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_simulation");
    group.sample_size(10);

    let params = HullWhiteParams::new(0.1, 0.01).unwrap();
    let engine = ExposureEngine::new(EngineConfig::builder().seed(42).build());

    for n_paths in [1_000, 5_000] {
        group.bench_with_input(BenchmarkId::new("irs_10y", n_paths), &n_paths, |b, &n| {
            b.iter(|| {
                let mut models = ModelMap::new(quarterly(10), n)
                    .unwrap()
                    .with_rate_factor("USD", CurveEnum::flat(0.015), params)
                    .unwrap();
                let mut swap =
                    InterestRateSwap::vanilla("USD", SwapDirection::Payer, 0.015, 1e6, 10.0, 0.25)
                        .unwrap();
                engine.run(black_box(&mut swap), &mut models, None).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark a 5y FX forward on three correlated factors.
fn bench_fx_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx_simulation");
    group.sample_size(10);

    let params = HullWhiteParams::new(0.1, 0.01).unwrap();
    let engine = ExposureEngine::new(EngineConfig::builder().seed(42).build());

    group.bench_function("fx_forward_5y_5000", |b| {
        b.iter(|| {
            let mut models = ModelMap::new(quarterly(5), 5_000)
                .unwrap()
                .with_rate_factor("JPY", CurveEnum::flat(0.035), params)
                .unwrap()
                .with_rate_factor("USD", CurveEnum::flat(0.0175), params)
                .unwrap()
                .with_fx_spot("USDJPY", "JPY", "USD", 100.0, 0.1)
                .unwrap();
            let mut fwd = FxForward::new("USDJPY", "JPY", "USD", 109.144226, 1.0, 5.0);
            engine
                .run(black_box(&mut fwd), &mut models, Some(&FX_CORRELATION))
                .unwrap()
        });
    });

    group.finish();
}

/// Benchmark the EPE/ENE/EFV reduction.
fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");

    for (n_dates, n_paths) in [(41, 1_000), (41, 10_000), (121, 10_000)] {
        let label = format!("{}dates_{}paths", n_dates, n_paths);
        let matrix = synthetic_matrix(n_dates, n_paths);

        group.bench_with_input(BenchmarkId::new("profile", &label), &matrix, |b, m| {
            b.iter(|| ExposureAggregator::reduce(black_box(m)));
        });
    }

    group.finish();
}

/// Benchmark PFE quantiles.
fn bench_pfe(c: &mut Criterion) {
    let mut group = c.benchmark_group("pfe");

    let matrix = synthetic_matrix(41, 10_000);
    for confidence in [0.95, 0.99] {
        group.bench_with_input(
            BenchmarkId::new("quantile", confidence),
            &confidence,
            |b, &q| {
                b.iter(|| ExposureAggregator::potential_future_exposure(black_box(&matrix), q));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_swap_simulation,
    bench_fx_simulation,
    bench_reduce,
    bench_pfe
);
criterion_main!(benches);
