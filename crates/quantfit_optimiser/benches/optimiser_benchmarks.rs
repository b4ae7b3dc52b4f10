//! Benchmarks for quantfit_optimiser.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quantfit_core::math::basis::BasisFunctionGenerator;
use quantfit_core::math::linalg::Vector;
use quantfit_optimiser::leastsquare::GeneralizedLeastSquares;
use quantfit_optimiser::rootfinding::BroydenRootFinder;

/// Par-swap residual system over `n` annual pillars.
fn swap_residuals(quotes: Vec<f64>) -> impl Fn(&Vector) -> Vector {
    move |zeros: &Vector| {
        let mut annuity = 0.0;
        Vector::new(
            zeros
                .as_slice()
                .iter()
                .enumerate()
                .zip(&quotes)
                .map(|((i, &z), &quote)| {
                    let df = (-z * (i + 1) as f64).exp();
                    annuity += df;
                    quote * annuity + df - 1.0
                })
                .collect(),
        )
    }
}

fn generate_quotes(count: usize) -> Vec<f64> {
    let zeros = Vector::new(
        (1..=count)
            .map(|t| 0.02 + 0.015 * (1.0 - (-(t as f64) / 4.0).exp()))
            .collect::<Vec<_>>(),
    );
    let mut annuity = 0.0;
    (0..count)
        .map(|i| {
            let df = (-zeros.as_slice()[i] * (i + 1) as f64).exp();
            annuity += df;
            (1.0 - df) / annuity
        })
        .collect()
}

fn benchmark_broyden_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("broyden_bootstrap");

    for size in [5, 10, 20] {
        let residuals = swap_residuals(generate_quotes(size));
        let finder = BroydenRootFinder::with_defaults();
        let guess = Vector::new(vec![0.03; size]);

        group.bench_with_input(BenchmarkId::from_parameter(size), &guess, |b, guess| {
            b.iter(|| finder.find_root(&residuals, black_box(guess)))
        });
    }

    group.finish();
}

fn benchmark_penalized_spline_fit(c: &mut Criterion) {
    let xs: Vec<f64> = (0..50).map(|i| i as f64 * 0.04).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (3.0 * x).sin() + 0.5 * x).collect();
    let sigmas = vec![0.01; xs.len()];
    let generator = BasisFunctionGenerator::new();
    let fitter = GeneralizedLeastSquares::new();

    let mut group = c.benchmark_group("penalized_spline_fit");

    for n_knots in [10, 20, 40] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_knots),
            &n_knots,
            |b, &n_knots| {
                b.iter(|| {
                    let bases = generator.generate_set(0.0, 2.0, n_knots, 3).unwrap();
                    fitter.fit_penalized(
                        black_box(&xs),
                        black_box(&ys),
                        &sigmas,
                        bases,
                        100.0,
                        2,
                    )
                })
            },
        );
    }

    group.finish();
}

fn benchmark_unpenalized_fit(c: &mut Criterion) {
    let xs: Vec<f64> = (0..100).map(|i| i as f64 * 0.02).collect();
    let bases: Vec<_> = (0..8)
        .map(|k| move |x: &f64| ((2 * k + 1) as f64 * x).sin())
        .collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| bases.iter().map(|b| b(x)).sum())
        .collect();
    let sigmas = vec![0.05; xs.len()];
    let fitter = GeneralizedLeastSquares::new();

    c.bench_function("unpenalized_sine_fit", |b| {
        b.iter(|| fitter.fit(black_box(&xs), black_box(&ys), &sigmas, &bases))
    });
}

criterion_group!(
    benches,
    benchmark_broyden_bootstrap,
    benchmark_penalized_spline_fit,
    benchmark_unpenalized_fit
);
criterion_main!(benches);
