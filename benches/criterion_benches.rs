//! Criterion benchmarks for mateval
//!
//! Measures wall-clock time of evaluation and reductions per policy.
//! Run with: cargo bench --bench criterion_benches

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mateval::fold::fold_scalars;
use mateval::ops::{add, mul};
use mateval::{
    evaluate, evaluate_policy, fold_slice, maximum, minmax, sum, AccessPolicy, DenseMatrix,
    RepeatCol, Sum, Transpose,
};
use std::hint::black_box;
use std::num::NonZeroUsize;

fn sample(rows: usize, cols: usize) -> DenseMatrix<f32> {
    DenseMatrix::from_fn(rows, cols, |i, j| ((i * 31 + j * 17) % 97) as f32 * 0.01).unwrap()
}

/// Benchmark full reductions against a one-element-at-a-time fold
fn bench_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reductions");

    for size in [64, 1024, 16384].iter() {
        let v = sample(*size, 1);

        group.bench_with_input(BenchmarkId::new("sum_tree", size), &v, |bencher, v| {
            bencher.iter(|| black_box(sum(black_box(v))))
        });

        group.bench_with_input(BenchmarkId::new("sum_scalar", size), &v, |bencher, v| {
            let len = NonZeroUsize::new(v.as_slice().len()).unwrap();
            bencher.iter(|| black_box(fold_scalars(len, &Sum, black_box(v.as_slice()))))
        });

        group.bench_with_input(BenchmarkId::new("maximum", size), &v, |bencher, v| {
            bencher.iter(|| black_box(maximum(black_box(v))))
        });

        group.bench_with_input(BenchmarkId::new("minmax", size), &v, |bencher, v| {
            bencher.iter(|| black_box(minmax(black_box(v))))
        });
    }

    group.finish();
}

/// Benchmark ragged lengths where the scalar tail is longest
fn bench_ragged_tail(c: &mut Criterion) {
    let mut group = c.benchmark_group("ragged_tail");

    for size in [63, 1023].iter() {
        let data: Vec<f32> = (0..*size).map(|x| x as f32 * 0.5).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |bencher, data| {
            bencher.iter(|| black_box(fold_slice(&Sum, black_box(data.as_slice()))))
        });
    }

    group.finish();
}

/// Benchmark each forced policy on the same elementwise expression
fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("policies");

    let a = sample(256, 64);
    let b = sample(256, 64);
    let mut out = DenseMatrix::<f32>::zeros(256, 64).unwrap();

    for policy in [
        AccessPolicy::LinearScalar,
        AccessPolicy::LinearSimd,
        AccessPolicy::PerColumnScalar,
        AccessPolicy::PerColumnSimd,
    ] {
        let e = mul(&a, &b).unwrap();
        if evaluate_policy(&e, &mut out, policy).is_err() {
            continue;
        }
        group.bench_function(policy.name(), |bencher| {
            bencher.iter(|| evaluate_policy(black_box(&e), &mut out, policy))
        });
    }

    group.finish();
}

/// Benchmark operands that need a cache under one order
fn bench_cached_operands(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_operands");

    let m = sample(256, 64);
    let v = sample(256, 1);
    let mut out = DenseMatrix::<f32>::zeros(256, 64).unwrap();

    group.bench_function("repeat_col", |bencher| {
        let e = add(&m, RepeatCol::new(&v, 64).unwrap()).unwrap();
        bencher.iter(|| evaluate(black_box(&e), &mut out))
    });

    let sq = sample(128, 128);
    let mut out_sq = DenseMatrix::<f32>::zeros(128, 128).unwrap();
    group.bench_function("transpose", |bencher| {
        let e = Transpose::new(&sq);
        bencher.iter(|| evaluate(black_box(&e), &mut out_sq))
    });

    group.bench_function("transposed_view", |bencher| {
        let e = sq.view().t();
        bencher.iter(|| evaluate(black_box(&e), &mut out_sq))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_reductions,
    bench_ragged_tail,
    bench_policies,
    bench_cached_operands
);
criterion_main!(benches);
