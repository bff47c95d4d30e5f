//! iai-callgrind benchmarks for mateval
//!
//! Measures instruction counts of the fold tree and evaluation loops
//! (deterministic, cachegrind-based).
//! Run with: cargo bench --bench iai_benches

use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use mateval::ops::mul;
use mateval::{
    colwise_sum, evaluate, evaluation_policy, fold_slice, minmax, rowwise_sum, sum, AccessPolicy,
    DenseMatrix, MinMaxStat, RepeatCol, Sum,
};
use std::hint::black_box;

fn sample(rows: usize, cols: usize) -> DenseMatrix<f32> {
    DenseMatrix::from_fn(rows, cols, |i, j| ((i * 31 + j * 17) % 97) as f32 * 0.01).unwrap()
}

// Reductions

#[library_benchmark]
fn bench_sum_1024() -> f32 {
    let v = black_box(sample(1024, 1));
    black_box(sum(&v))
}

#[library_benchmark]
fn bench_sum_ragged_1027() -> f32 {
    let data: Vec<f32> = black_box((0..1027).map(|x| x as f32).collect());
    black_box(fold_slice(&Sum, data.as_slice()).unwrap_or_default())
}

#[library_benchmark]
fn bench_minmax_1024() -> MinMaxStat<f32> {
    let v = black_box(sample(1024, 1));
    black_box(minmax(&v))
}

#[library_benchmark]
fn bench_colwise_sum_64x16() -> f32 {
    let m = black_box(sample(64, 16));
    let mut out = DenseMatrix::<f32>::zeros(16, 1).unwrap();
    colwise_sum(&m, &mut out).unwrap();
    black_box(out.as_slice()[15])
}

#[library_benchmark]
fn bench_rowwise_sum_64x16() -> f32 {
    let m = black_box(sample(64, 16));
    let mut out = DenseMatrix::<f32>::zeros(64, 1).unwrap();
    rowwise_sum(&m, &mut out).unwrap();
    black_box(out.as_slice()[63])
}

library_benchmark_group!(
    name = reduction_group;
    benchmarks = bench_sum_1024, bench_sum_ragged_1027, bench_minmax_1024,
                 bench_colwise_sum_64x16, bench_rowwise_sum_64x16
);

// Evaluation

#[library_benchmark]
fn bench_evaluate_dense_64x64() -> f32 {
    let a = black_box(sample(64, 64));
    let mut out = DenseMatrix::<f32>::zeros(64, 64).unwrap();
    evaluate(&mul(&a, &a).unwrap(), &mut out).unwrap();
    black_box(out[(63, 63)])
}

#[library_benchmark]
fn bench_evaluate_repeat_col_64x64() -> f32 {
    let a = black_box(sample(64, 64));
    let v = black_box(sample(64, 1));
    let mut out = DenseMatrix::<f32>::zeros(64, 64).unwrap();
    evaluate(&mul(&a, RepeatCol::new(&v, 64).unwrap()).unwrap(), &mut out).unwrap();
    black_box(out[(63, 63)])
}

#[library_benchmark]
fn bench_policy_selection() -> AccessPolicy {
    let a = black_box(sample(64, 64));
    let out = DenseMatrix::<f32>::zeros(64, 64).unwrap();
    black_box(evaluation_policy(&mul(&a, &a).unwrap(), &out))
}

library_benchmark_group!(
    name = evaluation_group;
    benchmarks = bench_evaluate_dense_64x64, bench_evaluate_repeat_col_64x64,
                 bench_policy_selection
);

main!(
    library_benchmark_groups = reduction_group,
    evaluation_group
);
