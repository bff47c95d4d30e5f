//! Policy selection through the public API
//!
//! Pack widths differ between backends, so these tests pick extents that are
//! multiples of every native width (1, 2, 4, 8) and compare SIMD use against
//! `simd_available()`.

use mateval::{
    evaluate, evaluate_with_model, evaluation_policy, map1, map2, select_fold_policy,
    select_policy, simd_available, AccessOrder, AccessPolicy, Add, ConstExpr, CostModel,
    DenseMatrix, Mul, PortableVector, RepeatCol, RepeatRow, ScalarFn, ScalarVector, SimdKind,
    Transpose,
};


#[cfg(test)]
use test_utils::*;

type P4 = PortableVector<f64, 4>;

#[test]
fn test_compiled_backend_reports_support() {
    let kind = SimdKind::COMPILED;
    assert!(!kind.name().is_empty());
    assert_eq!(simd_available(), kind.is_supported());
}

#[test]
fn test_contiguous_dense_goes_linear() {
    let a = DenseMatrix::<f64>::zeros(16, 8).unwrap();
    let mut out = DenseMatrix::<f64>::zeros(16, 8).unwrap();
    let e = map2(Mul, &a, &a).unwrap();
    let policy = evaluate(&e, &mut out).unwrap();
    assert_eq!(policy.order(), AccessOrder::Linear);
    assert_eq!(policy.uses_simd(), simd_available());
}

#[test]
fn test_block_destination_goes_per_column() {
    let a = DenseMatrix::<f64>::filled(8, 2, 1.0).unwrap();
    let mut big = DenseMatrix::<f64>::zeros(16, 4).unwrap();
    let mut block = big.block_mut(8, 1, 8, 2).unwrap();
    let policy = evaluate(&a, &mut block).unwrap();
    assert_eq!(policy.order(), AccessOrder::PerColumn);
    assert_eq!(policy.uses_simd(), simd_available());
    assert_eq!(big.as_slice().iter().sum::<f64>(), 16.0);
}

#[test]
fn test_row_destination_is_linear_but_scalar() {
    let r = DenseMatrix::<f64>::filled(1, 8, 2.0).unwrap();
    let mut big = DenseMatrix::<f64>::zeros(3, 8).unwrap();
    let mut row = big.block_mut(1, 0, 1, 8).unwrap();
    let policy = evaluate(&r, &mut row).unwrap();
    // Uniform step of 3 allows linear writes, but not pack stores
    assert_eq!(policy, AccessPolicy::LinearScalar);
    for j in 0..8 {
        assert_eq!(big[(1, j)], 2.0);
        assert_eq!(big[(0, j)], 0.0);
    }
}

#[test]
fn test_repeated_column_prefers_per_column() {
    let v = matrix(8, 1, sample_data(8));
    let m = matrix(8, 4, sample_data(32));
    let out = DenseMatrix::<f64>::zeros(8, 4).unwrap();
    let e = map2(Add, &m, RepeatCol::new(&v, 4).unwrap()).unwrap();

    let d = select_policy::<P4, _, _>(&e, &out, &CostModel::default());
    assert_eq!((d.linear_cost, d.percol_cost), (1200, 0));
    assert_eq!(d.policy.order(), AccessOrder::PerColumn);
}

#[test]
fn test_repeated_row_prefers_per_column() {
    let r = matrix(1, 4, vec![1.0, 2.0, 3.0, 4.0]);
    let e = RepeatRow::new(&r, 8).unwrap();
    let out = DenseMatrix::<f64>::zeros(8, 4).unwrap();
    let d = select_policy::<P4, _, _>(&e, &out, &CostModel::default());
    assert_eq!(d.policy.order(), AccessOrder::PerColumn);
}

#[test]
fn test_short_columns_tip_towards_linear_cache() {
    // Two rows: per-column pays the short-column penalty, linear pays the cache
    let v = matrix(2, 1, vec![1.0, 2.0]);
    let e = RepeatCol::new(&v, 16).unwrap();
    let out = DenseMatrix::<f64>::zeros(2, 16).unwrap();

    let d = select_policy::<P4, _, _>(&e, &out, &CostModel::default());
    assert_eq!((d.linear_cost, d.percol_cost), (1200, 100));
    assert_eq!(d.policy.order(), AccessOrder::PerColumn);

    let cheap_cache = CostModel {
        cache_cost: 50,
        ..CostModel::default()
    };
    let d = select_policy::<P4, _, _>(&e, &out, &cheap_cache);
    assert_eq!((d.linear_cost, d.percol_cost), (50, 100));
    assert_eq!(d.policy.order(), AccessOrder::Linear);
}

#[test]
fn test_transpose_ties_go_linear() {
    let m = matrix(8, 8, sample_data(64));
    let t = Transpose::new(&m);
    let out = DenseMatrix::<f64>::zeros(8, 8).unwrap();
    let d = select_policy::<P4, _, _>(&t, &out, &CostModel::default());
    assert_eq!(d.linear_cost, d.percol_cost);
    assert_eq!(d.policy.order(), AccessOrder::Linear);
}

#[test]
fn test_constant_costs_nothing() {
    let c = ConstExpr::new(1.0f64, 2, 9).unwrap();
    let model = CostModel::default();
    assert_eq!(model.linear_cost(&c), 0);
    // Short columns still pay the penalty
    assert_eq!(model.percol_cost(&c), model.short_column_penalty);
}

#[test]
fn test_scalar_only_function_disables_simd() {
    let a = matrix(8, 8, sample_data(64));
    let out = DenseMatrix::<f64>::zeros(8, 8).unwrap();
    let e = map1(ScalarFn(|x: f64| x * 0.5), &a);
    assert_eq!(evaluation_policy(&e, &out), AccessPolicy::LinearScalar);
    let d = select_fold_policy::<P4, _>(&e, true, &CostModel::default());
    assert!(!d.policy.uses_simd());
}

#[test]
fn test_ragged_lengths_for_evaluation_and_folds() {
    let a = matrix(5, 5, sample_data(25));
    let out = DenseMatrix::<f64>::zeros(5, 5).unwrap();
    let model = CostModel::default();
    assert!(!select_policy::<P4, _, _>(&a, &out, &model).policy.uses_simd());
    assert_eq!(
        select_fold_policy::<P4, _>(&a, true, &model).policy.uses_simd(),
        simd_available()
    );
    // Single-lane packs divide every length
    assert_eq!(
        select_policy::<ScalarVector<f64>, _, _>(&a, &out, &model)
            .policy
            .uses_simd(),
        simd_available()
    );
}

#[test]
fn test_selection_is_deterministic() {
    let m = matrix(8, 4, sample_data(32));
    let v = matrix(8, 1, sample_data(8));
    let e = map2(Add, &m, RepeatCol::new(&v, 4).unwrap()).unwrap();
    let out = DenseMatrix::<f64>::zeros(8, 4).unwrap();
    let first = evaluation_policy(&e, &out);
    for _ in 0..10 {
        assert_eq!(evaluation_policy(&e, &out), first);
    }
}

#[test]
fn test_reported_policy_matches_prediction() {
    let m = matrix(8, 4, sample_data(32));
    let t = Transpose::new(matrix(4, 8, sample_data(32)));
    let e = map2(Add, &m, &t).unwrap();
    let mut out = DenseMatrix::<f64>::zeros(8, 4).unwrap();
    let predicted = evaluation_policy(&e, &out);
    let used = evaluate_with_model(&e, &mut out, &CostModel::default()).unwrap();
    assert_eq!(predicted, used);
}
