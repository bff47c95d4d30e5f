//! Evaluation tests: every operand kind, every policy, every destination shape

use mateval::ops::{add, mul, mul_add, neg, scale, sub};
use mateval::{
    evaluate, evaluate_policy, evaluate_with, map2, AccessPolicy, ConstExpr, CostModel,
    DenseMatrix, Error, MatrixView, MatrixViewMut, Max2, PortableVector, RepeatCol, RepeatRow,
    ScalarFn2, ScalarVector, Transpose,
};


#[cfg(test)]
use test_utils::*;

const ALL_POLICIES: [AccessPolicy; 4] = [
    AccessPolicy::LinearScalar,
    AccessPolicy::LinearSimd,
    AccessPolicy::PerColumnScalar,
    AccessPolicy::PerColumnSimd,
];

#[test]
fn test_elementwise_expression() {
    let a = matrix(8, 3, sample_data(24));
    let b = matrix(8, 3, (0..24).map(|x| x as f64).collect());
    let mut out = DenseMatrix::<f64>::zeros(8, 3).unwrap();
    evaluate(&sub(mul(&a, &b).unwrap(), &b).unwrap(), &mut out).unwrap();
    for j in 0..3 {
        for i in 0..8 {
            assert_eq!(out[(i, j)], a[(i, j)] * b[(i, j)] - b[(i, j)]);
        }
    }
}

#[test]
fn test_every_forced_policy_gives_the_same_result() {
    let a = matrix(16, 4, sample_data(64));
    let b = matrix(16, 4, sample_data(64).into_iter().map(|x| x * 0.25).collect());
    let e = mul_add(&a, &b, &a).unwrap();

    let mut reference = DenseMatrix::<f64>::zeros(16, 4).unwrap();
    evaluate_policy(&e, &mut reference, AccessPolicy::LinearScalar).unwrap();

    for policy in ALL_POLICIES {
        let mut out = DenseMatrix::<f64>::filled(16, 4, f64::NAN).unwrap();
        match evaluate_policy(&e, &mut out, policy) {
            Ok(()) => assert_eq!(out.as_slice(), reference.as_slice(), "{}", policy.name()),
            // Only SIMD policies may be refused, and only when the CPU lacks the backend
            Err(Error::UnsupportedPolicy { .. }) => {
                assert!(policy.uses_simd() && !mateval::simd_available())
            }
            Err(e) => panic!("{}: {}", policy.name(), e),
        }
    }
}

#[test]
fn test_repeated_evaluation_is_identical() {
    let m = matrix(12, 5, sample_data(60));
    let v = matrix(12, 1, sample_data(12));
    let e = add(&m, RepeatCol::new(&v, 5).unwrap()).unwrap();
    let mut first = DenseMatrix::<f64>::zeros(12, 5).unwrap();
    let mut second = DenseMatrix::<f64>::zeros(12, 5).unwrap();
    let p1 = evaluate(&e, &mut first).unwrap();
    let p2 = evaluate(&e, &mut second).unwrap();
    assert_eq!(p1, p2);
    assert_eq!(first.as_slice(), second.as_slice());
}

#[test]
fn test_repeated_operands() {
    let col = matrix(3, 1, vec![1.0, 2.0, 3.0]);
    let row = matrix(1, 4, vec![10.0, 20.0, 30.0, 40.0]);
    let e = add(
        RepeatCol::new(&col, 4).unwrap(),
        RepeatRow::new(&row, 3).unwrap(),
    )
    .unwrap();
    let mut out = DenseMatrix::<f64>::zeros(3, 4).unwrap();
    evaluate(&e, &mut out).unwrap();
    for j in 0..4 {
        for i in 0..3 {
            assert_eq!(out[(i, j)], (i + 1) as f64 + 10.0 * (j + 1) as f64);
        }
    }

    for policy in [AccessPolicy::LinearScalar, AccessPolicy::PerColumnScalar] {
        let mut forced = DenseMatrix::<f64>::zeros(3, 4).unwrap();
        evaluate_policy(&e, &mut forced, policy).unwrap();
        assert_eq!(forced.as_slice(), out.as_slice());
    }
}

#[test]
fn test_transposed_operands() {
    let m = matrix(3, 5, sample_data(15));
    let mut out = DenseMatrix::<f64>::zeros(5, 3).unwrap();
    evaluate(&Transpose::new(&m), &mut out).unwrap();
    for i in 0..5 {
        for j in 0..3 {
            assert_eq!(out[(i, j)], m[(j, i)]);
        }
    }

    // A transposed view reads through strides instead of a cache
    let mut via_view = DenseMatrix::<f64>::zeros(5, 3).unwrap();
    evaluate(&m.view().t(), &mut via_view).unwrap();
    assert_eq!(via_view.as_slice(), out.as_slice());
}

#[test]
fn test_strided_source_and_destination() {
    // Every other element of a 32-element buffer, as a 4x4 matrix
    let backing: Vec<f64> = (0..32).map(|x| x as f64).collect();
    let src = MatrixView::strided(&backing, 4, 4, 2, 8).unwrap();

    let mut target = vec![0.0; 48];
    {
        let mut dst = MatrixViewMut::strided(&mut target, 4, 4, 3, 12).unwrap();
        evaluate(&neg(src), &mut dst).unwrap();
    }
    for j in 0..4 {
        for i in 0..4 {
            assert_eq!(target[i * 3 + j * 12], -((i * 2 + j * 8) as f64));
        }
    }
    assert_eq!(target.iter().filter(|&&x| x != 0.0).count(), 15);
}

#[test]
fn test_block_to_block() {
    let src = matrix(10, 10, (0..100).map(|x| x as f64).collect());
    let mut dst = DenseMatrix::<f64>::zeros(10, 10).unwrap();
    let block = src.block(2, 3, 5, 4).unwrap();
    {
        let mut target = dst.block_mut(4, 1, 5, 4).unwrap();
        evaluate(&scale(block, 2.0).unwrap(), &mut target).unwrap();
    }
    for j in 0..4 {
        for i in 0..5 {
            assert_eq!(dst[(4 + i, 1 + j)], 2.0 * src[(2 + i, 3 + j)]);
        }
    }
    assert_eq!(dst[(0, 0)], 0.0);
    assert_eq!(dst[(9, 9)], 0.0);
}

#[test]
fn test_scalar_only_function() {
    let a = matrix(4, 4, sample_data(16));
    let b = matrix(4, 4, vec![0.0; 16]);
    let mut out = DenseMatrix::<f64>::zeros(4, 4).unwrap();
    let e = map2(ScalarFn2(|x: f64, y: f64| x.max(y)), &a, &b).unwrap();
    assert!(!evaluate(&e, &mut out).unwrap().uses_simd());

    let mut simd_out = DenseMatrix::<f64>::zeros(4, 4).unwrap();
    evaluate(&map2(Max2, &a, &b).unwrap(), &mut simd_out).unwrap();
    assert_eq!(out.as_slice(), simd_out.as_slice());
}

#[test]
fn test_explicit_pack_types() {
    let a = matrix(8, 2, sample_data(16));
    let c = ConstExpr::new(1.5, 8, 2).unwrap();
    let e = add(&a, c).unwrap();
    let model = CostModel::default();

    let mut wide = DenseMatrix::<f64>::zeros(8, 2).unwrap();
    let mut narrow = DenseMatrix::<f64>::zeros(8, 2).unwrap();
    evaluate_with::<PortableVector<f64, 8>, _, _>(&e, &mut wide, &model).unwrap();
    evaluate_with::<ScalarVector<f64>, _, _>(&e, &mut narrow, &model).unwrap();
    assert_eq!(wide.as_slice(), narrow.as_slice());
    assert_eq!(wide[(7, 1)], a[(7, 1)] + 1.5);
}

#[test]
fn test_static_extents() {
    let a = DenseMatrix::<f32, 4, 4>::from_fn(4, 4, |i, j| (i * 4 + j) as f32).unwrap();
    let b = DenseMatrix::<f32, 4, 4>::filled(4, 4, 1.0).unwrap();
    let mut out = DenseMatrix::<f32, 4, 4>::zeros(4, 4).unwrap();
    evaluate(&add(&a, &b).unwrap(), &mut out).unwrap();
    assert_eq!(out[(3, 2)], 15.0);

    assert!(matches!(
        DenseMatrix::<f32, 4, 4>::zeros(3, 4),
        Err(Error::DimensionMismatch { .. })
    ));
}

#[test]
fn test_integer_evaluation() {
    let a = DenseMatrix::<i64>::from_fn(5, 3, |i, j| (i * 3 + j) as i64).unwrap();
    let mut out = DenseMatrix::<i64>::zeros(5, 3).unwrap();
    let policy = evaluate(&mul(&a, &a).unwrap(), &mut out).unwrap();
    assert!(!policy.uses_simd());
    assert_eq!(out[(4, 2)], 196);
}

#[test]
fn test_failed_evaluation_writes_nothing() {
    let a = matrix(4, 4, sample_data(16));
    let mut wrong = DenseMatrix::<f64>::filled(4, 5, 3.0).unwrap();
    assert!(matches!(
        evaluate(&a, &mut wrong),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(wrong.as_slice().iter().all(|&x| x == 3.0));

    let mut big = DenseMatrix::<f64>::filled(8, 8, 3.0).unwrap();
    let mut block = big.block_mut(0, 0, 4, 4).unwrap();
    let err = evaluate_policy(&a, &mut block, AccessPolicy::LinearSimd).unwrap_err();
    assert!(matches!(err, Error::UnsupportedPolicy { .. }));
    assert!(big.as_slice().iter().all(|&x| x == 3.0));
}

#[test]
fn test_empty_evaluation() {
    let a = DenseMatrix::<f64>::zeros(0, 3).unwrap();
    let mut out = DenseMatrix::<f64>::zeros(0, 3).unwrap();
    evaluate(&a, &mut out).unwrap();
    assert!(out.as_slice().is_empty());
}
