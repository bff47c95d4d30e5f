//! Property-based tests for mateval
//!
//! Uses proptest to check that every policy and pack width agrees with plain
//! sequential reference implementations.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use mateval::ops::{add, sub};
use mateval::{
    colwise_sum, evaluate, evaluate_policy, fold_slice, maximum, mean, minimum, minmax,
    rowwise_maximum, rowwise_minimum, rowwise_sum, sum, AccessPolicy, DenseMatrix, Error, Sum,
    Transpose,
};


#[cfg(test)]
use test_utils::*;

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 1_000,
        ..ProptestConfig::default()
    }
}

/// Property: the fold tree sums within tolerance of a sequential sum
#[test]
fn test_sum_matches_reference() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        assert_sum_close(sum(&m), &data, &format!("{}x{}", rows, cols));
    });
}

#[test]
fn test_f32_sum_matches_reference() {
    proptest!(proptest_config(), |(data in vec_f32(200))| {
        let v = DenseMatrix::<f32>::from_vec(data.len(), 1, data.clone()).unwrap();
        assert_sum_close_f32(sum(&v), &data, "column vector");
        assert_sum_close_f32(fold_slice(&Sum, data.as_slice()).unwrap(), &data, "slice");
    });
}

/// Property: max and min are exact whatever the pack width or order
#[test]
fn test_extrema_are_exact() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        prop_assert_eq!(maximum(&m), Ok(ref_max(&data)));
        prop_assert_eq!(minimum(&m), Ok(ref_min(&data)));

        let t = Transpose::new(&m);
        prop_assert_eq!(maximum(&t), Ok(ref_max(&data)));
        prop_assert_eq!(minimum(&t), Ok(ref_min(&data)));
    });
}

/// Property: minmax bounds every element and attains both bounds
#[test]
fn test_minmax_bounds() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let s = minmax(&matrix(rows, cols, data.clone()));
        prop_assert!(data.iter().all(|&x| s.contains(x)));
        prop_assert!(data.contains(&s.min_value));
        prop_assert!(data.contains(&s.max_value));
    });
}

/// Property: the policy never changes an elementwise result
#[test]
fn test_policies_agree() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let a = matrix(rows, cols, data.clone());
        let b = matrix(rows, cols, data.iter().map(|x| x * 0.5 - 1.0).collect());
        let e = sub(add(&a, &b).unwrap(), &b).unwrap();

        let mut chosen = DenseMatrix::<f64>::zeros(rows, cols).unwrap();
        evaluate(&e, &mut chosen).unwrap();

        for policy in [AccessPolicy::LinearScalar, AccessPolicy::PerColumnScalar] {
            let mut forced = DenseMatrix::<f64>::zeros(rows, cols).unwrap();
            evaluate_policy(&e, &mut forced, policy).unwrap();
            prop_assert_eq!(forced.as_slice(), chosen.as_slice());
        }
        for policy in [AccessPolicy::LinearSimd, AccessPolicy::PerColumnSimd] {
            let mut forced = DenseMatrix::<f64>::zeros(rows, cols).unwrap();
            match evaluate_policy(&e, &mut forced, policy) {
                Ok(()) => prop_assert_eq!(forced.as_slice(), chosen.as_slice()),
                Err(err) => prop_assert!(
                    matches!(err, Error::UnsupportedPolicy { .. }),
                    "{} refused with {}",
                    policy.name(),
                    err
                ),
            }
        }
    });
}

/// Property: evaluating a transpose twice restores the original
#[test]
fn test_double_transpose() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data);
        let mut out = DenseMatrix::<f64>::zeros(rows, cols).unwrap();
        evaluate(&Transpose::new(Transpose::new(&m)), &mut out).unwrap();
        prop_assert_eq!(out.as_slice(), m.as_slice());
    });
}

/// Property: column sums add up to the full sum
#[test]
fn test_colwise_sum_consistent() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        let mut sums = DenseMatrix::<f64>::zeros(cols, 1).unwrap();
        colwise_sum(&m, &mut sums).unwrap();
        for j in 0..cols {
            let column = &data[j * rows..(j + 1) * rows];
            assert_sum_close(sums.as_slice()[j], column, &format!("column {}", j));
        }
        assert_sum_close(sum(&sums), &data, "sum of column sums");
    });
}

/// Property: row sums match a sequential reference and add up to the full sum
#[test]
fn test_rowwise_sum_consistent() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        let mut sums = DenseMatrix::<f64>::zeros(rows, 1).unwrap();
        rowwise_sum(&m, &mut sums).unwrap();
        for i in 0..rows {
            let row = ref_row(&data, rows, cols, i);
            assert_sum_close(sums.as_slice()[i], &row, &format!("row {}", i));
        }
        assert_sum_close(sum(&sums), &data, "sum of row sums");
    });
}

/// Property: row extrema are exact and agree with the full extrema
#[test]
fn test_rowwise_extrema_exact() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        let mut maxes = DenseMatrix::<f64>::zeros(1, rows).unwrap();
        let mut mins = DenseMatrix::<f64>::zeros(1, rows).unwrap();
        rowwise_maximum(&m, &mut maxes).unwrap();
        rowwise_minimum(&m, &mut mins).unwrap();
        for i in 0..rows {
            let row = ref_row(&data, rows, cols, i);
            prop_assert_eq!(maxes.as_slice()[i], ref_max(&row));
            prop_assert_eq!(mins.as_slice()[i], ref_min(&row));
        }
        prop_assert_eq!(maximum(&maxes), Ok(ref_max(&data)));
        prop_assert_eq!(minimum(&mins), Ok(ref_min(&data)));
    });
}

/// Property: mean lies between min and max
#[test]
fn test_mean_within_bounds() {
    proptest!(proptest_config(), |((rows, cols, data) in matrix_parts())| {
        let m = matrix(rows, cols, data.clone());
        let mu = mean(&m).unwrap();
        let slack = 1e-9 * data.iter().map(|x| x.abs()).fold(1.0, f64::max);
        prop_assert!(mu >= ref_min(&data) - slack);
        prop_assert!(mu <= ref_max(&data) + slack);
    });
}
