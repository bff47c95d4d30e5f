//! Expression evaluation into a destination
//!
//! One policy is chosen per call (see [`crate::policy`]) and the matching
//! loop runs to completion. All checks happen before the first write, so a
//! failed call leaves the destination untouched.

use crate::access::{Accessor, DenseWriter};
use crate::error::{Error, Result};
use crate::expr::{MatDest, MatExpr};
use crate::policy::{decide, select_policy, simd_blocker, AccessOrder, AccessPolicy, CostModel, Target};
use crate::traits::{Element, SimdVector};

/// Evaluate `expr` into `dst` with the native pack and default costs
///
/// Returns the policy that was used.
///
/// # Example
///
/// ```rust
/// use mateval::{evaluate, map2, DenseMatrix, Mul};
///
/// let a = DenseMatrix::<f32>::from_fn(4, 4, |i, j| (i + j) as f32).unwrap();
/// let mut out = DenseMatrix::<f32>::zeros(4, 4).unwrap();
/// evaluate(&map2(Mul, &a, &a).unwrap(), &mut out).unwrap();
/// assert_eq!(out[(3, 3)], 36.0);
/// ```
pub fn evaluate<E, D>(expr: &E, dst: &mut D) -> Result<AccessPolicy>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    evaluate_with::<<E::Elem as Element>::Pack, E, D>(expr, dst, &CostModel::default())
}

/// [`evaluate`] with explicit cost constants
pub fn evaluate_with_model<E, D>(expr: &E, dst: &mut D, model: &CostModel) -> Result<AccessPolicy>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    evaluate_with::<<E::Elem as Element>::Pack, E, D>(expr, dst, model)
}

/// [`evaluate`] with an explicit pack type and cost constants
pub fn evaluate_with<V, E, D>(expr: &E, dst: &mut D, model: &CostModel) -> Result<AccessPolicy>
where
    E: MatExpr + ?Sized,
    D: MatDest<Elem = E::Elem> + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    dst.shape().expect_same(expr.shape())?;
    let policy = select_policy::<V, E, D>(expr, dst, model).policy;
    run::<V, E, D>(expr, dst, policy);
    Ok(policy)
}

/// Evaluate `expr` into `dst` with a caller-chosen policy
///
/// Fails with `UnsupportedPolicy` when the destination cannot be written in
/// the policy's order or a SIMD policy cannot run on these operands.
pub fn evaluate_policy<E, D>(expr: &E, dst: &mut D, policy: AccessPolicy) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    dst.shape().expect_same(expr.shape())?;
    let target = Target::dest(dst);
    if policy.order() == AccessOrder::Linear && !target.linear {
        return Err(Error::UnsupportedPolicy {
            policy: policy.name(),
            reason: "destination has no uniform linear step",
        });
    }
    if policy.uses_simd() {
        if let Some(reason) =
            simd_blocker::<<E::Elem as Element>::Pack, E>(expr, policy.order(), &target, true)
        {
            return Err(Error::UnsupportedPolicy {
                policy: policy.name(),
                reason,
            });
        }
    }
    run::<<E::Elem as Element>::Pack, E, D>(expr, dst, policy);
    Ok(())
}

/// Policy [`evaluate`] would pick, without evaluating
pub fn evaluation_policy<E, D>(expr: &E, dst: &D) -> AccessPolicy
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    decide::<<E::Elem as Element>::Pack, E>(expr, &Target::dest(dst), true, &CostModel::default())
        .policy
}

fn run<V, E, D>(expr: &E, dst: &mut D, policy: AccessPolicy)
where
    E: MatExpr + ?Sized,
    D: MatDest<Elem = E::Elem> + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    let rows = expr.nrows();
    let cols = expr.ncols();
    let reader = expr.reader(policy.order());
    let mut writer = dst.writer();
    match policy {
        AccessPolicy::LinearScalar => linear_scalar(rows * cols, &reader, &mut writer),
        AccessPolicy::LinearSimd => linear_simd::<V, _>(rows * cols, &reader, &mut writer),
        AccessPolicy::PerColumnScalar => percol_scalar(rows, cols, &reader, &mut writer),
        AccessPolicy::PerColumnSimd => percol_simd::<V, _>(rows, cols, &reader, &mut writer),
    }
}

fn linear_scalar<R: Accessor>(len: usize, reader: &R, writer: &mut DenseWriter<'_, R::Elem>) {
    for i in 0..len {
        writer.set(i, reader.scalar(i));
    }
}

fn linear_simd<V, R>(len: usize, reader: &R, writer: &mut DenseWriter<'_, R::Elem>)
where
    R: Accessor,
    V: SimdVector<Scalar = R::Elem>,
{
    debug_assert_eq!(len % V::LANES, 0);
    let mut i = 0;
    while i < len {
        writer.set_pack(i, reader.pack::<V>(i));
        i += V::LANES;
    }
}

fn percol_scalar<R: Accessor>(
    rows: usize,
    cols: usize,
    reader: &R,
    writer: &mut DenseWriter<'_, R::Elem>,
) {
    for j in 0..cols {
        let rs = reader.col_state(j);
        let ws = writer.col_state(j);
        for i in 0..rows {
            writer.col_set(&ws, i, reader.col_scalar(&rs, i));
        }
    }
}

fn percol_simd<V, R>(rows: usize, cols: usize, reader: &R, writer: &mut DenseWriter<'_, R::Elem>)
where
    R: Accessor,
    V: SimdVector<Scalar = R::Elem>,
{
    debug_assert_eq!(rows % V::LANES, 0);
    for j in 0..cols {
        let rs = reader.col_state(j);
        let ws = writer.col_state(j);
        let mut i = 0;
        while i < rows {
            writer.col_set_pack(&ws, i, reader.col_pack::<V>(&rs, i));
            i += V::LANES;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::portable::PortableVector;
    use crate::matrix::DenseMatrix;
    use crate::shape::Layout;
    use core::cell::Cell;

    type P4 = PortableVector<f64, 4>;

    /// Accessor that counts column-state derivations and per-column reads
    struct CountingReader<'a> {
        data: &'a [f64],
        rows: usize,
        states: Cell<usize>,
        reads: Cell<usize>,
    }

    impl Accessor for CountingReader<'_> {
        type Elem = f64;
        type ColState = usize;

        fn scalar(&self, i: usize) -> f64 {
            self.data[i]
        }

        fn pack<V: SimdVector<Scalar = f64>>(&self, i: usize) -> V {
            V::from_slice(&self.data[i..])
        }

        fn col_state(&self, j: usize) -> usize {
            self.states.set(self.states.get() + 1);
            j * self.rows
        }

        fn col_scalar(&self, state: &usize, i: usize) -> f64 {
            self.reads.set(self.reads.get() + 1);
            self.data[state + i]
        }

        fn col_pack<V: SimdVector<Scalar = f64>>(&self, state: &usize, i: usize) -> V {
            self.reads.set(self.reads.get() + V::LANES);
            V::from_slice(&self.data[state + i..])
        }
    }

    #[test]
    fn test_column_state_once_per_column() {
        let data: Vec<f64> = (0..24).map(|x| x as f64).collect();
        let reader = CountingReader {
            data: &data,
            rows: 8,
            states: Cell::new(0),
            reads: Cell::new(0),
        };
        let mut out = vec![0.0; 24];

        let mut w = DenseWriter::new(&mut out, Layout::column_major(8, 3));
        percol_scalar(8, 3, &reader, &mut w);
        assert_eq!(reader.states.get(), 3);
        assert_eq!(reader.reads.get(), 24);

        reader.states.set(0);
        reader.reads.set(0);
        let mut w = DenseWriter::new(&mut out, Layout::column_major(8, 3));
        percol_simd::<P4, _>(8, 3, &reader, &mut w);
        assert_eq!(reader.states.get(), 3);
        assert_eq!(reader.reads.get(), 24);
        assert_eq!(out, data);
    }

    #[test]
    fn test_mismatch_rejected_before_write() {
        let a = DenseMatrix::<f64>::filled(3, 3, 1.0).unwrap();
        let mut out = DenseMatrix::<f64>::filled(3, 4, 7.0).unwrap();
        let err = evaluate(&a, &mut out).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: (3, 4),
                found: (3, 3)
            }
        );
        assert!(out.as_slice().iter().all(|&x| x == 7.0));
    }

    #[test]
    fn test_forced_linear_into_block_rejected() {
        let a = DenseMatrix::<f64>::filled(2, 2, 1.0).unwrap();
        let mut big = DenseMatrix::<f64>::zeros(4, 4).unwrap();
        let mut block = big.block_mut(1, 1, 2, 2).unwrap();
        let err = evaluate_policy(&a, &mut block, AccessPolicy::LinearScalar).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPolicy { .. }));
        evaluate_policy(&a, &mut block, AccessPolicy::PerColumnScalar).unwrap();
        assert_eq!(big.as_slice().iter().sum::<f64>(), 4.0);
    }
}
