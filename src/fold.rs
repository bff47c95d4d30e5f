//! Fold engine
//!
//! Reduces a source of `len` elements with a [`FoldKernel`]. Whole packs are
//! folded into up to four independent pack accumulators, which keeps several
//! pack operations in flight instead of one serial dependency chain, and the
//! `len % W` leftover elements go through a scalar tail.
//!
//! Pack accumulator tree for `npacks = len / W`:
//!
//! ```text
//! npacks >= 4:  a0..a3 <- packs 0..3
//!               a0..a3 <- fold groups of four packs
//!               a0 <- a0 + a2,  a1 <- a1 + a3
//!               (npacks & 2) a0 <- fold next pack, a1 <- fold next pack
//!               a0 <- a0 + a1
//!               (npacks & 1) a0 <- fold next pack
//! npacks 2..3:  a0 <- pack 0, fold pack 1 (and pack 2)
//! npacks 1:     a0 <- pack 0
//! ```
//!
//! The result is `reduce(a0)` followed by the scalar tail. Without any whole
//! pack the first element seeds the scalar accumulator.

use core::num::NonZeroUsize;

use crate::access::{Accessor, Column, Linear, LinearSource};
use crate::error::{Error, Result};
use crate::expr::{map1, map2, MatExpr};
use crate::functor::{BinaryFn, UnaryFn};
use crate::kernels::FoldKernel;
use crate::policy::{select_fold_policy, AccessPolicy, CostModel};
use crate::traits::{Element, SimdVector};

/// Fold `len` elements of `src` through the pack tree and scalar tail
#[inline]
pub fn fold_packs<V, K, S>(len: NonZeroUsize, kernel: &K, src: &S) -> K::Value
where
    S: LinearSource + ?Sized,
    V: SimdVector<Scalar = S::Elem>,
    K: FoldKernel<S::Elem>,
{
    let len = len.get();
    let width = V::LANES;
    let npacks = len / width;
    let pack = |k: usize| src.pack::<V>(k * width);

    let (mut r, tail) = if npacks == 0 {
        (kernel.init(src.scalar(0)), 1)
    } else {
        let mut a0;
        if npacks >= 4 {
            a0 = kernel.init_pack(pack(0));
            let mut a1 = kernel.init_pack(pack(1));
            let mut a2 = kernel.init_pack(pack(2));
            let mut a3 = kernel.init_pack(pack(3));

            let end4 = npacks & !3;
            let mut k = 4;
            while k < end4 {
                kernel.fold_pack(&mut a0, pack(k));
                kernel.fold_pack(&mut a1, pack(k + 1));
                kernel.fold_pack(&mut a2, pack(k + 2));
                kernel.fold_pack(&mut a3, pack(k + 3));
                k += 4;
            }

            kernel.merge_pack::<V>(&mut a0, a2);
            kernel.merge_pack::<V>(&mut a1, a3);

            if npacks & 2 != 0 {
                kernel.fold_pack(&mut a0, pack(k));
                kernel.fold_pack(&mut a1, pack(k + 1));
                k += 2;
            }

            kernel.merge_pack::<V>(&mut a0, a1);

            if npacks & 1 != 0 {
                kernel.fold_pack(&mut a0, pack(k));
            }
        } else {
            a0 = kernel.init_pack(pack(0));
            if npacks >= 2 {
                kernel.fold_pack(&mut a0, pack(1));
            }
            if npacks == 3 {
                kernel.fold_pack(&mut a0, pack(2));
            }
        }
        (kernel.reduce::<V>(a0), npacks * width)
    };

    for i in tail..len {
        kernel.fold(&mut r, src.scalar(i));
    }
    r
}

/// Fold `len` elements of `src` one at a time, seeded from element 0
#[inline]
pub fn fold_scalars<K, S>(len: NonZeroUsize, kernel: &K, src: &S) -> K::Value
where
    S: LinearSource + ?Sized,
    K: FoldKernel<S::Elem>,
{
    let mut r = kernel.init(src.scalar(0));
    for i in 1..len.get() {
        kernel.fold(&mut r, src.scalar(i));
    }
    r
}

/// Fold column `j` of `acc`, computing its column state once
#[inline]
pub fn fold_column<V, K, A>(
    rows: NonZeroUsize,
    j: usize,
    kernel: &K,
    acc: &A,
    simd: bool,
) -> K::Value
where
    A: Accessor + ?Sized,
    V: SimdVector<Scalar = A::Elem>,
    K: FoldKernel<A::Elem>,
{
    let column = Column::new(acc, j);
    if simd {
        fold_packs::<V, K, _>(rows, kernel, &column)
    } else {
        fold_scalars(rows, kernel, &column)
    }
}

/// Fold every column with the tree and merge the column results in order
pub fn fold_columns<V, K, A>(
    rows: NonZeroUsize,
    cols: NonZeroUsize,
    kernel: &K,
    acc: &A,
    simd: bool,
) -> K::Value
where
    A: Accessor + ?Sized,
    V: SimdVector<Scalar = A::Elem>,
    K: FoldKernel<A::Elem>,
{
    let mut r = fold_column::<V, K, A>(rows, 0, kernel, acc, simd);
    for j in 1..cols.get() {
        let rj = fold_column::<V, K, A>(rows, j, kernel, acc, simd);
        kernel.merge(&mut r, rj);
    }
    r
}

/// Fold every row across the columns, one accumulator per row
///
/// Columns are visited in order and each column state is computed once, so
/// the traversal stays per-column even though the results run along rows.
pub fn fold_rows<K, A>(rows: usize, cols: NonZeroUsize, kernel: &K, acc: &A) -> Vec<K::Value>
where
    A: Accessor + ?Sized,
    K: FoldKernel<A::Elem>,
{
    let first = Column::new(acc, 0);
    let mut out: Vec<K::Value> = (0..rows).map(|i| kernel.init(first.scalar(i))).collect();
    for j in 1..cols.get() {
        let column = Column::new(acc, j);
        for (i, r) in out.iter_mut().enumerate() {
            kernel.fold(r, column.scalar(i));
        }
    }
    out
}

/// Fold a non-empty expression under an already selected policy
pub(crate) fn fold_with_policy<V, K, E>(
    kernel: &K,
    expr: &E,
    policy: AccessPolicy,
    rows: NonZeroUsize,
    cols: NonZeroUsize,
) -> K::Value
where
    E: MatExpr + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
    K: FoldKernel<E::Elem>,
{
    let reader = expr.reader(policy.order());
    let len = rows.saturating_mul(cols);
    match policy {
        AccessPolicy::LinearSimd => fold_packs::<V, K, _>(len, kernel, &Linear(&reader)),
        AccessPolicy::LinearScalar => fold_scalars(len, kernel, &Linear(&reader)),
        AccessPolicy::PerColumnSimd => fold_columns::<V, K, _>(rows, cols, kernel, &reader, true),
        AccessPolicy::PerColumnScalar => {
            fold_columns::<V, K, _>(rows, cols, kernel, &reader, false)
        }
    }
}

pub(crate) fn nonempty_extents<E: MatExpr + ?Sized>(
    expr: &E,
    what: &'static str,
) -> Result<(NonZeroUsize, NonZeroUsize)> {
    match (NonZeroUsize::new(expr.nrows()), NonZeroUsize::new(expr.ncols())) {
        (Some(rows), Some(cols)) => Ok((rows, cols)),
        _ => Err(Error::EmptyInput(what)),
    }
}

/// Fold a whole expression, choosing linear or per-column order by cost
///
/// Fails with `EmptyInput` on an empty expression.
pub fn fold<K, E>(kernel: &K, expr: &E) -> Result<K::Value>
where
    E: MatExpr,
    K: FoldKernel<E::Elem>,
{
    fold_with::<<E::Elem as Element>::Pack, K, E>(kernel, expr, &CostModel::default())
}

/// [`fold`] with explicit cost constants
pub fn fold_with_model<K, E>(kernel: &K, expr: &E, model: &CostModel) -> Result<K::Value>
where
    E: MatExpr,
    K: FoldKernel<E::Elem>,
{
    fold_with::<<E::Elem as Element>::Pack, K, E>(kernel, expr, model)
}

/// [`fold`] with an explicit pack type and cost constants
pub fn fold_with<V, K, E>(kernel: &K, expr: &E, model: &CostModel) -> Result<K::Value>
where
    E: MatExpr + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
    K: FoldKernel<E::Elem>,
{
    let (rows, cols) = nonempty_extents(expr, K::NAME)?;
    let decision = select_fold_policy::<V, E>(expr, K::SIMD, model);
    Ok(fold_with_policy::<V, K, E>(kernel, expr, decision.policy, rows, cols))
}

/// Fold `f(a)` without materializing it
pub fn foldf<K, F, A>(kernel: &K, f: F, a: A) -> Result<K::Value>
where
    A: MatExpr,
    F: UnaryFn<A::Elem>,
    K: FoldKernel<A::Elem>,
{
    fold(kernel, &map1(f, a))
}

/// Fold `f(a, b)` without materializing it
///
/// Fails with `DimensionMismatch` when the shapes of `a` and `b` differ.
pub fn foldf2<K, F, A, B>(kernel: &K, f: F, a: A, b: B) -> Result<K::Value>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    F: BinaryFn<A::Elem>,
    K: FoldKernel<A::Elem>,
{
    fold(kernel, &map2(f, a, b)?)
}

/// Fold a slice with the native pack of its element type
///
/// Fails with `EmptyInput` on an empty slice.
pub fn fold_slice<T, K>(kernel: &K, data: &[T]) -> Result<K::Value>
where
    T: Element,
    K: FoldKernel<T>,
{
    let len = NonZeroUsize::new(data.len()).ok_or(Error::EmptyInput(K::NAME))?;
    if K::SIMD && T::VECTORIZABLE && crate::dispatch::simd_available() {
        Ok(fold_packs::<T::Pack, K, _>(len, kernel, data))
    } else {
        Ok(fold_scalars(len, kernel, data))
    }
}
