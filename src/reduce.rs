//! Reductions over matrix expressions
//!
//! Full reductions collapse a whole expression to one value. Partial
//! reductions write one value per column (`colwise_*`) or per row
//! (`rowwise_*`) into a vector destination with that many elements. Each
//! checks emptiness first: reductions with a neutral element return it on
//! empty input, the others fail with `EmptyInput`.
//!
//! | reduction | empty input |
//! |---|---|
//! | `sum`, `asum`, `sqsum`, `amax`, `dot`, `diff_*`, `norm` | 0 |
//! | `prod` | 1 |
//! | `minmax` | `MinMaxStat::empty()` |
//! | `maximum`, `minimum`, `mean` | `EmptyInput` |
//!
//! Column-wise reductions run one fold tree per column. Row-wise reductions
//! keep one scalar accumulator per row and sweep the columns in order.

use core::num::NonZeroUsize;

use crate::error::{Error, Result};
use crate::expr::{map1, map2, MatDest, MatExpr};
use crate::fold::{fold, fold_column, fold_rows};
use crate::functor::{Abs, AbsDiff, Mul, Sqr, SqrDiff};
use crate::kernels::{FoldKernel, Maximum, MinMax, MinMaxStat, Minimum, Prod, Sum};
use crate::policy::{simd_blocker, AccessOrder, Target};
use crate::traits::{Element, Real};

/// Vector norm of all elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Norm {
    /// Sum of absolute values
    L1,
    /// Square root of the sum of squares
    L2,
    /// Largest absolute value
    Linf,
}

/// Fold with `kernel`, or `empty` when the expression has no element
fn fold_or<K, E>(kernel: &K, expr: &E, empty: K::Value) -> K::Value
where
    E: MatExpr,
    K: FoldKernel<E::Elem>,
{
    fold(kernel, expr).unwrap_or(empty)
}

/// Sum of all elements; 0 when empty
///
/// # Example
///
/// ```rust
/// use mateval::{sum, DenseMatrix};
///
/// let v = DenseMatrix::<f64>::from_fn(9, 1, |i, _| (i + 1) as f64).unwrap();
/// assert_eq!(sum(&v), 45.0);
/// ```
pub fn sum<E: MatExpr>(expr: &E) -> E::Elem {
    fold_or(&Sum, expr, E::Elem::ZERO)
}

/// Largest element
pub fn maximum<E: MatExpr>(expr: &E) -> Result<E::Elem> {
    fold(&Maximum, expr)
}

/// Smallest element
pub fn minimum<E: MatExpr>(expr: &E) -> Result<E::Elem> {
    fold(&Minimum, expr)
}

/// Product of all elements; 1 when empty
pub fn prod<E: MatExpr>(expr: &E) -> E::Elem {
    fold_or(&Prod, expr, E::Elem::ONE)
}

/// Smallest and largest element in one pass; `MinMaxStat::empty()` when empty
pub fn minmax<E: MatExpr>(expr: &E) -> MinMaxStat<E::Elem> {
    fold_or(&MinMax, expr, MinMaxStat::empty())
}

/// Arithmetic mean of all elements
pub fn mean<E: MatExpr>(expr: &E) -> Result<E::Elem> {
    if expr.nelems() == 0 {
        return Err(Error::EmptyInput("mean"));
    }
    Ok(sum(expr) / E::Elem::from_count(expr.nelems()))
}

/// Sum of absolute values; 0 when empty
pub fn asum<E: MatExpr>(expr: &E) -> E::Elem {
    fold_or(&Sum, &map1(Abs, expr), E::Elem::ZERO)
}

/// Sum of squares; 0 when empty
pub fn sqsum<E: MatExpr>(expr: &E) -> E::Elem {
    fold_or(&Sum, &map1(Sqr, expr), E::Elem::ZERO)
}

/// Largest absolute value; 0 when empty
pub fn amax<E: MatExpr>(expr: &E) -> E::Elem {
    fold_or(&Maximum, &map1(Abs, expr), E::Elem::ZERO)
}

/// Sum of elementwise products; 0 when empty
pub fn dot<A, B>(a: &A, b: &B) -> Result<A::Elem>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    Ok(fold_or(&Sum, &map2(Mul, a, b)?, A::Elem::ZERO))
}

/// Sum of absolute differences; 0 when empty
pub fn diff_asum<A, B>(a: &A, b: &B) -> Result<A::Elem>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    Ok(fold_or(&Sum, &map2(AbsDiff, a, b)?, A::Elem::ZERO))
}

/// Sum of squared differences; 0 when empty
pub fn diff_sqsum<A, B>(a: &A, b: &B) -> Result<A::Elem>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    Ok(fold_or(&Sum, &map2(SqrDiff, a, b)?, A::Elem::ZERO))
}

/// Largest absolute difference; 0 when empty
pub fn diff_amax<A, B>(a: &A, b: &B) -> Result<A::Elem>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    Ok(fold_or(&Maximum, &map2(AbsDiff, a, b)?, A::Elem::ZERO))
}

/// Norm of all elements taken as one vector
pub fn norm<E>(expr: &E, kind: Norm) -> E::Elem
where
    E: MatExpr,
    E::Elem: Real,
{
    match kind {
        Norm::L1 => asum(expr),
        Norm::L2 => sqsum(expr).sqrt_val(),
        Norm::Linf => amax(expr),
    }
}

/// Norm of the difference `a - b`
pub fn diff_norm<A, B>(a: &A, b: &B, kind: Norm) -> Result<A::Elem>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    A::Elem: Real,
{
    match kind {
        Norm::L1 => diff_asum(a, b),
        Norm::L2 => Ok(diff_sqsum(a, b)?.sqrt_val()),
        Norm::Linf => diff_amax(a, b),
    }
}

/// Fold each column of `expr` and write `finish(value)` for column `j` to `dst[j]`
fn colwise<K, E, D>(
    kernel: &K,
    expr: &E,
    dst: &mut D,
    empty: Option<E::Elem>,
    finish: impl Fn(K::Value) -> E::Elem,
) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
    K: FoldKernel<E::Elem>,
{
    let cols = expr.ncols();
    let dst_shape = dst.shape();
    if !dst_shape.is_vector() || dst_shape.nelems() != cols {
        return Err(Error::DimensionMismatch {
            expected: (1, cols),
            found: (dst_shape.rows, dst_shape.cols),
        });
    }
    if cols == 0 {
        return Ok(());
    }

    let mut writer = dst.writer();
    let Some(rows) = NonZeroUsize::new(expr.nrows()) else {
        let value = empty.ok_or(Error::EmptyInput(K::NAME))?;
        for j in 0..cols {
            writer.set(j, value);
        }
        return Ok(());
    };

    let simd = simd_blocker::<<E::Elem as Element>::Pack, E>(
        expr,
        AccessOrder::PerColumn,
        &Target::FOLD,
        K::SIMD,
    )
    .is_none();
    tracing::trace!(rows = rows.get(), cols, simd, "column-wise reduction");

    let reader = expr.reader(AccessOrder::PerColumn);
    for j in 0..cols {
        let value = fold_column::<<E::Elem as Element>::Pack, K, _>(rows, j, kernel, &reader, simd);
        writer.set(j, finish(value));
    }
    Ok(())
}

/// Fold each row of `expr` and write `finish(value)` for row `i` to `dst[i]`
fn rowwise<K, E, D>(
    kernel: &K,
    expr: &E,
    dst: &mut D,
    empty: Option<E::Elem>,
    finish: impl Fn(K::Value) -> E::Elem,
) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
    K: FoldKernel<E::Elem>,
{
    let rows = expr.nrows();
    let dst_shape = dst.shape();
    if !dst_shape.is_vector() || dst_shape.nelems() != rows {
        return Err(Error::DimensionMismatch {
            expected: (rows, 1),
            found: (dst_shape.rows, dst_shape.cols),
        });
    }
    if rows == 0 {
        return Ok(());
    }

    let Some(cols) = NonZeroUsize::new(expr.ncols()) else {
        let value = empty.ok_or(Error::EmptyInput(K::NAME))?;
        let mut writer = dst.writer();
        for i in 0..rows {
            writer.set(i, value);
        }
        return Ok(());
    };
    tracing::trace!(rows, cols = cols.get(), "row-wise reduction");

    let reader = expr.reader(AccessOrder::PerColumn);
    let values = fold_rows(rows, cols, kernel, &reader);
    let mut writer = dst.writer();
    for (i, value) in values.into_iter().enumerate() {
        writer.set(i, finish(value));
    }
    Ok(())
}

/// Direction of a partial reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Columns,
    Rows,
}

impl Axis {
    fn reduce<K, E, D>(
        self,
        kernel: &K,
        expr: &E,
        dst: &mut D,
        empty: Option<E::Elem>,
        finish: impl Fn(K::Value) -> E::Elem,
    ) -> Result<()>
    where
        E: MatExpr,
        D: MatDest<Elem = E::Elem>,
        K: FoldKernel<E::Elem>,
    {
        match self {
            Axis::Columns => colwise(kernel, expr, dst, empty, finish),
            Axis::Rows => rowwise(kernel, expr, dst, empty, finish),
        }
    }

    /// Elements folded into each output value
    fn run_len<E: MatExpr>(self, expr: &E) -> usize {
        match self {
            Axis::Columns => expr.nrows(),
            Axis::Rows => expr.ncols(),
        }
    }

    /// Number of output values
    fn outputs<E: MatExpr>(self, expr: &E) -> usize {
        match self {
            Axis::Columns => expr.ncols(),
            Axis::Rows => expr.nrows(),
        }
    }

    fn mean<E, D>(self, expr: &E, dst: &mut D) -> Result<()>
    where
        E: MatExpr,
        D: MatDest<Elem = E::Elem>,
    {
        let len = self.run_len(expr);
        if len == 0 && self.outputs(expr) > 0 {
            return Err(Error::EmptyInput("mean"));
        }
        let n = E::Elem::from_count(len);
        self.reduce(&Sum, expr, dst, None, |v| v / n)
    }

    fn dot<A, B, D>(self, a: &A, b: &B, dst: &mut D) -> Result<()>
    where
        A: MatExpr,
        B: MatExpr<Elem = A::Elem>,
        D: MatDest<Elem = A::Elem>,
    {
        self.reduce(&Sum, &map2(Mul, a, b)?, dst, Some(A::Elem::ZERO), |v| v)
    }

    fn norm<E, D>(self, expr: &E, kind: Norm, dst: &mut D) -> Result<()>
    where
        E: MatExpr,
        E::Elem: Real,
        D: MatDest<Elem = E::Elem>,
    {
        let zero = Some(E::Elem::ZERO);
        match kind {
            Norm::L1 => self.reduce(&Sum, &map1(Abs, expr), dst, zero, |v| v),
            Norm::L2 => self.reduce(&Sum, &map1(Sqr, expr), dst, zero, |v| v.sqrt_val()),
            Norm::Linf => self.reduce(&Maximum, &map1(Abs, expr), dst, zero, |v| v),
        }
    }
}

/// Sum of each column into `dst`, a vector with one element per column
pub fn colwise_sum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    colwise(&Sum, expr, dst, Some(E::Elem::ZERO), |v| v)
}

/// Mean of each column into `dst`
pub fn colwise_mean<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    Axis::Columns.mean(expr, dst)
}

/// Largest element of each column into `dst`
pub fn colwise_maximum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    colwise(&Maximum, expr, dst, None, |v| v)
}

/// Smallest element of each column into `dst`
pub fn colwise_minimum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    colwise(&Minimum, expr, dst, None, |v| v)
}

/// Product of each column into `dst`
pub fn colwise_prod<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    colwise(&Prod, expr, dst, Some(E::Elem::ONE), |v| v)
}

/// Dot product of corresponding columns of `a` and `b` into `dst`
pub fn colwise_dot<A, B, D>(a: &A, b: &B, dst: &mut D) -> Result<()>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    D: MatDest<Elem = A::Elem>,
{
    Axis::Columns.dot(a, b, dst)
}

/// Norm of each column into `dst`; 0 for empty columns
pub fn colwise_norm<E, D>(expr: &E, kind: Norm, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    E::Elem: Real,
    D: MatDest<Elem = E::Elem>,
{
    Axis::Columns.norm(expr, kind, dst)
}

/// Sum of each row into `dst`, a vector with one element per row
///
/// # Example
///
/// ```rust
/// use mateval::{rowwise_sum, DenseMatrix};
///
/// let m = DenseMatrix::<f64>::from_fn(2, 3, |i, j| (10 * i + j) as f64).unwrap();
/// let mut sums = DenseMatrix::<f64>::zeros(2, 1).unwrap();
/// rowwise_sum(&m, &mut sums).unwrap();
/// assert_eq!(sums.as_slice(), &[3.0, 33.0]);
/// ```
pub fn rowwise_sum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    rowwise(&Sum, expr, dst, Some(E::Elem::ZERO), |v| v)
}

/// Mean of each row into `dst`
pub fn rowwise_mean<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    Axis::Rows.mean(expr, dst)
}

/// Largest element of each row into `dst`
pub fn rowwise_maximum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    rowwise(&Maximum, expr, dst, None, |v| v)
}

/// Smallest element of each row into `dst`
pub fn rowwise_minimum<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    rowwise(&Minimum, expr, dst, None, |v| v)
}

/// Product of each row into `dst`
pub fn rowwise_prod<E, D>(expr: &E, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    D: MatDest<Elem = E::Elem>,
{
    rowwise(&Prod, expr, dst, Some(E::Elem::ONE), |v| v)
}

/// Dot product of corresponding rows of `a` and `b` into `dst`
pub fn rowwise_dot<A, B, D>(a: &A, b: &B, dst: &mut D) -> Result<()>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    D: MatDest<Elem = A::Elem>,
{
    Axis::Rows.dot(a, b, dst)
}

/// Norm of each row into `dst`; 0 for empty rows
pub fn rowwise_norm<E, D>(expr: &E, kind: Norm, dst: &mut D) -> Result<()>
where
    E: MatExpr,
    E::Elem: Real,
    D: MatDest<Elem = E::Elem>,
{
    Axis::Rows.norm(expr, kind, dst)
}
