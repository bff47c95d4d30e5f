//! Functional-style expression builders
//!
//! Thin wrappers over [`map1`] and [`map2`] with the stock functors, so
//! expressions read as `add(&a, mul(&b, &c)?)?` instead of spelling out the
//! functor types. Binary builders check shapes and fail with
//! `DimensionMismatch`.

use crate::error::Result;
use crate::expr::{map1, map2, map3, ConstExpr, Map1, Map2, Map3, MatExpr};
use crate::functor::{Abs, AbsDiff, Add, Div, Max2, Min2, Mul, MulAdd, Neg, Sqr, SqrDiff, Sub};

/// Elementwise `a + b`
///
/// # Example
///
/// ```rust
/// use mateval::ops::add;
/// use mateval::{evaluate, DenseMatrix};
///
/// let a = DenseMatrix::<f64>::filled(2, 3, 1.5).unwrap();
/// let b = DenseMatrix::<f64>::filled(2, 3, 2.5).unwrap();
/// let mut out = DenseMatrix::<f64>::zeros(2, 3).unwrap();
/// evaluate(&add(&a, &b).unwrap(), &mut out).unwrap();
/// assert!(out.as_slice().iter().all(|&x| x == 4.0));
/// ```
#[inline]
pub fn add<A, B>(a: A, b: B) -> Result<Map2<Add, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Add, a, b)
}

/// Elementwise `a - b`
#[inline]
pub fn sub<A, B>(a: A, b: B) -> Result<Map2<Sub, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Sub, a, b)
}

/// Elementwise `a * b`
#[inline]
pub fn mul<A, B>(a: A, b: B) -> Result<Map2<Mul, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Mul, a, b)
}

/// Elementwise `a / b`
#[inline]
pub fn div<A, B>(a: A, b: B) -> Result<Map2<Div, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Div, a, b)
}

/// Elementwise minimum
#[inline]
pub fn min<A, B>(a: A, b: B) -> Result<Map2<Min2, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Min2, a, b)
}

/// Elementwise maximum
#[inline]
pub fn max<A, B>(a: A, b: B) -> Result<Map2<Max2, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(Max2, a, b)
}

/// Elementwise `|a - b|`
#[inline]
pub fn abs_diff<A, B>(a: A, b: B) -> Result<Map2<AbsDiff, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(AbsDiff, a, b)
}

/// Elementwise `(a - b)^2`
#[inline]
pub fn sqr_diff<A, B>(a: A, b: B) -> Result<Map2<SqrDiff, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
{
    map2(SqrDiff, a, b)
}

/// Elementwise `a * b + c`
#[inline]
pub fn mul_add<A, B, C>(a: A, b: B, c: C) -> Result<Map3<MulAdd, A, B, C>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    C: MatExpr<Elem = A::Elem>,
{
    map3(MulAdd, a, b, c)
}

/// Elementwise `-a`
#[inline]
pub fn neg<A: MatExpr>(a: A) -> Map1<Neg, A> {
    map1(Neg, a)
}

/// Elementwise `|a|`
#[inline]
pub fn abs<A: MatExpr>(a: A) -> Map1<Abs, A> {
    map1(Abs, a)
}

/// Elementwise `a^2`
#[inline]
pub fn sqr<A: MatExpr>(a: A) -> Map1<Sqr, A> {
    map1(Sqr, a)
}

/// Every element of `a` multiplied by `s`
#[inline]
pub fn scale<A: MatExpr>(a: A, s: A::Elem) -> Result<Map2<Mul, A, ConstExpr<A::Elem>>> {
    let c = ConstExpr::new(s, a.nrows(), a.ncols())?;
    map2(Mul, a, c)
}
