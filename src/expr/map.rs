//! Elementwise map expressions
//!
//! A map applies an elementwise function to one, two or three operands of the
//! same shape. Its accessors hold one sub-accessor per operand; the column
//! state is the tuple of the sub-states, so each operand derives its own state
//! exactly once per column.

use core::marker::PhantomData;

use super::{Capabilities, MatExpr};
use crate::access::Accessor;
use crate::error::Result;
use crate::functor::{BinaryFn, TernaryFn, UnaryFn};
use crate::policy::{AccessOrder, CostModel};
use crate::shape::{common_dim, dims_compatible};
use crate::traits::{Element, SimdVector};

/// Build-time rejection of operands whose static extents disagree
struct SameStaticShape<A, B>(PhantomData<(A, B)>);

impl<A: MatExpr, B: MatExpr> SameStaticShape<A, B> {
    const OK: () = assert!(
        dims_compatible(A::CT_ROWS, B::CT_ROWS) && dims_compatible(A::CT_COLS, B::CT_COLS),
        "operands of an elementwise map have different static shapes"
    );
}

fn composite_caps(parts: &[Capabilities], simd_fn: bool) -> Capabilities {
    Capabilities {
        linear: parts.iter().all(|c| c.linear),
        simd: simd_fn && parts.iter().all(|c| c.simd),
        dense: false,
        percol_contiguous: false,
        contiguous: false,
    }
}

/// `f(a)` elementwise
#[derive(Debug, Clone, Copy)]
pub struct Map1<F, A> {
    f: F,
    a: A,
}

/// `f(a, b)` elementwise
#[derive(Debug, Clone, Copy)]
pub struct Map2<F, A, B> {
    f: F,
    a: A,
    b: B,
}

/// `f(a, b, c)` elementwise
#[derive(Debug, Clone, Copy)]
pub struct Map3<F, A, B, C> {
    f: F,
    a: A,
    b: B,
    c: C,
}

/// Apply `f` to every element of `a`
pub fn map1<F, A>(f: F, a: A) -> Map1<F, A>
where
    A: MatExpr,
    F: UnaryFn<A::Elem>,
{
    Map1 { f, a }
}

/// Apply `f` to corresponding elements of `a` and `b`
///
/// Fails with `DimensionMismatch` when the runtime shapes differ; static
/// shapes that differ do not compile.
pub fn map2<F, A, B>(f: F, a: A, b: B) -> Result<Map2<F, A, B>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    F: BinaryFn<A::Elem>,
{
    #[allow(clippy::let_unit_value)]
    let () = SameStaticShape::<A, B>::OK;
    a.shape().expect_same(b.shape())?;
    Ok(Map2 { f, a, b })
}

/// Apply `f` to corresponding elements of `a`, `b` and `c`
pub fn map3<F, A, B, C>(f: F, a: A, b: B, c: C) -> Result<Map3<F, A, B, C>>
where
    A: MatExpr,
    B: MatExpr<Elem = A::Elem>,
    C: MatExpr<Elem = A::Elem>,
    F: TernaryFn<A::Elem>,
{
    #[allow(clippy::let_unit_value)]
    let () = SameStaticShape::<A, B>::OK;
    #[allow(clippy::let_unit_value)]
    let () = SameStaticShape::<A, C>::OK;
    a.shape().expect_same(b.shape())?;
    a.shape().expect_same(c.shape())?;
    Ok(Map3 { f, a, b, c })
}

/// Accessor of [`Map1`]
#[derive(Debug, Clone, Copy)]
pub struct MapReader1<F, RA> {
    f: F,
    a: RA,
}

/// Accessor of [`Map2`]
#[derive(Debug, Clone, Copy)]
pub struct MapReader2<F, RA, RB> {
    f: F,
    a: RA,
    b: RB,
}

/// Accessor of [`Map3`]
#[derive(Debug, Clone, Copy)]
pub struct MapReader3<F, RA, RB, RC> {
    f: F,
    a: RA,
    b: RB,
    c: RC,
}

impl<T, F, RA> Accessor for MapReader1<F, RA>
where
    T: Element,
    F: UnaryFn<T>,
    RA: Accessor<Elem = T>,
{
    type Elem = T;
    type ColState = RA::ColState;

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self.f.apply(self.a.scalar(i))
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        self.f.apply_pack(self.a.pack::<V>(i))
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::ColState {
        self.a.col_state(j)
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> T {
        self.f.apply(self.a.col_scalar(state, i))
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, state: &Self::ColState, i: usize) -> V {
        self.f.apply_pack(self.a.col_pack::<V>(state, i))
    }
}

impl<T, F, RA, RB> Accessor for MapReader2<F, RA, RB>
where
    T: Element,
    F: BinaryFn<T>,
    RA: Accessor<Elem = T>,
    RB: Accessor<Elem = T>,
{
    type Elem = T;
    type ColState = (RA::ColState, RB::ColState);

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self.f.apply(self.a.scalar(i), self.b.scalar(i))
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        self.f
            .apply_pack(self.a.pack::<V>(i), self.b.pack::<V>(i))
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::ColState {
        (self.a.col_state(j), self.b.col_state(j))
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> T {
        self.f
            .apply(self.a.col_scalar(&state.0, i), self.b.col_scalar(&state.1, i))
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, state: &Self::ColState, i: usize) -> V {
        self.f.apply_pack(
            self.a.col_pack::<V>(&state.0, i),
            self.b.col_pack::<V>(&state.1, i),
        )
    }
}

impl<T, F, RA, RB, RC> Accessor for MapReader3<F, RA, RB, RC>
where
    T: Element,
    F: TernaryFn<T>,
    RA: Accessor<Elem = T>,
    RB: Accessor<Elem = T>,
    RC: Accessor<Elem = T>,
{
    type Elem = T;
    type ColState = (RA::ColState, RB::ColState, RC::ColState);

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self.f
            .apply(self.a.scalar(i), self.b.scalar(i), self.c.scalar(i))
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        self.f.apply_pack(
            self.a.pack::<V>(i),
            self.b.pack::<V>(i),
            self.c.pack::<V>(i),
        )
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::ColState {
        (
            self.a.col_state(j),
            self.b.col_state(j),
            self.c.col_state(j),
        )
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> T {
        self.f.apply(
            self.a.col_scalar(&state.0, i),
            self.b.col_scalar(&state.1, i),
            self.c.col_scalar(&state.2, i),
        )
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, state: &Self::ColState, i: usize) -> V {
        self.f.apply_pack(
            self.a.col_pack::<V>(&state.0, i),
            self.b.col_pack::<V>(&state.1, i),
            self.c.col_pack::<V>(&state.2, i),
        )
    }
}

impl<T, F, A> MatExpr for Map1<F, A>
where
    T: Element,
    F: UnaryFn<T>,
    A: MatExpr<Elem = T>,
{
    type Elem = T;
    type Native<'a> = MapReader1<F, A::Native<'a>> where Self: 'a;
    type Reader<'a> = MapReader1<F, A::Reader<'a>> where Self: 'a;

    const CT_ROWS: usize = A::CT_ROWS;
    const CT_COLS: usize = A::CT_COLS;

    #[inline]
    fn nrows(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.a.ncols()
    }

    fn caps(&self) -> Capabilities {
        composite_caps(&[self.a.caps()], F::SIMD)
    }

    fn is_direct(&self, order: AccessOrder) -> bool {
        self.a.is_direct(order)
    }

    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        self.a.access_cost(order, model)
    }

    fn simd_ready(&self, order: AccessOrder) -> bool {
        F::SIMD && self.a.simd_ready(order)
    }

    fn native(&self) -> Self::Native<'_> {
        MapReader1 {
            f: self.f,
            a: self.a.native(),
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        MapReader1 {
            f: self.f,
            a: self.a.reader(order),
        }
    }
}

impl<T, F, A, B> MatExpr for Map2<F, A, B>
where
    T: Element,
    F: BinaryFn<T>,
    A: MatExpr<Elem = T>,
    B: MatExpr<Elem = T>,
{
    type Elem = T;
    type Native<'a> = MapReader2<F, A::Native<'a>, B::Native<'a>> where Self: 'a;
    type Reader<'a> = MapReader2<F, A::Reader<'a>, B::Reader<'a>> where Self: 'a;

    const CT_ROWS: usize = common_dim(A::CT_ROWS, B::CT_ROWS);
    const CT_COLS: usize = common_dim(A::CT_COLS, B::CT_COLS);

    #[inline]
    fn nrows(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.a.ncols()
    }

    fn caps(&self) -> Capabilities {
        composite_caps(&[self.a.caps(), self.b.caps()], F::SIMD)
    }

    fn is_direct(&self, order: AccessOrder) -> bool {
        self.a.is_direct(order) && self.b.is_direct(order)
    }

    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        self.a.access_cost(order, model) + self.b.access_cost(order, model)
    }

    fn simd_ready(&self, order: AccessOrder) -> bool {
        F::SIMD && self.a.simd_ready(order) && self.b.simd_ready(order)
    }

    fn native(&self) -> Self::Native<'_> {
        MapReader2 {
            f: self.f,
            a: self.a.native(),
            b: self.b.native(),
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        MapReader2 {
            f: self.f,
            a: self.a.reader(order),
            b: self.b.reader(order),
        }
    }
}

impl<T, F, A, B, C> MatExpr for Map3<F, A, B, C>
where
    T: Element,
    F: TernaryFn<T>,
    A: MatExpr<Elem = T>,
    B: MatExpr<Elem = T>,
    C: MatExpr<Elem = T>,
{
    type Elem = T;
    type Native<'a> = MapReader3<F, A::Native<'a>, B::Native<'a>, C::Native<'a>> where Self: 'a;
    type Reader<'a> = MapReader3<F, A::Reader<'a>, B::Reader<'a>, C::Reader<'a>> where Self: 'a;

    const CT_ROWS: usize = common_dim(common_dim(A::CT_ROWS, B::CT_ROWS), C::CT_ROWS);
    const CT_COLS: usize = common_dim(common_dim(A::CT_COLS, B::CT_COLS), C::CT_COLS);

    #[inline]
    fn nrows(&self) -> usize {
        self.a.nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.a.ncols()
    }

    fn caps(&self) -> Capabilities {
        composite_caps(&[self.a.caps(), self.b.caps(), self.c.caps()], F::SIMD)
    }

    fn is_direct(&self, order: AccessOrder) -> bool {
        self.a.is_direct(order) && self.b.is_direct(order) && self.c.is_direct(order)
    }

    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        self.a.access_cost(order, model)
            + self.b.access_cost(order, model)
            + self.c.access_cost(order, model)
    }

    fn simd_ready(&self, order: AccessOrder) -> bool {
        F::SIMD
            && self.a.simd_ready(order)
            && self.b.simd_ready(order)
            && self.c.simd_ready(order)
    }

    fn native(&self) -> Self::Native<'_> {
        MapReader3 {
            f: self.f,
            a: self.a.native(),
            b: self.b.native(),
            c: self.c.native(),
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        MapReader3 {
            f: self.f,
            a: self.a.reader(order),
            b: self.b.reader(order),
            c: self.c.reader(order),
        }
    }
}
