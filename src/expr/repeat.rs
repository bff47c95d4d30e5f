//! Vectors repeated across a matrix
//!
//! Both operands are cheap per column but have no linear representation:
//! a linear traversal materializes them, a per-column traversal reads the
//! underlying vector directly.

use super::{leaf_reader, Capabilities, MatExpr};
use crate::access::{Accessor, Cached};
use crate::error::{Error, Result};
use crate::policy::{AccessOrder, CostModel};
use crate::shape::checked_nelems;
use crate::traits::SimdVector;

/// Column vector `v` repeated as every column of an `m x n` matrix
#[derive(Debug, Clone, Copy)]
pub struct RepeatCol<E> {
    inner: E,
    cols: usize,
}

impl<E: MatExpr> RepeatCol<E> {
    /// Repeat the `m x 1` operand `inner` `cols` times
    pub fn new(inner: E, cols: usize) -> Result<Self> {
        if inner.ncols() != 1 {
            return Err(Error::InvalidArgument(format!(
                "repeated column must be m x 1, got {}x{}",
                inner.nrows(),
                inner.ncols()
            )));
        }
        checked_nelems(inner.nrows(), cols)?;
        Ok(Self { inner, cols })
    }
}

/// Accessor of [`RepeatCol`]
#[derive(Debug, Clone, Copy)]
pub struct RepeatColReader<R> {
    inner: R,
    rows: usize,
}

impl<R: Accessor> Accessor for RepeatColReader<R> {
    type Elem = R::Elem;
    type ColState = ();

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        self.inner.scalar(i % self.rows)
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        V::gather(|k| self.scalar(i + k))
    }

    #[inline(always)]
    fn col_state(&self, _j: usize) {}

    #[inline(always)]
    fn col_scalar(&self, _state: &(), i: usize) -> Self::Elem {
        self.inner.scalar(i)
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, _state: &(), i: usize) -> V {
        self.inner.pack(i)
    }
}

impl<E: MatExpr> MatExpr for RepeatCol<E> {
    type Elem = E::Elem;
    type Native<'a> = RepeatColReader<E::Reader<'a>> where Self: 'a;
    type Reader<'a> = Cached<RepeatColReader<E::Reader<'a>>> where Self: 'a;

    const CT_ROWS: usize = E::CT_ROWS;

    fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    fn caps(&self) -> Capabilities {
        Capabilities {
            linear: true,
            simd: self.inner.caps().simd,
            dense: false,
            percol_contiguous: false,
            contiguous: false,
        }
    }

    fn is_direct(&self, order: AccessOrder) -> bool {
        order == AccessOrder::PerColumn
    }

    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        match order {
            AccessOrder::Linear => model.cache_cost,
            AccessOrder::PerColumn => self.inner.access_cost(AccessOrder::Linear, model),
        }
    }

    fn simd_ready(&self, order: AccessOrder) -> bool {
        match order {
            AccessOrder::Linear => true,
            AccessOrder::PerColumn => self.inner.simd_ready(AccessOrder::Linear),
        }
    }

    fn native(&self) -> Self::Native<'_> {
        RepeatColReader {
            inner: self.inner.reader(AccessOrder::Linear),
            rows: self.inner.nrows(),
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        leaf_reader(self, order)
    }
}

/// Row vector `v` repeated as every row of an `m x n` matrix
#[derive(Debug, Clone, Copy)]
pub struct RepeatRow<E> {
    inner: E,
    rows: usize,
}

impl<E: MatExpr> RepeatRow<E> {
    /// Repeat the `1 x n` operand `inner` `rows` times
    pub fn new(inner: E, rows: usize) -> Result<Self> {
        if inner.nrows() != 1 {
            return Err(Error::InvalidArgument(format!(
                "repeated row must be 1 x n, got {}x{}",
                inner.nrows(),
                inner.ncols()
            )));
        }
        checked_nelems(rows, inner.ncols())?;
        Ok(Self { inner, rows })
    }
}

/// Accessor of [`RepeatRow`]
///
/// The column state is the row element of that column.
#[derive(Debug, Clone, Copy)]
pub struct RepeatRowReader<R> {
    inner: R,
    rows: usize,
}

impl<R: Accessor> Accessor for RepeatRowReader<R> {
    type Elem = R::Elem;
    type ColState = R::Elem;

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        self.inner.scalar(i / self.rows)
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        V::gather(|k| self.scalar(i + k))
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::Elem {
        self.inner.scalar(j)
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::Elem, _i: usize) -> Self::Elem {
        *state
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, state: &Self::Elem, _i: usize) -> V {
        V::splat(*state)
    }
}

impl<E: MatExpr> MatExpr for RepeatRow<E> {
    type Elem = E::Elem;
    type Native<'a> = RepeatRowReader<E::Reader<'a>> where Self: 'a;
    type Reader<'a> = Cached<RepeatRowReader<E::Reader<'a>>> where Self: 'a;

    const CT_COLS: usize = E::CT_COLS;

    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    fn caps(&self) -> Capabilities {
        Capabilities {
            linear: true,
            simd: true,
            dense: false,
            percol_contiguous: false,
            contiguous: false,
        }
    }

    fn is_direct(&self, order: AccessOrder) -> bool {
        order == AccessOrder::PerColumn
    }

    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        match order {
            AccessOrder::Linear => model.cache_cost,
            AccessOrder::PerColumn => self.inner.access_cost(AccessOrder::Linear, model),
        }
    }

    fn simd_ready(&self, _order: AccessOrder) -> bool {
        true
    }

    fn native(&self) -> Self::Native<'_> {
        RepeatRowReader {
            inner: self.inner.reader(AccessOrder::Linear),
            rows: self.rows,
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        leaf_reader(self, order)
    }
}
