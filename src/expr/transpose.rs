use super::{leaf_reader, Capabilities, MatExpr};
use crate::access::{Accessor, Cached};
use crate::policy::AccessOrder;
use crate::traits::SimdVector;

/// Transpose of an operand
///
/// Never read in place by an evaluation: both orders materialize it first.
#[derive(Debug, Clone, Copy)]
pub struct Transpose<E> {
    inner: E,
}

impl<E: MatExpr> Transpose<E> {
    /// `inner` with rows and columns swapped
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

/// Accessor of [`Transpose`]
///
/// Column `j` of the transpose is row `j` of the operand, so every element is
/// a gather through the operand's column states.
#[derive(Debug, Clone, Copy)]
pub struct TransposeReader<R> {
    inner: R,
    rows: usize,
}

impl<R: Accessor> Accessor for TransposeReader<R> {
    type Elem = R::Elem;
    type ColState = usize;

    #[inline]
    fn scalar(&self, i: usize) -> Self::Elem {
        self.col_scalar(&(i / self.rows), i % self.rows)
    }

    #[inline]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        V::gather(|k| self.scalar(i + k))
    }

    #[inline]
    fn col_state(&self, j: usize) -> usize {
        j
    }

    #[inline]
    fn col_scalar(&self, state: &usize, i: usize) -> Self::Elem {
        let s = self.inner.col_state(i);
        self.inner.col_scalar(&s, *state)
    }

    #[inline]
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, state: &usize, i: usize) -> V {
        V::gather(|k| self.col_scalar(state, i + k))
    }
}

impl<E: MatExpr> MatExpr for Transpose<E> {
    type Elem = E::Elem;
    type Native<'a> = TransposeReader<E::Native<'a>> where Self: 'a;
    type Reader<'a> = Cached<TransposeReader<E::Native<'a>>> where Self: 'a;

    const CT_ROWS: usize = E::CT_COLS;
    const CT_COLS: usize = E::CT_ROWS;

    fn nrows(&self) -> usize {
        self.inner.ncols()
    }

    fn ncols(&self) -> usize {
        self.inner.nrows()
    }

    fn caps(&self) -> Capabilities {
        Capabilities {
            linear: true,
            ..Capabilities::default()
        }
    }

    fn native(&self) -> Self::Native<'_> {
        TransposeReader {
            inner: self.inner.native(),
            rows: self.nrows(),
        }
    }

    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        leaf_reader(self, order)
    }
}
