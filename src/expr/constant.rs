use super::{Capabilities, MatExpr};
use crate::access::Accessor;
use crate::error::Result;
use crate::policy::{AccessOrder, CostModel};
use crate::shape::checked_nelems;
use crate::traits::{Element, SimdVector};

/// Matrix whose every element is the same value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstExpr<T> {
    value: T,
    rows: usize,
    cols: usize,
}

impl<T: Element> ConstExpr<T> {
    /// `rows x cols` matrix filled with `value`
    ///
    /// Fails when `rows * cols` does not fit in `usize`.
    pub fn new(value: T, rows: usize, cols: usize) -> Result<Self> {
        checked_nelems(rows, cols)?;
        Ok(Self { value, rows, cols })
    }

    /// The repeated value
    pub fn value(&self) -> T {
        self.value
    }
}

/// Accessor of [`ConstExpr`]
#[derive(Debug, Clone, Copy)]
pub struct ConstReader<T> {
    value: T,
}

impl<T: Element> Accessor for ConstReader<T> {
    type Elem = T;
    type ColState = ();

    #[inline(always)]
    fn scalar(&self, _i: usize) -> T {
        self.value
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, _i: usize) -> V {
        V::splat(self.value)
    }

    #[inline(always)]
    fn col_state(&self, _j: usize) {}

    #[inline(always)]
    fn col_scalar(&self, _state: &(), _i: usize) -> T {
        self.value
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, _state: &(), _i: usize) -> V {
        V::splat(self.value)
    }
}

impl<T: Element> MatExpr for ConstExpr<T> {
    type Elem = T;
    type Native<'a> = ConstReader<T>;
    type Reader<'a> = ConstReader<T>;

    fn nrows(&self) -> usize {
        self.rows
    }

    fn ncols(&self) -> usize {
        self.cols
    }

    fn caps(&self) -> Capabilities {
        Capabilities {
            linear: true,
            simd: true,
            dense: false,
            percol_contiguous: true,
            contiguous: true,
        }
    }

    fn is_direct(&self, _order: AccessOrder) -> bool {
        true
    }

    fn access_cost(&self, _order: AccessOrder, _model: &CostModel) -> u32 {
        0
    }

    fn simd_ready(&self, _order: AccessOrder) -> bool {
        true
    }

    fn native(&self) -> ConstReader<T> {
        ConstReader { value: self.value }
    }

    fn reader(&self, _order: AccessOrder) -> ConstReader<T> {
        self.native()
    }
}
