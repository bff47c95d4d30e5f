//! Zero-copy readers and writers over strided slices

use super::Accessor;
use crate::shape::Layout;
use crate::traits::{Element, SimdVector};

/// Reader over a strided region of a slice
///
/// Linear indices are mapped through the uniform linear step when the region
/// has one and through `(i % rows, i / rows)` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct DenseReader<'a, T> {
    data: &'a [T],
    layout: Layout,
    step: Option<usize>,
}

impl<'a, T: Element> DenseReader<'a, T> {
    /// The layout must already be validated against `data`
    #[inline]
    pub(crate) fn new(data: &'a [T], layout: Layout) -> Self {
        Self {
            data,
            layout,
            step: layout.linear_step(),
        }
    }

    /// Layout of the region
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline(always)]
    fn linear_offset(&self, i: usize) -> usize {
        match self.step {
            Some(step) => i * step,
            None => self.layout.offset(i % self.layout.rows, i / self.layout.rows),
        }
    }
}

impl<T: Element> Accessor for DenseReader<'_, T> {
    type Elem = T;
    type ColState = usize;

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self.data[self.linear_offset(i)]
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        if self.step == Some(1) {
            V::from_slice(&self.data[i..])
        } else {
            V::gather(|k| self.scalar(i + k))
        }
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> usize {
        j * self.layout.col_stride
    }

    #[inline(always)]
    fn col_scalar(&self, state: &usize, i: usize) -> T {
        self.data[*state + i * self.layout.row_stride]
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, state: &usize, i: usize) -> V {
        if self.layout.row_stride == 1 {
            V::from_slice(&self.data[*state + i..])
        } else {
            V::gather(|k| self.col_scalar(state, i + k))
        }
    }
}

/// Writer over a strided region of a mutable slice
#[derive(Debug)]
pub struct DenseWriter<'a, T> {
    data: &'a mut [T],
    layout: Layout,
    step: Option<usize>,
}

impl<'a, T: Element> DenseWriter<'a, T> {
    /// The layout must already be validated against `data`
    #[inline]
    pub(crate) fn new(data: &'a mut [T], layout: Layout) -> Self {
        Self {
            data,
            layout,
            step: layout.linear_step(),
        }
    }

    /// Layout of the region
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline(always)]
    fn linear_offset(&self, i: usize) -> usize {
        match self.step {
            Some(step) => i * step,
            None => self.layout.offset(i % self.layout.rows, i / self.layout.rows),
        }
    }

    /// Store `value` at column-major index `i`
    #[inline(always)]
    pub fn set(&mut self, i: usize, value: T) {
        let offset = self.linear_offset(i);
        self.data[offset] = value;
    }

    /// Store a pack at column-major indices `i..i + V::LANES`
    #[inline(always)]
    pub fn set_pack<V: SimdVector<Scalar = T>>(&mut self, i: usize, value: V) {
        if self.step == Some(1) {
            value.to_slice(&mut self.data[i..]);
        } else {
            value.scatter(|k, x| self.set(i + k, x));
        }
    }

    /// Token for column `j`
    #[inline(always)]
    pub fn col_state(&self, j: usize) -> usize {
        j * self.layout.col_stride
    }

    /// Store `value` at row `i` of the column described by `state`
    #[inline(always)]
    pub fn col_set(&mut self, state: &usize, i: usize, value: T) {
        self.data[*state + i * self.layout.row_stride] = value;
    }

    /// Store a pack at rows `i..i + V::LANES` of the column described by `state`
    #[inline(always)]
    pub fn col_set_pack<V: SimdVector<Scalar = T>>(&mut self, state: &usize, i: usize, value: V) {
        if self.layout.row_stride == 1 {
            value.to_slice(&mut self.data[*state + i..]);
        } else {
            value.scatter(|k, x| self.col_set(state, i + k, x));
        }
    }
}
