//! Element accessors
//!
//! An accessor is the read side of an expression bound for one evaluation
//! call. It supports two traversal orders:
//!
//! - linear: `scalar(i)` / `pack(i)` with `i` the column-major index
//! - per-column: `col_state(j)` once per column, then `col_scalar(&s, i)` /
//!   `col_pack(&s, i)` for every row `i` of that column
//!
//! Composite accessors nest, so the column state of a composite is the tuple
//! of the states of its parts.

mod cached;
mod dense;

pub use cached::{materialize, BufferReader, Cached, CachedState};
pub use dense::{DenseReader, DenseWriter};

use crate::traits::{Element, SimdVector};

/// Read access to the elements of an operand
pub trait Accessor {
    /// Element type
    type Elem: Element;

    /// Per-column token computed once per column
    type ColState;

    /// Element at column-major index `i`
    fn scalar(&self, i: usize) -> Self::Elem;

    /// Pack of `V::LANES` elements starting at column-major index `i`
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V;

    /// Token for column `j`
    fn col_state(&self, j: usize) -> Self::ColState;

    /// Element at row `i` of the column described by `state`
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> Self::Elem;

    /// Pack of `V::LANES` elements starting at row `i` of the column described by `state`
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, state: &Self::ColState, i: usize) -> V;
}

impl<A: Accessor + ?Sized> Accessor for &A {
    type Elem = A::Elem;
    type ColState = A::ColState;

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        (**self).scalar(i)
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        (**self).pack(i)
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::ColState {
        (**self).col_state(j)
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> Self::Elem {
        (**self).col_scalar(state, i)
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, state: &Self::ColState, i: usize) -> V {
        (**self).col_pack(state, i)
    }
}

/// One-dimensional indexed source consumed by the fold engine
pub trait LinearSource {
    /// Element type
    type Elem: Element;

    /// Element at index `i`
    fn scalar(&self, i: usize) -> Self::Elem;

    /// Pack of `V::LANES` elements starting at index `i`
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V;
}

impl<T: Element> LinearSource for [T] {
    type Elem = T;

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self[i]
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        V::from_slice(&self[i..])
    }
}

/// Linear traversal of a whole accessor
#[derive(Debug, Clone, Copy)]
pub struct Linear<'a, A: ?Sized>(pub &'a A);

impl<A: Accessor + ?Sized> LinearSource for Linear<'_, A> {
    type Elem = A::Elem;

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        self.0.scalar(i)
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        self.0.pack(i)
    }
}

/// Traversal of one column of an accessor, indexed by row
pub struct Column<'a, A: Accessor + ?Sized> {
    accessor: &'a A,
    state: A::ColState,
}

impl<'a, A: Accessor + ?Sized> Column<'a, A> {
    /// Bind column `j`; its state is computed here and nowhere else
    #[inline]
    pub fn new(accessor: &'a A, j: usize) -> Self {
        Self {
            accessor,
            state: accessor.col_state(j),
        }
    }
}

impl<A: Accessor + ?Sized> LinearSource for Column<'_, A> {
    type Elem = A::Elem;

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        self.accessor.col_scalar(&self.state, i)
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        self.accessor.col_pack(&self.state, i)
    }
}
