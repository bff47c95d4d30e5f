//! Materialized operands
//!
//! An operand that cannot be read directly in the chosen order is copied once,
//! column by column through its native accessor, into a packed column-major
//! buffer. All reads of the evaluation call then go to that buffer.

use super::Accessor;
use crate::expr::MatExpr;
use crate::traits::{Element, SimdVector};

/// Reader over an owned packed column-major buffer
#[derive(Debug, Clone)]
pub struct BufferReader<T> {
    buf: Vec<T>,
    rows: usize,
}

impl<T> BufferReader<T> {
    /// Buffered elements in column-major order
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }
}

impl<T: Element> Accessor for BufferReader<T> {
    type Elem = T;
    type ColState = usize;

    #[inline(always)]
    fn scalar(&self, i: usize) -> T {
        self.buf[i]
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = T>>(&self, i: usize) -> V {
        V::from_slice(&self.buf[i..])
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> usize {
        j * self.rows
    }

    #[inline(always)]
    fn col_scalar(&self, state: &usize, i: usize) -> T {
        self.buf[*state + i]
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = T>>(&self, state: &usize, i: usize) -> V {
        V::from_slice(&self.buf[*state + i..])
    }
}

/// Copy an operand into a packed column-major buffer of its exact shape
pub fn materialize<E: MatExpr + ?Sized>(expr: &E) -> BufferReader<E::Elem> {
    let rows = expr.nrows();
    let cols = expr.ncols();
    tracing::debug!(rows, cols, "materializing operand into cache buffer");

    let native = expr.native();
    let mut buf = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        let state = native.col_state(j);
        for i in 0..rows {
            buf.push(native.col_scalar(&state, i));
        }
    }
    BufferReader { buf, rows }
}

/// Reader that is either the operand itself or its materialized copy
///
/// The variant is fixed when the reader is built, once per evaluation call.
#[derive(Debug, Clone)]
pub enum Cached<A: Accessor> {
    /// Direct reads from the operand
    Direct(A),
    /// Reads from a buffer filled before evaluation started
    Buffered(BufferReader<A::Elem>),
}

/// Column state of a [`Cached`] reader
#[derive(Debug, Clone, Copy)]
pub enum CachedState<S> {
    /// State of the direct reader
    Direct(S),
    /// Column offset into the buffer
    Buffered(usize),
}

impl<A: Accessor> Cached<A> {
    /// Whether reads go to a materialized buffer
    pub fn is_buffered(&self) -> bool {
        matches!(self, Cached::Buffered(_))
    }
}

impl<A: Accessor> Accessor for Cached<A> {
    type Elem = A::Elem;
    type ColState = CachedState<A::ColState>;

    #[inline(always)]
    fn scalar(&self, i: usize) -> Self::Elem {
        match self {
            Cached::Direct(a) => a.scalar(i),
            Cached::Buffered(b) => b.scalar(i),
        }
    }

    #[inline(always)]
    fn pack<V: SimdVector<Scalar = Self::Elem>>(&self, i: usize) -> V {
        match self {
            Cached::Direct(a) => a.pack(i),
            Cached::Buffered(b) => b.pack(i),
        }
    }

    #[inline(always)]
    fn col_state(&self, j: usize) -> Self::ColState {
        match self {
            Cached::Direct(a) => CachedState::Direct(a.col_state(j)),
            Cached::Buffered(b) => CachedState::Buffered(b.col_state(j)),
        }
    }

    #[inline(always)]
    fn col_scalar(&self, state: &Self::ColState, i: usize) -> Self::Elem {
        match (self, state) {
            (Cached::Direct(a), CachedState::Direct(s)) => a.col_scalar(s, i),
            (Cached::Buffered(b), CachedState::Buffered(s)) => b.col_scalar(s, i),
            _ => unreachable!("column state from a different reader"),
        }
    }

    #[inline(always)]
    fn col_pack<V: SimdVector<Scalar = Self::Elem>>(&self, state: &Self::ColState, i: usize) -> V {
        match (self, state) {
            (Cached::Direct(a), CachedState::Direct(s)) => a.col_pack(s, i),
            (Cached::Buffered(b), CachedState::Buffered(s)) => b.col_pack(s, i),
            _ => unreachable!("column state from a different reader"),
        }
    }
}
