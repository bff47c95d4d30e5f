//! Matrix expressions
//!
//! [`MatExpr`] is the facade every operand implements: dense storage,
//! constants, repeated vectors, transposes and elementwise maps over other
//! expressions. It reports shape and capabilities, prices each traversal
//! order for the policy selector, and hands out accessors.
//!
//! [`MatDest`] is the write side: anything an expression can be evaluated into.

mod constant;
mod map;
mod repeat;
mod transpose;

pub use constant::{ConstExpr, ConstReader};
pub use map::{map1, map2, map3, Map1, Map2, Map3, MapReader1, MapReader2, MapReader3};
pub use repeat::{RepeatCol, RepeatColReader, RepeatRow, RepeatRowReader};
pub use transpose::{Transpose, TransposeReader};

use crate::access::{materialize, Accessor, Cached, DenseWriter};
use crate::policy::{AccessOrder, CostModel};
use crate::shape::{Layout, Shape, DYN};
use crate::traits::Element;

/// Access capabilities of an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Elements can be addressed by column-major index
    pub linear: bool,
    /// Packs can be read without a gather
    pub simd: bool,
    /// Elements live in memory and need no computation
    pub dense: bool,
    /// The elements of every column are adjacent
    pub percol_contiguous: bool,
    /// The whole operand is one packed column-major run
    pub contiguous: bool,
}

impl Capabilities {
    /// Capabilities of a strided memory region
    pub const fn of_layout(layout: &Layout) -> Self {
        Self {
            linear: layout.linear_step().is_some(),
            simd: true,
            dense: true,
            percol_contiguous: layout.is_percol_contiguous(),
            contiguous: layout.is_contiguous(),
        }
    }

    /// Whether the operand can be read in `order` without materializing it
    pub const fn is_direct(&self, order: AccessOrder) -> bool {
        match order {
            AccessOrder::Linear => self.dense && self.linear,
            AccessOrder::PerColumn => self.dense,
        }
    }

    /// Whether packs can be loaded directly in `order`
    pub const fn is_contiguous_in(&self, order: AccessOrder) -> bool {
        self.simd
            && match order {
                AccessOrder::Linear => self.contiguous,
                AccessOrder::PerColumn => self.percol_contiguous,
            }
    }
}

/// Matrix-valued expression
///
/// Implementors are immutable for the duration of an evaluation call and are
/// only ever borrowed by it.
pub trait MatExpr {
    /// Element type
    type Elem: Element;

    /// Accessor reading the operand in place, valid in both orders
    type Native<'a>: Accessor<Elem = Self::Elem>
    where
        Self: 'a;

    /// Accessor used by evaluation, possibly backed by a materialized copy
    type Reader<'a>: Accessor<Elem = Self::Elem>
    where
        Self: 'a;

    /// Static row count, or [`DYN`]
    const CT_ROWS: usize = DYN;

    /// Static column count, or [`DYN`]
    const CT_COLS: usize = DYN;

    /// Runtime row count
    fn nrows(&self) -> usize;

    /// Runtime column count
    fn ncols(&self) -> usize;

    /// Runtime extents
    fn shape(&self) -> Shape {
        Shape::new(self.nrows(), self.ncols())
    }

    /// Total number of elements
    fn nelems(&self) -> usize {
        self.nrows() * self.ncols()
    }

    /// Access capabilities
    fn caps(&self) -> Capabilities;

    /// Whether `reader(order)` reads in place
    fn is_direct(&self, order: AccessOrder) -> bool {
        self.caps().is_direct(order)
    }

    /// Cost of reading the operand in `order`: zero when direct, a cache otherwise
    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        if self.is_direct(order) {
            0
        } else {
            model.cache_cost
        }
    }

    /// Whether `reader(order)` serves packs without gathers
    ///
    /// Materialized operands are always contiguous.
    fn simd_ready(&self, order: AccessOrder) -> bool {
        !self.is_direct(order) || self.caps().is_contiguous_in(order)
    }

    /// Accessor over the operand itself
    fn native(&self) -> Self::Native<'_>;

    /// Accessor for an evaluation traversing in `order`
    fn reader(&self, order: AccessOrder) -> Self::Reader<'_>;
}

/// Reader that is direct when the operand allows it in `order`, cached otherwise
pub(crate) fn leaf_reader<E: MatExpr + ?Sized>(
    expr: &E,
    order: AccessOrder,
) -> Cached<E::Native<'_>> {
    if expr.is_direct(order) {
        Cached::Direct(expr.native())
    } else {
        Cached::Buffered(materialize(expr))
    }
}

impl<'e, E: MatExpr> MatExpr for &'e E {
    type Elem = E::Elem;
    type Native<'a> = E::Native<'a> where Self: 'a;
    type Reader<'a> = E::Reader<'a> where Self: 'a;

    const CT_ROWS: usize = E::CT_ROWS;
    const CT_COLS: usize = E::CT_COLS;

    #[inline]
    fn nrows(&self) -> usize {
        (**self).nrows()
    }

    #[inline]
    fn ncols(&self) -> usize {
        (**self).ncols()
    }

    #[inline]
    fn caps(&self) -> Capabilities {
        (**self).caps()
    }

    #[inline]
    fn is_direct(&self, order: AccessOrder) -> bool {
        (**self).is_direct(order)
    }

    #[inline]
    fn access_cost(&self, order: AccessOrder, model: &CostModel) -> u32 {
        (**self).access_cost(order, model)
    }

    #[inline]
    fn simd_ready(&self, order: AccessOrder) -> bool {
        (**self).simd_ready(order)
    }

    #[inline]
    fn native(&self) -> Self::Native<'_> {
        (**self).native()
    }

    #[inline]
    fn reader(&self, order: AccessOrder) -> Self::Reader<'_> {
        (**self).reader(order)
    }
}

/// Destination of an evaluation
pub trait MatDest {
    /// Element type
    type Elem: Element;

    /// Static row count, or [`DYN`]
    const CT_ROWS: usize = DYN;

    /// Static column count, or [`DYN`]
    const CT_COLS: usize = DYN;

    /// Placement of the destination region
    fn layout(&self) -> Layout;

    /// Writer over the destination region
    fn writer(&mut self) -> DenseWriter<'_, Self::Elem>;

    /// Runtime extents
    fn shape(&self) -> Shape {
        self.layout().shape()
    }

    /// Whether the destination can be written by column-major index
    fn supports_linear(&self) -> bool {
        self.layout().linear_step().is_some()
    }

    /// Whether packs can be stored directly in `order`
    fn simd_ready(&self, order: AccessOrder) -> bool {
        Capabilities::of_layout(&self.layout()).is_contiguous_in(order)
    }
}

impl<D: MatDest> MatDest for &mut D {
    type Elem = D::Elem;

    const CT_ROWS: usize = D::CT_ROWS;
    const CT_COLS: usize = D::CT_COLS;

    fn layout(&self) -> Layout {
        (**self).layout()
    }

    fn writer(&mut self) -> DenseWriter<'_, Self::Elem> {
        (**self).writer()
    }
}
