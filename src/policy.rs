//! Evaluation policy selection
//!
//! Every evaluation or reduction call picks one traversal order (linear or
//! per-column) and one access mode (scalar or SIMD packs) before touching any
//! element. The order is chosen by comparing integer costs; the access mode by
//! a set of capability checks. No runtime search or measurement is involved:
//! the same expression type, shape and CPU always produce the same policy.
//!
//! # Cost model
//!
//! - an operand costs 0 in an order it can be read in place, `cache_cost`
//!   when it must be materialized first
//! - a composite costs the sum of its operands
//! - per-column traversal pays `short_column_penalty` extra when columns are
//!   shorter than `short_column_bound`
//! - linear traversal wins ties

use crate::dispatch::simd_available;
use crate::expr::{MatDest, MatExpr};
use crate::shape::DYN;
use crate::traits::{Element, SimdVector};

/// Traversal order of an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOrder {
    /// One loop over column-major indices
    Linear,
    /// Outer loop over columns, inner loop over rows
    PerColumn,
}

/// Traversal order plus access mode, fixed for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    /// Linear order, one element at a time
    LinearScalar,
    /// Linear order, whole packs
    LinearSimd,
    /// Per-column order, one element at a time
    PerColumnScalar,
    /// Per-column order, packs within each column
    PerColumnSimd,
}

impl AccessPolicy {
    /// Combine an order and an access mode
    pub const fn new(order: AccessOrder, simd: bool) -> Self {
        match (order, simd) {
            (AccessOrder::Linear, false) => AccessPolicy::LinearScalar,
            (AccessOrder::Linear, true) => AccessPolicy::LinearSimd,
            (AccessOrder::PerColumn, false) => AccessPolicy::PerColumnScalar,
            (AccessOrder::PerColumn, true) => AccessPolicy::PerColumnSimd,
        }
    }

    /// Traversal order
    pub const fn order(self) -> AccessOrder {
        match self {
            AccessPolicy::LinearScalar | AccessPolicy::LinearSimd => AccessOrder::Linear,
            AccessPolicy::PerColumnScalar | AccessPolicy::PerColumnSimd => AccessOrder::PerColumn,
        }
    }

    /// Whether the policy reads whole packs
    pub const fn uses_simd(self) -> bool {
        matches!(self, AccessPolicy::LinearSimd | AccessPolicy::PerColumnSimd)
    }

    /// Get policy name as string
    pub const fn name(self) -> &'static str {
        match self {
            AccessPolicy::LinearScalar => "linear-scalar",
            AccessPolicy::LinearSimd => "linear-simd",
            AccessPolicy::PerColumnScalar => "percol-scalar",
            AccessPolicy::PerColumnSimd => "percol-simd",
        }
    }
}

/// Integer cost constants of policy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Cost of materializing an operand before evaluation
    pub cache_cost: u32,
    /// Extra per-column cost when columns are short
    pub short_column_penalty: u32,
    /// Columns with fewer rows than this are short
    pub short_column_bound: usize,
}

impl CostModel {
    /// Default constants
    pub const DEFAULT: CostModel = CostModel {
        cache_cost: 1200,
        short_column_penalty: 100,
        short_column_bound: 4,
    };

    /// Cost of a linear traversal of `expr`
    pub fn linear_cost<E: MatExpr + ?Sized>(&self, expr: &E) -> u32 {
        expr.access_cost(AccessOrder::Linear, self)
    }

    /// Cost of a per-column traversal of `expr`, short-column penalty included
    ///
    /// The static row count decides shortness when known, the runtime one otherwise.
    pub fn percol_cost<E: MatExpr + ?Sized>(&self, expr: &E) -> u32 {
        let rows = if E::CT_ROWS != DYN {
            E::CT_ROWS
        } else {
            expr.nrows()
        };
        let mut cost = expr.access_cost(AccessOrder::PerColumn, self);
        if rows < self.short_column_bound {
            cost += self.short_column_penalty;
        }
        cost
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of policy selection, with the costs that decided the order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    /// Selected policy
    pub policy: AccessPolicy,
    /// Cost of the linear order
    pub linear_cost: u32,
    /// Cost of the per-column order
    pub percol_cost: u32,
}

/// Write-side constraints of a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Target {
    pub linear: bool,
    pub simd_linear: bool,
    pub simd_percol: bool,
    /// Whether SIMD loops need lengths that are whole multiples of the pack width
    pub whole_packs: bool,
}

impl Target {
    /// Constraints of writing into `dst`
    pub(crate) fn dest<D: MatDest + ?Sized>(dst: &D) -> Self {
        Self {
            linear: dst.supports_linear(),
            simd_linear: dst.simd_ready(AccessOrder::Linear),
            simd_percol: dst.simd_ready(AccessOrder::PerColumn),
            whole_packs: true,
        }
    }

    /// Reductions write nothing and own a scalar tail
    pub(crate) const FOLD: Target = Target {
        linear: true,
        simd_linear: true,
        simd_percol: true,
        whole_packs: false,
    };

    fn simd_ready(&self, order: AccessOrder) -> bool {
        match order {
            AccessOrder::Linear => self.simd_linear,
            AccessOrder::PerColumn => self.simd_percol,
        }
    }
}

/// Why SIMD is unavailable for `expr` in `order`, or `None` when it is available
pub(crate) fn simd_blocker<V, E>(
    expr: &E,
    order: AccessOrder,
    target: &Target,
    kernel_simd: bool,
) -> Option<&'static str>
where
    E: MatExpr + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    if !<E::Elem as Element>::VECTORIZABLE {
        return Some("element type is not vectorizable");
    }
    if !kernel_simd {
        return Some("kernel is scalar-only");
    }
    if !simd_available() {
        return Some("SIMD backend not supported by this CPU");
    }
    if !expr.simd_ready(order) {
        return Some("operands are not contiguous in this order or apply scalar-only functions");
    }
    if !target.simd_ready(order) {
        return Some("destination is not contiguous in this order");
    }
    if target.whole_packs {
        let len = match order {
            AccessOrder::Linear => expr.nelems(),
            AccessOrder::PerColumn => expr.nrows(),
        };
        if len % V::LANES != 0 {
            return Some("length is not a multiple of the pack width");
        }
    }
    None
}

pub(crate) fn decide<V, E>(
    expr: &E,
    target: &Target,
    kernel_simd: bool,
    model: &CostModel,
) -> PolicyDecision
where
    E: MatExpr + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    let linear_cost = model.linear_cost(expr);
    let percol_cost = model.percol_cost(expr);
    let order = if target.linear && linear_cost <= percol_cost {
        AccessOrder::Linear
    } else {
        AccessOrder::PerColumn
    };
    let simd = simd_blocker::<V, E>(expr, order, target, kernel_simd).is_none();
    let decision = PolicyDecision {
        policy: AccessPolicy::new(order, simd),
        linear_cost,
        percol_cost,
    };
    tracing::trace!(
        policy = decision.policy.name(),
        linear_cost,
        percol_cost,
        rows = expr.nrows(),
        cols = expr.ncols(),
        lanes = V::LANES,
        "selected access policy"
    );
    decision
}

/// Policy for evaluating `expr` into `dst` with packs of type `V`
pub fn select_policy<V, E, D>(expr: &E, dst: &D, model: &CostModel) -> PolicyDecision
where
    E: MatExpr + ?Sized,
    D: MatDest<Elem = E::Elem> + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    decide::<V, E>(expr, &Target::dest(dst), true, model)
}

/// Policy for folding `expr` with packs of type `V`
///
/// Unlike evaluation, SIMD does not require lengths to be multiples of the
/// pack width.
pub fn select_fold_policy<V, E>(expr: &E, kernel_simd: bool, model: &CostModel) -> PolicyDecision
where
    E: MatExpr + ?Sized,
    V: SimdVector<Scalar = E::Elem>,
{
    decide::<V, E>(expr, &Target::FOLD, kernel_simd, model)
}
