#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! # Crate layout
//!
//! - [`traits`]: `SimdVector` packs and the `Element` scalar contract
//! - [`backends`]: scalar, portable, AVX2 and NEON packs
//! - [`dispatch`]: compiled backend and runtime CPU feature checks
//! - [`shape`]: static/dynamic extents and strided layouts
//! - [`matrix`]: dense storage and views
//! - [`expr`]: the expression facade and its composites
//! - [`access`]: linear and per-column accessors, materialization
//! - [`policy`]: cost model and policy selection
//! - [`eval`]: evaluation into a destination
//! - [`fold`] and [`kernels`]: the fold tree and its reductions
//! - [`reduce`]: ready-made full, column-wise and row-wise reductions
//! - [`ops`]: functional-style expression builders

// Core trait definitions
pub mod traits;

// Backend implementations
pub mod backends;

// Backend detection
pub mod dispatch;

pub mod error;

// Shapes, storage and expressions
pub mod shape;
pub mod matrix;
pub mod expr;
pub mod functor;
pub mod access;

// Policy selection and the engines that follow it
pub mod policy;
pub mod eval;
pub mod fold;
pub mod kernels;
pub mod reduce;

// Functional-style expression builders
pub mod ops;

// Public re-exports for convenience
pub use traits::{pack_width, Element, Real, SimdVector};

// Re-export backend types
pub use backends::portable::PortableVector;
pub use backends::scalar::ScalarVector;
pub use backends::{NativeF32, NativeF64};

#[cfg(all(feature = "avx2", target_arch = "x86_64"))]
pub use backends::avx2::{Avx2Vector, Avx2VectorF64};

#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub use backends::neon::{NeonVector, NeonVectorF64};

pub use dispatch::{simd_available, CpuFeatures, SimdKind};
pub use error::{Error, Result};
pub use shape::{Layout, Shape, DYN};
pub use matrix::{DenseMatrix, MatrixView, MatrixViewMut};
pub use expr::{
    map1, map2, map3, Capabilities, ConstExpr, Map1, Map2, Map3, MatDest, MatExpr, RepeatCol,
    RepeatRow, Transpose,
};
pub use functor::{
    Abs, AbsDiff, Add, BinaryFn, Div, Max2, Min2, Mul, MulAdd, Neg, ScalarFn, ScalarFn2, Sqr,
    SqrDiff, Sub, TernaryFn, UnaryFn,
};
pub use policy::{
    select_fold_policy, select_policy, AccessOrder, AccessPolicy, CostModel, PolicyDecision,
};
pub use eval::{evaluate, evaluate_policy, evaluate_with, evaluate_with_model, evaluation_policy};
pub use fold::{fold, fold_slice, fold_with, fold_with_model, foldf, foldf2};
pub use kernels::{FoldKernel, MinMax, MinMaxStat, Maximum, Minimum, Prod, Sum};
pub use reduce::{
    amax, asum, colwise_dot, colwise_maximum, colwise_mean, colwise_minimum, colwise_norm,
    colwise_prod, colwise_sum, diff_amax, diff_asum, diff_norm, diff_sqsum, dot, maximum, mean,
    minimum, minmax, norm, prod, rowwise_dot, rowwise_maximum, rowwise_mean, rowwise_minimum,
    rowwise_norm, rowwise_prod, rowwise_sum, sqsum, sum, Norm,
};
