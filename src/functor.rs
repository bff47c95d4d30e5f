//! Elementwise functions
//!
//! Functions applied by map expressions, each with a scalar form and a pack
//! form. A function whose `SIMD` flag is false only has a meaningful scalar
//! form; its pack form applies the scalar one lane by lane and the policy
//! selector never picks a SIMD policy for expressions containing it.

use crate::traits::{Element, SimdVector};

/// Function of one element
pub trait UnaryFn<T: Element>: Copy {
    /// Whether `apply_pack` runs on whole packs
    const SIMD: bool = true;

    /// Apply to one element
    fn apply(&self, x: T) -> T;

    /// Apply to every lane of a pack
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V) -> V;
}

/// Function of two elements
pub trait BinaryFn<T: Element>: Copy {
    /// Whether `apply_pack` runs on whole packs
    const SIMD: bool = true;

    /// Apply to one pair of elements
    fn apply(&self, x: T, y: T) -> T;

    /// Apply lane-wise to two packs
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V, y: V) -> V;
}

/// Function of three elements
pub trait TernaryFn<T: Element>: Copy {
    /// Whether `apply_pack` runs on whole packs
    const SIMD: bool = true;

    /// Apply to one triple of elements
    fn apply(&self, x: T, y: T, z: T) -> T;

    /// Apply lane-wise to three packs
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V, y: V, z: V) -> V;
}

/// `-x`
#[derive(Debug, Clone, Copy, Default)]
pub struct Neg;

impl<T: Element> UnaryFn<T> for Neg {
    #[inline(always)]
    fn apply(&self, x: T) -> T {
        -x
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V) -> V {
        x.neg()
    }
}

/// `|x|`
#[derive(Debug, Clone, Copy, Default)]
pub struct Abs;

impl<T: Element> UnaryFn<T> for Abs {
    #[inline(always)]
    fn apply(&self, x: T) -> T {
        x.abs_val()
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V) -> V {
        x.abs()
    }
}

/// `x * x`
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqr;

impl<T: Element> UnaryFn<T> for Sqr {
    #[inline(always)]
    fn apply(&self, x: T) -> T {
        x * x
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V) -> V {
        x.mul(x)
    }
}

macro_rules! binary_fn {
    ($(#[$doc:meta])* $name:ident, |$x:ident, $y:ident| $scalar:expr, |$px:ident, $py:ident| $pack:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl<T: Element> BinaryFn<T> for $name {
            #[inline(always)]
            fn apply(&self, $x: T, $y: T) -> T {
                $scalar
            }

            #[inline(always)]
            fn apply_pack<V: SimdVector<Scalar = T>>(&self, $px: V, $py: V) -> V {
                $pack
            }
        }
    };
}

binary_fn!(
    /// `x + y`
    Add, |x, y| x + y, |x, y| x.add(y)
);
binary_fn!(
    /// `x - y`
    Sub, |x, y| x - y, |x, y| x.sub(y)
);
binary_fn!(
    /// `x * y`
    Mul, |x, y| x * y, |x, y| x.mul(y)
);
binary_fn!(
    /// `x / y`
    Div, |x, y| x / y, |x, y| x.div(y)
);
binary_fn!(
    /// Smaller of `x` and `y`
    Min2, |x, y| x.min_val(y), |x, y| x.min(y)
);
binary_fn!(
    /// Larger of `x` and `y`
    Max2, |x, y| x.max_val(y), |x, y| x.max(y)
);
binary_fn!(
    /// `|x - y|`
    AbsDiff, |x, y| (x - y).abs_val(), |x, y| x.sub(y).abs()
);
binary_fn!(
    /// `(x - y)^2`
    SqrDiff,
    |x, y| {
        let d = x - y;
        d * d
    },
    |x, y| {
        let d = x.sub(y);
        d.mul(d)
    }
);

/// `x * y + z`
#[derive(Debug, Clone, Copy, Default)]
pub struct MulAdd;

impl<T: Element> TernaryFn<T> for MulAdd {
    #[inline(always)]
    fn apply(&self, x: T, y: T, z: T) -> T {
        x * y + z
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V, y: V, z: V) -> V {
        x.mul(y).add(z)
    }
}

/// Scalar-only wrapper around a closure of one element
#[derive(Debug, Clone, Copy)]
pub struct ScalarFn<F>(pub F);

impl<T: Element, F: Fn(T) -> T + Copy> UnaryFn<T> for ScalarFn<F> {
    const SIMD: bool = false;

    #[inline(always)]
    fn apply(&self, x: T) -> T {
        (self.0)(x)
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V) -> V {
        x.map_lanes(&self.0)
    }
}

/// Scalar-only wrapper around a closure of two elements
#[derive(Debug, Clone, Copy)]
pub struct ScalarFn2<F>(pub F);

impl<T: Element, F: Fn(T, T) -> T + Copy> BinaryFn<T> for ScalarFn2<F> {
    const SIMD: bool = false;

    #[inline(always)]
    fn apply(&self, x: T, y: T) -> T {
        (self.0)(x, y)
    }

    #[inline(always)]
    fn apply_pack<V: SimdVector<Scalar = T>>(&self, x: V, y: V) -> V {
        x.zip_lanes(y, &self.0)
    }
}
