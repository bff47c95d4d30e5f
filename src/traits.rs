//! Core SIMD and element abstractions
//!
//! `SimdVector` is the pack abstraction every backend implements (scalar,
//! portable arrays, AVX2, NEON). `Element` ties each matrix element type to
//! the native pack of the compiled backend and tells the policy selector
//! whether the type is vectorizable at all.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Upper bound on `SimdVector::LANES`; lane scratch buffers are this long
pub const MAX_LANES: usize = 16;

/// Core SIMD vector abstraction trait
///
/// All SIMD backends implement this trait. A value of an implementing type is
/// a *pack*: `LANES` elements of `Scalar` processed by one instruction.
///
/// # Example
///
/// ```rust
/// use mateval::{PortableVector, SimdVector};
///
/// let a = PortableVector::<f32, 4>::splat(2.0);
/// let b = PortableVector::<f32, 4>::splat(3.0);
/// assert_eq!(a.add(b).horizontal_sum(), 20.0);
/// ```
pub trait SimdVector: Copy + Clone + Sized {
    /// The underlying scalar type
    type Scalar: Copy + Default;

    /// Number of SIMD lanes (1 for scalar, 4 for NEON f32, 8 for AVX2 f32)
    const LANES: usize;

    /// Broadcast a scalar value to all SIMD lanes
    fn splat(value: Self::Scalar) -> Self;

    /// Load from a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn from_slice(slice: &[Self::Scalar]) -> Self;

    /// Store to a slice (must have at least LANES elements)
    ///
    /// # Panics
    ///
    /// Panics if slice has fewer than LANES elements
    fn to_slice(self, slice: &mut [Self::Scalar]);

    /// Element-wise addition
    fn add(self, rhs: Self) -> Self;

    /// Element-wise subtraction
    fn sub(self, rhs: Self) -> Self;

    /// Element-wise multiplication
    fn mul(self, rhs: Self) -> Self;

    /// Element-wise division
    fn div(self, rhs: Self) -> Self;

    /// Element-wise negation
    fn neg(self) -> Self;

    /// Element-wise absolute value
    fn abs(self) -> Self;

    /// Element-wise minimum
    fn min(self, rhs: Self) -> Self;

    /// Element-wise maximum
    fn max(self, rhs: Self) -> Self;

    /// Sum all SIMD lanes into a scalar
    fn horizontal_sum(self) -> Self::Scalar;

    /// Maximum value across all SIMD lanes
    fn horizontal_max(self) -> Self::Scalar;

    /// Minimum value across all SIMD lanes
    fn horizontal_min(self) -> Self::Scalar;

    /// Build a pack lane by lane
    ///
    /// Used for gathers from strided memory and for operands that have no
    /// contiguous representation. Backends with cheaper gathers may override.
    #[inline]
    fn gather<F: FnMut(usize) -> Self::Scalar>(mut f: F) -> Self {
        let mut buf = [Self::Scalar::default(); MAX_LANES];
        let lanes = &mut buf[..Self::LANES];
        for (k, lane) in lanes.iter_mut().enumerate() {
            *lane = f(k);
        }
        Self::from_slice(lanes)
    }

    /// Write every lane through `f`, in lane order
    #[inline]
    fn scatter<F: FnMut(usize, Self::Scalar)>(self, mut f: F) {
        let mut buf = [Self::Scalar::default(); MAX_LANES];
        let lanes = &mut buf[..Self::LANES];
        self.to_slice(lanes);
        for (k, lane) in lanes.iter().enumerate() {
            f(k, *lane);
        }
    }

    /// Apply a scalar function to every lane
    #[inline]
    fn map_lanes<F: Fn(Self::Scalar) -> Self::Scalar>(self, f: F) -> Self {
        let mut buf = [Self::Scalar::default(); MAX_LANES];
        let lanes = &mut buf[..Self::LANES];
        self.to_slice(lanes);
        for lane in lanes.iter_mut() {
            *lane = f(*lane);
        }
        Self::from_slice(lanes)
    }

    /// Apply a scalar function to every pair of corresponding lanes
    #[inline]
    fn zip_lanes<F: Fn(Self::Scalar, Self::Scalar) -> Self::Scalar>(self, rhs: Self, f: F) -> Self {
        let mut lhs_buf = [Self::Scalar::default(); MAX_LANES];
        let mut rhs_buf = [Self::Scalar::default(); MAX_LANES];
        let lhs_lanes = &mut lhs_buf[..Self::LANES];
        let rhs_lanes = &mut rhs_buf[..Self::LANES];
        self.to_slice(lhs_lanes);
        rhs.to_slice(rhs_lanes);
        for (l, r) in lhs_lanes.iter_mut().zip(rhs_lanes.iter()) {
            *l = f(*l, *r);
        }
        Self::from_slice(lhs_lanes)
    }
}

/// Matrix element type
///
/// Every element type names the pack type of the compiled backend and states
/// whether it belongs to the vectorizable set (`f32`, `f64`). Integer
/// elements are carried by single-lane packs and always evaluated with
/// scalar policies.
pub trait Element:
    Copy
    + Default
    + PartialOrd
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Native pack of the compiled backend for this element type
    type Pack: SimdVector<Scalar = Self>;

    /// Whether SIMD policies may be chosen for this element type
    const VECTORIZABLE: bool;

    /// Additive identity
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// Identity of `min_val` (+inf for floats, MAX for integers)
    const UPPER: Self;

    /// Identity of `max_val` (-inf for floats, MIN for integers)
    const LOWER: Self;

    /// Smaller of two values
    fn min_val(self, other: Self) -> Self;

    /// Larger of two values
    fn max_val(self, other: Self) -> Self;

    /// Absolute value
    fn abs_val(self) -> Self;

    /// Convert an element count to this type
    fn from_count(n: usize) -> Self;
}

/// Floating-point elements
pub trait Real: Element {
    /// Square root
    fn sqrt_val(self) -> Self;
}

/// Pack width of the compiled backend for element type `T`
#[inline]
pub const fn pack_width<T: Element>() -> usize {
    <T::Pack as SimdVector>::LANES
}

impl Element for f32 {
    type Pack = crate::backends::NativeF32;

    const VECTORIZABLE: bool = true;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const UPPER: Self = f32::INFINITY;
    const LOWER: Self = f32::NEG_INFINITY;

    #[inline(always)]
    fn min_val(self, other: Self) -> Self {
        libm::fminf(self, other)
    }

    #[inline(always)]
    fn max_val(self, other: Self) -> Self {
        libm::fmaxf(self, other)
    }

    #[inline(always)]
    fn abs_val(self) -> Self {
        libm::fabsf(self)
    }

    #[inline(always)]
    fn from_count(n: usize) -> Self {
        n as f32
    }
}

impl Real for f32 {
    #[inline(always)]
    fn sqrt_val(self) -> Self {
        libm::sqrtf(self)
    }
}

impl Element for f64 {
    type Pack = crate::backends::NativeF64;

    const VECTORIZABLE: bool = true;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const UPPER: Self = f64::INFINITY;
    const LOWER: Self = f64::NEG_INFINITY;

    #[inline(always)]
    fn min_val(self, other: Self) -> Self {
        libm::fmin(self, other)
    }

    #[inline(always)]
    fn max_val(self, other: Self) -> Self {
        libm::fmax(self, other)
    }

    #[inline(always)]
    fn abs_val(self) -> Self {
        libm::fabs(self)
    }

    #[inline(always)]
    fn from_count(n: usize) -> Self {
        n as f64
    }
}

impl Real for f64 {
    #[inline(always)]
    fn sqrt_val(self) -> Self {
        libm::sqrt(self)
    }
}

macro_rules! impl_integer_element {
    ($t:ty) => {
        impl Element for $t {
            type Pack = crate::backends::scalar::ScalarVector<$t>;

            const VECTORIZABLE: bool = false;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const UPPER: Self = <$t>::MAX;
            const LOWER: Self = <$t>::MIN;

            #[inline(always)]
            fn min_val(self, other: Self) -> Self {
                Ord::min(self, other)
            }

            #[inline(always)]
            fn max_val(self, other: Self) -> Self {
                Ord::max(self, other)
            }

            #[inline(always)]
            fn abs_val(self) -> Self {
                self.wrapping_abs()
            }

            #[inline(always)]
            fn from_count(n: usize) -> Self {
                n as $t
            }
        }
    };
}

impl_integer_element!(i32);
impl_integer_element!(i64);
