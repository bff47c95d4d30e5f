//! Portable fixed-width backend
//!
//! Packs are plain arrays of `N` lanes. Every operation is a lane-wise loop
//! over a fixed-size array, which the compiler unrolls and vectorizes for the
//! target at hand. This backend runs everywhere and is the default.

use crate::traits::{SimdVector, MAX_LANES};

/// Array-backed pack of `N` lanes
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct PortableVector<T, const N: usize>(pub [T; N]);

impl<T: Copy, const N: usize> PortableVector<T, N> {
    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        PortableVector(core::array::from_fn(|k| f(self.0[k])))
    }

    #[inline(always)]
    fn zip(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        PortableVector(core::array::from_fn(|k| f(self.0[k], rhs.0[k])))
    }

    /// Pairwise tree over the lanes: lane k is combined with lane k + half
    #[inline(always)]
    fn tree(self, f: impl Fn(T, T) -> T) -> T {
        let mut lanes = self.0;
        let mut width = N;
        while width > 1 {
            let half = width / 2;
            for k in 0..half {
                lanes[k] = f(lanes[k], lanes[k + half]);
            }
            if width % 2 == 1 {
                lanes[0] = f(lanes[0], lanes[width - 1]);
            }
            width = half;
        }
        lanes[0]
    }
}

macro_rules! impl_portable_vector {
    ($t:ty, abs: $abs:expr, min: $min:expr, max: $max:expr) => {
        impl<const N: usize> SimdVector for PortableVector<$t, N> {
            type Scalar = $t;

            const LANES: usize = {
                assert!(N > 0, "PortableVector needs at least one lane");
                assert!(N <= MAX_LANES, "PortableVector lanes exceed MAX_LANES");
                N
            };

            #[inline(always)]
            fn splat(value: Self::Scalar) -> Self {
                PortableVector([value; N])
            }

            #[inline(always)]
            fn from_slice(slice: &[Self::Scalar]) -> Self {
                assert!(slice.len() >= N, "Slice too short for portable load");
                PortableVector(core::array::from_fn(|k| slice[k]))
            }

            #[inline(always)]
            fn to_slice(self, slice: &mut [Self::Scalar]) {
                assert!(slice.len() >= N, "Slice too short for portable store");
                slice[..N].copy_from_slice(&self.0);
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a + b)
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a - b)
            }

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a * b)
            }

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                self.zip(rhs, |a, b| a / b)
            }

            #[inline(always)]
            fn neg(self) -> Self {
                self.map(|a| -a)
            }

            #[inline(always)]
            fn abs(self) -> Self {
                self.map($abs)
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                self.zip(rhs, $min)
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                self.zip(rhs, $max)
            }

            #[inline(always)]
            fn horizontal_sum(self) -> Self::Scalar {
                self.tree(|a, b| a + b)
            }

            #[inline(always)]
            fn horizontal_max(self) -> Self::Scalar {
                self.tree($max)
            }

            #[inline(always)]
            fn horizontal_min(self) -> Self::Scalar {
                self.tree($min)
            }

            #[inline(always)]
            fn gather<F: FnMut(usize) -> Self::Scalar>(f: F) -> Self {
                PortableVector(core::array::from_fn(f))
            }
        }
    };
}

impl_portable_vector!(f32, abs: libm::fabsf, min: libm::fminf, max: libm::fmaxf);
impl_portable_vector!(f64, abs: libm::fabs, min: libm::fmin, max: libm::fmax);
