//! Scalar backend implementation
//!
//! This backend provides a scalar (non-SIMD) fallback that always works on any platform.
//! It serves as the reference implementation and carries the non-vectorizable
//! integer element types.

use crate::traits::SimdVector;

/// Scalar vector wrapper (single-lane SIMD)
///
/// This wraps a single scalar value to implement the SimdVector trait,
/// providing a fallback when SIMD is not available or desired.
#[derive(Debug, Copy, Clone, PartialEq)]
#[repr(transparent)]
pub struct ScalarVector<T>(pub T);

macro_rules! impl_scalar_vector {
    ($t:ty, abs: $abs:expr, min: $min:expr, max: $max:expr) => {
        impl SimdVector for ScalarVector<$t> {
            type Scalar = $t;

            const LANES: usize = 1;

            #[inline(always)]
            fn splat(value: Self::Scalar) -> Self {
                ScalarVector(value)
            }

            #[inline(always)]
            fn from_slice(slice: &[Self::Scalar]) -> Self {
                assert!(slice.len() >= Self::LANES, "Slice too short for scalar load");
                ScalarVector(slice[0])
            }

            #[inline(always)]
            fn to_slice(self, slice: &mut [Self::Scalar]) {
                assert!(
                    slice.len() >= Self::LANES,
                    "Slice too short for scalar store"
                );
                slice[0] = self.0;
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                ScalarVector(self.0 + rhs.0)
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                ScalarVector(self.0 - rhs.0)
            }

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                ScalarVector(self.0 * rhs.0)
            }

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                ScalarVector(self.0 / rhs.0)
            }

            #[inline(always)]
            fn neg(self) -> Self {
                ScalarVector(-self.0)
            }

            #[inline(always)]
            fn abs(self) -> Self {
                ScalarVector($abs(self.0))
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                ScalarVector($min(self.0, rhs.0))
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                ScalarVector($max(self.0, rhs.0))
            }

            #[inline(always)]
            fn horizontal_sum(self) -> Self::Scalar {
                self.0
            }

            #[inline(always)]
            fn horizontal_max(self) -> Self::Scalar {
                self.0
            }

            #[inline(always)]
            fn horizontal_min(self) -> Self::Scalar {
                self.0
            }

            #[inline(always)]
            fn gather<F: FnMut(usize) -> Self::Scalar>(mut f: F) -> Self {
                ScalarVector(f(0))
            }
        }
    };
}

impl_scalar_vector!(f32, abs: libm::fabsf, min: libm::fminf, max: libm::fmaxf);
impl_scalar_vector!(f64, abs: libm::fabs, min: libm::fmin, max: libm::fmax);
impl_scalar_vector!(i32, abs: i32::wrapping_abs, min: Ord::min, max: Ord::max);
impl_scalar_vector!(i64, abs: i64::wrapping_abs, min: Ord::min, max: Ord::max);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_arithmetic() {
        let a = ScalarVector(2.0f32);
        let b = ScalarVector(3.0f32);

        assert_eq!(a.add(b).0, 5.0);
        assert_eq!(a.sub(b).0, -1.0);
        assert_eq!(a.mul(b).0, 6.0);
        assert_eq!(a.div(b).0, 2.0 / 3.0);
    }

    #[test]
    fn test_scalar_minmax() {
        let a = ScalarVector(2.0f64);
        let b = ScalarVector(-3.0f64);

        assert_eq!(a.min(b).0, -3.0);
        assert_eq!(a.max(b).0, 2.0);
        assert_eq!(b.abs().0, 3.0);
        assert_eq!(b.neg().0, 3.0);
    }

    #[test]
    fn test_scalar_horizontal_is_identity() {
        let v = ScalarVector(42i64);
        assert_eq!(v.horizontal_sum(), 42);
        assert_eq!(v.horizontal_max(), 42);
        assert_eq!(v.horizontal_min(), 42);
    }

    #[test]
    fn test_scalar_load_store() {
        let data = [1.5f32, 2.5];
        let v = ScalarVector::<f32>::from_slice(&data);
        let mut out = [0.0f32; 1];
        v.to_slice(&mut out);
        assert_eq!(out, [1.5]);
    }
}
