//! NEON backend (aarch64)
//!
//! 128-bit packs: 4 lanes of f32 and 2 lanes of f64. NEON is part of the
//! aarch64 baseline, so no runtime detection is needed. Min and max use the
//! `*nm*` forms, which return the number when one operand is NaN, matching
//! `libm::fmin`/`fmax` in the scalar path.

#![cfg(target_arch = "aarch64")]

use crate::traits::SimdVector;
use core::arch::aarch64::*;

/// NEON pack of 4 f32 lanes
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct NeonVector(float32x4_t);

/// NEON pack of 2 f64 lanes
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct NeonVectorF64(float64x2_t);

// Every operation is one intrinsic
macro_rules! impl_neon_vector {
    (
        $name:ident, $t:ty, lanes: $lanes:expr,
        dup: $dup:ident, load: $load:ident, store: $store:ident,
        add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
        neg: $neg:ident, abs: $abs:ident, min: $min:ident, max: $max:ident,
        hsum: $hsum:ident, hmax: $hmax:ident, hmin: $hmin:ident
    ) => {
        impl SimdVector for $name {
            type Scalar = $t;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $t) -> Self {
                unsafe { $name($dup(value)) }
            }

            #[inline(always)]
            fn from_slice(slice: &[$t]) -> Self {
                assert!(slice.len() >= $lanes, "Slice too short for NEON load");
                unsafe { $name($load(slice.as_ptr())) }
            }

            #[inline(always)]
            fn to_slice(self, slice: &mut [$t]) {
                assert!(slice.len() >= $lanes, "Slice too short for NEON store");
                unsafe { $store(slice.as_mut_ptr(), self.0) }
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                unsafe { $name($add(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                unsafe { $name($sub(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                unsafe { $name($mul(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                unsafe { $name($div(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn neg(self) -> Self {
                unsafe { $name($neg(self.0)) }
            }

            #[inline(always)]
            fn abs(self) -> Self {
                unsafe { $name($abs(self.0)) }
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                unsafe { $name($min(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                unsafe { $name($max(self.0, rhs.0)) }
            }

            #[inline(always)]
            fn horizontal_sum(self) -> $t {
                unsafe { $hsum(self.0) }
            }

            #[inline(always)]
            fn horizontal_max(self) -> $t {
                unsafe { $hmax(self.0) }
            }

            #[inline(always)]
            fn horizontal_min(self) -> $t {
                unsafe { $hmin(self.0) }
            }
        }
    };
}

impl_neon_vector!(
    NeonVector, f32, lanes: 4,
    dup: vdupq_n_f32, load: vld1q_f32, store: vst1q_f32,
    add: vaddq_f32, sub: vsubq_f32, mul: vmulq_f32, div: vdivq_f32,
    neg: vnegq_f32, abs: vabsq_f32, min: vminnmq_f32, max: vmaxnmq_f32,
    hsum: vaddvq_f32, hmax: vmaxnmvq_f32, hmin: vminnmvq_f32
);

impl_neon_vector!(
    NeonVectorF64, f64, lanes: 2,
    dup: vdupq_n_f64, load: vld1q_f64, store: vst1q_f64,
    add: vaddq_f64, sub: vsubq_f64, mul: vmulq_f64, div: vdivq_f64,
    neg: vnegq_f64, abs: vabsq_f64, min: vminnmq_f64, max: vmaxnmq_f64,
    hsum: vaddvq_f64, hmax: vmaxnmvq_f64, hmin: vminnmvq_f64
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neon_horizontal_f32() {
        let v = NeonVector::from_slice(&[3.0f32, -1.0, 4.0, 9.0]);
        assert_eq!(v.horizontal_sum(), 15.0);
        assert_eq!(v.horizontal_max(), 9.0);
        assert_eq!(v.horizontal_min(), -1.0);
    }

    #[test]
    fn test_neon_horizontal_f64() {
        let a = NeonVectorF64::splat(2.0);
        let b = NeonVectorF64::splat(3.0);
        assert_eq!(a.add(b).horizontal_sum(), 10.0);
        assert_eq!(a.sub(b).abs().horizontal_max(), 1.0);
    }

    #[test]
    fn test_neon_min_max_ignore_nan() {
        let a = NeonVector::from_slice(&[f32::NAN, 1.0, 2.0, 3.0]);
        let b = NeonVector::splat(0.5);
        assert_eq!(a.min(b).horizontal_min(), 0.5);
        assert_eq!(a.max(b).horizontal_max(), 3.0);
    }
}
