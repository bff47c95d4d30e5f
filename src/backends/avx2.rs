//! AVX2 backend (x86-64)
//!
//! 256-bit packs: 8 lanes of f32 and 4 lanes of f64. The CPU is checked by
//! [`crate::dispatch`] before any SIMD policy is chosen; without AVX2 these
//! packs are never constructed.

#![cfg(target_arch = "x86_64")]

use crate::traits::SimdVector;
use core::arch::x86_64::*;

/// AVX2 pack of 8 f32 lanes
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2Vector(__m256);

/// AVX2 pack of 4 f64 lanes
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Avx2VectorF64(__m256d);

/// Collapse 8 f32 lanes with `op`: halves, then pairs, then neighbours
#[inline(always)]
unsafe fn reduce_ps(v: __m256, op: impl Fn(__m128, __m128) -> __m128) -> f32 {
    let x = op(_mm256_extractf128_ps::<1>(v), _mm256_castps256_ps128(v));
    let x = op(x, _mm_movehl_ps(x, x));
    let x = op(x, _mm_movehdup_ps(x));
    _mm_cvtss_f32(x)
}

/// Collapse 4 f64 lanes with `op`: halves, then the remaining pair
#[inline(always)]
unsafe fn reduce_pd(v: __m256d, op: impl Fn(__m128d, __m128d) -> __m128d) -> f64 {
    let x = op(_mm256_extractf128_pd::<1>(v), _mm256_castpd256_pd128(v));
    let x = op(x, _mm_unpackhi_pd(x, x));
    _mm_cvtsd_f64(x)
}

macro_rules! impl_avx2_vector {
    (
        $name:ident, $t:ty, lanes: $lanes:expr, sign_bit: $sign:expr,
        set1: $set1:ident, load: $load:ident, store: $store:ident,
        add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
        andnot: $andnot:ident, xor: $xor:ident, min: $min:ident, max: $max:ident,
        reduce: $reduce:ident, add128: $add128:ident, min128: $min128:ident,
        max128: $max128:ident
    ) => {
        impl SimdVector for $name {
            type Scalar = $t;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $t) -> Self {
                unsafe { $name($set1(value)) }
            }

            #[inline(always)]
            fn from_slice(slice: &[$t]) -> Self {
                assert!(slice.len() >= $lanes, "Slice too short for AVX2 load");
                unsafe { $name($load(slice.as_ptr())) }
            }

            #[inline(always)]
            fn to_slice(self, slice: &mut [$t]) {
                assert!(slice.len() >= $lanes, "Slice too short for AVX2 store");
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

            // Sign flips and clears act on the sign bit only
            #[inline(always)]
            fn neg(self) -> Self {
                unsafe { $name($xor(self.0, $set1($sign))) }
            }

            #[inline(always)]
            fn abs(self) -> Self {
                unsafe { $name($andnot($set1($sign), self.0)) }
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
                unsafe { $reduce(self.0, |a, b| $add128(a, b)) }
            }

            #[inline(always)]
            fn horizontal_max(self) -> $t {
                unsafe { $reduce(self.0, |a, b| $max128(a, b)) }
            }

            #[inline(always)]
            fn horizontal_min(self) -> $t {
                unsafe { $reduce(self.0, |a, b| $min128(a, b)) }
            }
        }
    };
}

impl_avx2_vector!(
    Avx2Vector, f32, lanes: 8, sign_bit: -0.0f32,
    set1: _mm256_set1_ps, load: _mm256_loadu_ps, store: _mm256_storeu_ps,
    add: _mm256_add_ps, sub: _mm256_sub_ps, mul: _mm256_mul_ps, div: _mm256_div_ps,
    andnot: _mm256_andnot_ps, xor: _mm256_xor_ps, min: _mm256_min_ps, max: _mm256_max_ps,
    reduce: reduce_ps, add128: _mm_add_ps, min128: _mm_min_ps, max128: _mm_max_ps
);

impl_avx2_vector!(
    Avx2VectorF64, f64, lanes: 4, sign_bit: -0.0f64,
    set1: _mm256_set1_pd, load: _mm256_loadu_pd, store: _mm256_storeu_pd,
    add: _mm256_add_pd, sub: _mm256_sub_pd, mul: _mm256_mul_pd, div: _mm256_div_pd,
    andnot: _mm256_andnot_pd, xor: _mm256_xor_pd, min: _mm256_min_pd, max: _mm256_max_pd,
    reduce: reduce_pd, add128: _mm_add_pd, min128: _mm_min_pd, max128: _mm_max_pd
);
