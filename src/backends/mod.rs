//! SIMD backend implementations
//!
//! This module contains the pack implementations selected at compile time via
//! cargo features. The active backend is exposed through the `NativeF32` and
//! `NativeF64` aliases, which `Element::Pack` resolves to.
//!
//! Precedence when several backend features are enabled: `avx2` (x86-64),
//! `neon` (aarch64), `scalar`, then `portable`. Intrinsic backends requested
//! for the wrong architecture are ignored.

// Always available: scalar packs also carry the integer element types
pub mod scalar;

pub mod portable;

// Platform-specific backends (feature-gated)
#[cfg(all(feature = "avx2", target_arch = "x86_64"))]
pub mod avx2;

#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub mod neon;

/// Native f32 pack of the compiled backend
#[cfg(all(feature = "avx2", target_arch = "x86_64"))]
pub type NativeF32 = avx2::Avx2Vector;
/// Native f64 pack of the compiled backend
#[cfg(all(feature = "avx2", target_arch = "x86_64"))]
pub type NativeF64 = avx2::Avx2VectorF64;

/// Native f32 pack of the compiled backend
#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub type NativeF32 = neon::NeonVector;
/// Native f64 pack of the compiled backend
#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub type NativeF64 = neon::NeonVectorF64;

/// Native f32 pack of the compiled backend
#[cfg(all(
    feature = "scalar",
    not(any(
        all(feature = "avx2", target_arch = "x86_64"),
        all(feature = "neon", target_arch = "aarch64")
    ))
))]
pub type NativeF32 = scalar::ScalarVector<f32>;
/// Native f64 pack of the compiled backend
#[cfg(all(
    feature = "scalar",
    not(any(
        all(feature = "avx2", target_arch = "x86_64"),
        all(feature = "neon", target_arch = "aarch64")
    ))
))]
pub type NativeF64 = scalar::ScalarVector<f64>;

/// Native f32 pack of the compiled backend
#[cfg(not(any(
    feature = "scalar",
    all(feature = "avx2", target_arch = "x86_64"),
    all(feature = "neon", target_arch = "aarch64")
)))]
pub type NativeF32 = portable::PortableVector<f32, 8>;
/// Native f64 pack of the compiled backend
#[cfg(not(any(
    feature = "scalar",
    all(feature = "avx2", target_arch = "x86_64"),
    all(feature = "neon", target_arch = "aarch64")
)))]
pub type NativeF64 = portable::PortableVector<f64, 4>;
