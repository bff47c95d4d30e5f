//! Backend detection
//!
//! The pack backend is chosen at compile time through cargo features; this
//! module reports which one was compiled and whether the running CPU can
//! execute it. On x86_64 AVX2 support is detected with the `cpufeatures` crate.
//! On aarch64 NEON is assumed always present.

/// CPU Feature Detection Results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuFeatures {
    /// AVX2 support available (x86_64)
    pub has_avx2: bool,
}

impl CpuFeatures {
    /// Detect CPU features at runtime
    ///
    /// The first call executes CPUID; later calls hit the cache kept by
    /// `cpufeatures`.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            cpufeatures::new!(cpuid_avx2, "avx2");

            Self {
                has_avx2: cpuid_avx2::get(),
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            Self { has_avx2: false }
        }
    }
}

/// Pack backend compiled into this build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimdKind {
    /// Single-lane packs
    Scalar,

    /// Fixed-width array packs (8 x f32, 4 x f64)
    Portable,

    /// AVX2 intrinsics (x86_64, 256-bit)
    Avx2,

    /// NEON intrinsics (aarch64, 128-bit)
    Neon,
}

impl SimdKind {
    /// The backend `Element::Pack` resolves to in this build
    #[cfg(all(feature = "avx2", target_arch = "x86_64"))]
    pub const COMPILED: SimdKind = SimdKind::Avx2;

    /// The backend `Element::Pack` resolves to in this build
    #[cfg(all(feature = "neon", target_arch = "aarch64"))]
    pub const COMPILED: SimdKind = SimdKind::Neon;

    /// The backend `Element::Pack` resolves to in this build
    #[cfg(all(
        feature = "scalar",
        not(any(
            all(feature = "avx2", target_arch = "x86_64"),
            all(feature = "neon", target_arch = "aarch64")
        ))
    ))]
    pub const COMPILED: SimdKind = SimdKind::Scalar;

    /// The backend `Element::Pack` resolves to in this build
    #[cfg(not(any(
        feature = "scalar",
        all(feature = "avx2", target_arch = "x86_64"),
        all(feature = "neon", target_arch = "aarch64")
    )))]
    pub const COMPILED: SimdKind = SimdKind::Portable;

    /// Whether the running CPU can execute this backend
    pub fn is_supported(self) -> bool {
        match self {
            SimdKind::Avx2 => CpuFeatures::detect().has_avx2,
            SimdKind::Neon => cfg!(target_arch = "aarch64"),
            SimdKind::Scalar | SimdKind::Portable => true,
        }
    }

    /// Get backend name as string
    pub fn name(&self) -> &'static str {
        match self {
            SimdKind::Scalar => "scalar",
            SimdKind::Portable => "portable",
            SimdKind::Avx2 => "avx2",
            SimdKind::Neon => "neon",
        }
    }
}

/// Whether SIMD policies may run on this CPU
///
/// When this returns `false` the policy selector only produces scalar policies.
pub fn simd_available() -> bool {
    SimdKind::COMPILED.is_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(CpuFeatures::detect(), CpuFeatures::detect());
    }

    #[test]
    fn test_avx2_support_follows_detection() {
        assert_eq!(SimdKind::Avx2.is_supported(), CpuFeatures::detect().has_avx2);
        #[cfg(not(target_arch = "x86_64"))]
        assert!(!CpuFeatures::detect().has_avx2);
    }

    #[test]
    fn test_portable_and_scalar_always_supported() {
        assert!(SimdKind::Portable.is_supported());
        assert!(SimdKind::Scalar.is_supported());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(SimdKind::Avx2.name(), "avx2");
        assert_eq!(SimdKind::Portable.name(), "portable");
        assert!(!SimdKind::COMPILED.name().is_empty());
    }

    #[cfg(not(any(
        feature = "scalar",
        all(feature = "avx2", target_arch = "x86_64"),
        all(feature = "neon", target_arch = "aarch64")
    )))]
    #[test]
    fn test_default_build_is_portable() {
        assert_eq!(SimdKind::COMPILED, SimdKind::Portable);
        assert!(simd_available());
    }
}
