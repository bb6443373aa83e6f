//! Runtime capability detection.
//!
//! This module provides:
//! - `CpuFeature` and the `Capabilities` bitmask
//! - `SimdTier` ceilings used by configuration
//! - `capabilities()` for the cached, process-wide effective set
//! - `init_with_config()` for explicit initialisation
//! - `warmup()` for eliminating cold-start latency

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::error::{Error, Result};

// =============================================================================
// Features and tiers
// =============================================================================

/// One hardware instruction-set extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CpuFeature {
    /// 128-bit single-precision baseline (x86).
    Sse,
    /// 128-bit integer and double baseline (x86).
    Sse2,
    /// Horizontal add/sub (x86).
    Sse3,
    /// Supplemental SSE3 (x86).
    Ssse3,
    /// Dot product and rounding (x86).
    Sse41,
    /// String and CRC extensions (x86).
    Sse42,
    /// 256-bit floating point (x86).
    Avx,
    /// 256-bit integer (x86).
    Avx2,
    /// Fused multiply-add (x86).
    Fma,
    /// Population count (x86).
    Popcnt,
    /// Leading-zero count (x86).
    Lzcnt,
    /// Advanced SIMD (aarch64).
    Neon,
}

impl CpuFeature {
    /// Every feature, in bit order.
    pub const ALL: [CpuFeature; 12] = [
        CpuFeature::Sse,
        CpuFeature::Sse2,
        CpuFeature::Sse3,
        CpuFeature::Ssse3,
        CpuFeature::Sse41,
        CpuFeature::Sse42,
        CpuFeature::Avx,
        CpuFeature::Avx2,
        CpuFeature::Fma,
        CpuFeature::Popcnt,
        CpuFeature::Lzcnt,
        CpuFeature::Neon,
    ];

    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u32
    }

    /// Lowest tier that includes this feature.
    #[must_use]
    pub const fn tier(self) -> SimdTier {
        match self {
            CpuFeature::Sse | CpuFeature::Sse2 | CpuFeature::Neon => SimdTier::Baseline,
            CpuFeature::Sse3 | CpuFeature::Ssse3 => SimdTier::Sse3,
            CpuFeature::Sse41 | CpuFeature::Sse42 | CpuFeature::Popcnt => SimdTier::Sse41,
            CpuFeature::Avx => SimdTier::Avx,
            CpuFeature::Avx2 | CpuFeature::Fma | CpuFeature::Lzcnt => SimdTier::Avx2,
        }
    }

    /// Lowercase name, as accepted by the feature probe macros.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CpuFeature::Sse => "sse",
            CpuFeature::Sse2 => "sse2",
            CpuFeature::Sse3 => "sse3",
            CpuFeature::Ssse3 => "ssse3",
            CpuFeature::Sse41 => "sse4.1",
            CpuFeature::Sse42 => "sse4.2",
            CpuFeature::Avx => "avx",
            CpuFeature::Avx2 => "avx2",
            CpuFeature::Fma => "fma",
            CpuFeature::Popcnt => "popcnt",
            CpuFeature::Lzcnt => "lzcnt",
            CpuFeature::Neon => "neon",
        }
    }
}

impl fmt::Display for CpuFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered ceiling on which features dispatch may use.
///
/// Deserialises through [`FromStr`], so configuration files and environment
/// variables accept the same aliases as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SimdTier {
    /// Software fallback only.
    Scalar,
    /// SSE/SSE2 or NEON.
    Baseline,
    /// Up to SSE3/SSSE3.
    Sse3,
    /// Up to SSE4.1/SSE4.2/POPCNT.
    Sse41,
    /// Up to AVX.
    Avx,
    /// Up to AVX2/FMA/LZCNT.
    Avx2,
}

impl SimdTier {
    /// The highest tier.
    pub const MAX: SimdTier = SimdTier::Avx2;

    /// Lowercase name, as accepted by `FromStr` and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SimdTier::Scalar => "scalar",
            SimdTier::Baseline => "baseline",
            SimdTier::Sse3 => "sse3",
            SimdTier::Sse41 => "sse41",
            SimdTier::Avx => "avx",
            SimdTier::Avx2 => "avx2",
        }
    }
}

impl fmt::Display for SimdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimdTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "software" | "none" => Ok(SimdTier::Scalar),
            "baseline" | "sse" | "sse2" | "neon" => Ok(SimdTier::Baseline),
            "sse3" | "ssse3" => Ok(SimdTier::Sse3),
            "sse41" | "sse4.1" | "sse42" | "sse4.2" => Ok(SimdTier::Sse41),
            "avx" => Ok(SimdTier::Avx),
            "avx2" | "fma" => Ok(SimdTier::Avx2),
            _ => Err(Error::InvalidTier(s.to_string())),
        }
    }
}

impl TryFrom<String> for SimdTier {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

// =============================================================================
// Capability bitmask
// =============================================================================

/// Immutable set of available features, one bit per [`CpuFeature`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u32);

impl Capabilities {
    /// No features: every operation takes the software path.
    pub const NONE: Capabilities = Capabilities(0);

    /// Builds a set from a list of features.
    #[must_use]
    pub fn from_features(features: &[CpuFeature]) -> Self {
        Capabilities(features.iter().fold(0, |acc, f| acc | f.bit()))
    }

    /// Probes the running processor.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut bits = 0_u32;

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            macro_rules! probe {
                ($($feature:tt => $variant:ident),* $(,)?) => {
                    $(
                        if is_x86_feature_detected!($feature) {
                            bits |= CpuFeature::$variant.bit();
                        }
                    )*
                };
            }
            probe! {
                "sse" => Sse,
                "sse2" => Sse2,
                "sse3" => Sse3,
                "ssse3" => Ssse3,
                "sse4.1" => Sse41,
                "sse4.2" => Sse42,
                "avx" => Avx,
                "avx2" => Avx2,
                "fma" => Fma,
                "popcnt" => Popcnt,
                "lzcnt" => Lzcnt,
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                bits |= CpuFeature::Neon.bit();
            }
        }

        Capabilities(bits)
    }

    /// Raw bitmask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `true` when `feature` is present.
    #[inline]
    #[must_use]
    pub const fn contains(self, feature: CpuFeature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// `true` when no feature is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Copy without `feature`.
    #[must_use]
    pub const fn without(self, feature: CpuFeature) -> Self {
        Capabilities(self.0 & !feature.bit())
    }

    /// Copy keeping only features at or below `ceiling`.
    #[must_use]
    pub fn restrict_to(self, ceiling: SimdTier) -> Self {
        CpuFeature::ALL
            .into_iter()
            .filter(|f| f.tier() > ceiling)
            .fold(self, Capabilities::without)
    }

    /// Iterates the present features in bit order.
    pub fn iter(self) -> impl Iterator<Item = CpuFeature> {
        CpuFeature::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Highest tier with at least one present feature.
    #[must_use]
    pub fn highest_tier(self) -> SimdTier {
        self.iter()
            .map(CpuFeature::tier)
            .max()
            .unwrap_or(SimdTier::Scalar)
    }

    /// SSE is available.
    #[inline]
    #[must_use]
    pub const fn sse(self) -> bool {
        self.contains(CpuFeature::Sse)
    }

    /// SSE2 is available.
    #[inline]
    #[must_use]
    pub const fn sse2(self) -> bool {
        self.contains(CpuFeature::Sse2)
    }

    /// SSE3 is available.
    #[inline]
    #[must_use]
    pub const fn sse3(self) -> bool {
        self.contains(CpuFeature::Sse3)
    }

    /// SSE4.1 is available.
    #[inline]
    #[must_use]
    pub const fn sse41(self) -> bool {
        self.contains(CpuFeature::Sse41)
    }

    /// AVX is available.
    #[inline]
    #[must_use]
    pub const fn avx(self) -> bool {
        self.contains(CpuFeature::Avx)
    }

    /// AVX2 is available.
    #[inline]
    #[must_use]
    pub const fn avx2(self) -> bool {
        self.contains(CpuFeature::Avx2)
    }

    /// FMA is available.
    #[inline]
    #[must_use]
    pub const fn fma(self) -> bool {
        self.contains(CpuFeature::Fma)
    }

    /// POPCNT is available.
    #[inline]
    #[must_use]
    pub const fn popcnt(self) -> bool {
        self.contains(CpuFeature::Popcnt)
    }

    /// LZCNT is available.
    #[inline]
    #[must_use]
    pub const fn lzcnt(self) -> bool {
        self.contains(CpuFeature::Lzcnt)
    }

    /// NEON is available.
    #[inline]
    #[must_use]
    pub const fn neon(self) -> bool {
        self.contains(CpuFeature::Neon)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, feature) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{feature}")?;
        }
        Ok(())
    }
}

impl Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

// =============================================================================
// Cached process-wide state
// =============================================================================

static DETECTED: OnceLock<Capabilities> = OnceLock::new();
static EFFECTIVE: OnceLock<Capabilities> = OnceLock::new();

/// Raw probe result, ignoring configuration.
#[inline]
#[must_use]
pub fn detected_capabilities() -> Capabilities {
    *DETECTED.get_or_init(|| {
        let detected = Capabilities::detect();
        tracing::debug!(features = %detected, "probed cpu features");
        detected
    })
}

fn effective_for(config: &DispatchConfig) -> Capabilities {
    let ceiling = config.ceiling();
    let effective = detected_capabilities().restrict_to(ceiling);
    if config.log_capabilities {
        tracing::info!(features = %effective, %ceiling, "lanekit dispatch initialised");
    } else {
        tracing::debug!(features = %effective, %ceiling, "lanekit dispatch initialised");
    }
    effective
}

fn init_from_env() -> Capabilities {
    let config = DispatchConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid lanekit environment configuration, using defaults");
        DispatchConfig::default()
    });
    effective_for(&config)
}

/// Returns the cached effective capability set.
///
/// Initialised from the environment on first use unless
/// [`init_with_config`] ran first.
#[inline]
#[must_use]
pub fn capabilities() -> Capabilities {
    *EFFECTIVE.get_or_init(init_from_env)
}

/// Initialises the effective capability set from an explicit configuration.
///
/// Fails with [`Error::AlreadyInitialized`] if any kernel call or an earlier
/// initialisation already fixed the set.
pub fn init_with_config(config: &DispatchConfig) -> Result<Capabilities> {
    let mut installed = false;
    let caps = *EFFECTIVE.get_or_init(|| {
        installed = true;
        effective_for(config)
    });
    if installed {
        Ok(caps)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

/// Initialises dispatch and runs every kernel family once.
///
/// Call this at application startup so the first real call does not pay
/// for detection or cold instruction caches.
///
/// # Example
///
/// ```
/// lanekit_core::warmup();
/// ```
pub fn warmup() {
    use crate::kernel::{Accelerated, Kernel, Trigonometry, VectorAlgebra};
    use crate::vector::{Vector4D, Vector4F};

    let _ = capabilities();
    let a = Vector4F::new(0.25, -1.5, 3.0, 0.5);
    let b = Vector4F::splat(0.75);
    for _ in 0..3 {
        let _ = Accelerated.normalize3(Accelerated.cross3(a, b));
        let _ = Accelerated.sin_cos(a);
        let _ = Accelerated.compare_greater_than(a, b);
    }
    let c = Vector4D::new(0.25, -1.5, 3.0, 0.5);
    let _ = Accelerated.dot4(c, c);
    let _ = Accelerated.sin_cos(c);
}
