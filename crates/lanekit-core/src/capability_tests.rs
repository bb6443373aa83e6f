//! Tests for `capability` module - feature sets, tiers and cached dispatch state.

use crate::capability::{
    capabilities, detected_capabilities, init_with_config, warmup, Capabilities, CpuFeature,
    SimdTier,
};
use crate::config::DispatchConfig;
use crate::error::Error;

#[test]
fn test_from_features_and_contains() {
    let caps = Capabilities::from_features(&[CpuFeature::Sse, CpuFeature::Avx2]);
    assert!(caps.sse());
    assert!(caps.avx2());
    assert!(!caps.avx());
    assert!(!caps.neon());
    assert_eq!(caps.iter().collect::<Vec<_>>(), vec![CpuFeature::Sse, CpuFeature::Avx2]);
}

#[test]
fn test_none_is_empty() {
    assert!(Capabilities::NONE.is_empty());
    assert_eq!(Capabilities::NONE.highest_tier(), SimdTier::Scalar);
    assert_eq!(Capabilities::NONE.to_string(), "none");
}

#[test]
fn test_restrict_to_drops_higher_tiers() {
    let caps = Capabilities::from_features(&CpuFeature::ALL);
    let restricted = caps.restrict_to(SimdTier::Sse41);
    assert!(restricted.sse41());
    assert!(restricted.sse3());
    assert!(restricted.popcnt());
    assert!(!restricted.avx());
    assert!(!restricted.fma());
    assert_eq!(restricted.highest_tier(), SimdTier::Sse41);
}

#[test]
fn test_restrict_to_scalar_clears_everything() {
    let caps = Capabilities::from_features(&CpuFeature::ALL);
    assert!(caps.restrict_to(SimdTier::Scalar).is_empty());
}

#[test]
fn test_restrict_to_max_is_identity() {
    let caps = Capabilities::from_features(&CpuFeature::ALL);
    assert_eq!(caps.restrict_to(SimdTier::MAX), caps);
}

#[test]
fn test_without_removes_single_feature() {
    let caps = Capabilities::from_features(&[CpuFeature::Sse, CpuFeature::Fma]);
    let caps = caps.without(CpuFeature::Fma);
    assert!(caps.sse());
    assert!(!caps.fma());
}

#[test]
fn test_display_lists_features() {
    let caps = Capabilities::from_features(&[CpuFeature::Sse41, CpuFeature::Sse]);
    assert_eq!(caps.to_string(), "sse sse4.1");
}

#[test]
fn test_capabilities_serialize_as_list() {
    let caps = Capabilities::from_features(&[CpuFeature::Sse2, CpuFeature::Neon]);
    let json = serde_json::to_string(&caps).unwrap();
    assert_eq!(json, r#"["sse2","neon"]"#);
}

#[test]
fn test_tier_ordering() {
    assert!(SimdTier::Scalar < SimdTier::Baseline);
    assert!(SimdTier::Baseline < SimdTier::Sse3);
    assert!(SimdTier::Sse41 < SimdTier::Avx);
    assert!(SimdTier::Avx < SimdTier::Avx2);
    assert_eq!(SimdTier::MAX, SimdTier::Avx2);
}

#[test]
fn test_tier_parse_aliases() {
    assert_eq!("SSE4.1".parse::<SimdTier>().unwrap(), SimdTier::Sse41);
    assert_eq!("software".parse::<SimdTier>().unwrap(), SimdTier::Scalar);
    assert_eq!(" neon ".parse::<SimdTier>().unwrap(), SimdTier::Baseline);
    assert_eq!("fma".parse::<SimdTier>().unwrap(), SimdTier::Avx2);
}

#[test]
fn test_tier_parse_rejects_unknown() {
    let err = "avx512".parse::<SimdTier>().unwrap_err();
    assert!(matches!(err, Error::InvalidTier(name) if name == "avx512"));
}

#[test]
fn test_tier_name_round_trips() {
    for tier in [
        SimdTier::Scalar,
        SimdTier::Baseline,
        SimdTier::Sse3,
        SimdTier::Sse41,
        SimdTier::Avx,
        SimdTier::Avx2,
    ] {
        assert_eq!(tier.name().parse::<SimdTier>().unwrap(), tier);
    }
}

#[test]
fn test_feature_tiers() {
    assert_eq!(CpuFeature::Neon.tier(), SimdTier::Baseline);
    assert_eq!(CpuFeature::Ssse3.tier(), SimdTier::Sse3);
    assert_eq!(CpuFeature::Fma.tier(), SimdTier::Avx2);
}

#[test]
fn test_detection_is_cached() {
    assert_eq!(detected_capabilities(), detected_capabilities());
    assert_eq!(capabilities(), capabilities());
}

#[test]
fn test_effective_is_subset_of_detected() {
    let detected = detected_capabilities();
    for feature in capabilities().iter() {
        assert!(detected.contains(feature), "{feature} not detected");
    }
}

#[cfg(target_arch = "x86_64")]
#[test]
fn test_x86_64_baseline_detected() {
    let caps = detected_capabilities();
    assert!(caps.sse());
    assert!(caps.sse2());
    assert!(!caps.neon());
}

#[cfg(target_arch = "aarch64")]
#[test]
fn test_aarch64_neon_detected() {
    assert!(detected_capabilities().neon());
}

#[test]
fn test_init_after_first_use_fails() {
    let _ = capabilities();
    let err = init_with_config(&DispatchConfig::default()).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized));
}

#[test]
fn test_warmup_is_idempotent() {
    warmup();
    warmup();
}
