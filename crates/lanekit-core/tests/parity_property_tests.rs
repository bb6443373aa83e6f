//! Property-based parity tests between the accelerated and software paths.
//!
//! Inputs are drawn from arbitrary bit patterns (NaN payloads, subnormals,
//! infinities included) as well as ordinary finite ranges, so every exact
//! operation is exercised on the values most likely to expose divergent
//! instruction semantics.

use lanekit_core::prelude::*;
use lanekit_core::selfcheck::check_parity;
use proptest::{
    array::uniform4,
    collection::vec,
    prelude::{any, prop_assert, prop_oneof, Just, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};

const PARITY_PROP_CASES: u32 = 256;
const PARITY_PROP_MAX_SHRINK_ITERS: u32 = 2048;

fn special_f32() -> impl Strategy<Value = f32> {
    prop_oneof![
        Just(0.0_f32),
        Just(-0.0_f32),
        Just(f32::INFINITY),
        Just(f32::NEG_INFINITY),
        Just(f32::NAN),
        Just(f32::MIN_POSITIVE),
        Just(f32::MAX),
        Just(1.0e-40_f32),
        Just(0.5_f32),
        Just(-2.5_f32),
    ]
}

fn lane_f32() -> impl Strategy<Value = f32> {
    prop_oneof![
        3 => -1.0e4_f32..1.0e4_f32,
        2 => any::<u32>().prop_map(f32::from_bits),
        1 => special_f32(),
    ]
}

fn lane_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => -1.0e4_f64..1.0e4_f64,
        2 => any::<u64>().prop_map(f64::from_bits),
        1 => prop_oneof![
            Just(0.0_f64),
            Just(-0.0_f64),
            Just(f64::INFINITY),
            Just(f64::NAN),
            Just(5.0e-324_f64),
            Just(f64::MAX),
        ],
    ]
}

fn parity_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: PARITY_PROP_CASES,
        max_shrink_iters: PARITY_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "parity-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn same<T: Element>(a: Vector4<T>, b: Vector4<T>) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

proptest! {
    #![proptest_config(parity_proptest_config())]

    #[test]
    fn test_parity_report_clean_f32(samples in vec(uniform4(lane_f32()), 1..6)) {
        let report = check_parity(&samples);
        prop_assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    }

    #[test]
    fn test_parity_report_clean_f64(samples in vec(uniform4(lane_f64()), 1..6)) {
        let report = check_parity(&samples);
        prop_assert!(report.is_clean(), "mismatches: {:#?}", report.mismatches);
    }

    #[test]
    fn test_arithmetic_parity_f32(a in uniform4(lane_f32()), b in uniform4(lane_f32())) {
        let (a, b) = (Vector4F::from_array(a), Vector4F::from_array(b));
        prop_assert!(same(Accelerated.add(a, b), Software.add(a, b)));
        prop_assert!(same(Accelerated.subtract(a, b), Software.subtract(a, b)));
        prop_assert!(same(Accelerated.multiply(a, b), Software.multiply(a, b)));
        prop_assert!(same(Accelerated.dot3(a, b), Software.dot3(a, b)));
        prop_assert!(same(Accelerated.cross3(a, b), Software.cross3(a, b)));
    }

    #[test]
    fn test_comparison_masks_are_canonical(a in uniform4(lane_f32()), b in uniform4(lane_f32())) {
        let (a, b) = (Vector4F::from_array(a), Vector4F::from_array(b));
        for mask in [
            Accelerated.compare_equal(a, b),
            Accelerated.compare_not_equal(a, b),
            Accelerated.compare_greater_than(a, b),
            Accelerated.compare_greater_than_or_equal(a, b),
            Accelerated.compare_less_than(a, b),
            Accelerated.compare_less_than_or_equal(a, b),
        ] {
            prop_assert!(mask.to_bits().iter().all(|&bits| bits == 0 || bits == u32::MAX));
        }
    }
}
