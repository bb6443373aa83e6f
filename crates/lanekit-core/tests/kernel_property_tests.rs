//! Property-based tests for the algebraic and trigonometric contracts.
//!
//! Each property runs against the accelerated strategy, which routes to the
//! best kernel the host supports; parity with the software path is covered
//! separately.

use lanekit_core::prelude::*;
use proptest::{
    array::uniform4,
    prelude::{any, prop_assert, prop_assert_eq, Strategy},
    proptest,
    test_runner::{Config as ProptestConfig, FileFailurePersistence},
};

const KERNEL_PROP_CASES: u32 = 512;
const KERNEL_PROP_MAX_SHRINK_ITERS: u32 = 2048;

/// Absolute bound between precise and approximate sin/cos.
const TRIG_APPROX_EPSILON: f32 = 2e-5;

fn kernel_proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: KERNEL_PROP_CASES,
        max_shrink_iters: KERNEL_PROP_MAX_SHRINK_ITERS,
        failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
            "kernel-property-regressions",
        ))),
        ..ProptestConfig::default()
    }
}

fn finite_vector() -> impl Strategy<Value = Vector4F> {
    uniform4(-100.0_f32..100.0_f32).prop_map(Vector4F::from_array)
}

fn any_vector() -> impl Strategy<Value = Vector4F> {
    uniform4(any::<u32>().prop_map(f32::from_bits)).prop_map(Vector4F::from_array)
}

/// Bitwise equality, with any NaN matching any NaN.
fn same(a: Vector4F, b: Vector4F) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

proptest! {
    #![proptest_config(kernel_proptest_config())]

    #[test]
    fn test_dot_is_symmetric(a in any_vector(), b in any_vector()) {
        prop_assert!(same(Accelerated.dot2(a, b), Accelerated.dot2(b, a)));
        prop_assert!(same(Accelerated.dot3(a, b), Accelerated.dot3(b, a)));
        prop_assert!(same(Accelerated.dot4(a, b), Accelerated.dot4(b, a)));
    }

    #[test]
    fn test_dot_broadcasts(a in finite_vector(), b in finite_vector()) {
        let d = Accelerated.dot4(a, b);
        prop_assert_eq!(d, Vector4F::splat(d.x()));
    }

    #[test]
    fn test_cross3_is_orthogonal(a in finite_vector(), b in finite_vector()) {
        let c = Accelerated.cross3(a, b);
        let (la, lb) = (Accelerated.length3(a).x(), Accelerated.length3(b).x());
        prop_assert!(Accelerated.dot3(c, a).x().abs() <= 1e-5 * la * la * lb + 1e-3);
        prop_assert!(Accelerated.dot3(c, b).x().abs() <= 1e-5 * la * lb * lb + 1e-3);
        prop_assert_eq!(c.w(), 0.0);
    }

    #[test]
    fn test_normalize_has_unit_length(v in finite_vector()) {
        let length = Accelerated.length3(v).x();
        if length > 1e-3 {
            let n = Accelerated.normalize3(v);
            prop_assert!((Accelerated.length3(n).x() - 1.0).abs() <= 1e-5);
            let n = Accelerated.normalize4(v);
            prop_assert!((Accelerated.length4(n).x() - 1.0).abs() <= 1e-5);
        }
    }

    #[test]
    fn test_lerp_boundaries_exact(a in finite_vector(), b in finite_vector()) {
        prop_assert_eq!(Accelerated.lerp_scalar(a, b, 0.0).to_array(), a.to_array());
        prop_assert_eq!(Accelerated.lerp_scalar(a, b, 1.0).to_array(), b.to_array());
    }

    #[test]
    fn test_bitwise_identities(v in any_vector()) {
        prop_assert_eq!(Accelerated.not(Accelerated.not(v)), v);
        prop_assert_eq!(Accelerated.xor(v, v), Vector4F::ZERO);
        prop_assert_eq!(Accelerated.and(v, v), v);
        prop_assert_eq!(Accelerated.or(v, v), v);
        prop_assert_eq!(Accelerated.and_not(v, v), Vector4F::ZERO);
    }

    #[test]
    fn test_select_round_trips(mask_bits in uniform4(any::<bool>()), t in any_vector(), f in any_vector()) {
        let mask = Vector4F::from_bits(mask_bits.map(|set| if set { u32::MAX } else { 0 }));
        let picked = Accelerated.select(mask, t, f);
        for i in 0..4 {
            let expected = if mask_bits[i] { t.lane(i) } else { f.lane(i) };
            prop_assert_eq!(picked.lane(i).to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_sin_cos_approx_bound(v in uniform4(-1.0e4_f32..1.0e4_f32)) {
        let v = Vector4F::from_array(v);
        let (sin, cos) = Accelerated.sin_cos(v);
        let (sin_approx, cos_approx) = Accelerated.sin_cos_approx(v);
        for i in 0..4 {
            prop_assert!((sin.lane(i) - sin_approx.lane(i)).abs() <= TRIG_APPROX_EPSILON);
            prop_assert!((cos.lane(i) - cos_approx.lane(i)).abs() <= TRIG_APPROX_EPSILON);
        }
    }

    #[test]
    fn test_sin_cos_match_libm(v in uniform4(-100.0_f32..100.0_f32)) {
        let v = Vector4F::from_array(v);
        let (sin, cos) = Accelerated.sin_cos(v);
        for i in 0..4 {
            let x = f64::from(v.lane(i));
            prop_assert!((f64::from(sin.lane(i)) - x.sin()).abs() <= 1e-5);
            prop_assert!((f64::from(cos.lane(i)) - x.cos()).abs() <= 1e-5);
        }
    }

    #[test]
    fn test_tan_approx_bound(v in uniform4(-1.4_f32..1.4_f32)) {
        let v = Vector4F::from_array(v);
        let (tan, approx) = (Accelerated.tan(v), Accelerated.tan_approx(v));
        for i in 0..4 {
            let (t, a) = (tan.lane(i), approx.lane(i));
            prop_assert!((t - a).abs() <= 5e-3 * t.abs().max(1.0), "tan={t} approx={a}");
        }
    }

    #[test]
    fn test_atan2_matches_libm(y in uniform4(-50.0_f64..50.0), x in uniform4(-50.0_f64..50.0)) {
        let angle = Accelerated.atan2(Vector4D::from_array(y), Vector4D::from_array(x));
        for i in 0..4 {
            let expected = y[i].atan2(x[i]);
            prop_assert!((angle.lane(i) - expected).abs() <= 1e-5, "atan2({}, {})", y[i], x[i]);
        }
    }

    #[test]
    fn test_max_min_discard_nan(a in finite_vector()) {
        let nan = Vector4F::splat(f32::NAN);
        prop_assert_eq!(Accelerated.max(a, nan), a);
        prop_assert_eq!(Accelerated.min(nan, a), a);
    }
}

#[test]
fn test_nan_equality_asymmetry() {
    let nan = Vector4F::splat(f32::NAN);
    assert!(Accelerated.all_false(Accelerated.compare_equal(nan, nan), LaneMask::ALL));
    assert!(Accelerated.all_true(Accelerated.compare_not_equal(nan, nan), LaneMask::ALL));

    let nan = Vector4D::splat(f64::NAN);
    assert!(Accelerated.all_false(Accelerated.compare_equal(nan, nan), LaneMask::ALL));
    assert!(Accelerated.all_true(Accelerated.compare_not_equal(nan, nan), LaneMask::ALL));
}
