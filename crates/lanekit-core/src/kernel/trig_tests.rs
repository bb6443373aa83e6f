//! Tests for `trig` module - polynomial trigonometry.

#![allow(clippy::cast_precision_loss)]

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::{Kernel, Software, Trigonometry};
use crate::vector::{Vector4D, Vector4F};

/// Evenly spaced `f32` angles over `[start, end]`, four per register.
fn grid(start: f32, end: f32, steps: usize) -> Vec<Vector4F> {
    let step = (end - start) / (steps * 4) as f32;
    (0..steps)
        .map(|i| {
            let base = start + step * (i * 4) as f32;
            Vector4F::new(base, base + step, base + 2.0 * step, base + 3.0 * step)
        })
        .collect()
}

// =============================================================================
// sin / cos
// =============================================================================

#[test]
fn test_sin_cos_against_libm() {
    for v in grid(-100.0, 100.0, 2000) {
        let (sin, cos) = (Software.sin(v), Software.cos(v));
        for i in 0..4 {
            let angle = f64::from(v.lane(i));
            let (expected_sin, expected_cos) = (angle.sin(), angle.cos());
            let (got_sin, got_cos) = (f64::from(sin.lane(i)), f64::from(cos.lane(i)));
            assert!(
                (got_sin - expected_sin).abs() < 1e-5,
                "sin({angle}) = {got_sin}, expected {expected_sin}"
            );
            assert!(
                (got_cos - expected_cos).abs() < 1e-5,
                "cos({angle}) = {got_cos}, expected {expected_cos}"
            );
        }
    }
}

#[test]
fn test_sin_cos_scenario() {
    let (sin, cos) = Software.sin_cos(Vector4F::splat(0.5));
    assert!((sin.x() - 0.479_425_55).abs() < 1e-6, "sin={}", sin.x());
    assert!((cos.x() - 0.877_582_56).abs() < 1e-6, "cos={}", cos.x());
}

#[test]
fn test_sin_cos_matches_separate_calls() {
    for v in grid(-20.0, 20.0, 200) {
        let (sin, cos) = Software.sin_cos(v);
        assert_eq!(sin, Software.sin(v));
        assert_eq!(cos, Software.cos(v));

        let (sin, cos) = Software.sin_cos_approx(v);
        assert_eq!(sin, Software.sin_approx(v));
        assert_eq!(cos, Software.cos_approx(v));
    }
}

#[test]
fn test_approx_tracks_precise() {
    for v in grid(-1000.0, 1000.0, 4000) {
        let sin_gap = Software.subtract(Software.sin_approx(v), Software.sin(v));
        let cos_gap = Software.subtract(Software.cos_approx(v), Software.cos(v));
        for i in 0..4 {
            assert!(sin_gap.lane(i).abs() <= 2e-5, "sin gap {} at {}", sin_gap.lane(i), v.lane(i));
            assert!(cos_gap.lane(i).abs() <= 2e-5, "cos gap {} at {}", cos_gap.lane(i), v.lane(i));
        }
    }
}

#[test]
fn test_pythagorean_identity() {
    for v in grid(-10.0, 10.0, 100) {
        let (sin, cos) = Software.sin_cos(v);
        let one = Software.add(Software.multiply(sin, sin), Software.multiply(cos, cos));
        for i in 0..4 {
            assert!((one.lane(i) - 1.0).abs() < 2e-5, "sin^2+cos^2={}", one.lane(i));
        }
    }
}

#[test]
fn test_sin_f64_against_libm() {
    let mut angle = -50.0_f64;
    while angle < 50.0 {
        let got = Software.sin(Vector4D::splat(angle)).x();
        assert!((got - angle.sin()).abs() < 1e-5, "sin({angle}) = {got}");
        angle += 0.173;
    }
}

#[test]
fn test_trig_of_non_finite_is_nan() {
    let v = Vector4F::new(f32::INFINITY, f32::NEG_INFINITY, f32::NAN, 0.0);
    let (sin, cos) = Software.sin_cos(v);
    for i in 0..3 {
        assert!(sin.lane(i).is_nan());
        assert!(cos.lane(i).is_nan());
        assert!(Software.tan(v).lane(i).is_nan());
    }
    assert_eq!(sin.w(), 0.0);
    assert_eq!(cos.w(), 1.0);
}

#[test]
fn test_wrap_angle() {
    let r = Software.wrap_angle(Vector4F::new(7.0, -7.0, 0.5, 0.0));
    assert!((r.x() - (7.0 - 2.0 * PI)).abs() < 1e-6);
    assert!((r.y() + (7.0 - 2.0 * PI)).abs() < 1e-6);
    assert_eq!(r.z(), 0.5);
    assert_eq!(r.w(), 0.0);
}

// =============================================================================
// tan
// =============================================================================

#[test]
fn test_tan_relative_accuracy() {
    for v in grid(-1.4, 1.4, 500) {
        let tan = Software.tan(v);
        for i in 0..4 {
            let expected = f64::from(v.lane(i)).tan();
            let got = f64::from(tan.lane(i));
            let scale = expected.abs().max(1e-30);
            assert!(
                (got - expected).abs() / scale < 1e-5 || (got - expected).abs() < 1e-7,
                "tan({}) = {got}, expected {expected}",
                v.lane(i)
            );
        }
    }
}

#[test]
fn test_tan_preserves_signed_zero() {
    let r = Software.tan(Vector4F::new(0.0, -0.0, 1e-5, -1e-5));
    assert_eq!(r.x().to_bits(), 0.0_f32.to_bits());
    assert_eq!(r.y().to_bits(), (-0.0_f32).to_bits());
    assert_eq!(r.z(), 1e-5);
    assert_eq!(r.w(), -1e-5);
}

#[test]
fn test_tan_approx_bound() {
    for v in grid(-1.4, 1.4, 500) {
        let tan = Software.tan_approx(v);
        for i in 0..4 {
            let expected = f64::from(v.lane(i)).tan();
            let got = f64::from(tan.lane(i));
            assert!(
                (got - expected).abs() <= 5e-3 * expected.abs().max(1.0),
                "tan_approx({}) = {got}, expected {expected}",
                v.lane(i)
            );
        }
    }
}

// =============================================================================
// atan / atan2
// =============================================================================

#[test]
fn test_atan_against_libm() {
    for v in grid(-20.0, 20.0, 500) {
        let atan = Software.atan(v);
        for i in 0..4 {
            let expected = f64::from(v.lane(i)).atan();
            let got = f64::from(atan.lane(i));
            assert!((got - expected).abs() < 1e-5, "atan({}) = {got}", v.lane(i));
        }
    }
}

#[test]
fn test_atan_special_values() {
    let r = Software.atan(Vector4F::new(f32::INFINITY, f32::NEG_INFINITY, -0.0, f32::NAN));
    assert_eq!(r.x(), FRAC_PI_2);
    assert_eq!(r.y(), -FRAC_PI_2);
    assert_eq!(r.z().to_bits(), (-0.0_f32).to_bits());
    assert!(r.w().is_nan());
}

#[test]
fn test_atan2_quadrants() {
    let y = Vector4F::new(1.0, 1.0, -1.0, -1.0);
    let x = Vector4F::new(1.0, -1.0, -1.0, 1.0);
    let r = Software.atan2(y, x);
    let expected = [FRAC_PI_4, 3.0 * FRAC_PI_4, -3.0 * FRAC_PI_4, -FRAC_PI_4];
    for (i, e) in expected.into_iter().enumerate() {
        assert!((r.lane(i) - e).abs() < 1e-6, "lane {i}: {} vs {e}", r.lane(i));
    }
}

#[test]
fn test_atan2_zero_table() {
    let y = Vector4F::new(0.0, -0.0, 0.0, -0.0);
    let r = Software.atan2(y, Vector4F::new(1.0, 1.0, -1.0, -0.0));
    assert_eq!(r.x().to_bits(), 0.0_f32.to_bits());
    assert_eq!(r.y().to_bits(), (-0.0_f32).to_bits());
    assert_eq!(r.z(), PI);
    assert_eq!(r.w(), -PI);

    let r = Software.atan2(Vector4F::new(1.0, -1.0, 0.0, 0.0), Vector4F::new(0.0, -0.0, 0.0, -0.0));
    assert_eq!(r.x(), FRAC_PI_2);
    assert_eq!(r.y(), -FRAC_PI_2);
    assert_eq!(r.z(), 0.0);
    assert_eq!(r.w(), PI);
}

#[test]
fn test_atan2_infinity_table() {
    let inf = f32::INFINITY;
    let r = Software.atan2(Vector4F::new(inf, inf, -inf, inf), Vector4F::new(inf, -inf, inf, 1.0));
    assert_eq!(r.x(), FRAC_PI_4);
    assert_eq!(r.y(), 3.0 * FRAC_PI_4);
    assert_eq!(r.z(), -FRAC_PI_4);
    assert_eq!(r.w(), FRAC_PI_2);

    let r = Software.atan2(Vector4F::new(1.0, 1.0, -1.0, 0.0), Vector4F::new(inf, -inf, -inf, inf));
    assert_eq!(r.x(), 0.0);
    assert_eq!(r.y(), PI);
    assert_eq!(r.z(), -PI);
    assert_eq!(r.w(), 0.0);
}

#[test]
fn test_atan2_propagates_nan() {
    let r = Software.atan2(
        Vector4F::new(f32::NAN, 0.0, f32::NAN, 1.0),
        Vector4F::new(0.0, f32::NAN, f32::NAN, 1.0),
    );
    assert!(r.x().is_nan());
    assert!(r.y().is_nan());
    assert!(r.z().is_nan());
    assert!((r.w() - FRAC_PI_4).abs() < 1e-6);
}

#[test]
fn test_atan2_f64_general() {
    let r = Software.atan2(Vector4D::splat(2.0), Vector4D::splat(-3.0));
    assert!((r.x() - 2.0_f64.atan2(-3.0)).abs() < 1e-6);
}
