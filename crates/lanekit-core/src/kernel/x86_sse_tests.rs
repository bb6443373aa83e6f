//! Tests for `x86_sse` module - every SSE kernel against the software path.

use super::{x86_sse, Kernel, Software};
use crate::selfcheck::edge_samples;
use crate::vector::Vector4F;

fn samples() -> Vec<Vector4F> {
    let mut out: Vec<Vector4F> = edge_samples::<f32>().into_iter().map(Vector4F::from_array).collect();
    out.extend([
        Vector4F::new(1.0, 2.0, 3.0, 4.0),
        Vector4F::new(-0.1, 1e7, 3.333, -8.5),
        Vector4F::new(1e-3, -1e-3, 123.456, 0.75),
        Vector4F::new(16_777_216.0, -0.5, 1.5, 2.5),
    ]);
    out
}

fn same(a: Vector4F, b: Vector4F) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

fn pairs() -> Vec<(Vector4F, Vector4F)> {
    let s = samples();
    s.iter().flat_map(|&a| s.iter().map(move |&b| (a, b))).collect()
}

macro_rules! assert_unary {
    ($feature:tt; $($name:ident),+) => {
        if !is_x86_feature_detected!($feature) {
            return;
        }
        for v in samples() {
            $(
                // SAFETY: feature detected above.
                let got = unsafe { x86_sse::$name(v) };
                let expected = Software.$name(v);
                assert!(same(got, expected), "{}({v:?}): {got:?} vs {expected:?}", stringify!($name));
            )+
        }
    };
}

macro_rules! assert_binary {
    ($feature:tt; $($name:ident),+) => {
        if !is_x86_feature_detected!($feature) {
            return;
        }
        for (a, b) in pairs() {
            $(
                // SAFETY: feature detected above.
                let got = unsafe { x86_sse::$name(a, b) };
                let expected = Software.$name(a, b);
                assert!(same(got, expected), "{}({a:?}, {b:?}): {got:?} vs {expected:?}", stringify!($name));
            )+
        }
    };
}

#[test]
fn test_sse_arithmetic_matches_software() {
    assert_binary!("sse"; add, subtract, multiply, divide, max, min, horizontal_add, cross2, cross3);
}

#[test]
fn test_sse_bitwise_matches_software() {
    assert_binary!("sse"; and, or, xor, and_not);
}

#[test]
fn test_sse_comparisons_match_software() {
    assert_binary!(
        "sse";
        compare_equal,
        compare_not_equal,
        compare_greater_than,
        compare_greater_than_or_equal,
        compare_less_than,
        compare_less_than_or_equal
    );
}

#[test]
fn test_sse_unary_matches_software() {
    assert_unary!("sse"; sqrt, not, fill_with_x, fill_with_y, fill_with_z, fill_with_w);
}

#[test]
fn test_sse_move_mask_matches_software() {
    if !is_x86_feature_detected!("sse") {
        return;
    }
    for v in samples() {
        // SAFETY: SSE detected above.
        assert_eq!(unsafe { x86_sse::move_mask(v) }, Software.move_mask(v));
    }
}

#[test]
fn test_sse_dot_variants_match_software() {
    if !is_x86_feature_detected!("sse3") || !is_x86_feature_detected!("sse4.1") {
        return;
    }
    for (a, b) in pairs() {
        let cases = [
            (Vector4F::MASK_ZW, Software.dot2(a, b)),
            (Vector4F::MASK_W, Software.dot3(a, b)),
            (Vector4F::ALL_BITS_SET, Software.dot4(a, b)),
        ];
        for (mask, expected) in cases {
            // SAFETY: SSE3 detected above; SSE is implied.
            let (sse, sse3) = unsafe { (x86_sse::dot_sse(a, b, mask), x86_sse::dot_sse3(a, b, mask)) };
            assert!(same(sse, expected), "dot_sse({a:?}, {b:?}): {sse:?} vs {expected:?}");
            assert!(same(sse3, expected), "dot_sse3({a:?}, {b:?}): {sse3:?} vs {expected:?}");
        }
        // SAFETY: SSE4.1 detected above.
        unsafe {
            assert!(same(x86_sse::dot2_sse41(a, b), Software.dot2(a, b)));
            assert!(same(x86_sse::dot3_sse41(a, b), Software.dot3(a, b)));
            assert!(same(x86_sse::dot4_sse41(a, b), Software.dot4(a, b)));
        }
    }
}

#[test]
fn test_sse3_horizontal_add_matches_software() {
    if !is_x86_feature_detected!("sse3") {
        return;
    }
    for (a, b) in pairs() {
        // SAFETY: SSE3 detected above.
        let got = unsafe { x86_sse::horizontal_add_sse3(a, b) };
        assert!(same(got, Software.horizontal_add(a, b)));
    }
}

#[test]
fn test_sse41_rounding_matches_software() {
    assert_unary!("sse4.1"; round, floor, truncate);
}

#[test]
fn test_sse2_equal_bits_matches_software() {
    assert_binary!("sse2"; equal_bits);
}

#[test]
fn test_fma_matches_software() {
    if !is_x86_feature_detected!("fma") {
        return;
    }
    let s = samples();
    for (i, &a) in s.iter().enumerate() {
        let (b, c) = (s[(i + 1) % s.len()], s[(i + 2) % s.len()]);
        // SAFETY: FMA detected above.
        let got = unsafe { x86_sse::fused_multiply_add(a, b, c) };
        assert!(same(got, Software.fused_multiply_add(a, b, c)));
    }
}

#[test]
fn test_sse_cross4_matches_software() {
    if !is_x86_feature_detected!("sse") {
        return;
    }
    let s = samples();
    for (i, &a) in s.iter().enumerate() {
        let (b, c) = (s[(i + 3) % s.len()], s[(i + 5) % s.len()]);
        // SAFETY: SSE detected above.
        let got = unsafe { x86_sse::cross4(a, b, c) };
        assert!(same(got, Software.cross4(a, b, c)), "cross4({a:?}, {b:?}, {c:?})");
    }
}

#[test]
fn test_sse_estimates_within_bound() {
    if !is_x86_feature_detected!("sse") {
        return;
    }
    let v = Vector4F::new(1.0, 3.0, 1e-3, 12345.0);
    // SAFETY: SSE detected above.
    let (rcp, rsqrt) = unsafe { (x86_sse::reciprocal_approx(v), x86_sse::reciprocal_sqrt_approx(v)) };
    for i in 0..4 {
        let x = f64::from(v.lane(i));
        let rel_rcp = (f64::from(rcp.lane(i)) * x - 1.0).abs();
        let rel_rsqrt = (f64::from(rsqrt.lane(i)) * x.sqrt() - 1.0).abs();
        assert!(rel_rcp <= 1.0 / 2048.0, "rcp({x}) rel={rel_rcp}");
        assert!(rel_rsqrt <= 1.0 / 2048.0, "rsqrt({x}) rel={rel_rsqrt}");
    }
}
