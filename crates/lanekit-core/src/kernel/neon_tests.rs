//! Tests for `neon` module - every NEON kernel against the software path.

use super::{neon, Kernel, Software};
use crate::selfcheck::edge_samples;
use crate::vector::Vector4F;

fn samples() -> Vec<Vector4F> {
    let mut out: Vec<Vector4F> = edge_samples::<f32>().into_iter().map(Vector4F::from_array).collect();
    out.extend([
        Vector4F::new(1.0, 2.0, 3.0, 4.0),
        Vector4F::new(-0.1, 1e7, 3.333, -8.5),
        Vector4F::new(1e-3, -1e-3, 123.456, 0.75),
    ]);
    out
}

fn same(a: Vector4F, b: Vector4F) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

#[test]
fn test_neon_binary_kernels_match_software() {
    let s = samples();
    for &a in &s {
        for &b in &s {
            macro_rules! check {
                ($($name:ident),+) => {$(
                    let (got, expected) = (neon::$name(a, b), Software.$name(a, b));
                    assert!(same(got, expected), "{}({a:?}, {b:?}): {got:?} vs {expected:?}", stringify!($name));
                )+};
            }
            check!(
                add, subtract, multiply, divide, max, min, horizontal_add, and, or, xor, and_not,
                equal_bits, compare_equal, compare_not_equal, compare_greater_than,
                compare_greater_than_or_equal, compare_less_than, compare_less_than_or_equal,
                cross2, cross3
            );
            assert!(same(neon::dot(a, b, Vector4F::MASK_ZW), Software.dot2(a, b)));
            assert!(same(neon::dot(a, b, Vector4F::MASK_W), Software.dot3(a, b)));
            assert!(same(neon::dot(a, b, Vector4F::ALL_BITS_SET), Software.dot4(a, b)));
        }
    }
}

#[test]
fn test_neon_unary_kernels_match_software() {
    for v in samples() {
        macro_rules! check {
            ($($name:ident),+) => {$(
                let (got, expected) = (neon::$name(v), Software.$name(v));
                assert!(same(got, expected), "{}({v:?}): {got:?} vs {expected:?}", stringify!($name));
            )+};
        }
        check!(sqrt, not, round, floor, truncate, fill_with_x, fill_with_y, fill_with_z, fill_with_w);
        assert_eq!(neon::move_mask(v), Software.move_mask(v));
    }
}

#[test]
fn test_neon_ternary_kernels_match_software() {
    let s = samples();
    for (i, &a) in s.iter().enumerate() {
        let (b, c) = (s[(i + 3) % s.len()], s[(i + 5) % s.len()]);
        assert!(same(neon::cross4(a, b, c), Software.cross4(a, b, c)));
        assert!(same(neon::fused_multiply_add(a, b, c), Software.fused_multiply_add(a, b, c)));
    }
}

#[test]
fn test_neon_estimates_within_bound() {
    let v = Vector4F::new(1.0, 3.0, 1e-3, 12345.0);
    let (rcp, rsqrt) = (neon::reciprocal_approx(v), neon::reciprocal_sqrt_approx(v));
    for i in 0..4 {
        let x = f64::from(v.lane(i));
        assert!((f64::from(rcp.lane(i)) * x - 1.0).abs() <= 1.0 / 2048.0);
        assert!((f64::from(rsqrt.lane(i)) * x.sqrt() - 1.0).abs() <= 1.0 / 2048.0);
    }
}


#[test]
fn test_lane_table_selects_source_bytes() {
    use crate::vector::shuffle;

    assert_eq!(
        neon::LaneTable::<{ shuffle::XYZW }>::BYTES,
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]
    );
    assert_eq!(
        neon::LaneTable::<{ shuffle::YZXW }>::BYTES,
        [4, 5, 6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 12, 13, 14, 15]
    );
    assert_eq!(neon::LaneTable::<{ shuffle::WWWW }>::BYTES[..4], [12, 13, 14, 15]);
}
