//! Tests for `dimension` module - 2D/3D views and their explicit conversions.

use crate::dimension::{Vector2, Vector3};
use crate::vector::{Vector4D, Vector4F};

#[test]
fn test_vector3_dot_and_cross() {
    let a = Vector3::new(1.0_f32, 2.0, 3.0);
    let b = Vector3::new(4.0, 5.0, 6.0);
    assert_eq!(a.dot(b), 32.0);
    assert_eq!(a.cross(b), Vector3::new(-3.0, 6.0, -3.0));
}

#[test]
fn test_vector3_ignores_w() {
    let a = Vector4F::new(1.0, 2.0, 3.0, 100.0).as_vector3();
    let b = Vector4F::new(1.0, 1.0, 1.0, f32::NAN).as_vector3();
    assert_eq!(a.dot(b), 6.0);
    assert_eq!(a.length_squared(), 14.0);
}

#[test]
fn test_vector3_normalize() {
    let n = Vector3::new(3.0_f64, 0.0, 4.0).normalize();
    assert!((n.x() - 0.6).abs() < 1e-12);
    assert!((n.z() - 0.8).abs() < 1e-12);
    assert!((n.length() - 1.0).abs() < 1e-12);
}

#[test]
fn test_vector3_normalize_approx_is_close() {
    let n = Vector3::new(1.0_f32, 2.0, 2.0).normalize_approx();
    assert!((n.length() - 1.0).abs() < 1e-3, "length={}", n.length());
}

#[test]
fn test_vector3_distance_and_reflect() {
    let a = Vector3::new(1.0_f32, 2.0, 3.0);
    let b = Vector3::new(1.0, 5.0, 7.0);
    assert_eq!(a.distance(b), 5.0);
    assert_eq!(a.distance_squared(b), 25.0);

    let r = Vector3::new(1.0_f32, -1.0, 0.5).reflect(Vector3::new(0.0, 1.0, 0.0));
    assert_eq!(r, Vector3::new(1.0, 1.0, 0.5));
}

#[test]
fn test_vector3_negate_keeps_w() {
    let v = Vector4F::new(1.0, -2.0, 3.0, 7.0).as_vector3().negate();
    assert_eq!(v.into_raw(), Vector4F::new(-1.0, 2.0, -3.0, 7.0));
}

#[test]
fn test_vector2_operations() {
    let a = Vector2::new(3.0_f32, 4.0);
    let b = Vector2::new(1.0, 0.0);
    assert_eq!(a.length(), 5.0);
    assert_eq!(a.length_squared(), 25.0);
    assert_eq!(a.dot(b), 3.0);
    assert_eq!(b.cross(a), 4.0);
    assert_eq!(a.distance(b), 20.0_f32.sqrt());
    assert_eq!(a.distance_squared(b), 20.0);
    assert_eq!(a.negate(), Vector2::new(-3.0, -4.0));
    assert_eq!(a.reflect(Vector2::new(0.0, 1.0)), Vector2::new(3.0, -4.0));
}

#[test]
fn test_vector2_normalize() {
    let n = Vector2::new(0.0_f64, -2.0).normalize();
    assert_eq!((n.x(), n.y()), (0.0, -1.0));
    let approx = Vector2::new(5.0_f32, 12.0).normalize_approx();
    assert!((approx.x() - 5.0 / 13.0).abs() < 1e-3);
}

#[test]
fn test_as_views_keep_register_unchanged() {
    let raw = Vector4D::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(raw.as_vector2().into_raw(), raw);
    assert_eq!(raw.as_vector3().into_raw(), raw);
    assert_eq!(raw.as_vector3().as_vector2().into_raw(), raw);
}

#[test]
fn test_widening_zeroes_ignored_lanes() {
    let raw = Vector4F::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(raw.as_vector2().widen_to_vector4(), Vector4F::new(1.0, 2.0, 0.0, 0.0));
    assert_eq!(raw.as_vector2().widen_to_vector3(), Vector3::new(1.0, 2.0, 0.0));
    assert_eq!(raw.as_vector3().widen_to_vector4(), Vector4F::new(1.0, 2.0, 3.0, 0.0));
}

#[test]
fn test_widened_view_changes_results() {
    let raw = Vector4F::new(1.0, 1.0, 1.0, 0.0);
    let as_2d = raw.as_vector2();
    assert_eq!(as_2d.length_squared(), 2.0);
    assert_eq!(as_2d.widen_to_vector3().length_squared(), 2.0);
    assert_eq!(raw.as_vector3().length_squared(), 3.0);
}

#[test]
fn test_default_is_zero() {
    assert_eq!(Vector3::<f32>::default(), Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(Vector2::<f64>::default().into_raw(), Vector4D::ZERO);
}
