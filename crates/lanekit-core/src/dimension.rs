//! 2D and 3D views over one 4-lane register.
//!
//! A view never changes the register it wraps; it only selects which
//! dimension-specific kernel runs. Moving between views is always an explicit
//! call: `as_*` reinterprets the register as-is, `widen_to_*` zeroes the lanes
//! the narrower view ignored.

use crate::element::Element;
use crate::kernel::{Accelerated, Kernel, VectorAlgebra};
use crate::vector::Vector4;

/// X and Y of a register; Z and W are carried but ignored.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[repr(transparent)]
pub struct Vector2<T: Element>(Vector4<T>);

/// X, Y and Z of a register; W is carried but ignored.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[repr(transparent)]
pub struct Vector3<T: Element>(Vector4<T>);

impl<T: Element> Vector4<T> {
    /// Views the register as 2D without touching Z and W.
    #[inline]
    #[must_use]
    pub const fn as_vector2(self) -> Vector2<T> {
        Vector2(self)
    }

    /// Views the register as 3D without touching W.
    #[inline]
    #[must_use]
    pub const fn as_vector3(self) -> Vector3<T> {
        Vector3(self)
    }
}

// =============================================================================
// Vector2
// =============================================================================

impl<T: Element> Vector2<T> {
    /// Builds a 2D view; Z and W are zero.
    #[inline]
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self(Vector4::new(x, y, T::ZERO, T::ZERO))
    }

    /// The wrapped register, unchanged.
    #[inline]
    #[must_use]
    pub fn into_raw(self) -> Vector4<T> {
        self.0
    }

    /// X lane.
    #[inline]
    #[must_use]
    pub fn x(self) -> T {
        self.0.x()
    }

    /// Y lane.
    #[inline]
    #[must_use]
    pub fn y(self) -> T {
        self.0.y()
    }

    /// 3D view with Z and W zeroed.
    #[inline]
    #[must_use]
    pub fn widen_to_vector3(self) -> Vector3<T> {
        Vector3(self.widen_to_vector4())
    }

    /// Register with Z and W zeroed.
    #[inline]
    #[must_use]
    pub fn widen_to_vector4(self) -> Vector4<T> {
        Vector4::new(self.0.x(), self.0.y(), T::ZERO, T::ZERO)
    }
}

impl<T: Element> Vector2<T>
where
    Accelerated: Kernel<T>,
{
    /// `x*x' + y*y'`.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> T {
        Accelerated.dot2(self.0, other.0).x()
    }

    /// `x*y' - y*x'`, the signed area of the spanned parallelogram.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> T {
        Accelerated.cross2(self.0, other.0).x()
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> T {
        Accelerated.length2(self.0).x()
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> T {
        Accelerated.length_squared2(self.0).x()
    }

    /// Unit vector in the same direction.
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Self {
        Self(Accelerated.normalize2(self.0))
    }

    /// Unit vector from the reciprocal square-root estimate.
    #[inline]
    #[must_use]
    pub fn normalize_approx(self) -> Self {
        Self(Accelerated.normalize_approx2(self.0))
    }

    /// Distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> T {
        Accelerated.distance2(self.0, other.0).x()
    }

    /// Squared distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> T {
        Accelerated.distance_squared2(self.0, other.0).x()
    }

    /// Reflects about `normal`.
    #[inline]
    #[must_use]
    pub fn reflect(self, normal: Self) -> Self {
        Self(Accelerated.reflect2(self.0, normal.0))
    }

    /// Flips the sign of X and Y.
    #[inline]
    #[must_use]
    pub fn negate(self) -> Self {
        Self(Accelerated.negate2(self.0))
    }
}

// =============================================================================
// Vector3
// =============================================================================

impl<T: Element> Vector3<T> {
    /// Builds a 3D view; W is zero.
    #[inline]
    #[must_use]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self(Vector4::new(x, y, z, T::ZERO))
    }

    /// The wrapped register, unchanged.
    #[inline]
    #[must_use]
    pub fn into_raw(self) -> Vector4<T> {
        self.0
    }

    /// X lane.
    #[inline]
    #[must_use]
    pub fn x(self) -> T {
        self.0.x()
    }

    /// Y lane.
    #[inline]
    #[must_use]
    pub fn y(self) -> T {
        self.0.y()
    }

    /// Z lane.
    #[inline]
    #[must_use]
    pub fn z(self) -> T {
        self.0.z()
    }

    /// 2D view of the same register.
    #[inline]
    #[must_use]
    pub fn as_vector2(self) -> Vector2<T> {
        Vector2(self.0)
    }

    /// Register with W zeroed.
    #[inline]
    #[must_use]
    pub fn widen_to_vector4(self) -> Vector4<T> {
        self.0.with_w(T::ZERO)
    }
}

impl<T: Element> Vector3<T>
where
    Accelerated: Kernel<T>,
{
    /// 3D dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, other: Self) -> T {
        Accelerated.dot3(self.0, other.0).x()
    }

    /// 3D cross product; W of the result is zero.
    #[inline]
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self(Accelerated.cross3(self.0, other.0))
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> T {
        Accelerated.length3(self.0).x()
    }

    /// Squared length.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> T {
        Accelerated.length_squared3(self.0).x()
    }

    /// Unit vector in the same direction.
    #[inline]
    #[must_use]
    pub fn normalize(self) -> Self {
        Self(Accelerated.normalize3(self.0))
    }

    /// Unit vector from the reciprocal square-root estimate.
    #[inline]
    #[must_use]
    pub fn normalize_approx(self) -> Self {
        Self(Accelerated.normalize_approx3(self.0))
    }

    /// Distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> T {
        Accelerated.distance3(self.0, other.0).x()
    }

    /// Squared distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance_squared(self, other: Self) -> T {
        Accelerated.distance_squared3(self.0, other.0).x()
    }

    /// Reflects about `normal`.
    #[inline]
    #[must_use]
    pub fn reflect(self, normal: Self) -> Self {
        Self(Accelerated.reflect3(self.0, normal.0))
    }

    /// Flips the sign of X, Y and Z.
    #[inline]
    #[must_use]
    pub fn negate(self) -> Self {
        Self(Accelerated.negate3(self.0))
    }
}

impl<T: Element> Eq for Vector2<T> {}

impl<T: Element> Eq for Vector3<T> {}
