//! Vector algebra composed from kernel primitives.
//!
//! Nothing here touches an intrinsic: every method is a fixed sequence of
//! [`Kernel`] primitives, so `Software` and `Accelerated` agree exactly
//! wherever their primitives do. The `*_approx` normalisations inherit the
//! divergence of `reciprocal_sqrt_approx`.
//!
//! Dimensioned operations look only at the first N lanes for their dot
//! products; scaling (`normalize*`, `reflect*`) applies to every lane.

use super::Kernel;
use crate::element::Element;
use crate::vector::Vector4;

/// Length, distance, normalisation, reflection and interpolation.
///
/// Blanket-implemented for every [`Kernel`].
pub trait VectorAlgebra<T: Element>: Kernel<T> {
    /// `min(max(v, low), high)` per lane.
    #[inline]
    fn clamp(&self, v: Vector4<T>, low: Vector4<T>, high: Vector4<T>) -> Vector4<T> {
        self.min(self.max(v, low), high)
    }

    /// `from * (1 - weight) + to * weight` per lane.
    ///
    /// Weights outside `[0, 1]` extrapolate. Weight 0 returns `from` and
    /// weight 1 returns `to` exactly for finite inputs, which the
    /// `from + (to - from) * weight` form does not guarantee. Between the
    /// endpoints the two forms can differ in the last bit.
    #[inline]
    fn lerp(&self, from: Vector4<T>, to: Vector4<T>, weight: Vector4<T>) -> Vector4<T> {
        let keep = self.multiply(from, self.subtract(Vector4::ONE, weight));
        self.add(keep, self.multiply(to, weight))
    }

    /// [`lerp`](Self::lerp) with one weight for every lane.
    #[inline]
    fn lerp_scalar(&self, from: Vector4<T>, to: Vector4<T>, weight: T) -> Vector4<T> {
        self.lerp(from, to, Vector4::splat(weight))
    }

    /// Exact `1 / v`.
    #[inline]
    fn reciprocal(&self, v: Vector4<T>) -> Vector4<T> {
        self.divide(Vector4::ONE, v)
    }

    /// Exact `1 / sqrt(v)`.
    #[inline]
    fn reciprocal_sqrt(&self, v: Vector4<T>) -> Vector4<T> {
        self.divide(Vector4::ONE, self.sqrt(v))
    }

    // -------------------------------------------------------------------------
    // Length
    // -------------------------------------------------------------------------

    /// Squared 2D length, broadcast.
    #[inline]
    fn length_squared2(&self, v: Vector4<T>) -> Vector4<T> {
        self.dot2(v, v)
    }

    /// Squared 3D length, broadcast.
    #[inline]
    fn length_squared3(&self, v: Vector4<T>) -> Vector4<T> {
        self.dot3(v, v)
    }

    /// Squared 4D length, broadcast.
    #[inline]
    fn length_squared4(&self, v: Vector4<T>) -> Vector4<T> {
        self.dot4(v, v)
    }

    /// 2D length, broadcast.
    #[inline]
    fn length2(&self, v: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.length_squared2(v))
    }

    /// 3D length, broadcast.
    #[inline]
    fn length3(&self, v: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.length_squared3(v))
    }

    /// 4D length, broadcast.
    #[inline]
    fn length4(&self, v: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.length_squared4(v))
    }

    // -------------------------------------------------------------------------
    // Normalisation
    // -------------------------------------------------------------------------

    /// `v / length2(v)`. A zero vector yields NaN lanes.
    #[inline]
    fn normalize2(&self, v: Vector4<T>) -> Vector4<T> {
        self.divide(v, self.length2(v))
    }

    /// `v / length3(v)`. A zero vector yields NaN lanes.
    #[inline]
    fn normalize3(&self, v: Vector4<T>) -> Vector4<T> {
        self.divide(v, self.length3(v))
    }

    /// `v / length4(v)`. A zero vector yields NaN lanes.
    #[inline]
    fn normalize4(&self, v: Vector4<T>) -> Vector4<T> {
        self.divide(v, self.length4(v))
    }

    /// `v * rsqrt_estimate(dot2(v, v))`.
    #[inline]
    fn normalize_approx2(&self, v: Vector4<T>) -> Vector4<T> {
        self.multiply(v, self.reciprocal_sqrt_approx(self.length_squared2(v)))
    }

    /// `v * rsqrt_estimate(dot3(v, v))`.
    #[inline]
    fn normalize_approx3(&self, v: Vector4<T>) -> Vector4<T> {
        self.multiply(v, self.reciprocal_sqrt_approx(self.length_squared3(v)))
    }

    /// `v * rsqrt_estimate(dot4(v, v))`.
    #[inline]
    fn normalize_approx4(&self, v: Vector4<T>) -> Vector4<T> {
        self.multiply(v, self.reciprocal_sqrt_approx(self.length_squared4(v)))
    }

    // -------------------------------------------------------------------------
    // Distance
    // -------------------------------------------------------------------------

    /// Squared 2D distance, broadcast.
    #[inline]
    fn distance_squared2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.length_squared2(self.subtract(a, b))
    }

    /// Squared 3D distance, broadcast.
    #[inline]
    fn distance_squared3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.length_squared3(self.subtract(a, b))
    }

    /// Squared 4D distance, broadcast.
    #[inline]
    fn distance_squared4(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.length_squared4(self.subtract(a, b))
    }

    /// 2D distance, broadcast.
    #[inline]
    fn distance2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.distance_squared2(a, b))
    }

    /// 3D distance, broadcast.
    #[inline]
    fn distance3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.distance_squared3(a, b))
    }

    /// 4D distance, broadcast.
    #[inline]
    fn distance4(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        self.sqrt(self.distance_squared4(a, b))
    }

    // -------------------------------------------------------------------------
    // Reflection
    // -------------------------------------------------------------------------

    /// `incident - 2 * dot2(incident, normal) * normal`.
    #[inline]
    fn reflect2(&self, incident: Vector4<T>, normal: Vector4<T>) -> Vector4<T> {
        let d = self.dot2(incident, normal);
        self.subtract(incident, self.multiply(self.add(d, d), normal))
    }

    /// `incident - 2 * dot3(incident, normal) * normal`.
    #[inline]
    fn reflect3(&self, incident: Vector4<T>, normal: Vector4<T>) -> Vector4<T> {
        let d = self.dot3(incident, normal);
        self.subtract(incident, self.multiply(self.add(d, d), normal))
    }

    /// `incident - 2 * dot4(incident, normal) * normal`.
    #[inline]
    fn reflect4(&self, incident: Vector4<T>, normal: Vector4<T>) -> Vector4<T> {
        let d = self.dot4(incident, normal);
        self.subtract(incident, self.multiply(self.add(d, d), normal))
    }
}

impl<T: Element, K: Kernel<T>> VectorAlgebra<T> for K {}
