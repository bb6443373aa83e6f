//! Polynomial trigonometry composed from kernel primitives.
//!
//! # Accuracy
//!
//! | Function | Reduction | Polynomial | Bound |
//! |----------|-----------|------------|-------|
//! | `sin`/`cos` | `2π`, reflect to `[-π/2, π/2]` | degree 11 / 10 | ~1e-5 vs libm on `[-100, 100]` (f32) |
//! | `sin_approx`/`cos_approx` | same | degree 7 / 6 | 2e-5 from the precise result |
//! | `tan` | `π/2` quadrants, split constant | rational 7/8 | relative 1e-5 on `(-1.4, 1.4)` |
//! | `tan_approx` | `π` | rational 3/2 | relative 5e-3 on `(-1.4, 1.4)` |
//! | `atan` | reciprocal for `\|v\| > 1` | degree 17 | ~1e-6 |
//!
//! Coefficients are decimal constants converted once per call with
//! [`Element::from_f64`], so `f32` and `f64` share them.

use super::Kernel;
use crate::element::Element;
use crate::vector::Vector4;

const SIN: [f64; 6] = [
    -2.388_985_9e-8,
    2.752_556_2e-6,
    -1.984_087_4e-4,
    8.333_331e-3,
    -1.666_666_7e-1,
    1.0,
];

const COS: [f64; 6] = [
    -2.605_161_5e-7,
    2.476_049_5e-5,
    -1.388_837_8e-3,
    4.166_663_8e-2,
    -0.5,
    1.0,
];

const SIN_APPROX: [f64; 4] = [-1.852_467e-4, 8.313_950_2e-3, -1.666_585_2e-1, 1.0];

const COS_APPROX: [f64; 4] = [-1.271_243_6e-3, 4.149_391_9e-2, -4.999_274_6e-1, 1.0];

const TAN_NUMERATOR: [f64; 3] = [-1.786_170_734e-5, 3.424_887_824e-3, -1.333_835_001e-1];

const TAN_DENOMINATOR: [f64; 5] = [
    4.981_943_399e-7,
    -3.118_153_191e-4,
    2.566_383_229e-2,
    -4.667_168_334e-1,
    1.0,
];

/// π/2 split into a head exactly representable in `f32` and a tail.
const TAN_HALF_PI_HEAD: f64 = 1.570_796_371;
const TAN_HALF_PI_TAIL: f64 = 6.077_100_628e-11;
/// Below this reduced magnitude `tan(x) == x` to working precision.
const TAN_LINEAR_BOUND: f64 = 0.000_244_140_625;

const TAN_APPROX_NUMERATOR_LINEAR: f64 = 2.484;
const TAN_APPROX_NUMERATOR_CUBIC: f64 = -1.954_923_183e-1;
const TAN_APPROX_DENOMINATOR: f64 = 2.467_401_101;

const ATAN: [f64; 9] = [
    2.866_225_7e-3,
    -1.616_573_67e-2,
    4.290_961_38e-2,
    -7.528_964e-2,
    1.065_626_393e-1,
    -1.420_889_944e-1,
    1.999_355_085e-1,
    -3.333_314_528e-1,
    1.0,
];

#[inline]
fn constant<T: Element>(value: f64) -> Vector4<T> {
    Vector4::splat(T::from_f64(value))
}

/// Horner evaluation in `x2`, highest-order coefficient first.
#[inline]
fn horner<T: Element, K: Kernel<T> + ?Sized>(k: &K, x2: Vector4<T>, coefficients: &[f64]) -> Vector4<T> {
    coefficients
        .iter()
        .skip(1)
        .fold(constant(coefficients[0]), |acc, &c| k.add(k.multiply(acc, x2), constant(c)))
}

/// Wraps into `[-π, π]` and reflects into `[-π/2, π/2]`.
///
/// Returns the reduced angle and the lanes that needed no reflection.
#[inline]
fn reduce_half_pi<T: Element, K: Kernel<T> + ?Sized>(k: &K, v: Vector4<T>) -> (Vector4<T>, Vector4<T>) {
    let x = k.wrap_angle(v);
    let sign = k.and(x, Vector4::SIGN_MASK);
    let signed_pi = k.or(Vector4::PI, sign);
    let magnitude = k.and_not(sign, x);
    let reflected = k.subtract(signed_pi, x);
    let direct = k.compare_less_than_or_equal(magnitude, Vector4::PI_DIV2);
    (k.select(direct, x, reflected), direct)
}

#[inline]
fn quadrant_sign<T: Element, K: Kernel<T> + ?Sized>(k: &K, direct: Vector4<T>) -> Vector4<T> {
    k.select(direct, Vector4::ONE, Vector4::NEG_ONE)
}

/// Sine, cosine, tangent and arctangent.
///
/// Blanket-implemented for every [`Kernel`]. Non-finite inputs produce NaN,
/// except that `atan(±∞) = ±π/2`.
pub trait Trigonometry<T: Element>: Kernel<T> {
    /// `v - round(v / 2π) * 2π`, the angle wrapped into `[-π, π]`.
    #[inline]
    fn wrap_angle(&self, v: Vector4<T>) -> Vector4<T> {
        let turns = self.round(self.multiply(v, Vector4::ONE_DIV_2PI));
        self.subtract(v, self.multiply(turns, Vector4::PI2))
    }

    /// Sine, degree-11 polynomial.
    #[inline]
    fn sin(&self, v: Vector4<T>) -> Vector4<T> {
        let (x, _) = reduce_half_pi(self, v);
        self.multiply(horner(self, self.multiply(x, x), &SIN), x)
    }

    /// Cosine, degree-10 polynomial.
    #[inline]
    fn cos(&self, v: Vector4<T>) -> Vector4<T> {
        let (x, direct) = reduce_half_pi(self, v);
        let poly = horner(self, self.multiply(x, x), &COS);
        self.multiply(poly, quadrant_sign(self, direct))
    }

    /// `(sin(v), cos(v))` sharing one range reduction.
    #[inline]
    fn sin_cos(&self, v: Vector4<T>) -> (Vector4<T>, Vector4<T>) {
        let (x, direct) = reduce_half_pi(self, v);
        let x2 = self.multiply(x, x);
        let sin = self.multiply(horner(self, x2, &SIN), x);
        let cos = self.multiply(horner(self, x2, &COS), quadrant_sign(self, direct));
        (sin, cos)
    }

    /// Sine, degree-7 polynomial.
    #[inline]
    fn sin_approx(&self, v: Vector4<T>) -> Vector4<T> {
        let (x, _) = reduce_half_pi(self, v);
        self.multiply(horner(self, self.multiply(x, x), &SIN_APPROX), x)
    }

    /// Cosine, degree-6 polynomial.
    #[inline]
    fn cos_approx(&self, v: Vector4<T>) -> Vector4<T> {
        let (x, direct) = reduce_half_pi(self, v);
        let poly = horner(self, self.multiply(x, x), &COS_APPROX);
        self.multiply(poly, quadrant_sign(self, direct))
    }

    /// `(sin_approx(v), cos_approx(v))` sharing one range reduction.
    #[inline]
    fn sin_cos_approx(&self, v: Vector4<T>) -> (Vector4<T>, Vector4<T>) {
        let (x, direct) = reduce_half_pi(self, v);
        let x2 = self.multiply(x, x);
        let sin = self.multiply(horner(self, x2, &SIN_APPROX), x);
        let cos = self.multiply(horner(self, x2, &COS_APPROX), quadrant_sign(self, direct));
        (sin, cos)
    }

    /// Tangent, rational approximation over `π/2` quadrants.
    ///
    /// Odd quadrants return `-1 / tan` of the reduced angle; `tan(±0) = ±0`.
    fn tan(&self, v: Vector4<T>) -> Vector4<T> {
        let quadrant = self.round(self.multiply(v, Vector4::splat(T::TWO_DIV_PI)));
        let head = self.subtract(v, self.multiply(quadrant, constant(TAN_HALF_PI_HEAD)));
        let x = self.subtract(head, self.multiply(quadrant, constant(TAN_HALF_PI_TAIL)));
        let x2 = self.multiply(x, x);

        let numerator = self.multiply(x2, horner(self, x2, &TAN_NUMERATOR));
        let numerator = self.add(self.multiply(x, numerator), x);
        let denominator = horner(self, x2, &TAN_DENOMINATOR);

        let linear = self.in_bounds(x, constant(TAN_LINEAR_BOUND));
        let numerator = self.select(linear, x, numerator);
        let denominator = self.select(linear, Vector4::ONE, denominator);

        let half = self.multiply(quadrant, Vector4::HALF);
        let even = self.compare_equal(half, self.truncate(half));
        let result = self.select(
            even,
            self.divide(numerator, denominator),
            self.divide(denominator, self.negate(numerator)),
        );
        self.select(self.is_zero(v), v, result)
    }

    /// Tangent, rational approximation over `π` periods.
    fn tan_approx(&self, v: Vector4<T>) -> Vector4<T> {
        let periods = self.round(self.multiply(v, Vector4::splat(T::ONE_DIV_PI)));
        let x = self.subtract(v, self.multiply(Vector4::PI, periods));
        let x2 = self.multiply(x, x);
        let cubic = self.multiply(x2, self.multiply(x, constant(TAN_APPROX_NUMERATOR_CUBIC)));
        let numerator = self.add(cubic, self.multiply(x, constant(TAN_APPROX_NUMERATOR_LINEAR)));
        let denominator = self.subtract(constant(TAN_APPROX_DENOMINATOR), x2);
        self.divide(numerator, denominator)
    }

    /// Arctangent, result in `[-π/2, π/2]`.
    fn atan(&self, v: Vector4<T>) -> Vector4<T> {
        let inverse = self.divide(Vector4::ONE, v);
        let above = self.compare_greater_than(v, Vector4::ONE);
        let sign = self.select(above, Vector4::ONE, Vector4::NEG_ONE);
        let inside = self.compare_less_than_or_equal(self.abs(v), Vector4::ONE);
        let sign = self.select(inside, Vector4::ZERO, sign);
        let x = self.select(inside, v, inverse);

        let poly = self.multiply(horner(self, self.multiply(x, x), &ATAN), x);
        let reflected = self.subtract(self.multiply(sign, Vector4::PI_DIV2), poly);
        self.select(self.is_zero(sign), poly, reflected)
    }

    /// Angle of the point `(x, y)`, result in `[-π, π]`.
    ///
    /// Zero and infinite operands follow the C `atan2` table; a NaN in
    /// either operand yields NaN.
    fn atan2(&self, y: Vector4<T>, x: Vector4<T>) -> Vector4<T> {
        let y_sign = self.and(y, Vector4::SIGN_MASK);
        let pi = self.or(Vector4::PI, y_sign);
        let pi_div2 = self.or(Vector4::PI_DIV2, y_sign);
        let pi_div4 = self.or(Vector4::splat(T::PI_DIV4), y_sign);
        let three_pi_div4 = self.or(Vector4::splat(T::THREE_PI_DIV4), y_sign);

        let y_zero = self.is_zero(y);
        let x_zero = self.is_zero(x);
        let x_positive = self.equal_bits(self.and(x, Vector4::SIGN_MASK), Vector4::ZERO);
        let y_infinite = self.is_infinite(y);
        let x_infinite = self.is_infinite(x);

        let on_x_axis = self.select(x_positive, y_sign, pi);
        let on_y_axis = self.select(x_zero, pi_div2, Vector4::ALL_BITS_SET);
        let finite_y = self.select(y_zero, on_x_axis, on_y_axis);
        let corner = self.select(x_positive, pi_div4, three_pi_div4);
        let infinite_y = self.select(x_infinite, corner, pi_div2);
        let special = self.select(y_infinite, infinite_y, finite_y);
        let general = self.equal_bits(special, Vector4::ALL_BITS_SET);

        let offset = self.select(x_positive, Vector4::ZERO, pi);
        let angle = self.add(self.atan(self.divide(y, x)), offset);
        let result = self.select(general, angle, special);

        let nan = self.or(self.is_nan(x), self.is_nan(y));
        self.select(nan, self.add(x, y), result)
    }
}

impl<T: Element, K: Kernel<T>> Trigonometry<T> for K {}
