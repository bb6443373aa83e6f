//! Lane element abstraction.
//!
//! `Element` is implemented for `f32` (4 lanes in a 128-bit register) and
//! `f64` (4 lanes in a 256-bit register). Every generic algorithm in the crate
//! is written once against this trait.

use std::fmt::Debug;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A floating-point lane type.
pub trait Element:
    sealed::Sealed
    + Copy
    + Debug
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
    + Neg<Output = Self>
{
    /// Raw bit pattern of one lane.
    type Bits: Copy
        + Eq
        + Debug
        + BitAnd<Output = Self::Bits>
        + BitOr<Output = Self::Bits>
        + BitXor<Output = Self::Bits>
        + Not<Output = Self::Bits>;

    /// Short type name used in reports (`"f32"` / `"f64"`).
    const NAME: &'static str;

    /// `0.0`
    const ZERO: Self;
    /// `1.0`
    const ONE: Self;
    /// `-1.0`
    const NEG_ONE: Self;
    /// `0.5`
    const HALF: Self;
    /// Positive infinity.
    const INFINITY: Self;
    /// Every bit set. Reinterpreted as a float this is a NaN.
    const ALL_BITS_SET: Self;
    /// Only the sign bit set (`-0.0`).
    const SIGN_MASK: Self;
    /// Every bit except the sign bit.
    const ABS_MASK: Self;

    /// π
    const PI: Self;
    /// 2π
    const PI2: Self;
    /// π/2
    const PI_DIV2: Self;
    /// π/4
    const PI_DIV4: Self;
    /// 3π/4
    const THREE_PI_DIV4: Self;
    /// 1/π
    const ONE_DIV_PI: Self;
    /// 1/(2π)
    const ONE_DIV_2PI: Self;
    /// 2/π
    const TWO_DIV_PI: Self;

    /// Reinterprets the lane as raw bits.
    fn to_bits(self) -> Self::Bits;
    /// Reinterprets raw bits as a lane.
    fn from_bits(bits: Self::Bits) -> Self;
    /// Converts a decimal polynomial coefficient to this precision.
    fn from_f64(value: f64) -> Self;
    /// Widens the lane to `f64` for reports.
    fn to_f64(self) -> f64;

    /// Correctly rounded square root.
    fn sqrt(self) -> Self;
    /// Round toward negative infinity.
    fn floor(self) -> Self;
    /// Round toward zero.
    fn trunc(self) -> Self;
    /// Round to nearest, ties to even.
    fn round_ties_even(self) -> Self;
    /// Single-rounded `self * a + b`.
    fn mul_add(self, a: Self, b: Self) -> Self;
    /// `true` for any NaN pattern.
    fn is_nan(self) -> bool;
    /// `true` for finite, non-zero, non-subnormal values.
    fn is_normal(self) -> bool;
    /// `true` when the sign bit is set (including `-0.0` and negative NaNs).
    fn is_sign_negative(self) -> bool;
}

impl Element for f32 {
    type Bits = u32;

    const NAME: &'static str = "f32";

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const NEG_ONE: Self = -1.0;
    const HALF: Self = 0.5;
    const INFINITY: Self = f32::INFINITY;
    const ALL_BITS_SET: Self = f32::from_bits(u32::MAX);
    const SIGN_MASK: Self = f32::from_bits(0x8000_0000);
    const ABS_MASK: Self = f32::from_bits(0x7FFF_FFFF);

    const PI: Self = std::f32::consts::PI;
    const PI2: Self = std::f32::consts::PI * 2.0;
    const PI_DIV2: Self = std::f32::consts::PI / 2.0;
    const PI_DIV4: Self = std::f32::consts::PI / 4.0;
    const THREE_PI_DIV4: Self = std::f32::consts::PI * 3.0 / 4.0;
    const ONE_DIV_PI: Self = 1.0 / std::f32::consts::PI;
    const ONE_DIV_2PI: Self = 1.0 / (std::f32::consts::PI * 2.0);
    const TWO_DIV_PI: Self = std::f32::consts::FRAC_2_PI;

    #[inline]
    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    #[inline]
    fn from_bits(bits: u32) -> Self {
        f32::from_bits(bits)
    }

    // Coefficients are authored as f64 decimals.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    #[inline]
    fn floor(self) -> Self {
        f32::floor(self)
    }

    #[inline]
    fn trunc(self) -> Self {
        f32::trunc(self)
    }

    #[inline]
    fn round_ties_even(self) -> Self {
        f32::round_ties_even(self)
    }

    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        f32::mul_add(self, a, b)
    }

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline]
    fn is_normal(self) -> bool {
        f32::is_normal(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        f32::is_sign_negative(self)
    }
}

impl Element for f64 {
    type Bits = u64;

    const NAME: &'static str = "f64";

    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const NEG_ONE: Self = -1.0;
    const HALF: Self = 0.5;
    const INFINITY: Self = f64::INFINITY;
    const ALL_BITS_SET: Self = f64::from_bits(u64::MAX);
    const SIGN_MASK: Self = f64::from_bits(0x8000_0000_0000_0000);
    const ABS_MASK: Self = f64::from_bits(0x7FFF_FFFF_FFFF_FFFF);

    const PI: Self = std::f64::consts::PI;
    const PI2: Self = std::f64::consts::PI * 2.0;
    const PI_DIV2: Self = std::f64::consts::PI / 2.0;
    const PI_DIV4: Self = std::f64::consts::PI / 4.0;
    const THREE_PI_DIV4: Self = std::f64::consts::PI * 3.0 / 4.0;
    const ONE_DIV_PI: Self = 1.0 / std::f64::consts::PI;
    const ONE_DIV_2PI: Self = 1.0 / (std::f64::consts::PI * 2.0);
    const TWO_DIV_PI: Self = std::f64::consts::FRAC_2_PI;

    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn floor(self) -> Self {
        f64::floor(self)
    }

    #[inline]
    fn trunc(self) -> Self {
        f64::trunc(self)
    }

    #[inline]
    fn round_ties_even(self) -> Self {
        f64::round_ties_even(self)
    }

    #[inline]
    fn mul_add(self, a: Self, b: Self) -> Self {
        f64::mul_add(self, a, b)
    }

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn is_normal(self) -> bool {
        f64::is_normal(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        f64::is_sign_negative(self)
    }
}
