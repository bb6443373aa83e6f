//! Fixed-width vector register, lane accessors and constant registers.
//!
//! `Vector4<T>` is a plain value: four lanes, copied by value, compared
//! bit-for-bit. The kernels in [`crate::kernel`] treat it as an opaque
//! register; the accessors here are for callers and for the scalar fallback.

use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::{Error, Result};

/// Four packed lanes of `T`.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Vector4<T: Element> {
    lanes: [T; 4],
}

/// Four packed `f32` lanes (128-bit register).
pub type Vector4F = Vector4<f32>;
/// Four packed `f64` lanes (256-bit register).
pub type Vector4D = Vector4<f64>;

// =============================================================================
// Construction and lane access
// =============================================================================

impl<T: Element> Vector4<T> {
    /// Builds a register from four lanes.
    #[inline]
    #[must_use]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self {
            lanes: [x, y, z, w],
        }
    }

    /// Broadcasts one value into every lane.
    #[inline]
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }

    /// Builds a register from an array of lanes.
    #[inline]
    #[must_use]
    pub const fn from_array(lanes: [T; 4]) -> Self {
        Self { lanes }
    }

    /// Returns the lanes as an array.
    #[inline]
    #[must_use]
    pub fn to_array(self) -> [T; 4] {
        self.lanes
    }

    /// Borrows the lanes.
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> &[T; 4] {
        &self.lanes
    }

    /// Lane 0.
    #[inline]
    #[must_use]
    pub fn x(self) -> T {
        self.lanes[0]
    }

    /// Lane 1.
    #[inline]
    #[must_use]
    pub fn y(self) -> T {
        self.lanes[1]
    }

    /// Lane 2.
    #[inline]
    #[must_use]
    pub fn z(self) -> T {
        self.lanes[2]
    }

    /// Lane 3.
    #[inline]
    #[must_use]
    pub fn w(self) -> T {
        self.lanes[3]
    }

    /// Lane `index & 3`.
    #[inline]
    #[must_use]
    pub fn lane(self, index: usize) -> T {
        self.lanes[index & 3]
    }

    /// Copy with lane 0 replaced.
    #[inline]
    #[must_use]
    pub fn with_x(self, value: T) -> Self {
        self.with_lane(0, value)
    }

    /// Copy with lane 1 replaced.
    #[inline]
    #[must_use]
    pub fn with_y(self, value: T) -> Self {
        self.with_lane(1, value)
    }

    /// Copy with lane 2 replaced.
    #[inline]
    #[must_use]
    pub fn with_z(self, value: T) -> Self {
        self.with_lane(2, value)
    }

    /// Copy with lane 3 replaced.
    #[inline]
    #[must_use]
    pub fn with_w(self, value: T) -> Self {
        self.with_lane(3, value)
    }

    /// Copy with lane `index & 3` replaced.
    #[inline]
    #[must_use]
    pub fn with_lane(mut self, index: usize, value: T) -> Self {
        self.lanes[index & 3] = value;
        self
    }

    /// Bit patterns of the four lanes.
    #[inline]
    #[must_use]
    pub fn to_bits(self) -> [T::Bits; 4] {
        self.lanes.map(T::to_bits)
    }

    /// Builds a register from four raw lane patterns.
    #[inline]
    #[must_use]
    pub fn from_bits(bits: [T::Bits; 4]) -> Self {
        Self::from_array(bits.map(T::from_bits))
    }

    #[inline]
    pub(crate) fn map(self, f: impl Fn(T) -> T) -> Self {
        Self::from_array(self.lanes.map(f))
    }

    #[inline]
    pub(crate) fn zip_map(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        let (a, b) = (self.lanes, other.lanes);
        Self::new(f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3]))
    }

    #[inline]
    pub(crate) fn zip_bits(self, other: Self, f: impl Fn(T::Bits, T::Bits) -> T::Bits) -> Self {
        self.zip_map(other, |a, b| T::from_bits(f(a.to_bits(), b.to_bits())))
    }

    #[inline]
    pub(crate) fn mask_from(self, other: Self, predicate: impl Fn(T, T) -> bool) -> Self {
        self.zip_map(other, |a, b| if predicate(a, b) { T::ALL_BITS_SET } else { T::ZERO })
    }
}

// =============================================================================
// Constant registers
// =============================================================================

impl<T: Element> Vector4<T> {
    const SET: T = T::ALL_BITS_SET;
    const CLEAR: T = T::ZERO;

    /// All lanes `0.0`.
    pub const ZERO: Self = Self::splat(T::ZERO);
    /// All lanes `1.0`.
    pub const ONE: Self = Self::splat(T::ONE);
    /// All lanes `-1.0`.
    pub const NEG_ONE: Self = Self::splat(T::NEG_ONE);
    /// All lanes `0.5`.
    pub const HALF: Self = Self::splat(T::HALF);
    /// All lanes `+inf`.
    pub const INFINITY: Self = Self::splat(T::INFINITY);
    /// Every bit of every lane set; the boolean-vector "all true".
    pub const ALL_BITS_SET: Self = Self::splat(T::ALL_BITS_SET);
    /// Only the sign bit in each lane (`-0.0`).
    pub const SIGN_MASK: Self = Self::splat(T::SIGN_MASK);
    /// Every bit but the sign bit in each lane.
    pub const ABS_MASK: Self = Self::splat(T::ABS_MASK);

    /// Clears X, keeps Y/Z/W.
    pub const MASK_X: Self = Self::new(Self::CLEAR, Self::SET, Self::SET, Self::SET);
    /// Clears Y, keeps X/Z/W.
    pub const MASK_Y: Self = Self::new(Self::SET, Self::CLEAR, Self::SET, Self::SET);
    /// Clears Z, keeps X/Y/W.
    pub const MASK_Z: Self = Self::new(Self::SET, Self::SET, Self::CLEAR, Self::SET);
    /// Clears W, keeps X/Y/Z.
    pub const MASK_W: Self = Self::new(Self::SET, Self::SET, Self::SET, Self::CLEAR);
    /// Clears X/Y, keeps Z/W.
    pub const MASK_XY: Self = Self::new(Self::CLEAR, Self::CLEAR, Self::SET, Self::SET);
    /// Clears Z/W, keeps X/Y.
    pub const MASK_ZW: Self = Self::new(Self::SET, Self::SET, Self::CLEAR, Self::CLEAR);
    /// Clears X/Y/Z, keeps W.
    pub const MASK_XYZ: Self = Self::new(Self::CLEAR, Self::CLEAR, Self::CLEAR, Self::SET);
    /// Clears Y/Z/W, keeps X.
    pub const MASK_YZW: Self = Self::new(Self::SET, Self::CLEAR, Self::CLEAR, Self::CLEAR);
    /// Clears every lane.
    pub const MASK_XYZW: Self = Self::splat(Self::CLEAR);

    /// `(1, 0, 0, 0)`
    pub const UNIT_X: Self = Self::new(T::ONE, T::ZERO, T::ZERO, T::ZERO);
    /// `(0, 1, 0, 0)`
    pub const UNIT_Y: Self = Self::new(T::ZERO, T::ONE, T::ZERO, T::ZERO);
    /// `(0, 0, 1, 0)`
    pub const UNIT_Z: Self = Self::new(T::ZERO, T::ZERO, T::ONE, T::ZERO);
    /// `(0, 0, 0, 1)`
    pub const UNIT_W: Self = Self::new(T::ZERO, T::ZERO, T::ZERO, T::ONE);

    /// All lanes π.
    pub const PI: Self = Self::splat(T::PI);
    /// All lanes 2π.
    pub const PI2: Self = Self::splat(T::PI2);
    /// All lanes π/2.
    pub const PI_DIV2: Self = Self::splat(T::PI_DIV2);
    /// All lanes 1/(2π).
    pub const ONE_DIV_2PI: Self = Self::splat(T::ONE_DIV_2PI);

    /// Sign bit in X/Y only.
    pub const SIGN_FLIP_2D: Self = Self::new(T::SIGN_MASK, T::SIGN_MASK, T::ZERO, T::ZERO);
    /// Sign bit in X/Y/Z only.
    pub const SIGN_FLIP_3D: Self = Self::new(T::SIGN_MASK, T::SIGN_MASK, T::SIGN_MASK, T::ZERO);
    /// Sign bit in every lane.
    pub const SIGN_FLIP_4D: Self = Self::splat(T::SIGN_MASK);
}

// =============================================================================
// Shuffle controls
// =============================================================================

/// Packs four 2-bit lane selectors into a shuffle control byte.
///
/// Output lane X takes source lane `x`, and so on. The encoding matches the
/// `shufps` immediate: X lives in the low two bits.
#[must_use]
pub const fn shuffle_control(x: u8, y: u8, z: u8, w: u8) -> u8 {
    ((w & 3) << 6) | ((z & 3) << 4) | ((y & 3) << 2) | (x & 3)
}

/// Named shuffle controls.
pub mod shuffle {
    use super::shuffle_control;

    /// Identity.
    pub const XYZW: u8 = shuffle_control(0, 1, 2, 3);
    /// Rotate left by one lane in the first three lanes.
    pub const YZXW: u8 = shuffle_control(1, 2, 0, 3);
    /// Rotate right by one lane in the first three lanes.
    pub const ZXYW: u8 = shuffle_control(2, 0, 1, 3);
    /// Swap within pairs.
    pub const YXWZ: u8 = shuffle_control(1, 0, 3, 2);
    /// Swap halves.
    pub const ZWXY: u8 = shuffle_control(2, 3, 0, 1);
    /// Reverse.
    pub const WZYX: u8 = shuffle_control(3, 2, 1, 0);
    /// Broadcast X.
    pub const XXXX: u8 = shuffle_control(0, 0, 0, 0);
    /// Broadcast Y.
    pub const YYYY: u8 = shuffle_control(1, 1, 1, 1);
    /// Broadcast Z.
    pub const ZZZZ: u8 = shuffle_control(2, 2, 2, 2);
    /// Broadcast W.
    pub const WWWW: u8 = shuffle_control(3, 3, 3, 3);
}

impl<T: Element> Vector4<T> {
    /// Reorders lanes of one register by a [`shuffle_control`] byte.
    #[inline]
    #[must_use]
    pub fn shuffle<const CONTROL: u8>(self) -> Self {
        Self::shuffle2::<CONTROL>(self, self)
    }

    /// Two-source shuffle: X/Y come from `a`, Z/W from `b`.
    #[inline]
    #[must_use]
    pub fn shuffle2<const CONTROL: u8>(a: Self, b: Self) -> Self {
        let pick = |shift: u8| usize::from((CONTROL >> shift) & 3);
        Self::new(
            a.lanes[pick(0)],
            a.lanes[pick(2)],
            b.lanes[pick(4)],
            b.lanes[pick(6)],
        )
    }
}

// =============================================================================
// Memory adapters
// =============================================================================

fn require<T>(slice: &[T], needed: usize) -> Result<()> {
    if slice.len() < needed {
        return Err(Error::SliceTooShort {
            needed,
            actual: slice.len(),
        });
    }
    Ok(())
}

impl<T: Element> Vector4<T> {
    /// Loads two elements; Z and W are zero.
    pub fn load2(src: &[T]) -> Result<Self> {
        require(src, 2)?;
        Ok(Self::new(src[0], src[1], T::ZERO, T::ZERO))
    }

    /// Loads three elements; W is zero.
    pub fn load3(src: &[T]) -> Result<Self> {
        require(src, 3)?;
        Ok(Self::new(src[0], src[1], src[2], T::ZERO))
    }

    /// Loads four elements.
    pub fn load4(src: &[T]) -> Result<Self> {
        require(src, 4)?;
        Ok(Self::new(src[0], src[1], src[2], src[3]))
    }

    /// Stores X and Y.
    pub fn store2(self, dst: &mut [T]) -> Result<()> {
        require(dst, 2)?;
        dst[..2].copy_from_slice(&self.lanes[..2]);
        Ok(())
    }

    /// Stores X, Y and Z.
    pub fn store3(self, dst: &mut [T]) -> Result<()> {
        require(dst, 3)?;
        dst[..3].copy_from_slice(&self.lanes[..3]);
        Ok(())
    }

    /// Stores all four lanes.
    pub fn store4(self, dst: &mut [T]) -> Result<()> {
        require(dst, 4)?;
        dst[..4].copy_from_slice(&self.lanes);
        Ok(())
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T: Element> Default for Vector4<T> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<T: Element> PartialEq for Vector4<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T: Element> Eq for Vector4<T> {}

impl<T: Element> From<[T; 4]> for Vector4<T> {
    fn from(lanes: [T; 4]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Element> From<Vector4<T>> for [T; 4] {
    fn from(v: Vector4<T>) -> Self {
        v.lanes
    }
}

impl<T: Element> fmt::Debug for Vector4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector4")
            .field(&self.lanes[0])
            .field(&self.lanes[1])
            .field(&self.lanes[2])
            .field(&self.lanes[3])
            .finish()
    }
}

impl<T: Element + fmt::Display> fmt::Display for Vector4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.lanes;
        write!(f, "<{x}, {y}, {z}, {w}>")
    }
}

/// Parses `"x,y,z,w"`, or a single value broadcast to every lane.
impl<T: Element + FromStr> FromStr for Vector4<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lanes = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<T>()
                    .map_err(|_| Error::Parse(format!("invalid lane '{}' in '{s}'", part.trim())))
            })
            .collect::<Result<Vec<T>>>()?;
        match lanes.as_slice() {
            [value] => Ok(Self::splat(*value)),
            [x, y, z, w] => Ok(Self::new(*x, *y, *z, *w)),
            _ => Err(Error::Parse(format!(
                "expected 1 or 4 comma-separated lanes, got {} in '{s}'",
                lanes.len()
            ))),
        }
    }
}
