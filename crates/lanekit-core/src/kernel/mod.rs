//! Dual-path kernel: one strategy trait, a software oracle and a
//! capability-dispatched accelerated implementation.
//!
//! # Module Structure
//!
//! - `software`: scalar-per-lane implementation of every primitive; the
//!   correctness oracle
//! - `accelerated`: per-element dispatch on the cached capability set
//! - `x86_sse`: SSE/SSE2/SSE3/SSE4.1/FMA kernels for `f32` (x86_64 only)
//! - `x86_avx`: AVX/AVX2/FMA kernels for `f64` (x86_64 only)
//! - `neon`: NEON kernels for `f32` (aarch64 only)
//! - `algebra`: length, normalize, distance, reflect, lerp built on primitives
//! - `trig`: sin/cos/tan/atan polynomial kernels built on primitives
//!
//! # Parity
//!
//! Primitives are implemented separately per path and must agree exactly
//! (NaN payloads aside). Everything else is a provided method composed only
//! from primitives, so it agrees whenever the primitives do. The only
//! intentionally divergent primitives are `reciprocal_approx` and
//! `reciprocal_sqrt_approx`.
#![allow(clippy::doc_markdown)] // ISA nomenclature in docs.

use crate::element::Element;
use crate::vector::Vector4;

mod accelerated;
mod algebra;
mod software;
mod trig;

#[cfg(test)]
mod trig_tests;

#[cfg(target_arch = "x86_64")]
mod x86_avx;
#[cfg(target_arch = "x86_64")]
mod x86_sse;
#[cfg(all(test, target_arch = "x86_64"))]
mod x86_sse_tests;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(all(test, target_arch = "aarch64"))]
mod neon_tests;

pub use accelerated::Accelerated;
pub use algebra::VectorAlgebra;
pub use software::Software;
pub use trig::Trigonometry;

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for SIMD unsafe blocks in this module tree.
// - Condition 1: Target-featured functions are called only after the cached
//   capability set reports the feature, or on architectures where the
//   feature is guaranteed.
// - Condition 2: Registers are moved in and out of `Vector4` with unaligned
//   load/store intrinsics on pointers to a live `[T; 4]`.

// =============================================================================
// Lane masks
// =============================================================================

/// Set of lanes a mask reduction looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LaneMask(u8);

impl LaneMask {
    /// No lanes.
    pub const NONE: LaneMask = LaneMask(0);
    /// Lane X.
    pub const X: LaneMask = LaneMask(0b0001);
    /// Lane Y.
    pub const Y: LaneMask = LaneMask(0b0010);
    /// Lane Z.
    pub const Z: LaneMask = LaneMask(0b0100);
    /// Lane W.
    pub const W: LaneMask = LaneMask(0b1000);
    /// Lanes X and Y.
    pub const XY: LaneMask = LaneMask(0b0011);
    /// Lanes X, Y and Z.
    pub const XYZ: LaneMask = LaneMask(0b0111);
    /// Every lane.
    pub const ALL: LaneMask = LaneMask(0b1111);

    /// Raw 4-bit set, X in bit 0.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// Union of two lane sets.
    #[must_use]
    pub const fn union(self, other: LaneMask) -> LaneMask {
        LaneMask(self.0 | other.0)
    }
}

// =============================================================================
// Strategy trait
// =============================================================================

/// One implementation strategy of the vector kernel.
///
/// Boolean-vector results are always all-bits-set (true) or all-bits-clear
/// (false) per lane.
pub trait Kernel<T: Element>: Copy + Send + Sync + 'static {
    /// Short name of the strategy, for reports.
    fn name(&self) -> &'static str;

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    /// Lane-wise `a + b`.
    fn add(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `a - b`.
    fn subtract(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `a * b`.
    fn multiply(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `a / b`.
    fn divide(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise correctly rounded square root.
    fn sqrt(&self, v: Vector4<T>) -> Vector4<T>;
    /// Lane-wise maximum. A NaN lane takes the other operand; ties take `b`.
    fn max(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise minimum. A NaN lane takes the other operand; ties take `b`.
    fn min(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `(a.x + a.y, a.z + a.w, b.x + b.y, b.z + b.w)`.
    fn horizontal_add(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise truncated remainder, as scalar `%`.
    fn remainder(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise round toward negative infinity.
    fn floor(&self, v: Vector4<T>) -> Vector4<T>;
    /// Lane-wise round to nearest, ties to even.
    fn round(&self, v: Vector4<T>) -> Vector4<T>;
    /// Lane-wise round toward zero.
    fn truncate(&self, v: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `a * b + c` with a single rounding.
    fn fused_multiply_add(&self, a: Vector4<T>, b: Vector4<T>, c: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `1 / v` estimate. Exact on the software path.
    fn reciprocal_approx(&self, v: Vector4<T>) -> Vector4<T>;
    /// Lane-wise `1 / sqrt(v)` estimate. Exact on the software path.
    fn reciprocal_sqrt_approx(&self, v: Vector4<T>) -> Vector4<T>;

    // -------------------------------------------------------------------------
    // Vector products
    // -------------------------------------------------------------------------

    /// `(a.x*b.x + a.y*b.y)` broadcast into every lane.
    fn dot2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// 3D dot product broadcast into every lane.
    fn dot3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// 4D dot product broadcast into every lane.
    ///
    /// Every dot product sums pairwise: `(p0 + p1) + (p2 + p3)`, with
    /// unused lanes contributing `+0.0`.
    fn dot4(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// 2D cross product (the signed parallelogram area) broadcast.
    fn cross2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// 3D cross product; W is `+0.0`.
    fn cross3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// 4D cross product: a vector orthogonal to `a`, `b` and `c`.
    fn cross4(&self, a: Vector4<T>, b: Vector4<T>, c: Vector4<T>) -> Vector4<T>;

    // -------------------------------------------------------------------------
    // Comparisons
    // -------------------------------------------------------------------------

    /// `a == b`; false when either lane is NaN.
    fn compare_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `!(a == b)`; true when either lane is NaN.
    fn compare_not_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `!(a <= b)`; true when either lane is NaN.
    fn compare_greater_than(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `!(a < b)`; true when either lane is NaN.
    fn compare_greater_than_or_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `a < b`; false when either lane is NaN.
    fn compare_less_than(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// `a <= b`; false when either lane is NaN.
    fn compare_less_than_or_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;

    // -------------------------------------------------------------------------
    // Bitwise
    // -------------------------------------------------------------------------

    /// Bitwise `a & b`.
    fn and(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Bitwise `a | b`.
    fn or(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Bitwise `a ^ b`.
    fn xor(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Bitwise `!v`.
    fn not(&self, v: Vector4<T>) -> Vector4<T>;
    /// Bitwise `!a & b`.
    fn and_not(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Lane-wise raw bit equality (NaN patterns compare by bits).
    fn equal_bits(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T>;
    /// Sign bit of each lane packed into bits 0..4, X in bit 0.
    fn move_mask(&self, v: Vector4<T>) -> u32;

    // -------------------------------------------------------------------------
    // Lane broadcast
    // -------------------------------------------------------------------------

    /// Broadcasts X.
    fn fill_with_x(&self, v: Vector4<T>) -> Vector4<T>;
    /// Broadcasts Y.
    fn fill_with_y(&self, v: Vector4<T>) -> Vector4<T>;
    /// Broadcasts Z.
    fn fill_with_z(&self, v: Vector4<T>) -> Vector4<T>;
    /// Broadcasts W.
    fn fill_with_w(&self, v: Vector4<T>) -> Vector4<T>;

    // =========================================================================
    // Provided: sign and mask helpers
    // =========================================================================

    /// Picks `when_true` where `mask` bits are set, `when_false` elsewhere.
    #[inline]
    fn select(&self, mask: Vector4<T>, when_true: Vector4<T>, when_false: Vector4<T>) -> Vector4<T> {
        self.or(self.and(mask, when_true), self.and_not(mask, when_false))
    }

    /// Flips the sign bit of every lane.
    #[inline]
    fn negate(&self, v: Vector4<T>) -> Vector4<T> {
        self.negate4(v)
    }

    /// Flips the sign of X and Y only.
    #[inline]
    fn negate2(&self, v: Vector4<T>) -> Vector4<T> {
        self.xor(v, Vector4::SIGN_FLIP_2D)
    }

    /// Flips the sign of X, Y and Z only.
    #[inline]
    fn negate3(&self, v: Vector4<T>) -> Vector4<T> {
        self.xor(v, Vector4::SIGN_FLIP_3D)
    }

    /// Flips the sign of every lane.
    #[inline]
    fn negate4(&self, v: Vector4<T>) -> Vector4<T> {
        self.xor(v, Vector4::SIGN_FLIP_4D)
    }

    /// Clears the sign bit of every lane.
    #[inline]
    fn abs(&self, v: Vector4<T>) -> Vector4<T> {
        self.and_not(Vector4::SIGN_MASK, v)
    }

    /// Clears W.
    #[inline]
    fn zero_w(&self, v: Vector4<T>) -> Vector4<T> {
        self.and(v, Vector4::MASK_W)
    }

    /// Magnitude of `magnitude` with the sign bit of `sign`.
    #[inline]
    fn copy_sign(&self, magnitude: Vector4<T>, sign: Vector4<T>) -> Vector4<T> {
        self.or(
            self.and_not(Vector4::SIGN_MASK, magnitude),
            self.extract_sign(sign),
        )
    }

    /// Only the sign bit of each lane (`+0.0` or `-0.0`).
    #[inline]
    fn extract_sign(&self, v: Vector4<T>) -> Vector4<T> {
        self.and(v, Vector4::SIGN_MASK)
    }

    // =========================================================================
    // Provided: predicates
    // =========================================================================

    /// True in NaN lanes.
    #[inline]
    fn is_nan(&self, v: Vector4<T>) -> Vector4<T> {
        self.compare_not_equal(v, v)
    }

    /// True in ±∞ lanes.
    #[inline]
    fn is_infinite(&self, v: Vector4<T>) -> Vector4<T> {
        self.compare_equal(self.abs(v), Vector4::INFINITY)
    }

    /// True in lanes that are neither NaN nor infinite.
    #[inline]
    fn is_finite(&self, v: Vector4<T>) -> Vector4<T> {
        self.compare_less_than(self.abs(v), Vector4::INFINITY)
    }

    /// True in ±0 lanes.
    #[inline]
    fn is_zero(&self, v: Vector4<T>) -> Vector4<T> {
        self.compare_equal(v, Vector4::ZERO)
    }

    /// True where `-bounds <= v <= bounds`.
    #[inline]
    fn in_bounds(&self, v: Vector4<T>, bounds: Vector4<T>) -> Vector4<T> {
        let upper = self.compare_less_than_or_equal(v, bounds);
        let lower = self.compare_greater_than_or_equal(v, self.negate(bounds));
        self.and(upper, lower)
    }

    // =========================================================================
    // Provided: mask reductions
    // =========================================================================

    /// Every lane in `lanes` is true.
    #[inline]
    fn all_true(&self, mask: Vector4<T>, lanes: LaneMask) -> bool {
        self.move_mask(mask) & lanes.bits() == lanes.bits()
    }

    /// At least one lane in `lanes` is true.
    #[inline]
    fn any_true(&self, mask: Vector4<T>, lanes: LaneMask) -> bool {
        self.move_mask(mask) & lanes.bits() != 0
    }

    /// Every lane in `lanes` is false.
    #[inline]
    fn all_false(&self, mask: Vector4<T>, lanes: LaneMask) -> bool {
        self.move_mask(mask) & lanes.bits() == 0
    }

    /// At least one lane in `lanes` is false.
    #[inline]
    fn any_false(&self, mask: Vector4<T>, lanes: LaneMask) -> bool {
        self.move_mask(mask) & lanes.bits() != lanes.bits()
    }

    /// Lanes in `lanes` hold both true and false values.
    #[inline]
    fn mixed(&self, mask: Vector4<T>, lanes: LaneMask) -> bool {
        self.any_true(mask, lanes) && self.any_false(mask, lanes)
    }
}
