//! ARM NEON kernel implementations for `f32` on aarch64.
//!
//! NEON is always available on aarch64, so no runtime detection is needed
//! beyond honouring a software override in the capability set.

// SAFETY: Casts in this file are intentional and safe:
// - shuffle-control fields are 2-bit lane indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::wildcard_imports)]

use std::arch::aarch64::*;

use crate::vector::{shuffle, shuffle_control, Vector4F};

#[inline(always)]
fn load(v: Vector4F) -> float32x4_t {
    // SAFETY: `as_array` points at four live f32 values; vld1q_f32 is unaligned-safe.
    unsafe { vld1q_f32(v.as_array().as_ptr()) }
}

#[inline(always)]
fn store(r: float32x4_t) -> Vector4F {
    let mut out = [0.0_f32; 4];
    // SAFETY: `out` has room for exactly four f32 values.
    unsafe { vst1q_f32(out.as_mut_ptr(), r) };
    Vector4F::from_array(out)
}

#[inline(always)]
fn bits(v: float32x4_t) -> uint32x4_t {
    // SAFETY: reinterpretation between same-width registers is always valid.
    unsafe { vreinterpretq_u32_f32(v) }
}

#[inline(always)]
fn float(v: uint32x4_t) -> float32x4_t {
    // SAFETY: reinterpretation between same-width registers is always valid.
    unsafe { vreinterpretq_f32_u32(v) }
}

/// Byte indices for `vqtbl1q_u8` that realise a `shuffle_control` byte.
const fn lane_table(control: u8) -> [u8; 16] {
    let mut table = [0_u8; 16];
    let mut lane = 0;
    while lane < 4 {
        let source = (control >> (2 * lane)) & 0b11;
        let mut byte = 0;
        while byte < 4 {
            table[lane * 4 + byte] = source * 4 + byte as u8;
            byte += 1;
        }
        lane += 1;
    }
    table
}

/// Byte indices for one shuffle control, evaluated at compile time.
pub(crate) struct LaneTable<const CONTROL: u8>;

impl<const CONTROL: u8> LaneTable<CONTROL> {
    pub(crate) const BYTES: [u8; 16] = lane_table(CONTROL);
}

#[inline(always)]
fn permute<const CONTROL: u8>(v: float32x4_t) -> float32x4_t {
    // SAFETY: NEON is baseline on aarch64; the table holds sixteen valid byte indices.
    unsafe {
        let idx = vld1q_u8(LaneTable::<CONTROL>::BYTES.as_ptr());
        vreinterpretq_f32_u8(vqtbl1q_u8(vreinterpretq_u8_f32(v), idx))
    }
}

/// Two-operand float kernels that map onto a single instruction.
macro_rules! neon_arith {
    ($($(#[$doc:meta])* $name:ident => $intrinsic:ident;)*) => {$(
        $(#[$doc])*
        #[inline]
        pub(crate) fn $name(a: Vector4F, b: Vector4F) -> Vector4F {
            // SAFETY: NEON intrinsics are always safe on aarch64.
            store(unsafe { $intrinsic(load(a), load(b)) })
        }
    )*};
}

/// Two-operand kernels over the raw lane bits.
macro_rules! neon_bits {
    ($($(#[$doc:meta])* $name:ident => |$a:ident, $b:ident| $body:expr;)*) => {$(
        $(#[$doc])*
        #[inline]
        pub(crate) fn $name(a: Vector4F, b: Vector4F) -> Vector4F {
            let ($a, $b) = (bits(load(a)), bits(load(b)));
            // SAFETY: NEON intrinsics are always safe on aarch64.
            store(float(unsafe { $body }))
        }
    )*};
}

// =============================================================================
// Arithmetic
// =============================================================================

neon_arith! {
    /// Lane-wise addition.
    add => vaddq_f32;
    /// Lane-wise subtraction.
    subtract => vsubq_f32;
    /// Lane-wise multiplication.
    multiply => vmulq_f32;
    /// Lane-wise division.
    divide => vdivq_f32;
    /// `(a.x + a.y, a.z + a.w, b.x + b.y, b.z + b.w)`.
    horizontal_add => vpaddq_f32;
}

/// Lane-wise square root.
#[inline]
pub(crate) fn sqrt(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vsqrtq_f32(load(v)) })
}

/// Lane-wise maximum; `b`'s NaN lanes take `a`, everything else follows `a > b ? a : b`.
#[inline]
pub(crate) fn max(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let picked = vbslq_f32(vcgtq_f32(va, vb), va, vb);
        vbslq_f32(vmvnq_u32(vceqq_f32(vb, vb)), va, picked)
    })
}

/// Lane-wise minimum; `b`'s NaN lanes take `a`, everything else follows `a < b ? a : b`.
#[inline]
pub(crate) fn min(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let picked = vbslq_f32(vcltq_f32(va, vb), va, vb);
        vbslq_f32(vmvnq_u32(vceqq_f32(vb, vb)), va, picked)
    })
}

/// Round to nearest, ties to even.
#[inline]
pub(crate) fn round(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vrndnq_f32(load(v)) })
}

/// Round toward negative infinity.
#[inline]
pub(crate) fn floor(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vrndmq_f32(load(v)) })
}

/// Round toward zero.
#[inline]
pub(crate) fn truncate(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vrndq_f32(load(v)) })
}

/// `a * b + c`, single rounding.
#[inline]
pub(crate) fn fused_multiply_add(a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vfmaq_f32(load(c), load(a), load(b)) })
}

/// Reciprocal estimate refined by one Newton-Raphson step.
#[inline]
pub(crate) fn reciprocal_approx(v: Vector4F) -> Vector4F {
    let x = load(v);
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let estimate = vrecpeq_f32(x);
        vmulq_f32(estimate, vrecpsq_f32(x, estimate))
    })
}

/// Reciprocal square-root estimate refined by one Newton-Raphson step.
#[inline]
pub(crate) fn reciprocal_sqrt_approx(v: Vector4F) -> Vector4F {
    let x = load(v);
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let estimate = vrsqrteq_f32(x);
        vmulq_f32(estimate, vrsqrtsq_f32(vmulq_f32(estimate, estimate), x))
    })
}

// =============================================================================
// Comparisons
// =============================================================================

/// Ordered equality.
#[inline]
pub(crate) fn compare_equal(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vceqq_f32(load(a), load(b)) }))
}

/// Unordered inequality (NaN lanes true).
#[inline]
pub(crate) fn compare_not_equal(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vmvnq_u32(vceqq_f32(load(a), load(b))) }))
}

/// Not-less-or-equal (NaN lanes true).
#[inline]
pub(crate) fn compare_greater_than(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vmvnq_u32(vcleq_f32(load(a), load(b))) }))
}

/// Not-less-than (NaN lanes true).
#[inline]
pub(crate) fn compare_greater_than_or_equal(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vmvnq_u32(vcltq_f32(load(a), load(b))) }))
}

/// Ordered less-than.
#[inline]
pub(crate) fn compare_less_than(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vcltq_f32(load(a), load(b)) }))
}

/// Ordered less-or-equal.
#[inline]
pub(crate) fn compare_less_than_or_equal(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vcleq_f32(load(a), load(b)) }))
}

// =============================================================================
// Bitwise
// =============================================================================

neon_bits! {
    /// Bitwise and.
    and => |a, b| vandq_u32(a, b);
    /// Bitwise or.
    or => |a, b| vorrq_u32(a, b);
    /// Bitwise xor.
    xor => |a, b| veorq_u32(a, b);
    /// `!a & b`; `vbic` clears the bits of its second operand.
    and_not => |a, b| vbicq_u32(b, a);
    /// Lane-wise raw bit equality.
    equal_bits => |a, b| vceqq_u32(a, b);
}

/// Bitwise not.
#[inline]
pub(crate) fn not(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(float(unsafe { vmvnq_u32(bits(load(v))) }))
}

/// Sign bits of the four lanes, X in bit 0.
#[inline]
pub(crate) fn move_mask(v: Vector4F) -> u32 {
    const SHIFTS: [i32; 4] = [0, 1, 2, 3];
    // SAFETY: NEON intrinsics are always safe on aarch64; SHIFTS holds four i32.
    unsafe {
        let signs = vshrq_n_u32::<31>(bits(load(v)));
        vaddvq_u32(vshlq_u32(signs, vld1q_s32(SHIFTS.as_ptr())))
    }
}

// =============================================================================
// Products and broadcasts
// =============================================================================

/// Dot product over the lanes kept by `mask`, summed `(t0 + t1) + (t2 + t3)`.
#[inline]
pub(crate) fn dot(a: Vector4F, b: Vector4F, mask: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let t = float(vandq_u32(bits(vmulq_f32(load(a), load(b))), bits(load(mask))));
        let pairs = vpaddq_f32(t, t);
        vpaddq_f32(pairs, pairs)
    })
}

/// Broadcasts X.
#[inline]
pub(crate) fn fill_with_x(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vdupq_laneq_f32::<0>(load(v)) })
}

/// Broadcasts Y.
#[inline]
pub(crate) fn fill_with_y(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vdupq_laneq_f32::<1>(load(v)) })
}

/// Broadcasts Z.
#[inline]
pub(crate) fn fill_with_z(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vdupq_laneq_f32::<2>(load(v)) })
}

/// Broadcasts W.
#[inline]
pub(crate) fn fill_with_w(v: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe { vdupq_laneq_f32::<3>(load(v)) })
}

/// `a.x * b.y - a.y * b.x` broadcast.
#[inline]
pub(crate) fn cross2(a: Vector4F, b: Vector4F) -> Vector4F {
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let m = vmulq_f32(load(a), permute::<{ shuffle::YXWZ }>(load(b)));
        let r = vsubq_f32(m, vdupq_laneq_f32::<1>(m));
        vdupq_laneq_f32::<0>(r)
    })
}

/// `a.yzx * b.zxy - a.zxy * b.yzx` with W cleared.
#[inline]
pub(crate) fn cross3(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let lhs = vmulq_f32(permute::<{ shuffle::YZXW }>(va), permute::<{ shuffle::ZXYW }>(vb));
        let rhs = vmulq_f32(permute::<{ shuffle::ZXYW }>(va), permute::<{ shuffle::YZXW }>(vb));
        float(vandq_u32(bits(vsubq_f32(lhs, rhs)), bits(load(Vector4F::MASK_W))))
    })
}

/// Generalised cross product of three 4D vectors.
#[inline]
pub(crate) fn cross4(a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
    let (va, vb, vc) = (load(a), load(b), load(c));
    const ZWYZ: u8 = shuffle_control(2, 3, 1, 2);
    const WZWY: u8 = shuffle_control(3, 2, 3, 1);
    const YWXZ: u8 = shuffle_control(1, 3, 0, 2);
    const WXWX: u8 = shuffle_control(3, 0, 3, 0);
    const YZXY: u8 = shuffle_control(1, 2, 0, 1);
    const ZXYX: u8 = shuffle_control(2, 0, 1, 0);

    // SAFETY: NEON intrinsics are always safe on aarch64.
    store(unsafe {
        let t1 = vsubq_f32(
            vmulq_f32(permute::<ZWYZ>(vb), permute::<WZWY>(vc)),
            vmulq_f32(permute::<WZWY>(vb), permute::<ZWYZ>(vc)),
        );
        let mut result = vmulq_f32(t1, permute::<{ shuffle_control(1, 0, 0, 0) }>(va));

        let t2 = vsubq_f32(
            vmulq_f32(permute::<YWXZ>(vb), permute::<WXWX>(vc)),
            vmulq_f32(permute::<WXWX>(vb), permute::<YWXZ>(vc)),
        );
        result = vsubq_f32(result, vmulq_f32(t2, permute::<{ shuffle_control(2, 2, 1, 1) }>(va)));

        let t3 = vsubq_f32(
            vmulq_f32(permute::<YZXY>(vb), permute::<ZXYX>(vc)),
            vmulq_f32(permute::<ZXYX>(vb), permute::<YZXY>(vc)),
        );
        vaddq_f32(result, vmulq_f32(t3, permute::<{ shuffle_control(3, 3, 3, 2) }>(va)))
    })
}
