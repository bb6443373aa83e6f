//! SSE-family kernel implementations for `f32` on x86_64.
//!
//! One 128-bit register holds a whole `Vector4F`. Each function names the
//! lowest extension it needs in its `#[target_feature]`; the dispatcher in
//! `accelerated.rs` checks that extension before calling.

// SAFETY: Casts in this file are intentional and safe:
// - movemask results are 4-bit values, non-negative
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::vector::{shuffle, shuffle_control, Vector4F};

#[inline(always)]
unsafe fn load(v: Vector4F) -> __m128 {
    _mm_loadu_ps(v.as_array().as_ptr())
}

#[inline(always)]
unsafe fn store(r: __m128) -> Vector4F {
    let mut out = [0.0_f32; 4];
    _mm_storeu_ps(out.as_mut_ptr(), r);
    Vector4F::from_array(out)
}

/// Single-source lane permute with a `shuffle_control` byte.
macro_rules! permute {
    ($v:expr, $control:expr) => {{
        let v = $v;
        _mm_shuffle_ps::<{ $control as i32 }>(v, v)
    }};
}

/// Two-operand SSE kernels that map onto a single instruction.
macro_rules! sse_binary {
    ($($(#[$doc:meta])* $name:ident => $intrinsic:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Safety
        ///
        /// Caller must ensure the CPU supports SSE.
        #[target_feature(enable = "sse")]
        #[inline]
        pub(crate) unsafe fn $name(a: Vector4F, b: Vector4F) -> Vector4F {
            store($intrinsic(load(a), load(b)))
        }
    )*};
}

// =============================================================================
// Arithmetic, bitwise and comparison (SSE)
// =============================================================================

sse_binary! {
    /// Lane-wise addition.
    add => _mm_add_ps;
    /// Lane-wise subtraction.
    subtract => _mm_sub_ps;
    /// Lane-wise multiplication.
    multiply => _mm_mul_ps;
    /// Lane-wise division.
    divide => _mm_div_ps;
    /// Bitwise and.
    and => _mm_and_ps;
    /// Bitwise or.
    or => _mm_or_ps;
    /// Bitwise xor.
    xor => _mm_xor_ps;
    /// `!a & b`.
    and_not => _mm_andnot_ps;
    /// Ordered equality.
    compare_equal => _mm_cmpeq_ps;
    /// Unordered inequality (NaN lanes true).
    compare_not_equal => _mm_cmpneq_ps;
    /// Not-less-or-equal (NaN lanes true).
    compare_greater_than => _mm_cmpnle_ps;
    /// Not-less-than (NaN lanes true).
    compare_greater_than_or_equal => _mm_cmpnlt_ps;
    /// Ordered less-than.
    compare_less_than => _mm_cmplt_ps;
    /// Ordered less-or-equal.
    compare_less_than_or_equal => _mm_cmple_ps;
}

/// Lane-wise square root.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn sqrt(v: Vector4F) -> Vector4F {
    store(_mm_sqrt_ps(load(v)))
}

/// Bitwise not.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn not(v: Vector4F) -> Vector4F {
    store(_mm_xor_ps(load(v), load(Vector4F::ALL_BITS_SET)))
}

/// Lane-wise maximum with the NaN lanes of `b` replaced by `a`.
///
/// `maxps` already returns `b` when `a` is NaN or on ties; the blend covers
/// the remaining case.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn max(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    let m = _mm_max_ps(va, vb);
    let b_nan = _mm_cmpunord_ps(vb, vb);
    store(_mm_or_ps(_mm_and_ps(b_nan, va), _mm_andnot_ps(b_nan, m)))
}

/// Lane-wise minimum with the NaN lanes of `b` replaced by `a`.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn min(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    let m = _mm_min_ps(va, vb);
    let b_nan = _mm_cmpunord_ps(vb, vb);
    store(_mm_or_ps(_mm_and_ps(b_nan, va), _mm_andnot_ps(b_nan, m)))
}

/// Horizontal add built from two shuffles.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn horizontal_add(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    let even = _mm_shuffle_ps::<{ shuffle_control(0, 2, 0, 2) as i32 }>(va, vb);
    let odd = _mm_shuffle_ps::<{ shuffle_control(1, 3, 1, 3) as i32 }>(va, vb);
    store(_mm_add_ps(even, odd))
}

/// 12-bit reciprocal estimate.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn reciprocal_approx(v: Vector4F) -> Vector4F {
    store(_mm_rcp_ps(load(v)))
}

/// 12-bit reciprocal square root estimate.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn reciprocal_sqrt_approx(v: Vector4F) -> Vector4F {
    store(_mm_rsqrt_ps(load(v)))
}

/// Sign bits of the four lanes.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn move_mask(v: Vector4F) -> u32 {
    _mm_movemask_ps(load(v)) as u32
}

/// Broadcasts X.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn fill_with_x(v: Vector4F) -> Vector4F {
    store(permute!(load(v), shuffle::XXXX))
}

/// Broadcasts Y.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn fill_with_y(v: Vector4F) -> Vector4F {
    store(permute!(load(v), shuffle::YYYY))
}

/// Broadcasts Z.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn fill_with_z(v: Vector4F) -> Vector4F {
    store(permute!(load(v), shuffle::ZZZZ))
}

/// Broadcasts W.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn fill_with_w(v: Vector4F) -> Vector4F {
    store(permute!(load(v), shuffle::WWWW))
}

// =============================================================================
// Dot products
// =============================================================================

/// Dot product over the lanes kept by `mask`, baseline SSE.
///
/// `t + t.yxwz` pairs neighbours, then `s + s.zwxy` adds the pairs, leaving
/// `(t0 + t1) + (t2 + t3)` in every lane.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn dot_sse(a: Vector4F, b: Vector4F, mask: Vector4F) -> Vector4F {
    let t = _mm_and_ps(_mm_mul_ps(load(a), load(b)), load(mask));
    let s = _mm_add_ps(t, permute!(t, shuffle::YXWZ));
    store(_mm_add_ps(s, permute!(s, shuffle::ZWXY)))
}

/// Dot product over the lanes kept by `mask` with two horizontal adds.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE3.
#[target_feature(enable = "sse3")]
#[inline]
pub(crate) unsafe fn dot_sse3(a: Vector4F, b: Vector4F, mask: Vector4F) -> Vector4F {
    let t = _mm_and_ps(_mm_mul_ps(load(a), load(b)), load(mask));
    let h = _mm_hadd_ps(t, t);
    store(_mm_hadd_ps(h, h))
}

/// `(a.x + a.y, a.z + a.w, b.x + b.y, b.z + b.w)` in one instruction.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE3.
#[target_feature(enable = "sse3")]
#[inline]
pub(crate) unsafe fn horizontal_add_sse3(a: Vector4F, b: Vector4F) -> Vector4F {
    store(_mm_hadd_ps(load(a), load(b)))
}

/// 2D dot product with `dpps`.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn dot2_sse41(a: Vector4F, b: Vector4F) -> Vector4F {
    store(_mm_dp_ps::<0x3F>(load(a), load(b)))
}

/// 3D dot product with `dpps`.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn dot3_sse41(a: Vector4F, b: Vector4F) -> Vector4F {
    store(_mm_dp_ps::<0x7F>(load(a), load(b)))
}

/// 4D dot product with `dpps`.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn dot4_sse41(a: Vector4F, b: Vector4F) -> Vector4F {
    store(_mm_dp_ps::<0xFF>(load(a), load(b)))
}

// =============================================================================
// Rounding (SSE4.1)
// =============================================================================

/// Round to nearest, ties to even.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn round(v: Vector4F) -> Vector4F {
    store(_mm_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(load(v)))
}

/// Round toward negative infinity.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn floor(v: Vector4F) -> Vector4F {
    store(_mm_round_ps::<{ _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC }>(load(v)))
}

/// Round toward zero.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE4.1.
#[target_feature(enable = "sse4.1")]
#[inline]
pub(crate) unsafe fn truncate(v: Vector4F) -> Vector4F {
    store(_mm_round_ps::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(load(v)))
}

// =============================================================================
// Integer compare (SSE2) and FMA
// =============================================================================

/// Lane-wise raw bit equality.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE2.
#[target_feature(enable = "sse2")]
#[inline]
pub(crate) unsafe fn equal_bits(a: Vector4F, b: Vector4F) -> Vector4F {
    let eq = _mm_cmpeq_epi32(_mm_castps_si128(load(a)), _mm_castps_si128(load(b)));
    store(_mm_castsi128_ps(eq))
}

/// `a * b + c`, single rounding.
///
/// # Safety
///
/// Caller must ensure the CPU supports FMA.
#[target_feature(enable = "fma")]
#[inline]
pub(crate) unsafe fn fused_multiply_add(a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
    store(_mm_fmadd_ps(load(a), load(b), load(c)))
}

// =============================================================================
// Cross products (SSE)
// =============================================================================

/// `a.x * b.y - a.y * b.x` broadcast.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn cross2(a: Vector4F, b: Vector4F) -> Vector4F {
    let m = _mm_mul_ps(load(a), permute!(load(b), shuffle::YXWZ));
    let r = _mm_sub_ps(m, permute!(m, shuffle::YYYY));
    store(permute!(r, shuffle::XXXX))
}

/// `a.yzx * b.zxy - a.zxy * b.yzx` with W cleared.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn cross3(a: Vector4F, b: Vector4F) -> Vector4F {
    let (va, vb) = (load(a), load(b));
    let lhs = _mm_mul_ps(permute!(va, shuffle::YZXW), permute!(vb, shuffle::ZXYW));
    let rhs = _mm_mul_ps(permute!(va, shuffle::ZXYW), permute!(vb, shuffle::YZXW));
    store(_mm_and_ps(_mm_sub_ps(lhs, rhs), load(Vector4F::MASK_W)))
}

/// Generalised cross product of three 4D vectors.
///
/// # Safety
///
/// Caller must ensure the CPU supports SSE.
#[target_feature(enable = "sse")]
#[inline]
pub(crate) unsafe fn cross4(a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
    let (va, vb, vc) = (load(a), load(b), load(c));

    let t1 = _mm_sub_ps(
        _mm_mul_ps(
            permute!(vb, shuffle_control(2, 3, 1, 2)),
            permute!(vc, shuffle_control(3, 2, 3, 1)),
        ),
        _mm_mul_ps(
            permute!(vb, shuffle_control(3, 2, 3, 1)),
            permute!(vc, shuffle_control(2, 3, 1, 2)),
        ),
    );
    let mut result = _mm_mul_ps(t1, permute!(va, shuffle_control(1, 0, 0, 0)));

    let t2 = _mm_sub_ps(
        _mm_mul_ps(
            permute!(vb, shuffle_control(1, 3, 0, 2)),
            permute!(vc, shuffle_control(3, 0, 3, 0)),
        ),
        _mm_mul_ps(
            permute!(vb, shuffle_control(3, 0, 3, 0)),
            permute!(vc, shuffle_control(1, 3, 0, 2)),
        ),
    );
    result = _mm_sub_ps(result, _mm_mul_ps(t2, permute!(va, shuffle_control(2, 2, 1, 1))));

    let t3 = _mm_sub_ps(
        _mm_mul_ps(
            permute!(vb, shuffle_control(1, 2, 0, 1)),
            permute!(vc, shuffle_control(2, 0, 1, 0)),
        ),
        _mm_mul_ps(
            permute!(vb, shuffle_control(2, 0, 1, 0)),
            permute!(vc, shuffle_control(1, 2, 0, 1)),
        ),
    );
    store(_mm_add_ps(result, _mm_mul_ps(t3, permute!(va, shuffle_control(3, 3, 3, 2)))))
}
