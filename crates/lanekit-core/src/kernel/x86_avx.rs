//! AVX-family kernel implementations for `f64` on x86_64.
//!
//! One 256-bit register holds a whole `Vector4D`. Lane permutes need AVX2
//! (`vpermpd`), so the cross products and broadcasts sit behind `avx2` while
//! the element-wise work only needs `avx`.

// SAFETY: Casts in this file are intentional and safe:
// - movemask results are 4-bit values, non-negative
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::wildcard_imports)]

use std::arch::x86_64::*;

use crate::vector::{shuffle, shuffle_control, Vector4D};

#[inline(always)]
unsafe fn load(v: Vector4D) -> __m256d {
    _mm256_loadu_pd(v.as_array().as_ptr())
}

#[inline(always)]
unsafe fn store(r: __m256d) -> Vector4D {
    let mut out = [0.0_f64; 4];
    _mm256_storeu_pd(out.as_mut_ptr(), r);
    Vector4D::from_array(out)
}

/// Single-source lane permute with a `shuffle_control` byte (AVX2).
macro_rules! permute {
    ($v:expr, $control:expr) => {
        _mm256_permute4x64_pd::<{ $control as i32 }>($v)
    };
}

/// Two-operand AVX kernels that map onto a single instruction.
macro_rules! avx_binary {
    ($($(#[$doc:meta])* $name:ident => $intrinsic:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Safety
        ///
        /// Caller must ensure the CPU supports AVX.
        #[target_feature(enable = "avx")]
        #[inline]
        pub(crate) unsafe fn $name(a: Vector4D, b: Vector4D) -> Vector4D {
            store($intrinsic(load(a), load(b)))
        }
    )*};
}

/// AVX comparisons by predicate immediate.
macro_rules! avx_compare {
    ($($(#[$doc:meta])* $name:ident => $predicate:ident;)*) => {$(
        $(#[$doc])*
        ///
        /// # Safety
        ///
        /// Caller must ensure the CPU supports AVX.
        #[target_feature(enable = "avx")]
        #[inline]
        pub(crate) unsafe fn $name(a: Vector4D, b: Vector4D) -> Vector4D {
            store(_mm256_cmp_pd::<$predicate>(load(a), load(b)))
        }
    )*};
}

// =============================================================================
// Arithmetic, bitwise and comparison (AVX)
// =============================================================================

avx_binary! {
    /// Lane-wise addition.
    add => _mm256_add_pd;
    /// Lane-wise subtraction.
    subtract => _mm256_sub_pd;
    /// Lane-wise multiplication.
    multiply => _mm256_mul_pd;
    /// Lane-wise division.
    divide => _mm256_div_pd;
    /// Bitwise and.
    and => _mm256_and_pd;
    /// Bitwise or.
    or => _mm256_or_pd;
    /// Bitwise xor.
    xor => _mm256_xor_pd;
    /// `!a & b`.
    and_not => _mm256_andnot_pd;
}

avx_compare! {
    /// Ordered equality.
    compare_equal => _CMP_EQ_OQ;
    /// Unordered inequality (NaN lanes true).
    compare_not_equal => _CMP_NEQ_UQ;
    /// Not-less-or-equal (NaN lanes true).
    compare_greater_than => _CMP_NLE_UQ;
    /// Not-less-than (NaN lanes true).
    compare_greater_than_or_equal => _CMP_NLT_UQ;
    /// Ordered less-than.
    compare_less_than => _CMP_LT_OQ;
    /// Ordered less-or-equal.
    compare_less_than_or_equal => _CMP_LE_OQ;
}

/// Lane-wise square root.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn sqrt(v: Vector4D) -> Vector4D {
    store(_mm256_sqrt_pd(load(v)))
}

/// Bitwise not.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn not(v: Vector4D) -> Vector4D {
    store(_mm256_xor_pd(load(v), load(Vector4D::ALL_BITS_SET)))
}

/// Lane-wise maximum with the NaN lanes of `b` replaced by `a`.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn max(a: Vector4D, b: Vector4D) -> Vector4D {
    let (va, vb) = (load(a), load(b));
    let m = _mm256_max_pd(va, vb);
    store(_mm256_blendv_pd(m, va, _mm256_cmp_pd::<_CMP_UNORD_Q>(vb, vb)))
}

/// Lane-wise minimum with the NaN lanes of `b` replaced by `a`.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn min(a: Vector4D, b: Vector4D) -> Vector4D {
    let (va, vb) = (load(a), load(b));
    let m = _mm256_min_pd(va, vb);
    store(_mm256_blendv_pd(m, va, _mm256_cmp_pd::<_CMP_UNORD_Q>(vb, vb)))
}

/// `(a.x + a.y, a.z + a.w, b.x + b.y, b.z + b.w)`.
///
/// `vhaddpd` works per 128-bit half, so the halves are regrouped first.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn horizontal_add(a: Vector4D, b: Vector4D) -> Vector4D {
    let (va, vb) = (load(a), load(b));
    let low = _mm256_permute2f128_pd::<0x20>(va, vb);
    let high = _mm256_permute2f128_pd::<0x31>(va, vb);
    store(_mm256_hadd_pd(low, high))
}

/// Dot product over the lanes kept by `mask`.
///
/// `hadd(t, t)` gives `(t0+t1, t0+t1, t2+t3, t2+t3)`; adding the swapped
/// halves leaves `(t0 + t1) + (t2 + t3)` in every lane.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn dot(a: Vector4D, b: Vector4D, mask: Vector4D) -> Vector4D {
    let t = _mm256_and_pd(_mm256_mul_pd(load(a), load(b)), load(mask));
    let h = _mm256_hadd_pd(t, t);
    store(_mm256_add_pd(h, _mm256_permute2f128_pd::<0x01>(h, h)))
}

/// Sign bits of the four lanes.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn move_mask(v: Vector4D) -> u32 {
    _mm256_movemask_pd(load(v)) as u32
}

// =============================================================================
// Rounding (AVX)
// =============================================================================

/// Round to nearest, ties to even.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn round(v: Vector4D) -> Vector4D {
    store(_mm256_round_pd::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(load(v)))
}

/// Round toward negative infinity.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn floor(v: Vector4D) -> Vector4D {
    store(_mm256_round_pd::<{ _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC }>(load(v)))
}

/// Round toward zero.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX.
#[target_feature(enable = "avx")]
#[inline]
pub(crate) unsafe fn truncate(v: Vector4D) -> Vector4D {
    store(_mm256_round_pd::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(load(v)))
}

// =============================================================================
// AVX2 and FMA
// =============================================================================

/// Lane-wise raw bit equality.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn equal_bits(a: Vector4D, b: Vector4D) -> Vector4D {
    let eq = _mm256_cmpeq_epi64(_mm256_castpd_si256(load(a)), _mm256_castpd_si256(load(b)));
    store(_mm256_castsi256_pd(eq))
}

/// `a * b + c`, single rounding.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX and FMA.
#[target_feature(enable = "avx", enable = "fma")]
#[inline]
pub(crate) unsafe fn fused_multiply_add(a: Vector4D, b: Vector4D, c: Vector4D) -> Vector4D {
    store(_mm256_fmadd_pd(load(a), load(b), load(c)))
}

/// Broadcasts X.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn fill_with_x(v: Vector4D) -> Vector4D {
    store(permute!(load(v), shuffle::XXXX))
}

/// Broadcasts Y.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn fill_with_y(v: Vector4D) -> Vector4D {
    store(permute!(load(v), shuffle::YYYY))
}

/// Broadcasts Z.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn fill_with_z(v: Vector4D) -> Vector4D {
    store(permute!(load(v), shuffle::ZZZZ))
}

/// Broadcasts W.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn fill_with_w(v: Vector4D) -> Vector4D {
    store(permute!(load(v), shuffle::WWWW))
}

/// `a.x * b.y - a.y * b.x` broadcast.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn cross2(a: Vector4D, b: Vector4D) -> Vector4D {
    let m = _mm256_mul_pd(load(a), permute!(load(b), shuffle::YXWZ));
    let r = _mm256_sub_pd(m, permute!(m, shuffle::YYYY));
    store(permute!(r, shuffle::XXXX))
}

/// `a.yzx * b.zxy - a.zxy * b.yzx` with W cleared.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn cross3(a: Vector4D, b: Vector4D) -> Vector4D {
    let (va, vb) = (load(a), load(b));
    let lhs = _mm256_mul_pd(permute!(va, shuffle::YZXW), permute!(vb, shuffle::ZXYW));
    let rhs = _mm256_mul_pd(permute!(va, shuffle::ZXYW), permute!(vb, shuffle::YZXW));
    store(_mm256_and_pd(_mm256_sub_pd(lhs, rhs), load(Vector4D::MASK_W)))
}

/// Generalised cross product of three 4D vectors.
///
/// # Safety
///
/// Caller must ensure the CPU supports AVX2.
#[target_feature(enable = "avx2")]
#[inline]
pub(crate) unsafe fn cross4(a: Vector4D, b: Vector4D, c: Vector4D) -> Vector4D {
    let (va, vb, vc) = (load(a), load(b), load(c));

    let t1 = _mm256_sub_pd(
        _mm256_mul_pd(
            permute!(vb, shuffle_control(2, 3, 1, 2)),
            permute!(vc, shuffle_control(3, 2, 3, 1)),
        ),
        _mm256_mul_pd(
            permute!(vb, shuffle_control(3, 2, 3, 1)),
            permute!(vc, shuffle_control(2, 3, 1, 2)),
        ),
    );
    let mut result = _mm256_mul_pd(t1, permute!(va, shuffle_control(1, 0, 0, 0)));

    let t2 = _mm256_sub_pd(
        _mm256_mul_pd(
            permute!(vb, shuffle_control(1, 3, 0, 2)),
            permute!(vc, shuffle_control(3, 0, 3, 0)),
        ),
        _mm256_mul_pd(
            permute!(vb, shuffle_control(3, 0, 3, 0)),
            permute!(vc, shuffle_control(1, 3, 0, 2)),
        ),
    );
    result = _mm256_sub_pd(
        result,
        _mm256_mul_pd(t2, permute!(va, shuffle_control(2, 2, 1, 1))),
    );

    let t3 = _mm256_sub_pd(
        _mm256_mul_pd(
            permute!(vb, shuffle_control(1, 2, 0, 1)),
            permute!(vc, shuffle_control(2, 0, 1, 0)),
        ),
        _mm256_mul_pd(
            permute!(vb, shuffle_control(2, 0, 1, 0)),
            permute!(vc, shuffle_control(1, 2, 0, 1)),
        ),
    );
    store(_mm256_add_pd(
        result,
        _mm256_mul_pd(t3, permute!(va, shuffle_control(3, 3, 3, 2))),
    ))
}
