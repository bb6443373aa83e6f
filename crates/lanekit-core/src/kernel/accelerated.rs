//! Capability-dispatched strategy.
//!
//! Every primitive consults the cached capability set and routes to the most
//! capable ISA kernel whose features are present, falling back to
//! [`Software`] otherwise. Routing is per primitive: a CPU with SSE but not
//! SSE4.1 still accelerates arithmetic while rounding runs in software.

use super::software::Software;
use super::Kernel;
use crate::capability::capabilities;
use crate::vector::{Vector4D, Vector4F};

#[cfg(target_arch = "aarch64")]
use super::neon;
#[cfg(target_arch = "x86_64")]
use super::{x86_avx, x86_sse};

/// Hardware-accelerated strategy with per-primitive software fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accelerated;

/// Routes an `f32` primitive to SSE (gated on `$gate`) or NEON, else software.
macro_rules! dispatch_f32 {
    ($gate:ident: $sse:ident / $neon:ident ($($arg:expr),*)) => {{
        #[cfg(target_arch = "x86_64")]
        if capabilities().$gate() {
            // SAFETY: the cached capability set reports the required feature.
            return unsafe { x86_sse::$sse($($arg),*) };
        }
        #[cfg(target_arch = "aarch64")]
        if capabilities().neon() {
            return neon::$neon($($arg),*);
        }
        Software.$neon($($arg),*)
    }};
    ($gate:ident: $name:ident ($($arg:expr),*)) => {
        dispatch_f32!($gate: $name / $name ($($arg),*))
    };
}

/// Routes an `f64` primitive to AVX-family kernels gated on `$gate`, else software.
macro_rules! dispatch_f64 {
    ($gate:ident: $name:ident ($($arg:expr),*)) => {{
        #[cfg(target_arch = "x86_64")]
        if capabilities().$gate() {
            // SAFETY: the cached capability set reports the required feature.
            return unsafe { x86_avx::$name($($arg),*) };
        }
        Software.$name($($arg),*)
    }};
}

// =============================================================================
// f32: SSE family on x86_64, NEON on aarch64
// =============================================================================

impl Accelerated {
    /// Masked `f32` dot product, best available path first.
    #[inline]
    #[cfg_attr(
        not(any(target_arch = "x86_64", target_arch = "aarch64")),
        allow(unused_variables)
    )]
    fn dot_f32(a: Vector4F, b: Vector4F, dims: usize) -> Vector4F {
        let mask = match dims {
            2 => Vector4F::MASK_ZW,
            3 => Vector4F::MASK_W,
            _ => Vector4F::ALL_BITS_SET,
        };
        let caps = capabilities();

        #[cfg(target_arch = "x86_64")]
        {
            if caps.sse41() {
                // SAFETY: SSE4.1 reported by the cached capability set.
                return unsafe {
                    match dims {
                        2 => x86_sse::dot2_sse41(a, b),
                        3 => x86_sse::dot3_sse41(a, b),
                        _ => x86_sse::dot4_sse41(a, b),
                    }
                };
            }
            if caps.sse3() {
                // SAFETY: SSE3 reported by the cached capability set.
                return unsafe { x86_sse::dot_sse3(a, b, mask) };
            }
            if caps.sse() {
                // SAFETY: SSE reported by the cached capability set.
                return unsafe { x86_sse::dot_sse(a, b, mask) };
            }
        }

        #[cfg(target_arch = "aarch64")]
        if caps.neon() {
            return neon::dot(a, b, mask);
        }

        match dims {
            2 => Software.dot2(a, b),
            3 => Software.dot3(a, b),
            _ => Software.dot4(a, b),
        }
    }

    /// Masked `f64` dot product.
    #[inline]
    fn dot_f64(a: Vector4D, b: Vector4D, dims: usize) -> Vector4D {
        #[cfg(target_arch = "x86_64")]
        if capabilities().avx() {
            let mask = match dims {
                2 => Vector4D::MASK_ZW,
                3 => Vector4D::MASK_W,
                _ => Vector4D::ALL_BITS_SET,
            };
            // SAFETY: AVX reported by the cached capability set.
            return unsafe { x86_avx::dot(a, b, mask) };
        }
        match dims {
            2 => Software.dot2(a, b),
            3 => Software.dot3(a, b),
            _ => Software.dot4(a, b),
        }
    }
}

impl Kernel<f32> for Accelerated {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    #[inline]
    fn add(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: add(a, b))
    }

    #[inline]
    fn subtract(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: subtract(a, b))
    }

    #[inline]
    fn multiply(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: multiply(a, b))
    }

    #[inline]
    fn divide(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: divide(a, b))
    }

    #[inline]
    fn sqrt(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: sqrt(v))
    }

    #[inline]
    fn max(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: max(a, b))
    }

    #[inline]
    fn min(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: min(a, b))
    }

    #[inline]
    fn horizontal_add(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        #[cfg(target_arch = "x86_64")]
        if capabilities().sse3() {
            // SAFETY: SSE3 reported by the cached capability set.
            return unsafe { x86_sse::horizontal_add_sse3(a, b) };
        }
        dispatch_f32!(sse: horizontal_add(a, b))
    }

    #[inline]
    fn remainder(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        Software.remainder(a, b)
    }

    #[inline]
    fn floor(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse41: floor(v))
    }

    #[inline]
    fn round(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse41: round(v))
    }

    #[inline]
    fn truncate(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse41: truncate(v))
    }

    #[inline]
    fn fused_multiply_add(&self, a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
        dispatch_f32!(fma: fused_multiply_add(a, b, c))
    }

    #[inline]
    fn reciprocal_approx(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: reciprocal_approx(v))
    }

    #[inline]
    fn reciprocal_sqrt_approx(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: reciprocal_sqrt_approx(v))
    }

    #[inline]
    fn dot2(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        Self::dot_f32(a, b, 2)
    }

    #[inline]
    fn dot3(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        Self::dot_f32(a, b, 3)
    }

    #[inline]
    fn dot4(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        Self::dot_f32(a, b, 4)
    }

    #[inline]
    fn cross2(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: cross2(a, b))
    }

    #[inline]
    fn cross3(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: cross3(a, b))
    }

    #[inline]
    fn cross4(&self, a: Vector4F, b: Vector4F, c: Vector4F) -> Vector4F {
        dispatch_f32!(sse: cross4(a, b, c))
    }

    #[inline]
    fn compare_equal(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_equal(a, b))
    }

    #[inline]
    fn compare_not_equal(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_not_equal(a, b))
    }

    #[inline]
    fn compare_greater_than(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_greater_than(a, b))
    }

    #[inline]
    fn compare_greater_than_or_equal(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_greater_than_or_equal(a, b))
    }

    #[inline]
    fn compare_less_than(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_less_than(a, b))
    }

    #[inline]
    fn compare_less_than_or_equal(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: compare_less_than_or_equal(a, b))
    }

    #[inline]
    fn and(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: and(a, b))
    }

    #[inline]
    fn or(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: or(a, b))
    }

    #[inline]
    fn xor(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: xor(a, b))
    }

    #[inline]
    fn not(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: not(v))
    }

    #[inline]
    fn and_not(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse: and_not(a, b))
    }

    #[inline]
    fn equal_bits(&self, a: Vector4F, b: Vector4F) -> Vector4F {
        dispatch_f32!(sse2: equal_bits(a, b))
    }

    #[inline]
    fn move_mask(&self, v: Vector4F) -> u32 {
        dispatch_f32!(sse: move_mask(v))
    }

    #[inline]
    fn fill_with_x(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: fill_with_x(v))
    }

    #[inline]
    fn fill_with_y(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: fill_with_y(v))
    }

    #[inline]
    fn fill_with_z(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: fill_with_z(v))
    }

    #[inline]
    fn fill_with_w(&self, v: Vector4F) -> Vector4F {
        dispatch_f32!(sse: fill_with_w(v))
    }
}

// =============================================================================
// f64: AVX family on x86_64, software elsewhere
// =============================================================================

impl Kernel<f64> for Accelerated {
    fn name(&self) -> &'static str {
        "accelerated"
    }

    #[inline]
    fn add(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: add(a, b))
    }

    #[inline]
    fn subtract(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: subtract(a, b))
    }

    #[inline]
    fn multiply(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: multiply(a, b))
    }

    #[inline]
    fn divide(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: divide(a, b))
    }

    #[inline]
    fn sqrt(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx: sqrt(v))
    }

    #[inline]
    fn max(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: max(a, b))
    }

    #[inline]
    fn min(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: min(a, b))
    }

    #[inline]
    fn horizontal_add(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: horizontal_add(a, b))
    }

    #[inline]
    fn remainder(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        Software.remainder(a, b)
    }

    #[inline]
    fn floor(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx: floor(v))
    }

    #[inline]
    fn round(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx: round(v))
    }

    #[inline]
    fn truncate(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx: truncate(v))
    }

    #[inline]
    fn fused_multiply_add(&self, a: Vector4D, b: Vector4D, c: Vector4D) -> Vector4D {
        #[cfg(target_arch = "x86_64")]
        if capabilities().avx() && capabilities().fma() {
            // SAFETY: AVX and FMA reported by the cached capability set.
            return unsafe { x86_avx::fused_multiply_add(a, b, c) };
        }
        Software.fused_multiply_add(a, b, c)
    }

    #[inline]
    fn reciprocal_approx(&self, v: Vector4D) -> Vector4D {
        Software.reciprocal_approx(v)
    }

    #[inline]
    fn reciprocal_sqrt_approx(&self, v: Vector4D) -> Vector4D {
        Software.reciprocal_sqrt_approx(v)
    }

    #[inline]
    fn dot2(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        Self::dot_f64(a, b, 2)
    }

    #[inline]
    fn dot3(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        Self::dot_f64(a, b, 3)
    }

    #[inline]
    fn dot4(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        Self::dot_f64(a, b, 4)
    }

    #[inline]
    fn cross2(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: cross2(a, b))
    }

    #[inline]
    fn cross3(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: cross3(a, b))
    }

    #[inline]
    fn cross4(&self, a: Vector4D, b: Vector4D, c: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: cross4(a, b, c))
    }

    #[inline]
    fn compare_equal(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_equal(a, b))
    }

    #[inline]
    fn compare_not_equal(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_not_equal(a, b))
    }

    #[inline]
    fn compare_greater_than(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_greater_than(a, b))
    }

    #[inline]
    fn compare_greater_than_or_equal(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_greater_than_or_equal(a, b))
    }

    #[inline]
    fn compare_less_than(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_less_than(a, b))
    }

    #[inline]
    fn compare_less_than_or_equal(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: compare_less_than_or_equal(a, b))
    }

    #[inline]
    fn and(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: and(a, b))
    }

    #[inline]
    fn or(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: or(a, b))
    }

    #[inline]
    fn xor(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: xor(a, b))
    }

    #[inline]
    fn not(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx: not(v))
    }

    #[inline]
    fn and_not(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx: and_not(a, b))
    }

    #[inline]
    fn equal_bits(&self, a: Vector4D, b: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: equal_bits(a, b))
    }

    #[inline]
    fn move_mask(&self, v: Vector4D) -> u32 {
        dispatch_f64!(avx: move_mask(v))
    }

    #[inline]
    fn fill_with_x(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: fill_with_x(v))
    }

    #[inline]
    fn fill_with_y(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: fill_with_y(v))
    }

    #[inline]
    fn fill_with_z(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: fill_with_z(v))
    }

    #[inline]
    fn fill_with_w(&self, v: Vector4D) -> Vector4D {
        dispatch_f64!(avx2: fill_with_w(v))
    }
}
