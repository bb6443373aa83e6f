//! Scalar-per-lane implementation of every primitive.
//!
//! This is the semantic ground truth: accelerated kernels must reproduce it
//! bit-for-bit. Orderings that look arbitrary here (pairwise dot sums, the
//! shuffle products in `cross4`, the NaN checks in `max`/`min`) mirror the
//! instruction sequences so that both paths round identically.
#![allow(clippy::neg_cmp_op_on_partial_ord)] // NaN-aware predicates are spelled out.
#![allow(clippy::nonminimal_bool)]

use super::Kernel;
use crate::element::Element;
use crate::vector::{shuffle, shuffle_control, Vector4};

/// Portable scalar strategy, available on every target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Software;

/// Products of the first `dims` lanes, unused lanes `+0.0`, summed pairwise.
#[inline]
fn pairwise_dot<T: Element>(a: Vector4<T>, b: Vector4<T>, dims: usize) -> Vector4<T> {
    let (a, b) = (a.to_array(), b.to_array());
    let p: [T; 4] = std::array::from_fn(|i| if i < dims { a[i] * b[i] } else { T::ZERO });
    Vector4::splat((p[0] + p[1]) + (p[2] + p[3]))
}

#[inline]
fn sign_bit<T: Element>(value: T) -> u32 {
    u32::from(value.is_sign_negative())
}

impl<T: Element> Kernel<T> for Software {
    fn name(&self) -> &'static str {
        "software"
    }

    #[inline]
    fn add(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| l + r)
    }

    #[inline]
    fn subtract(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| l - r)
    }

    #[inline]
    fn multiply(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| l * r)
    }

    #[inline]
    fn divide(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| l / r)
    }

    #[inline]
    fn sqrt(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(T::sqrt)
    }

    #[inline]
    fn max(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| {
            if r.is_nan() {
                l
            } else if l.is_nan() || !(l > r) {
                r
            } else {
                l
            }
        })
    }

    #[inline]
    fn min(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| {
            if r.is_nan() {
                l
            } else if l.is_nan() || !(l < r) {
                r
            } else {
                l
            }
        })
    }

    #[inline]
    fn horizontal_add(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        Vector4::new(a.x() + a.y(), a.z() + a.w(), b.x() + b.y(), b.z() + b.w())
    }

    #[inline]
    fn remainder(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_map(b, |l, r| l % r)
    }

    #[inline]
    fn floor(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(T::floor)
    }

    #[inline]
    fn round(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(T::round_ties_even)
    }

    #[inline]
    fn truncate(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(T::trunc)
    }

    #[inline]
    fn fused_multiply_add(&self, a: Vector4<T>, b: Vector4<T>, c: Vector4<T>) -> Vector4<T> {
        let (a, b, c) = (a.to_array(), b.to_array(), c.to_array());
        Vector4::from_array(std::array::from_fn(|i| a[i].mul_add(b[i], c[i])))
    }

    #[inline]
    fn reciprocal_approx(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(|x| T::ONE / x)
    }

    #[inline]
    fn reciprocal_sqrt_approx(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(|x| T::ONE / x.sqrt())
    }

    #[inline]
    fn dot2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        pairwise_dot(a, b, 2)
    }

    #[inline]
    fn dot3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        pairwise_dot(a, b, 3)
    }

    #[inline]
    fn dot4(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        pairwise_dot(a, b, 4)
    }

    #[inline]
    fn cross2(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        Vector4::splat(a.x() * b.y() - a.y() * b.x())
    }

    #[inline]
    fn cross3(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        Vector4::new(
            a.y() * b.z() - a.z() * b.y(),
            a.z() * b.x() - a.x() * b.z(),
            a.x() * b.y() - a.y() * b.x(),
            T::ZERO,
        )
    }

    #[inline]
    fn cross4(&self, a: Vector4<T>, b: Vector4<T>, c: Vector4<T>) -> Vector4<T> {
        const ZWYZ: u8 = shuffle_control(2, 3, 1, 2);
        const WZWY: u8 = shuffle_control(3, 2, 3, 1);
        const YWXZ: u8 = shuffle_control(1, 3, 0, 2);
        const WXWX: u8 = shuffle_control(3, 0, 3, 0);
        const YZXY: u8 = shuffle_control(1, 2, 0, 1);
        const ZXYX: u8 = shuffle_control(2, 0, 1, 0);
        const YXXX: u8 = shuffle_control(1, 0, 0, 0);
        const ZZYY: u8 = shuffle_control(2, 2, 1, 1);
        const WWWZ: u8 = shuffle_control(3, 3, 3, 2);

        let mul = |l: Vector4<T>, r: Vector4<T>| l.zip_map(r, |x, y| x * y);
        let sub = |l: Vector4<T>, r: Vector4<T>| l.zip_map(r, |x, y| x - y);
        let add = |l: Vector4<T>, r: Vector4<T>| l.zip_map(r, |x, y| x + y);

        let t1 = sub(
            mul(b.shuffle::<ZWYZ>(), c.shuffle::<WZWY>()),
            mul(b.shuffle::<WZWY>(), c.shuffle::<ZWYZ>()),
        );
        let mut result = mul(t1, a.shuffle::<YXXX>());

        let t2 = sub(
            mul(b.shuffle::<YWXZ>(), c.shuffle::<WXWX>()),
            mul(b.shuffle::<WXWX>(), c.shuffle::<YWXZ>()),
        );
        result = sub(result, mul(t2, a.shuffle::<ZZYY>()));

        let t3 = sub(
            mul(b.shuffle::<YZXY>(), c.shuffle::<ZXYX>()),
            mul(b.shuffle::<ZXYX>(), c.shuffle::<YZXY>()),
        );
        add(result, mul(t3, a.shuffle::<WWWZ>()))
    }

    #[inline]
    fn compare_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| l == r)
    }

    #[inline]
    fn compare_not_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| !(l == r))
    }

    #[inline]
    fn compare_greater_than(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| !(l <= r))
    }

    #[inline]
    fn compare_greater_than_or_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| !(l < r))
    }

    #[inline]
    fn compare_less_than(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| l < r)
    }

    #[inline]
    fn compare_less_than_or_equal(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| l <= r)
    }

    #[inline]
    fn and(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_bits(b, |l, r| l & r)
    }

    #[inline]
    fn or(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_bits(b, |l, r| l | r)
    }

    #[inline]
    fn xor(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_bits(b, |l, r| l ^ r)
    }

    #[inline]
    fn not(&self, v: Vector4<T>) -> Vector4<T> {
        v.map(|x| T::from_bits(!x.to_bits()))
    }

    #[inline]
    fn and_not(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.zip_bits(b, |l, r| !l & r)
    }

    #[inline]
    fn equal_bits(&self, a: Vector4<T>, b: Vector4<T>) -> Vector4<T> {
        a.mask_from(b, |l, r| l.to_bits() == r.to_bits())
    }

    #[inline]
    fn move_mask(&self, v: Vector4<T>) -> u32 {
        sign_bit(v.x()) | (sign_bit(v.y()) << 1) | (sign_bit(v.z()) << 2) | (sign_bit(v.w()) << 3)
    }

    #[inline]
    fn fill_with_x(&self, v: Vector4<T>) -> Vector4<T> {
        v.shuffle::<{ shuffle::XXXX }>()
    }

    #[inline]
    fn fill_with_y(&self, v: Vector4<T>) -> Vector4<T> {
        v.shuffle::<{ shuffle::YYYY }>()
    }

    #[inline]
    fn fill_with_z(&self, v: Vector4<T>) -> Vector4<T> {
        v.shuffle::<{ shuffle::ZZZZ }>()
    }

    #[inline]
    fn fill_with_w(&self, v: Vector4<T>) -> Vector4<T> {
        v.shuffle::<{ shuffle::WWWW }>()
    }
}
