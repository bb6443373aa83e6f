//! Operator overloads for [`Vector4`], routed through [`Accelerated`].
//!
//! Arithmetic operators are lane-wise. The bit operators act on raw lane
//! bits, which is how boolean-vector masks are combined.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Rem, Sub};

use crate::element::Element;
use crate::kernel::{Accelerated, Kernel};
use crate::vector::Vector4;

macro_rules! binary_operator {
    ($($trait:ident :: $method:ident => $kernel:ident),* $(,)?) => {$(
        impl<T: Element> $trait for Vector4<T>
        where
            Accelerated: Kernel<T>,
        {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Accelerated.$kernel(self, rhs)
            }
        }
    )*};
}

binary_operator! {
    Add::add => add,
    Sub::sub => subtract,
    Mul::mul => multiply,
    Div::div => divide,
    Rem::rem => remainder,
    BitAnd::bitand => and,
    BitOr::bitor => or,
    BitXor::bitxor => xor,
}

/// Scales every lane.
impl<T: Element> Mul<T> for Vector4<T>
where
    Accelerated: Kernel<T>,
{
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self {
        Accelerated.multiply(self, Vector4::splat(rhs))
    }
}

/// Divides every lane.
impl<T: Element> Div<T> for Vector4<T>
where
    Accelerated: Kernel<T>,
{
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self {
        Accelerated.divide(self, Vector4::splat(rhs))
    }
}

/// Flips every sign bit (so `-0.0` and NaN signs flip too).
impl<T: Element> Neg for Vector4<T>
where
    Accelerated: Kernel<T>,
{
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Accelerated.negate(self)
    }
}

impl<T: Element> Not for Vector4<T>
where
    Accelerated: Kernel<T>,
{
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        Kernel::not(&Accelerated, self)
    }
}
