//! Runtime parity verification between [`Accelerated`] and [`Software`].
//!
//! Every exact operation is run on both strategies for each sample and the
//! results compared lane by lane: bit-identical, or NaN on both sides. The
//! reciprocal estimates (and the normalisations built on them) are held to
//! relative bounds instead, and the approximate trigonometry is checked
//! against its precise counterpart.

use serde::Serialize;

use crate::capability::capabilities;
use crate::element::Element;
use crate::kernel::{Accelerated, Kernel, LaneMask, Software, Trigonometry, VectorAlgebra};
use crate::vector::Vector4;

/// Relative bound for `reciprocal_approx` / `reciprocal_sqrt_approx`.
pub const RECIPROCAL_ESTIMATE_BOUND: f64 = 1.0 / 2048.0;
/// Relative bound for `normalize_approx*`.
pub const NORMALIZE_ESTIMATE_BOUND: f64 = 1.0 / 1024.0;
/// Absolute bound between `sin`/`cos` and their approximations.
pub const TRIG_APPROX_BOUND: f64 = 2e-5;
/// Largest angle magnitude the trig approximation bound is checked on.
pub const TRIG_APPROX_DOMAIN: f64 = 1e4;

/// One operation whose two results disagreed.
#[derive(Debug, Clone, Serialize)]
pub struct Mismatch {
    /// Operation name.
    pub operation: &'static str,
    /// Operands, widened to `f64`.
    pub inputs: Vec<[f64; 4]>,
    /// Result of the accelerated strategy.
    pub accelerated: [f64; 4],
    /// Result of the software strategy (or the reference for bound checks).
    pub software: [f64; 4],
}

/// Outcome of [`check_parity`].
#[derive(Debug, Clone, Serialize)]
pub struct ParityReport {
    /// Lane type, `"f32"` or `"f64"`.
    pub element: &'static str,
    /// Effective capability set the accelerated strategy ran with.
    pub capabilities: String,
    /// Number of input samples.
    pub samples: usize,
    /// Number of individual comparisons performed.
    pub checked: usize,
    /// Every failed comparison.
    pub mismatches: Vec<Mismatch>,
}

impl ParityReport {
    /// `true` when no comparison failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

fn widen<T: Element>(v: Vector4<T>) -> [f64; 4] {
    v.to_array().map(T::to_f64)
}

fn same_lanes<T: Element>(a: Vector4<T>, b: Vector4<T>) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

/// Lanes where `reference` is normal must be within `bound` relative error;
/// zero and NaN lanes must match in kind. Other lanes, and lanes within
/// `bound` of overflowing, are not constrained.
fn within_relative<T: Element>(actual: Vector4<T>, reference: Vector4<T>, bound: f64) -> bool {
    let near_overflow = |r: T| T::from_f64(r.to_f64() * (1.0 + bound)).to_f64().is_infinite();
    actual.to_array().into_iter().zip(reference.to_array()).all(|(a, r)| {
        if r.is_nan() {
            a.is_nan()
        } else if r == T::ZERO {
            a == T::ZERO
        } else if r.is_normal() && !near_overflow(r) {
            let (a, r) = (a.to_f64(), r.to_f64());
            ((a - r) / r).abs() <= bound
        } else {
            true
        }
    })
}

fn within_absolute<T: Element>(actual: Vector4<T>, reference: Vector4<T>, bound: f64) -> bool {
    actual
        .to_array()
        .into_iter()
        .zip(reference.to_array())
        .all(|(a, r)| (a.to_f64() - r.to_f64()).abs() <= bound)
}

type Unary<T> = fn(Vector4<T>) -> Vector4<T>;

struct Checker<T: Element> {
    checked: usize,
    mismatches: Vec<Mismatch>,
    inputs: Vec<[f64; 4]>,
    _element: std::marker::PhantomData<T>,
}

impl<T: Element> Checker<T> {
    fn record(&mut self, operation: &'static str, ok: bool, accelerated: Vector4<T>, software: Vector4<T>) {
        self.checked += 1;
        if !ok {
            tracing::debug!(operation, "parity mismatch");
            self.mismatches.push(Mismatch {
                operation,
                inputs: self.inputs.clone(),
                accelerated: widen(accelerated),
                software: widen(software),
            });
        }
    }

    fn exact(&mut self, operation: &'static str, accelerated: Vector4<T>, software: Vector4<T>) {
        let ok = same_lanes(accelerated, software);
        self.record(operation, ok, accelerated, software);
    }

    fn scalar(&mut self, operation: &'static str, accelerated: u32, software: u32) {
        let as_lanes = |bits: u32| {
            let lane = |i: u32| if (bits >> i) & 1 == 1 { T::ONE } else { T::ZERO };
            Vector4::new(lane(0), lane(1), lane(2), lane(3))
        };
        self.record(operation, accelerated == software, as_lanes(accelerated), as_lanes(software));
    }
}

/// Runs both strategies over an operation list for the given operands.
macro_rules! exact {
    ($checker:ident, $args:tt; $($op:ident),+ $(,)?) => {$(
        $checker.exact(stringify!($op), Accelerated.$op $args, Software.$op $args);
    )+};
}

/// Compares `Accelerated` against `Software` on every sample.
///
/// Sample `i` is used as the first operand, samples `i + 1` and `i + 2`
/// (wrapping) as the second and third.
#[must_use]
pub fn check_parity<T: Element>(samples: &[[T; 4]]) -> ParityReport
where
    Accelerated: Kernel<T>,
{
    let mut checker = Checker::<T> {
        checked: 0,
        mismatches: Vec::new(),
        inputs: Vec::new(),
        _element: std::marker::PhantomData,
    };
    let n = samples.len();

    for i in 0..n {
        let a = Vector4::from_array(samples[i]);
        let b = Vector4::from_array(samples[(i + 1) % n]);
        let c = Vector4::from_array(samples[(i + 2) % n]);
        checker.inputs = vec![widen(a), widen(b), widen(c)];

        exact!(checker, (a);
            sqrt, floor, round, truncate, not, negate, negate2, negate3, abs, zero_w,
            extract_sign, fill_with_x, fill_with_y, fill_with_z, fill_with_w,
            is_nan, is_infinite, is_finite, is_zero,
            reciprocal, reciprocal_sqrt,
            length2, length3, length4, length_squared2, length_squared3, length_squared4,
            normalize2, normalize3, normalize4,
            wrap_angle, sin, cos, tan, sin_approx, cos_approx, tan_approx, atan,
        );
        exact!(checker, (a, b);
            add, subtract, multiply, divide, max, min, horizontal_add, remainder,
            dot2, dot3, dot4, cross2, cross3,
            compare_equal, compare_not_equal, compare_greater_than,
            compare_greater_than_or_equal, compare_less_than, compare_less_than_or_equal,
            and, or, xor, and_not, equal_bits, copy_sign, in_bounds,
            distance2, distance3, distance4, distance_squared2, distance_squared3,
            distance_squared4, reflect2, reflect3, reflect4, atan2,
        );
        exact!(checker, (a, b, c);
            fused_multiply_add, cross4, select, clamp, lerp,
        );

        let ((acc_sin, acc_cos), (sw_sin, sw_cos)) = (Accelerated.sin_cos(a), Software.sin_cos(a));
        checker.exact("sin_cos.sin", acc_sin, sw_sin);
        checker.exact("sin_cos.cos", acc_cos, sw_cos);
        let ((acc_sin, acc_cos), (sw_sin, sw_cos)) =
            (Accelerated.sin_cos_approx(a), Software.sin_cos_approx(a));
        checker.exact("sin_cos_approx.sin", acc_sin, sw_sin);
        checker.exact("sin_cos_approx.cos", acc_cos, sw_cos);

        checker.scalar("move_mask", Accelerated.move_mask(a), Software.move_mask(a));
        let mask = Software.compare_less_than(a, b);
        checker.scalar(
            "all_true",
            u32::from(Accelerated.all_true(mask, LaneMask::ALL)),
            u32::from(Software.all_true(mask, LaneMask::ALL)),
        );
        checker.scalar(
            "mixed",
            u32::from(Accelerated.mixed(mask, LaneMask::XYZ)),
            u32::from(Software.mixed(mask, LaneMask::XYZ)),
        );

        check_estimates(&mut checker, a);
        check_trig_bounds(&mut checker, a);
    }

    ParityReport {
        element: T::NAME,
        capabilities: capabilities().to_string(),
        samples: n,
        checked: checker.checked,
        mismatches: checker.mismatches,
    }
}

fn check_estimates<T: Element>(checker: &mut Checker<T>, a: Vector4<T>)
where
    Accelerated: Kernel<T>,
{
    // Estimates flush subnormal operands, so only normal inputs are bounded.
    let normal = a.map(|x| if x.is_normal() { x } else { T::ONE });

    let (acc, sw) = (Accelerated.reciprocal_approx(normal), Software.reciprocal_approx(normal));
    let ok = within_relative(acc, sw, RECIPROCAL_ESTIMATE_BOUND);
    checker.record("reciprocal_approx", ok, acc, sw);

    let (acc, sw) = (
        Accelerated.reciprocal_sqrt_approx(normal),
        Software.reciprocal_sqrt_approx(normal),
    );
    let ok = within_relative(acc, sw, RECIPROCAL_ESTIMATE_BOUND);
    checker.record("reciprocal_sqrt_approx", ok, acc, sw);

    let normalizations: [(&'static str, Unary<T>, Unary<T>); 3] = [
        ("normalize_approx2", |v| Accelerated.normalize_approx2(v), |v| Software.normalize2(v)),
        ("normalize_approx3", |v| Accelerated.normalize_approx3(v), |v| Software.normalize3(v)),
        ("normalize_approx4", |v| Accelerated.normalize_approx4(v), |v| Software.normalize4(v)),
    ];
    let squared = [
        Software.length_squared2(a),
        Software.length_squared3(a),
        Software.length_squared4(a),
    ];
    for ((operation, approx, exact), length_squared) in normalizations.into_iter().zip(squared) {
        if !length_squared.x().is_normal() {
            continue;
        }
        let (acc, sw) = (approx(a), exact(a));
        let ok = within_relative(acc, sw, NORMALIZE_ESTIMATE_BOUND);
        checker.record(operation, ok, acc, sw);
    }
}

fn check_trig_bounds<T: Element>(checker: &mut Checker<T>, a: Vector4<T>)
where
    Accelerated: Kernel<T>,
{
    let angle = a.map(|x| {
        if x.is_nan() || x.to_f64().abs() > TRIG_APPROX_DOMAIN {
            T::ZERO
        } else {
            x
        }
    });

    let (approx, precise) = (Accelerated.sin_approx(angle), Accelerated.sin(angle));
    let ok = within_absolute(approx, precise, TRIG_APPROX_BOUND);
    checker.record("sin_approx.bound", ok, approx, precise);

    let (approx, precise) = (Accelerated.cos_approx(angle), Accelerated.cos(angle));
    let ok = within_absolute(approx, precise, TRIG_APPROX_BOUND);
    checker.record("cos_approx.bound", ok, approx, precise);
}

/// Special values every parity run should include: signed zeros,
/// infinities, NaN, subnormals, extremes and a few ordinary lanes.
#[must_use]
pub fn edge_samples<T: Element>() -> Vec<[T; 4]> {
    let nan = T::from_f64(f64::NAN);
    vec![
        [T::ZERO, -T::ZERO, T::ONE, T::NEG_ONE],
        [T::INFINITY, -T::INFINITY, nan, T::ZERO],
        [nan, T::ONE, -T::ZERO, T::INFINITY],
        [T::from_f64(1e-40), T::from_f64(-1e-40), T::from_f64(3.0e38), T::from_f64(-3.0e38)],
        [T::PI, -T::PI_DIV2, T::from_f64(10.4), T::from_f64(-10.4)],
        [T::from_f64(2.0), T::from_f64(-2.0), T::from_f64(0.5), T::from_f64(1e4)],
        [T::from_f64(2.5), T::from_f64(-2.5), T::from_f64(3.5), T::from_f64(-0.5)],
    ]
}
