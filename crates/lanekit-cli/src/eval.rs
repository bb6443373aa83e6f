//! Single-operation evaluation on both strategies.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use lanekit_core::prelude::*;
use serde::Serialize;

/// Unary operations accepted by `lanekit eval`.
pub const UNARY: &[&str] = &[
    "sqrt", "floor", "round", "truncate", "reciprocal_approx", "reciprocal_sqrt_approx", "not",
    "fill_with_x", "fill_with_y", "fill_with_z", "fill_with_w", "negate", "negate2", "negate3",
    "negate4", "abs", "zero_w", "extract_sign", "is_nan", "is_infinite", "is_finite", "is_zero",
    "reciprocal", "reciprocal_sqrt", "length2", "length3", "length4", "length_squared2",
    "length_squared3", "length_squared4", "normalize2", "normalize3", "normalize4",
    "normalize_approx2", "normalize_approx3", "normalize_approx4", "wrap_angle", "sin", "cos",
    "sin_cos", "sin_approx", "cos_approx", "sin_cos_approx", "tan", "tan_approx", "atan",
];

/// Binary operations accepted by `lanekit eval`.
pub const BINARY: &[&str] = &[
    "add", "subtract", "multiply", "divide", "max", "min", "horizontal_add", "remainder", "dot2",
    "dot3", "dot4", "cross2", "cross3", "compare_equal", "compare_not_equal",
    "compare_greater_than", "compare_greater_than_or_equal", "compare_less_than",
    "compare_less_than_or_equal", "and", "or", "xor", "and_not", "equal_bits", "copy_sign",
    "in_bounds", "distance2", "distance3", "distance4", "distance_squared2", "distance_squared3",
    "distance_squared4", "reflect2", "reflect3", "reflect4", "atan2",
];

/// Ternary operations accepted by `lanekit eval`.
pub const TERNARY: &[&str] = &["fused_multiply_add", "cross4", "select", "clamp", "lerp"];

/// Number of operands `op` takes, if it is known.
pub fn arity(op: &str) -> Option<usize> {
    if UNARY.contains(&op) {
        Some(1)
    } else if BINARY.contains(&op) {
        Some(2)
    } else if TERNARY.contains(&op) {
        Some(3)
    } else {
        None
    }
}

macro_rules! dispatch {
    (
        $kernel:expr, $op:expr, $args:expr;
        unary: [$($unary:ident),* $(,)?];
        binary: [$($binary:ident),* $(,)?];
        ternary: [$($ternary:ident),* $(,)?];
        pairs: [$($pair:ident),* $(,)?];
    ) => {
        match ($op, $args) {
            $((op, [a]) if op == stringify!($unary) => vec![$kernel.$unary(*a)],)*
            $((op, [a, b]) if op == stringify!($binary) => vec![$kernel.$binary(*a, *b)],)*
            $((op, [a, b, c]) if op == stringify!($ternary) => vec![$kernel.$ternary(*a, *b, *c)],)*
            $((op, [a]) if op == stringify!($pair) => {
                let (first, second) = $kernel.$pair(*a);
                vec![first, second]
            })*
            (op, args) => bail!("unsupported operation '{op}' with {} operand(s)", args.len()),
        }
    };
}

/// Runs `op` on one strategy.
pub fn apply<T, K>(kernel: K, op: &str, args: &[Vector4<T>]) -> Result<Vec<Vector4<T>>>
where
    T: Element,
    K: Kernel<T>,
{
    Ok(dispatch!(kernel, op, args;
        unary: [
            sqrt, floor, round, truncate, reciprocal_approx, reciprocal_sqrt_approx, not,
            fill_with_x, fill_with_y, fill_with_z, fill_with_w, negate, negate2, negate3, negate4,
            abs, zero_w, extract_sign, is_nan, is_infinite, is_finite, is_zero, reciprocal,
            reciprocal_sqrt, length2, length3, length4, length_squared2, length_squared3,
            length_squared4, normalize2, normalize3, normalize4, normalize_approx2,
            normalize_approx3, normalize_approx4, wrap_angle, sin, cos, sin_approx, cos_approx,
            tan, tan_approx, atan,
        ];
        binary: [
            add, subtract, multiply, divide, max, min, horizontal_add, remainder, dot2, dot3,
            dot4, cross2, cross3, compare_equal, compare_not_equal, compare_greater_than,
            compare_greater_than_or_equal, compare_less_than, compare_less_than_or_equal, and, or,
            xor, and_not, equal_bits, copy_sign, in_bounds, distance2, distance3, distance4,
            distance_squared2, distance_squared3, distance_squared4, reflect2, reflect3, reflect4,
            atan2,
        ];
        ternary: [fused_multiply_add, cross4, select, clamp, lerp];
        pairs: [sin_cos, sin_cos_approx];
    ))
}

/// Result of one operation on both strategies.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    /// Operation name.
    pub operation: String,
    /// Lane type.
    pub element: &'static str,
    /// Accelerated results, one register per output.
    pub accelerated: Vec<[f64; 4]>,
    /// Software results, one register per output.
    pub software: Vec<[f64; 4]>,
    /// Whether both paths agree lane-for-lane (any NaN matches any NaN).
    pub matches: bool,
    #[serde(skip)]
    rendered: Vec<(String, String)>,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.operation, self.element)?;
        for (accelerated, software) in &self.rendered {
            writeln!(f, "  accelerated: {accelerated}")?;
            writeln!(f, "  software:    {software}")?;
        }
        write!(f, "  match: {}", if self.matches { "yes" } else { "no" })
    }
}

fn same_lanes<T: Element>(a: Vector4<T>, b: Vector4<T>) -> bool {
    a.to_array()
        .into_iter()
        .zip(b.to_array())
        .all(|(l, r)| (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits())
}

/// Parses the operands and evaluates `op` on both strategies.
pub fn evaluate<T>(op: &str, operands: &[String]) -> Result<Evaluation>
where
    T: Element + FromStr + fmt::Display,
    Accelerated: Kernel<T>,
{
    let expected = arity(op).with_context(|| format!("unknown operation '{op}'"))?;
    if operands.len() != expected {
        bail!(
            "'{op}' takes {expected} operand(s), got {}",
            operands.len()
        );
    }
    let args = operands
        .iter()
        .map(|text| {
            text.parse::<Vector4<T>>()
                .with_context(|| format!("parsing operand '{text}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let accelerated = apply(Accelerated, op, &args)?;
    let software = apply(Software, op, &args)?;
    tracing::debug!(op, element = T::NAME, "evaluated on both strategies");

    let matches = accelerated
        .iter()
        .zip(&software)
        .all(|(a, s)| same_lanes(*a, *s));
    let rendered = accelerated
        .iter()
        .zip(&software)
        .map(|(a, s)| (a.to_string(), s.to_string()))
        .collect();
    let widen = |v: &Vector4<T>| v.to_array().map(T::to_f64);

    Ok(Evaluation {
        operation: op.to_string(),
        element: T::NAME,
        accelerated: accelerated.iter().map(widen).collect(),
        software: software.iter().map(widen).collect(),
        matches,
        rendered,
    })
}
