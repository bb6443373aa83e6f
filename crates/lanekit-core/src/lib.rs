//! # lanekit Core
//!
//! Dual-path vector kernel for 4-lane `f32` and `f64` registers.
//!
//! Every operation exists twice: a hardware-accelerated strategy selected at
//! runtime from the CPU's capability set, and a scalar software strategy that
//! defines the correct result. Exact operations agree bit-for-bit between the
//! two; approximations carry documented error bounds.
//!
//! ## Features
//!
//! - **Runtime dispatch**: SSE/SSE2/SSE3/SSE4.1/FMA for `f32`, AVX/AVX2/FMA
//!   for `f64`, NEON on aarch64, cached once per process
//! - **Vector algebra**: dot, cross, length, normalize, distance, reflect, lerp
//! - **Boolean vectors**: NaN-aware comparisons, bitwise logic, select, masks
//! - **Trigonometry**: sin/cos/tan/sin_cos with precise and approx tiers,
//!   atan and atan2
//! - **Self-check**: compare both strategies on any inputs at runtime
//!
//! ## Quick Start
//!
//! ```rust
//! use lanekit_core::prelude::*;
//!
//! let a = Vector4F::new(1.0, 2.0, 3.0, 0.0);
//! let b = Vector4F::new(4.0, 5.0, 6.0, 0.0);
//!
//! assert_eq!(Accelerated.dot3(a, b).x(), 32.0);
//! assert_eq!(Accelerated.cross3(a, b), Vector4F::new(-3.0, 6.0, -3.0, 0.0));
//!
//! let (sin, cos) = Accelerated.sin_cos(Vector4F::splat(0.5));
//! assert!((sin.x() - 0.5_f32.sin()).abs() < 1e-6);
//! assert!((cos.x() - 0.5_f32.cos()).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::cast_lossless,
        clippy::unreadable_literal,
        clippy::approx_constant
    )
)]

pub mod capability;
#[cfg(test)]
mod capability_tests;
pub mod config;
pub mod dimension;
#[cfg(test)]
mod dimension_tests;
pub mod element;
pub mod error;
pub mod kernel;
pub mod ops;
pub mod selfcheck;
#[cfg(test)]
mod selfcheck_tests;
pub mod vector;

pub use capability::{
    capabilities, detected_capabilities, init_with_config, warmup, Capabilities, CpuFeature,
    SimdTier,
};
pub use config::DispatchConfig;
pub use dimension::{Vector2, Vector3};
pub use element::Element;
pub use error::{Error, Result};
pub use kernel::{Accelerated, Kernel, LaneMask, Software, Trigonometry, VectorAlgebra};
pub use selfcheck::{check_parity, edge_samples, Mismatch, ParityReport};
pub use vector::{shuffle_control, Vector4, Vector4D, Vector4F};

/// Everything needed to call the kernels.
pub mod prelude {
    pub use crate::dimension::{Vector2, Vector3};
    pub use crate::element::Element;
    pub use crate::kernel::{Accelerated, Kernel, LaneMask, Software, Trigonometry, VectorAlgebra};
    pub use crate::vector::{Vector4, Vector4D, Vector4F};
}
