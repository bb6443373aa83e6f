//! Error types for lanekit-core.
//!
//! The numeric kernel itself never fails: degenerate inputs produce IEEE-754
//! special values. Errors only exist at the configuration, memory-adapter,
//! and parsing boundaries.

use thiserror::Error;

/// Boundary error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or merged.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown SIMD tier name.
    #[error("Unknown SIMD tier '{0}' (expected scalar, baseline, sse3, sse41, avx or avx2)")]
    InvalidTier(String),

    /// A memory adapter was given fewer elements than it needs.
    #[error("Slice too short: needed {needed} elements, got {actual}")]
    SliceTooShort {
        /// Elements required by the adapter.
        needed: usize,
        /// Elements actually provided.
        actual: usize,
    },

    /// Capabilities were already initialised for this process.
    #[error("Capabilities already initialised; configure dispatch before the first kernel call")]
    AlreadyInitialized,

    /// A textual vector or operation could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for lanekit boundary operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_too_short_display() {
        let err = Error::SliceTooShort {
            needed: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Slice too short: needed 3 elements, got 2");
    }

    #[test]
    fn test_invalid_tier_display() {
        let err = Error::InvalidTier("avx512".to_string());
        assert!(err.to_string().contains("avx512"));
    }

    #[test]
    fn test_figment_error_maps_to_config() {
        let err: Error = figment::Error::from("bad value".to_string()).into();
        assert!(matches!(err, Error::Config(msg) if msg.contains("bad value")));
    }
}
