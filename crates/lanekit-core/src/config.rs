//! Dispatch configuration.
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `LANEKIT_`-prefixed environment variables.
//!
//! ```toml
//! force_software = false
//! max_tier = "sse41"
//! log_capabilities = true
//! ```

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::capability::SimdTier;
use crate::error::{Error, Result};

/// Environment variable prefix for every dispatch setting.
pub const ENV_PREFIX: &str = "LANEKIT_";

/// How the accelerated kernels are allowed to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Route every operation through the software fallback.
    pub force_software: bool,
    /// Highest tier the accelerated kernels may use.
    pub max_tier: Option<SimdTier>,
    /// Log the capability set at `info` when it is initialised.
    pub log_capabilities: bool,
}

impl DispatchConfig {
    /// Loads defaults, then `path` (when given), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }
        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }

    /// Loads defaults overlaid with the environment only.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Renders the configuration in the file format `load` accepts.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Effective tier ceiling after `force_software` is applied.
    #[must_use]
    pub fn ceiling(&self) -> SimdTier {
        if self.force_software {
            return SimdTier::Scalar;
        }
        self.max_tier.unwrap_or(SimdTier::MAX)
    }
}
