//! Controller configuration with TOML file support.

use crate::error::GaugeError;
use gauge_twab::MAX_CARDINALITY;
use gauge_types::FIXED_POINT_ONE;
use serde::{Deserialize, Serialize};

/// Configuration for a gauge controller.
///
/// Can be loaded from a TOML file via [`GaugeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeConfig {
    /// Checkpoints retained per ledger before the oldest is overwritten.
    #[serde(default = "default_ring_capacity")]
    pub ring_capacity: u32,

    /// Scale given to gauges added without an explicit scale (18-decimal
    /// fixed point; 10^18 is 1.0).
    #[serde(default = "default_scale")]
    pub default_scale: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_ring_capacity() -> u32 {
    MAX_CARDINALITY
}

fn default_scale() -> u64 {
    FIXED_POINT_ONE as u64
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GaugeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, GaugeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| GaugeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, GaugeError> {
        let config: Self = toml::from_str(s).map_err(|e| GaugeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, GaugeError> {
        toml::to_string_pretty(self).map_err(|e| GaugeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GaugeError> {
        if self.ring_capacity == 0 || self.ring_capacity > MAX_CARDINALITY {
            return Err(GaugeError::Config(format!(
                "ring_capacity must be between 1 and {MAX_CARDINALITY}, got {}",
                self.ring_capacity
            )));
        }
        if self.default_scale == 0 {
            return Err(GaugeError::Config(
                "default_scale must be nonzero, a zero-scale gauge does not exist".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            ring_capacity: default_ring_capacity(),
            default_scale: default_scale(),
        }
    }
}
