//! Simulator configuration: controller settings plus logging.

use anyhow::Context;
use gauge_controller::GaugeConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::LogFormat;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    pub gauge: GaugeConfig,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "human".into()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            gauge: GaugeConfig::default(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

/// Settings given on the command line or through `GAUGE_*` variables.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub ring_capacity: Option<u32>,
    pub default_scale: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("parsing config")
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("serializing config")
    }

    /// File settings (or defaults) with `overrides` applied, then validated.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        if let Some(capacity) = overrides.ring_capacity {
            config.gauge.ring_capacity = capacity;
        }
        if let Some(scale) = overrides.default_scale {
            config.gauge.default_scale = scale;
        }
        if let Some(level) = overrides.log_level {
            config.log_level = level;
        }
        if let Some(format) = overrides.log_format {
            config.log_format = format;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.gauge.validate()?;
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> anyhow::Result<LogFormat> {
        self.log_format.parse().map_err(anyhow::Error::msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn overrides_beat_file_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ring_capacity = 32\nlog_level = \"debug\"").unwrap();
        let config = CliConfig::load(
            Some(file.path()),
            Overrides {
                ring_capacity: Some(8),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(config.gauge.ring_capacity, 8);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero_capacity = Overrides {
            ring_capacity: Some(0),
            ..Overrides::default()
        };
        assert!(CliConfig::load(None, zero_capacity).is_err());
        let bad_format = Overrides {
            log_format: Some("xml".into()),
            ..Overrides::default()
        };
        assert!(CliConfig::load(None, bad_format).is_err());
    }

    #[test]
    fn toml_output_reloads() {
        let config = CliConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(CliConfig::from_toml_str(&text).unwrap(), config);
    }
}
