use serde::{Deserialize, Serialize};

use crate::dataset::YearOrder;
use crate::error::ConfigError;

/// Playback settings read from `playback.toml`. Missing keys use defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between ticks, measured from the end of the previous tick.
    pub tick_interval_ms: u32,
    pub year_order: YearOrder,
    pub year_param: String,
    pub paused_param: String,
    /// Log every tick and toggle to the browser console.
    pub debug_logging: bool,
}

impl PlaybackConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u32 = 2000;

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.year_param.is_empty() {
            return Err(ConfigError::EmptyParamName { field: "year_param" });
        }
        if self.paused_param.is_empty() {
            return Err(ConfigError::EmptyParamName {
                field: "paused_param",
            });
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            year_order: YearOrder::FirstSeen,
            year_param: "year".to_string(),
            paused_param: "paused".to_string(),
            debug_logging: false,
        }
    }
}
