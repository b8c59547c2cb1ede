//! Handler configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::{HandlerError, HandlerResult};

/// Timing and naming knobs for the constraint handler.
///
/// Every field has a default, so a partial TOML table is enough:
///
/// ```toml
/// sweep_interval_ms = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Period of the full sweep while any tag is constrained.
    pub sweep_interval_ms: u64,
    /// Cooldown between two additions of the same (tag, download).
    pub debounce_cooldown_ms: u64,
    /// Name of the worker thread.
    pub worker_name: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 30_000,
            debounce_cooldown_ms: 1_000,
            worker_name: "tag:constraints".to_string(),
        }
    }
}

impl HandlerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> HandlerResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| HandlerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HandlerResult<()> {
        if self.sweep_interval_ms == 0 {
            return Err(HandlerError::config("sweep_interval_ms must be greater than 0"));
        }
        if self.debounce_cooldown_ms == 0 {
            return Err(HandlerError::config("debounce_cooldown_ms must be greater than 0"));
        }
        if self.worker_name.trim().is_empty() {
            return Err(HandlerError::config("worker_name must not be empty"));
        }
        Ok(())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn debounce_cooldown(&self) -> Duration {
        Duration::from_millis(self.debounce_cooldown_ms)
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = millis(interval);
        self
    }

    pub fn with_debounce_cooldown(mut self, cooldown: Duration) -> Self {
        self.debounce_cooldown_ms = millis(cooldown);
        self
    }

    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
