//! Configuration for the ambient pieces of report handling
//!
//! Merge semantics are fixed; the only configurable piece is which clock
//! stamps local updates. Configuration is layered: defaults, then a TOML
//! file, then `PROBE_*` environment variables.
//!
//! ```toml
//! [clock]
//! source = "manual"
//! start_ms = 1700000000000
//! step_ms = 1
//! ```

use crate::errors::{ProbeError, Result};
use crate::time::{ManualClock, PhysicalClock, SystemClock};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

const ENV_PREFIX: &str = "PROBE_";

/// Which clock stamps local updates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockSource {
    /// Wall clock
    #[default]
    System,
    /// Deterministic clock driven by `start_ms`/`step_ms`
    Manual,
}

/// Clock section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Clock implementation to use
    pub source: ClockSource,
    /// Initial reading of a manual clock
    pub start_ms: Option<u64>,
    /// Advance per reading of a manual clock
    pub step_ms: Option<u64>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Clock settings
    pub clock: ClockConfig,
}

impl ProbeConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ProbeError::invalid(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::internal(format!("Failed to read config file: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Apply `PROBE_*` environment variables on top of the current values
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `PROBE_*` key/value pairs on top of the current values.
    ///
    /// Recognised keys: `PROBE_CLOCK_SOURCE`, `PROBE_CLOCK_START_MS`,
    /// `PROBE_CLOCK_STEP_MS`. Other keys are ignored.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            self.set_from_string(&name.to_lowercase().replace('_', "."), value.as_ref())?;
        }
        Ok(())
    }

    /// Set a single value by dotted key (e.g. `clock.start.ms`)
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "clock.source" => {
                self.clock.source = match value.to_lowercase().as_str() {
                    "system" => ClockSource::System,
                    "manual" => ClockSource::Manual,
                    other => {
                        return Err(ProbeError::invalid(format!("Unknown clock source: {other}")))
                    }
                };
            }
            "clock.start.ms" => self.clock.start_ms = Some(parse_ms(key, value)?),
            "clock.step.ms" => self.clock.step_ms = Some(parse_ms(key, value)?),
            _ => {
                tracing::trace!(key, "ignoring unrecognised config key");
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.clock.source == ClockSource::System
            && (self.clock.start_ms.is_some() || self.clock.step_ms.is_some())
        {
            return Err(ProbeError::invalid(
                "start_ms/step_ms only apply to the manual clock",
            ));
        }
        Ok(())
    }

    /// Build the configured clock
    pub fn build_clock(&self) -> Result<Arc<dyn PhysicalClock>> {
        self.validate()?;
        let clock: Arc<dyn PhysicalClock> = match self.clock.source {
            ClockSource::System => Arc::new(SystemClock),
            ClockSource::Manual => Arc::new(ManualClock::with_step(
                self.clock.start_ms.unwrap_or(0),
                self.clock.step_ms.unwrap_or(0),
            )),
        };
        tracing::debug!(source = ?self.clock.source, "built clock");
        Ok(clock)
    }
}

fn parse_ms(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| ProbeError::invalid(format!("Invalid value for {key}: {e}")))
}
