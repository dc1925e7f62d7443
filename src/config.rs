//! Bridge configuration.
//!
//! Conversion knobs and solver parameters, loadable from TOML:
//!
//! ```toml
//! [conversion]
//! horizon = 2000
//! special_constraints = true
//!
//! [solver]
//! time_limit_secs = 30
//! options = { greedy_start = true }
//! ```
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of discrete time units covered by capacity calendars.
pub const DEFAULT_HORIZON: usize = 100_000;

// -----------------------------------------------------------------------
// Conversion
// -----------------------------------------------------------------------

/// Options of the forward conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Length of every capacity calendar.
    pub horizon: usize,
    /// Name of the synthetic origin task.
    pub source_task: String,
    /// Name of the synthetic terminal task.
    pub sink_task: String,
    /// Record start-at-end, start-together, offset and window constraints
    /// in the model instead of reporting them.
    pub special_constraints: bool,
    /// Fail on any diagnostic.
    pub strict: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            source_task: "source_".to_string(),
            sink_task: "sink_".to_string(),
            special_constraints: false,
            strict: false,
        }
    }
}

impl ConversionConfig {
    /// Builder: sets the horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Builder: enables special constraints.
    pub fn with_special_constraints(mut self, enabled: bool) -> Self {
        self.special_constraints = enabled;
        self
    }

    /// Builder: enables strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Checks the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::Value("horizon must be positive".into()));
        }
        if self.source_task.is_empty() || self.sink_task.is_empty() {
            return Err(ConfigError::Value("anchor task names must not be empty".into()));
        }
        if self.source_task == self.sink_task {
            return Err(ConfigError::Value(format!(
                "source and sink share the name '{}'",
                self.source_task
            )));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Solver
// -----------------------------------------------------------------------

/// Parameters passed through to the solver backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Wall-clock limit; `None` lets the backend decide.
    pub time_limit_secs: Option<u64>,
    /// Backend-specific options.
    pub options: serde_json::Value,
}

impl SolverParams {
    /// Builder: sets the time limit.
    pub fn with_time_limit(mut self, secs: u64) -> Self {
        self.time_limit_secs = Some(secs);
        self
    }

    /// Backend option by key.
    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }
}

// -----------------------------------------------------------------------
// File
// -----------------------------------------------------------------------

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub conversion: ConversionConfig,
    pub solver: SolverParams,
}

impl BridgeConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.conversion.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}
