//! Error types for conversion, solving and configuration.

use thiserror::Error;

use crate::convert::Diagnostic;
use crate::validation::ValidationError;

/// Errors raised while building an RCPSP model from a scheduling problem.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Activity duration has different lower and upper bounds
    #[error("Activity '{activity}' has non-fixed duration [{lower}, {upper}]")]
    NonFixedDuration {
        activity: String,
        lower: i64,
        upper: i64,
    },

    /// Effect value is not a constant
    #[error("Effect on '{fluent}' has non-constant amount [{lower}, {upper}]")]
    NonConstantEffect {
        fluent: String,
        lower: i64,
        upper: i64,
    },

    /// Base effect placed before the global start
    #[error("Effect on '{fluent}' at negative time {time}")]
    NegativeEffectTime { fluent: String, time: i64 },

    /// Calendar drops below zero
    #[error("Resource '{resource}' availability is negative at t={time}")]
    CapacityUnderflow { resource: String, time: usize },

    /// Calendar rises above the declared capacity
    #[error("Resource '{resource}' availability exceeds capacity {capacity} at t={time}")]
    CapacityOverflow {
        resource: String,
        capacity: i64,
        time: usize,
    },

    /// Activity requires more units than the resource ever has
    #[error("Activity '{activity}' requires {demand} of '{resource}' (capacity {capacity})")]
    DemandExceedsCapacity {
        activity: String,
        resource: String,
        demand: i64,
        capacity: i64,
    },

    /// Problem failed structural validation
    #[error("Invalid problem: {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    /// Strict mode rejected unsupported input
    #[error("Unsupported input: {} diagnostic(s)", .0.len())]
    Unsupported(Vec<Diagnostic>),
}

/// Errors reported by an RCPSP solver backend.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Backend rejected its parameters
    #[error("Invalid solver parameters: {0}")]
    InvalidParams(String),

    /// Backend failed while searching
    #[error("Solver '{solver}' failed: {message}")]
    Failed { solver: String, message: String },

    /// Backend was already released
    #[error("Solver '{0}' was released")]
    Released(String),
}

/// Errors of the solving engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Conversion of the problem failed
    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Converted model failed validation
    #[error("Invalid RCPSP model: {} error(s)", .0.len())]
    InvalidModel(Vec<ValidationError>),

    /// Solver backend failed
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Engine used after `close`
    #[error("Engine is closed")]
    Closed,
}

/// Errors loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML syntax or schema error
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Values parsed but are inconsistent
    #[error("Invalid configuration value: {0}")]
    Value(String),
}
