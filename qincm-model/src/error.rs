//! Error types for the navigation cost model.

use qincm_data::interpolation::InterpolationError;
use thiserror::Error;

/// Problems with the input tables, detected while building a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The chokepoint table has no entries
    #[error("Chokepoint table is empty")]
    NoChokepoints,

    /// Reference chokepoint is not in the chokepoint table
    #[error("Reference chokepoint not found: {0}")]
    UnknownReference(String),

    /// A route passes a chokepoint the model does not know
    #[error("Route {route} references unknown chokepoint: {chokepoint}")]
    UnknownChokepoint { route: String, chokepoint: String },

    /// Two chokepoints share a name
    #[error("Duplicate chokepoint: {0}")]
    DuplicateChokepoint(String),

    /// Two route entries describe the same set of chokepoints
    #[error("Duplicate route: {0}")]
    DuplicateRoute(String),

    /// A table key that should hold a number does not
    #[error("Invalid sample key '{key}' in {table}")]
    InvalidSampleKey { table: String, key: String },

    /// A chokepoint cannot be paired sample-by-sample with the reference
    #[error("Chokepoint {chokepoint} has {found} discharge samples, reference has {expected}")]
    ReferenceSampleMismatch {
        chokepoint: String,
        expected: usize,
        found: usize,
    },

    /// A lookup curve could not be built
    #[error("Invalid {curve} curve: {source}")]
    Curve {
        curve: String,
        #[source]
        source: InterpolationError,
    },

    /// Table JSON could not be parsed
    #[error("Failed to parse {table}: {message}")]
    Parse { table: String, message: String },
}

/// Discharge or occurrence input that does not fit the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Discharge row {row} has {found} values, expected one per chokepoint ({expected})")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unknown chokepoint in discharge input: {0}")]
    UnknownChokepoint(String),

    #[error("Discharge column {chokepoint} has {found} samples, expected {expected}")]
    ColumnLength {
        chokepoint: String,
        expected: usize,
        found: usize,
    },

    #[error("Got {found} sample labels for {expected} samples")]
    LabelCount { expected: usize, found: usize },

    #[error("Got {found} occurrence weights for {expected} samples")]
    OccurrenceCount { expected: usize, found: usize },

    #[error("Occurrence weight at sample {index} must be a non-negative number, got {value}")]
    InvalidOccurrence { index: usize, value: f64 },

    #[error("Invalid discharge sweep: {0}")]
    InvalidSweep(String),
}

/// Main error type for model operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QincmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Only the `scenario` evaluation mode exists
    #[error("Unsupported mode '{0}', only 'scenario' is supported")]
    UnsupportedMode(String),
}

/// Type alias for Results using QincmError
pub type Result<T> = std::result::Result<T, QincmError>;
