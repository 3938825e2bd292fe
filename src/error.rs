//! Errors raised by the simulation core.

use thiserror::Error;

/// Failure of a parameter lookup, a simulation run or a calibration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A growth rule asked for a key that the parameter set does not hold.
    #[error("missing parameter {key:?}")]
    MissingParameter { key: String },

    /// The requested year range is empty or reversed.
    #[error("invalid year range: t_end ({t_end}) must not be before t_0 ({t_0})")]
    InvalidRange { t_0: i32, t_end: i32 },

    /// A year-valued parameter was given a value that is not a whole number.
    #[error("parameter {key:?} must be an integral year, but is {value}")]
    InvalidYear { key: String, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
