/// Error types for the reservoir logbook core
use thiserror::Error;

use crate::reading::Field;

/// A raw reading rejected at the validation boundary.
///
/// The metrics engine never raises these; it reads unparseable fields as 0.
/// Data entry uses them to refuse a reading before it reaches the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// Field text is not a decimal number (either separator accepted)
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: Field, value: String },

    /// Field parsed but is below zero
    #[error("{field} must not be negative: {value}")]
    Negative { field: Field, value: f64 },
}

/// Failure to obtain calibration text.
///
/// Malformed lines inside the text are skipped, never reported here.
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// Calibration file could not be read
    #[error("Failed to read calibration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Results using CalibrationError
pub type Result<T> = std::result::Result<T, CalibrationError>;
