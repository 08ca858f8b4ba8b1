//! Error types and handling for Timeblock
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Timeblock operations
pub type Result<T> = std::result::Result<T, TimeBlockError>;

/// Main error type for Timeblock
#[derive(Debug, Error)]
pub enum TimeBlockError {
    /// Malformed calendar date or timestamp supplied by a caller
    #[error("Invalid date: {message}")]
    InvalidDate { message: String },

    /// Time of day matched none of the bands of its season/workday row.
    /// Reaching this is a bug in the band table, not a runtime condition.
    #[error("Unmatched time band: time of day {time_of_day} is not covered")]
    UnmatchedTimeBand { time_of_day: f64 },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// HTTP server could not bind or stopped serving
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl TimeBlockError {
    /// Create a new invalid date error
    pub fn invalid_date<S: Into<String>>(message: S) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Create a new unmatched time band error
    pub const fn unmatched_time_band(time_of_day: f64) -> Self {
        Self::UnmatchedTimeBand { time_of_day }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        Self::Web {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TimeBlockError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for TimeBlockError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for TimeBlockError {
    fn from(err: chrono::ParseError) -> Self {
        Self::invalid_date(err.to_string())
    }
}
