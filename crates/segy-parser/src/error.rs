//! Error types for SEG-Y parsing operations.

use thiserror::Error;

/// Result type for SEG-Y parser operations.
pub type SegyResult<T> = Result<T, SegyError>;

/// Error types for SEG-Y parsing.
#[derive(Error, Debug)]
pub enum SegyError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not have the layout of a SEG-Y file
    #[error("Invalid SEG-Y layout: {0}")]
    InvalidFormat(String),

    /// Data sample format code we cannot decode
    #[error("Unsupported data sample format code {0}")]
    UnsupportedFormat(i16),

    /// Trace or sample index outside the file
    #[error("{what} {requested} out of range (available: {available})")]
    OutOfRange {
        what: &'static str,
        requested: String,
        available: usize,
    },
}

impl SegyError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create an OutOfRange error for a trace index or range.
    pub fn trace_out_of_range(requested: impl std::fmt::Debug, available: usize) -> Self {
        Self::OutOfRange {
            what: "trace",
            requested: format!("{:?}", requested),
            available,
        }
    }

    /// Create an OutOfRange error for a sample index or range.
    pub fn sample_out_of_range(requested: impl std::fmt::Debug, available: usize) -> Self {
        Self::OutOfRange {
            what: "sample",
            requested: format!("{:?}", requested),
            available,
        }
    }
}
