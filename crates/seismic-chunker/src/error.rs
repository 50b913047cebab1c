//! Error types for SEG-Y chunking.

use segy_parser::SegyError;
use thiserror::Error;

/// Errors that can occur while partitioning, extracting or writing chunks.
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// A chunking parameter or configuration value is not usable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Requested trace/sample indices exceed the file extent.
    #[error("requested {requested} is outside the file extent {extent}")]
    OutOfRange {
        requested: String,
        extent: String,
    },

    /// File open/read/write failure from storage or a codec.
    #[error("I/O failure: {0}")]
    IoFailure(String),
}

impl ChunkerError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(requested: impl Into<String>, extent: impl Into<String>) -> Self {
        Self::OutOfRange {
            requested: requested.into(),
            extent: extent.into(),
        }
    }

    /// Create an IoFailure error.
    pub fn io_failure(msg: impl Into<String>) -> Self {
        Self::IoFailure(msg.into())
    }
}

impl From<std::io::Error> for ChunkerError {
    fn from(err: std::io::Error) -> Self {
        Self::IoFailure(err.to_string())
    }
}

impl From<serde_json::Error> for ChunkerError {
    fn from(err: serde_json::Error) -> Self {
        Self::IoFailure(format!("metadata codec: {}", err))
    }
}

impl From<serde_yaml::Error> for ChunkerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::InvalidParameter(format!("config: {}", err))
    }
}

impl From<SegyError> for ChunkerError {
    fn from(err: SegyError) -> Self {
        match err {
            SegyError::OutOfRange {
                what,
                requested,
                available,
            } => Self::OutOfRange {
                requested: format!("{} {}", what, requested),
                extent: format!("0..{}", available),
            },
            other => Self::IoFailure(other.to_string()),
        }
    }
}

/// Result type for chunker operations.
pub type Result<T> = std::result::Result<T, ChunkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segy_out_of_range_maps_to_out_of_range() {
        let err: ChunkerError = SegyError::trace_out_of_range(10..12, 10).into();
        assert!(matches!(err, ChunkerError::OutOfRange { .. }));
        assert!(err.to_string().contains("trace 10..12"));
    }

    #[test]
    fn test_segy_format_error_maps_to_io_failure() {
        let err: ChunkerError = SegyError::UnsupportedFormat(6).into();
        assert!(matches!(err, ChunkerError::IoFailure(_)));
    }

    #[test]
    fn test_io_error_maps_to_io_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.sgy");
        let err: ChunkerError = io.into();
        assert!(matches!(err, ChunkerError::IoFailure(_)));
    }
}
