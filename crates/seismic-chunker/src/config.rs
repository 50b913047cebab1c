//! Configuration for the chunker.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};
use crate::partition::ChunkingParams;

/// Configuration for partitioning and writing chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Traces per chunk along the trace axis.
    pub traces_per_chunk: usize,

    /// Time/depth extent per chunk in milliseconds.
    pub depth_interval_ms: f64,

    /// File name prefix for written chunks.
    pub chunk_prefix: String,

    /// Files with more traces than this are sampled (every n-th trace) when
    /// computing statistics.
    pub stats_sample_traces: usize,

    /// Loading the whole file logs a warning above this size.
    pub large_data_warning_mb: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            traces_per_chunk: 100,
            depth_interval_ms: 500.0,
            chunk_prefix: "chunk".to_string(),
            stats_sample_traces: 1000,
            large_data_warning_mb: 1000,
        }
    }
}

impl ChunkerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SEGY_TRACES_PER_CHUNK") {
            if let Ok(count) = val.parse() {
                config.traces_per_chunk = count;
            }
        }

        if let Ok(val) = std::env::var("SEGY_DEPTH_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                config.depth_interval_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("SEGY_CHUNK_PREFIX") {
            if !val.is_empty() {
                config.chunk_prefix = val;
            }
        }

        if let Ok(val) = std::env::var("SEGY_STATS_SAMPLE_TRACES") {
            if let Ok(count) = val.parse() {
                config.stats_sample_traces = count;
            }
        }

        if let Ok(val) = std::env::var("SEGY_LARGE_DATA_WARNING_MB") {
            if let Ok(mb) = val.parse() {
                config.large_data_warning_mb = mb;
            }
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChunkerError::io_failure(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.chunking_params().validate()?;

        if self.chunk_prefix.is_empty() {
            return Err(ChunkerError::invalid_parameter(
                "chunk_prefix must not be empty",
            ));
        }
        if self.chunk_prefix.contains(['/', '\\']) {
            return Err(ChunkerError::invalid_parameter(format!(
                "chunk_prefix {:?} must not contain path separators",
                self.chunk_prefix
            )));
        }

        if self.stats_sample_traces == 0 {
            return Err(ChunkerError::invalid_parameter(
                "stats_sample_traces must be > 0",
            ));
        }

        Ok(())
    }

    /// Chunk size parameters.
    pub fn chunking_params(&self) -> ChunkingParams {
        ChunkingParams::new(self.traces_per_chunk, self.depth_interval_ms)
    }

    /// Get the large-data warning threshold in bytes.
    pub fn large_data_warning_bytes(&self) -> usize {
        self.large_data_warning_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChunkerConfig::default();
        assert_eq!(config.traces_per_chunk, 100);
        assert_eq!(config.depth_interval_ms, 500.0);
        assert_eq!(config.chunk_prefix, "chunk");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_large_data_threshold_saturates() {
        let config = ChunkerConfig {
            large_data_warning_mb: usize::MAX / 2,
            ..Default::default()
        };
        assert_eq!(config.large_data_warning_bytes(), usize::MAX);
        assert_eq!(
            ChunkerConfig::default().large_data_warning_bytes(),
            1000 * 1024 * 1024
        );
    }

    #[test]
    fn test_yaml_partial_override() {
        let config = ChunkerConfig::from_yaml_str(
            "traces_per_chunk: 20\ndepth_interval_ms: 250.0\nchunk_prefix: mini\n",
        )
        .expect("parse");
        assert_eq!(config.traces_per_chunk, 20);
        assert_eq!(config.depth_interval_ms, 250.0);
        assert_eq!(config.chunk_prefix, "mini");
        assert_eq!(config.stats_sample_traces, 1000);
    }

    #[test]
    fn test_yaml_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("chunker.yaml");
        std::fs::write(&path, "depth_interval_ms: 96\n").expect("write");

        let config = ChunkerConfig::from_yaml(&path).expect("load");
        assert_eq!(config.depth_interval_ms, 96.0);
        assert_eq!(config.traces_per_chunk, 100);
    }

    #[test]
    fn test_yaml_type_error_is_invalid_parameter() {
        let err = ChunkerConfig::from_yaml_str("traces_per_chunk: many\n").unwrap_err();
        assert!(matches!(err, ChunkerError::InvalidParameter(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            ChunkerConfig {
                traces_per_chunk: 0,
                ..Default::default()
            },
            ChunkerConfig {
                depth_interval_ms: -1.0,
                ..Default::default()
            },
            ChunkerConfig {
                chunk_prefix: String::new(),
                ..Default::default()
            },
            ChunkerConfig {
                chunk_prefix: "a/b".to_string(),
                ..Default::default()
            },
            ChunkerConfig {
                stats_sample_traces: 0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ChunkerError::InvalidParameter(_))),
                "{:?} should be rejected",
                config
            );
        }
    }
}
