//! Summary statistics over sample blocks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};
use crate::types::TraceBlock;

/// Summary statistics of a block of samples.
///
/// Mean and standard deviation are accumulated in `f64`; the standard
/// deviation is the population value. Percentiles interpolate linearly
/// between the two nearest ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataStatistics {
    pub shape: (usize, usize),
    pub dtype: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub percentile_5: f64,
    pub percentile_95: f64,
}

impl DataStatistics {
    /// Compute statistics over every sample of `block`.
    pub fn compute(block: &TraceBlock) -> Result<Self> {
        if block.is_empty() {
            return Err(ChunkerError::invalid_parameter(
                "cannot compute statistics of an empty block",
            ));
        }

        let mut sorted: Vec<f64> = block.data().iter().map(|&v| v as f64).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Ok(Self {
            shape: block.shape(),
            dtype: "float32".to_string(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            std: variance.sqrt(),
            median: percentile(&sorted, 50.0),
            percentile_5: percentile(&sorted, 5.0),
            percentile_95: percentile(&sorted, 95.0),
        })
    }
}

/// Linear-interpolated percentile of ascending, non-empty `sorted`.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

impl fmt::Display for DataStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Shape:    ({}, {}) {}", self.shape.0, self.shape.1, self.dtype)?;
        writeln!(f, "  Min:      {:.6e}", self.min)?;
        writeln!(f, "  Max:      {:.6e}", self.max)?;
        writeln!(f, "  Mean:     {:.6e}", self.mean)?;
        writeln!(f, "  Std dev:  {:.6e}", self.std)?;
        writeln!(f, "  Median:   {:.6e}", self.median)?;
        write!(
            f,
            "  P5 / P95: {:.6e} / {:.6e}",
            self.percentile_5, self.percentile_95
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, create_constant_traces, create_decaying_traces};

    #[test]
    fn test_statistics_small_block() {
        let block = TraceBlock::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).expect("shape");
        let stats = DataStatistics::compute(&block).expect("stats");

        assert_eq!(stats.shape, (2, 3));
        assert_eq!(stats.dtype, "float32");
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 6.0);
        assert_approx_eq!(stats.mean, 3.5, 1e-12);
        assert_approx_eq!(stats.std, (35.0f64 / 12.0).sqrt(), 1e-12);
        assert_approx_eq!(stats.median, 3.5, 1e-12);
        // rank 0.25 and 4.75
        assert_approx_eq!(stats.percentile_5, 1.25, 1e-12);
        assert_approx_eq!(stats.percentile_95, 5.75, 1e-12);
    }

    #[test]
    fn test_statistics_single_value() {
        let block = TraceBlock::new(vec![-2.5], 1, 1).expect("shape");
        let stats = DataStatistics::compute(&block).expect("stats");
        assert_eq!(stats.min, -2.5);
        assert_eq!(stats.median, -2.5);
        assert_eq!(stats.std, 0.0);
    }

    #[test]
    fn test_statistics_constant_traces() {
        let block =
            TraceBlock::new(create_constant_traces(4, 25, 0.75), 4, 25).expect("shape");
        let stats = DataStatistics::compute(&block).expect("stats");
        assert_approx_eq!(stats.mean, 0.75, 1e-9);
        assert_approx_eq!(stats.std, 0.0, 1e-9);
        assert_approx_eq!(stats.percentile_5, 0.75, 1e-9);
        assert_approx_eq!(stats.percentile_95, 0.75, 1e-9);
    }

    #[test]
    fn test_statistics_normalized_traces() {
        let block =
            TraceBlock::new(create_decaying_traces(6, 250, 2.0), 6, 250).expect("shape");
        let stats = DataStatistics::compute(&block).expect("stats");
        assert!(stats.min >= -1.0 && stats.max <= 1.0);
        assert!(stats.percentile_5 <= stats.median && stats.median <= stats.percentile_95);
        assert!(stats.std > 0.0);
    }

    #[test]
    fn test_statistics_empty_block() {
        assert!(DataStatistics::compute(&TraceBlock::empty(10)).is_err());
    }
}
