//! Core types for SEG-Y chunking.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};

/// Immutable geometry summary of an open SEG-Y file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub total_traces: usize,
    pub total_samples: usize,
    pub sample_interval_ms: f64,
}

impl FileInfo {
    /// Create a new file info.
    pub fn new(total_traces: usize, total_samples: usize, sample_interval_ms: f64) -> Self {
        Self {
            total_traces,
            total_samples,
            sample_interval_ms,
        }
    }

    /// Record length: total_samples × sample_interval_ms.
    pub fn total_duration_ms(&self) -> f64 {
        self.total_samples as f64 * self.sample_interval_ms
    }

    /// Time/depth axis over every sample of the file.
    pub fn axis(&self) -> AxisVector {
        AxisVector::new(self.total_samples, self.sample_interval_ms)
    }

    /// Check that a trace range lies inside the file.
    pub fn check_trace_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.total_traces {
            return Err(ChunkerError::out_of_range(
                format!("traces {:?}", range),
                format!("0..{}", self.total_traces),
            ));
        }
        Ok(())
    }

    /// Check that a sample range lies inside every trace.
    pub fn check_sample_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.total_samples {
            return Err(ChunkerError::out_of_range(
                format!("samples {:?}", range),
                format!("0..{}", self.total_samples),
            ));
        }
        Ok(())
    }
}

/// Time/depth axis: `value[i] = i × sample_interval_ms`.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisVector {
    values: Vec<f64>,
    sample_interval_ms: f64,
}

impl AxisVector {
    /// Build the axis for `len` samples.
    pub fn new(len: usize, sample_interval_ms: f64) -> Self {
        Self {
            values: (0..len).map(|i| i as f64 * sample_interval_ms).collect(),
            sample_interval_ms,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_ms
    }

    /// Time at sample `index`. Defined up to and including `len()` so that
    /// the exclusive end of a half-open range maps to a time too.
    pub fn value_at(&self, index: usize) -> f64 {
        index as f64 * self.sample_interval_ms
    }

    /// Map a half-open sample range to its `[start, end)` time range.
    pub fn time_range(&self, samples: &Range<usize>) -> (f64, f64) {
        (self.value_at(samples.start), self.value_at(samples.end))
    }

    /// Convert a millisecond range to a sample-index range using
    /// nearest-index rounding, clamped to `[0, len]`.
    pub fn sample_range_for_ms(&self, start_ms: f64, end_ms: f64) -> Range<usize> {
        let to_index = |ms: f64| -> usize {
            if self.sample_interval_ms <= 0.0 || !ms.is_finite() || ms <= 0.0 {
                return 0;
            }
            let index = (ms / self.sample_interval_ms).round();
            if index >= self.len() as f64 {
                self.len()
            } else {
                index as usize
            }
        };

        let start = to_index(start_ms);
        let end = to_index(end_ms).max(start);
        start..end
    }
}

/// A 2-D block of samples indexed `[trace, sample]`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceBlock {
    data: Vec<f32>,
    num_traces: usize,
    num_samples: usize,
}

impl TraceBlock {
    /// Wrap row-major samples. Fails if the length does not match the shape.
    pub fn new(data: Vec<f32>, num_traces: usize, num_samples: usize) -> Result<Self> {
        if data.len() != num_traces * num_samples {
            return Err(ChunkerError::io_failure(format!(
                "block of {} values cannot have shape ({}, {})",
                data.len(),
                num_traces,
                num_samples
            )));
        }
        Ok(Self {
            data,
            num_traces,
            num_samples,
        })
    }

    /// An empty block with the given trace width.
    pub fn empty(num_samples: usize) -> Self {
        Self {
            data: Vec::new(),
            num_traces: 0,
            num_samples,
        }
    }

    pub fn num_traces(&self) -> usize {
        self.num_traces
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// (traces, samples)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_traces, self.num_samples)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the value at a specific `[trace, sample]`.
    pub fn get(&self, trace: usize, sample: usize) -> Option<f32> {
        if trace >= self.num_traces || sample >= self.num_samples {
            return None;
        }
        self.data.get(trace * self.num_samples + sample).copied()
    }

    /// Samples of one trace.
    pub fn trace(&self, trace: usize) -> Option<&[f32]> {
        if trace >= self.num_traces {
            return None;
        }
        let start = trace * self.num_samples;
        Some(&self.data[start..start + self.num_samples])
    }

    /// Iterate over traces.
    pub fn traces(&self) -> impl Iterator<Item = &[f32]> {
        // zero-width blocks hold no data, so max(1) only guards chunks(0)
        self.data.chunks(self.num_samples.max(1))
    }

    /// Copy out a column window `[samples.start, samples.end)` of every trace.
    pub fn slice_samples(&self, samples: Range<usize>) -> Result<Self> {
        if samples.start > samples.end || samples.end > self.num_samples {
            return Err(ChunkerError::out_of_range(
                format!("samples {:?}", samples),
                format!("0..{}", self.num_samples),
            ));
        }

        let width = samples.len();
        let mut data = Vec::with_capacity(self.num_traces * width);
        for trace in self.traces() {
            data.extend_from_slice(&trace[samples.clone()]);
        }
        Ok(Self {
            data,
            num_traces: self.num_traces,
            num_samples: width,
        })
    }
}

/// Position of a chunk along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId {
    pub trace_index: usize,
    pub sample_index: usize,
}

impl ChunkId {
    pub fn new(trace_index: usize, sample_index: usize) -> Self {
        Self {
            trace_index,
            sample_index,
        }
    }

    pub fn as_tuple(&self) -> (usize, usize) {
        (self.trace_index, self.sample_index)
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.trace_index, self.sample_index)
    }
}

/// One cell of the partition grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellBoundary {
    pub chunk_id: ChunkId,
    /// Position in the row-major partition sequence.
    pub chunk_number: usize,
    pub trace_range: Range<usize>,
    pub sample_range: Range<usize>,
}

impl CellBoundary {
    pub fn num_traces(&self) -> usize {
        self.trace_range.len()
    }

    pub fn num_samples(&self) -> usize {
        self.sample_range.len()
    }

    /// (traces, samples)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_traces(), self.num_samples())
    }
}

/// An extracted chunk: boundary, owned samples, absolute time range.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub boundary: CellBoundary,
    pub data: TraceBlock,
    pub time_range_ms: (f64, f64),
    pub source_file: PathBuf,
}

impl Chunk {
    pub fn chunk_id(&self) -> ChunkId {
        self.boundary.chunk_id
    }

    pub fn chunk_number(&self) -> usize {
        self.boundary.chunk_number
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    /// Sidecar metadata describing this chunk.
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            chunk_id: self.boundary.chunk_id.as_tuple(),
            chunk_number: self.boundary.chunk_number,
            trace_range: (self.boundary.trace_range.start, self.boundary.trace_range.end),
            sample_range: (self.boundary.sample_range.start, self.boundary.sample_range.end),
            time_range_ms: self.time_range_ms,
            shape: self.data.shape(),
            source_file: self.source_file.to_string_lossy().into_owned(),
        }
    }
}

/// Sidecar metadata written next to each chunk array.
///
/// Field names and nesting are the compatibility surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkMetadata {
    pub chunk_id: (usize, usize),
    pub chunk_number: usize,
    pub trace_range: (usize, usize),
    pub sample_range: (usize, usize),
    pub time_range_ms: (f64, f64),
    pub shape: (usize, usize),
    pub source_file: String,
}

impl ChunkMetadata {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ChunkerError::io_failure(format!("invalid chunk metadata: {}", e)))
    }

    /// Shape must equal the lengths of the two ranges.
    pub fn is_consistent(&self) -> bool {
        self.shape
            == (
                self.trace_range.1.saturating_sub(self.trace_range.0),
                self.sample_range.1.saturating_sub(self.sample_range.0),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_info_duration() {
        let info = FileInfo::new(50, 250, 2.0);
        assert!((info.total_duration_ms() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_axis_values() {
        let axis = AxisVector::new(5, 2.0);
        assert_eq!(axis.values(), &[0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(axis.value_at(5), 10.0);
        assert_eq!(axis.time_range(&(1..5)), (2.0, 10.0));
    }

    #[test]
    fn test_axis_ms_to_samples() {
        let axis = AxisVector::new(250, 2.0);
        assert_eq!(axis.sample_range_for_ms(0.0, 500.0), 0..250);
        assert_eq!(axis.sample_range_for_ms(100.0, 200.0), 50..100);
        // nearest index
        assert_eq!(axis.sample_range_for_ms(100.9, 201.2), 50..101);
        // clamped
        assert_eq!(axis.sample_range_for_ms(-10.0, 9999.0), 0..250);
        assert_eq!(axis.sample_range_for_ms(300.0, 100.0), 150..150);
    }

    #[test]
    fn test_trace_block_get_and_slice() {
        let data: Vec<f32> = (0..12).map(|i| i as f32).collect();
        let block = TraceBlock::new(data, 3, 4).expect("shape");

        assert_eq!(block.get(0, 0), Some(0.0));
        assert_eq!(block.get(2, 3), Some(11.0));
        assert_eq!(block.get(3, 0), None);
        assert_eq!(block.trace(1), Some(&[4.0, 5.0, 6.0, 7.0][..]));

        let window = block.slice_samples(1..3).expect("slice");
        assert_eq!(window.shape(), (3, 2));
        assert_eq!(window.data(), &[1.0, 2.0, 5.0, 6.0, 9.0, 10.0]);

        assert!(block.slice_samples(2..5).is_err());
    }

    #[test]
    fn test_trace_block_shape_mismatch() {
        assert!(TraceBlock::new(vec![0.0; 5], 2, 3).is_err());
    }

    #[test]
    fn test_metadata_json_field_names() {
        let metadata = ChunkMetadata {
            chunk_id: (2, 1),
            chunk_number: 5,
            trace_range: (40, 50),
            sample_range: (125, 250),
            time_range_ms: (250.0, 500.0),
            shape: (10, 125),
            source_file: "mini.sgy".to_string(),
        };

        let json = metadata.to_json().expect("serialize");
        assert_eq!(json["chunk_id"], serde_json::json!([2, 1]));
        assert_eq!(json["time_range_ms"], serde_json::json!([250.0, 500.0]));
        assert_eq!(json["shape"], serde_json::json!([10, 125]));
        assert_eq!(json.as_object().map(|o| o.len()), Some(7));
        assert!(metadata.is_consistent());

        let restored = ChunkMetadata::from_json(&json).expect("deserialize");
        assert_eq!(restored, metadata);
    }
}
