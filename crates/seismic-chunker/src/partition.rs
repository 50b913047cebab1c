//! Grid partitioning.
//!
//! Partitioning is pure arithmetic over the file geometry: no samples are
//! read here. Every function returns half-open ranges in ascending order;
//! the last range on each axis is truncated to the extent, never dropped and
//! never padded.
//!
//! ```text
//!            samples →
//!          ┌─────────┬─────────┐
//!  traces  │ #0 (0,0)│ #1 (0,1)│
//!    ↓     ├─────────┼─────────┤
//!          │ #2 (1,0)│ #3 (1,1)│
//!          ├─────────┼─────────┤
//!          │ #4 (2,0)│ #5 (2,1)│   ← partial trace chunk
//!          └─────────┴─────────┘
//! ```

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ChunkerError, Result};
use crate::types::{CellBoundary, ChunkId, FileInfo};

/// Number of chunk rows shown by [`DivisionSummary`].
const SUMMARY_PREVIEW: usize = 5;

/// Split `[0, extent)` into consecutive ranges of `chunk_len`.
///
/// A `chunk_len` larger than the extent yields one full-extent range; an
/// empty extent yields no ranges.
pub fn divide_axis(extent: usize, chunk_len: usize) -> Result<Vec<Range<usize>>> {
    if chunk_len == 0 {
        return Err(ChunkerError::invalid_parameter("chunk length must be > 0"));
    }

    Ok((0..extent)
        .step_by(chunk_len)
        .map(|start| start..start.saturating_add(chunk_len).min(extent))
        .collect())
}

/// Convert a time/depth interval to a whole number of samples.
///
/// Rounds to the nearest sample (halves away from zero). Fails when either
/// interval is not a positive finite number or the result is below one
/// sample.
pub fn samples_per_chunk(depth_interval_ms: f64, sample_interval_ms: f64) -> Result<usize> {
    check_depth_interval(depth_interval_ms)?;
    if !(sample_interval_ms.is_finite() && sample_interval_ms > 0.0) {
        return Err(ChunkerError::invalid_parameter(format!(
            "sample interval must be > 0 ms, got {}",
            sample_interval_ms
        )));
    }

    let samples = (depth_interval_ms / sample_interval_ms).round();
    if samples < 1.0 {
        return Err(ChunkerError::invalid_parameter(format!(
            "depth interval {} ms is less than one {} ms sample",
            depth_interval_ms, sample_interval_ms
        )));
    }

    // saturating cast; anything past the extent collapses to one chunk
    Ok(samples as usize)
}

fn check_traces_per_chunk(num_traces_per_chunk: usize) -> Result<()> {
    if num_traces_per_chunk == 0 {
        return Err(ChunkerError::invalid_parameter(
            "num_traces_per_chunk must be > 0",
        ));
    }
    Ok(())
}

fn check_depth_interval(depth_interval_ms: f64) -> Result<()> {
    if !(depth_interval_ms.is_finite() && depth_interval_ms > 0.0) {
        return Err(ChunkerError::invalid_parameter(format!(
            "depth_interval_ms must be > 0, got {}",
            depth_interval_ms
        )));
    }
    Ok(())
}

/// Trace-axis intervals of `num_traces_per_chunk` traces.
pub fn divide_by_traces(
    total_traces: usize,
    num_traces_per_chunk: usize,
) -> Result<Vec<Range<usize>>> {
    check_traces_per_chunk(num_traces_per_chunk)?;
    divide_axis(total_traces, num_traces_per_chunk)
}

/// Sample-axis intervals spanning `depth_interval_ms` each.
pub fn divide_by_depth(
    total_samples: usize,
    sample_interval_ms: f64,
    depth_interval_ms: f64,
) -> Result<Vec<Range<usize>>> {
    check_depth_interval(depth_interval_ms)?;
    if total_samples == 0 {
        return Ok(Vec::new());
    }
    let chunk_len = samples_per_chunk(depth_interval_ms, sample_interval_ms)?;
    divide_axis(total_samples, chunk_len)
}

/// Cross two axis divisions in row-major order.
fn grid(trace_ranges: &[Range<usize>], sample_ranges: &[Range<usize>]) -> Vec<CellBoundary> {
    let mut cells = Vec::with_capacity(trace_ranges.len() * sample_ranges.len());
    for (trace_index, traces) in trace_ranges.iter().enumerate() {
        for (sample_index, samples) in sample_ranges.iter().enumerate() {
            cells.push(CellBoundary {
                chunk_id: ChunkId::new(trace_index, sample_index),
                chunk_number: cells.len(),
                trace_range: traces.clone(),
                sample_range: samples.clone(),
            });
        }
    }
    cells
}

fn full_extent(extent: usize) -> Vec<Range<usize>> {
    if extent == 0 {
        Vec::new()
    } else {
        vec![0..extent]
    }
}

/// Partition the trace × sample grid into cells.
///
/// Cells come out row-major: every sample chunk of trace chunk 0, then trace
/// chunk 1, and so on. `chunk_number` is the position in that order. An
/// empty file yields no cells once the chunk sizes have been validated.
pub fn partition(
    total_traces: usize,
    total_samples: usize,
    sample_interval_ms: f64,
    num_traces_per_chunk: usize,
    depth_interval_ms: f64,
) -> Result<Vec<CellBoundary>> {
    check_traces_per_chunk(num_traces_per_chunk)?;
    check_depth_interval(depth_interval_ms)?;

    if total_traces == 0 || total_samples == 0 {
        debug!(total_traces, total_samples, "Empty grid, nothing to partition");
        return Ok(Vec::new());
    }

    let trace_ranges = divide_by_traces(total_traces, num_traces_per_chunk)?;
    let sample_ranges = divide_by_depth(total_samples, sample_interval_ms, depth_interval_ms)?;
    let cells = grid(&trace_ranges, &sample_ranges);

    debug!(
        trace_chunks = trace_ranges.len(),
        sample_chunks = sample_ranges.len(),
        cells = cells.len(),
        "Partitioned grid"
    );
    Ok(cells)
}

/// Partition along traces only; every cell spans all samples.
pub fn partition_by_traces(
    total_traces: usize,
    total_samples: usize,
    num_traces_per_chunk: usize,
) -> Result<Vec<CellBoundary>> {
    let trace_ranges = divide_by_traces(total_traces, num_traces_per_chunk)?;
    if total_samples == 0 {
        return Ok(Vec::new());
    }
    Ok(grid(&trace_ranges, &full_extent(total_samples)))
}

/// Partition along time/depth only; every cell spans all traces.
pub fn partition_by_depth(
    total_traces: usize,
    total_samples: usize,
    sample_interval_ms: f64,
    depth_interval_ms: f64,
) -> Result<Vec<CellBoundary>> {
    check_depth_interval(depth_interval_ms)?;
    if total_traces == 0 {
        return Ok(Vec::new());
    }
    let sample_ranges = divide_by_depth(total_samples, sample_interval_ms, depth_interval_ms)?;
    Ok(grid(&full_extent(total_traces), &sample_ranges))
}

/// Chunk size parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkingParams {
    pub num_traces_per_chunk: usize,
    pub depth_interval_ms: f64,
}

impl ChunkingParams {
    pub fn new(num_traces_per_chunk: usize, depth_interval_ms: f64) -> Self {
        Self {
            num_traces_per_chunk,
            depth_interval_ms,
        }
    }

    /// Check the parameters that do not depend on the file.
    pub fn validate(&self) -> Result<()> {
        check_traces_per_chunk(self.num_traces_per_chunk)?;
        check_depth_interval(self.depth_interval_ms)
    }
}

/// Partitioner bound to one set of validated chunk sizes.
#[derive(Debug, Clone, Copy)]
pub struct GridPartitioner {
    params: ChunkingParams,
}

impl GridPartitioner {
    /// Create a partitioner. Fails if the parameters are invalid.
    pub fn new(params: ChunkingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> ChunkingParams {
        self.params
    }

    /// Partition a file's full grid.
    pub fn partition(&self, info: &FileInfo) -> Result<Vec<CellBoundary>> {
        partition(
            info.total_traces,
            info.total_samples,
            info.sample_interval_ms,
            self.params.num_traces_per_chunk,
            self.params.depth_interval_ms,
        )
    }

    /// Partition along traces only.
    pub fn partition_by_traces(&self, info: &FileInfo) -> Result<Vec<CellBoundary>> {
        partition_by_traces(
            info.total_traces,
            info.total_samples,
            self.params.num_traces_per_chunk,
        )
    }

    /// Partition along time/depth only.
    pub fn partition_by_depth(&self, info: &FileInfo) -> Result<Vec<CellBoundary>> {
        partition_by_depth(
            info.total_traces,
            info.total_samples,
            info.sample_interval_ms,
            self.params.depth_interval_ms,
        )
    }
}

/// Printable overview of a partition: file geometry plus the first few
/// cells.
#[derive(Debug, Clone)]
pub struct DivisionSummary {
    pub source_file: PathBuf,
    pub info: FileInfo,
    pub total_chunks: usize,
    pub preview: Vec<CellBoundary>,
}

impl DivisionSummary {
    pub fn new(source_file: &Path, info: FileInfo, cells: &[CellBoundary]) -> Self {
        Self {
            source_file: source_file.to_path_buf(),
            info,
            total_chunks: cells.len(),
            preview: cells.iter().take(SUMMARY_PREVIEW).cloned().collect(),
        }
    }
}

impl fmt::Display for DivisionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        let axis = self.info.axis();

        writeln!(f, "{}", rule)?;
        writeln!(f, "DATA DIVISION INFORMATION")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Source file:        {}", self.source_file.display())?;
        writeln!(f, "Total traces:       {}", self.info.total_traces)?;
        writeln!(f, "Samples per trace:  {}", self.info.total_samples)?;
        writeln!(f, "Sample interval:    {:.3} ms", self.info.sample_interval_ms)?;
        writeln!(f)?;
        writeln!(f, "Total chunks: {}", self.total_chunks)?;

        if !self.preview.is_empty() {
            writeln!(f)?;
            writeln!(f, "First {} chunks:", self.preview.len())?;
            writeln!(f, "{}", "-".repeat(80))?;
        }
        for cell in &self.preview {
            let (start_ms, end_ms) = axis.time_range(&cell.sample_range);
            writeln!(
                f,
                "Chunk #{:04} | Traces: [{:5} - {:5}] ({:4} traces) | \
                 Samples: [{:5} - {:5}] ({:4} samples) | Time: [{:7.2} - {:7.2}] ms",
                cell.chunk_number,
                cell.trace_range.start,
                cell.trace_range.end,
                cell.num_traces(),
                cell.sample_range.start,
                cell.sample_range.end,
                cell.num_samples(),
                start_ms,
                end_ms,
            )?;
        }
        if self.total_chunks > self.preview.len() {
            writeln!(f, "... {} more chunks", self.total_chunks - self.preview.len())?;
        }
        write!(f, "{}", rule)
    }
}
