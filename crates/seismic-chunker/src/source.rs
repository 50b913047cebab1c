//! Trace sources: the seam between the chunker and a SEG-Y handle.

use std::ops::Range;
use std::path::Path;

use segy_parser::SegyFile;

use crate::error::{ChunkerError, Result};
use crate::types::{FileInfo, TraceBlock};

/// Positional access to a grid of traces.
///
/// Reads take `&mut self`: a source is used by one operation at a time.
pub trait TraceSource {
    /// Number of traces.
    fn total_traces(&self) -> usize;

    /// Number of samples in every trace.
    fn total_samples(&self) -> usize;

    /// Sample interval in milliseconds.
    fn sample_interval_ms(&self) -> f64;

    /// Path the data came from, if it was read from disk.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Read every sample of traces `[range.start, range.end)`.
    fn read_traces(&mut self, range: Range<usize>) -> Result<TraceBlock>;

    /// Read a sample window of a trace range without loading whole traces.
    ///
    /// Returns `Ok(None)` when the source cannot window samples directly;
    /// callers then slice the result of [`TraceSource::read_traces`].
    fn read_window(
        &mut self,
        _traces: Range<usize>,
        _samples: Range<usize>,
    ) -> Result<Option<TraceBlock>> {
        Ok(None)
    }

    /// Geometry summary.
    fn file_info(&self) -> FileInfo {
        FileInfo::new(
            self.total_traces(),
            self.total_samples(),
            self.sample_interval_ms(),
        )
    }
}

impl TraceSource for SegyFile {
    fn total_traces(&self) -> usize {
        self.trace_count()
    }

    fn total_samples(&self) -> usize {
        self.samples_per_trace()
    }

    fn sample_interval_ms(&self) -> f64 {
        SegyFile::sample_interval_ms(self)
    }

    fn path(&self) -> Option<&Path> {
        Some(SegyFile::path(self))
    }

    fn read_traces(&mut self, range: Range<usize>) -> Result<TraceBlock> {
        let num_traces = range.len();
        let data = SegyFile::read_traces(self, range)?;
        TraceBlock::new(data, num_traces, self.samples_per_trace())
    }

    fn read_window(
        &mut self,
        traces: Range<usize>,
        samples: Range<usize>,
    ) -> Result<Option<TraceBlock>> {
        let shape = (traces.len(), samples.len());
        let data = SegyFile::read_window(self, traces, samples)?;
        TraceBlock::new(data, shape.0, shape.1).map(Some)
    }
}

/// An in-memory grid of traces.
///
/// Used for tests and for data that has already been decoded. It has no
/// windowed read, so extraction falls back to slicing whole traces.
#[derive(Debug, Clone)]
pub struct MemoryTraceSource {
    block: TraceBlock,
    sample_interval_ms: f64,
}

impl MemoryTraceSource {
    /// Wrap a block of traces sampled every `sample_interval_ms`.
    pub fn new(block: TraceBlock, sample_interval_ms: f64) -> Self {
        Self {
            block,
            sample_interval_ms,
        }
    }

    /// Build from row-major samples.
    pub fn from_vec(
        data: Vec<f32>,
        num_traces: usize,
        num_samples: usize,
        sample_interval_ms: f64,
    ) -> Result<Self> {
        Ok(Self::new(
            TraceBlock::new(data, num_traces, num_samples)?,
            sample_interval_ms,
        ))
    }
}

impl TraceSource for MemoryTraceSource {
    fn total_traces(&self) -> usize {
        self.block.num_traces()
    }

    fn total_samples(&self) -> usize {
        self.block.num_samples()
    }

    fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_ms
    }

    fn read_traces(&mut self, range: Range<usize>) -> Result<TraceBlock> {
        if range.start > range.end || range.end > self.block.num_traces() {
            return Err(ChunkerError::out_of_range(
                format!("traces {:?}", range),
                format!("0..{}", self.block.num_traces()),
            ));
        }

        let width = self.block.num_samples();
        let data = self.block.data()[range.start * width..range.end * width].to_vec();
        TraceBlock::new(data, range.len(), width)
    }
}
