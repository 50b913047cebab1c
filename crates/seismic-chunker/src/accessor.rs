//! On-demand sample access over an open trace source.

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use segy_parser::SegyFile;
use tracing::{debug, warn};

use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::source::TraceSource;
use crate::stats::DataStatistics;
use crate::types::{AxisVector, FileInfo, TraceBlock};

/// Loads sample arrays from a [`TraceSource`].
///
/// The accessor owns its source; for [`SegyFile`] the file is closed when
/// the accessor is dropped. Geometry is captured once at construction.
#[derive(Debug)]
pub struct DataAccessor<S: TraceSource> {
    source: S,
    info: FileInfo,
    axis: AxisVector,
    stats_sample_traces: usize,
    large_data_warning_bytes: usize,
}

impl DataAccessor<SegyFile> {
    /// Open a SEG-Y file with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &ChunkerConfig::default())
    }

    /// Open a SEG-Y file.
    pub fn open_with_config(path: impl AsRef<Path>, config: &ChunkerConfig) -> Result<Self> {
        let segy = SegyFile::open(path.as_ref())?;
        Ok(Self::with_config(segy, config))
    }
}

impl<S: TraceSource> DataAccessor<S> {
    /// Wrap a source with default settings.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &ChunkerConfig::default())
    }

    pub fn with_config(source: S, config: &ChunkerConfig) -> Self {
        let info = source.file_info();
        Self {
            axis: info.axis(),
            info,
            source,
            stats_sample_traces: config.stats_sample_traces.max(1),
            large_data_warning_bytes: config.large_data_warning_bytes(),
        }
    }

    /// Geometry of the underlying file.
    pub fn file_info(&self) -> FileInfo {
        self.info
    }

    /// Time/depth axis over every sample.
    pub fn time_axis(&self) -> &AxisVector {
        &self.axis
    }

    /// Path of the underlying file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load one trace as a `[1, total_samples]` block.
    pub fn load_trace(&mut self, index: usize) -> Result<TraceBlock> {
        if index >= self.info.total_traces {
            return Err(ChunkerError::out_of_range(
                format!("trace {}", index),
                format!("0..{}", self.info.total_traces),
            ));
        }
        self.load_traces(index, index + 1)
    }

    /// Load traces `[start, end)` with every sample.
    ///
    /// `start == end` gives an empty block; `start > end` or
    /// `end > total_traces` is out of range.
    pub fn load_traces(&mut self, start: usize, end: usize) -> Result<TraceBlock> {
        let range = start..end;
        self.info.check_trace_range(&range)?;
        if range.is_empty() {
            return Ok(TraceBlock::empty(self.info.total_samples));
        }
        self.source.read_traces(range)
    }

    /// Load every trace in the file.
    pub fn load_all_data(&mut self) -> Result<TraceBlock> {
        let bytes = self.info.total_traces * self.info.total_samples * std::mem::size_of::<f32>();
        if bytes > self.large_data_warning_bytes {
            warn!(
                size_mb = %format!("{:.2}", bytes as f64 / (1024.0 * 1024.0)),
                traces = self.info.total_traces,
                "Loading the whole file, memory use may be high"
            );
        }
        self.load_traces(0, self.info.total_traces)
    }

    /// Load a sample window of a trace range.
    ///
    /// Windows are read directly when the source supports it; otherwise
    /// whole traces are loaded and sliced.
    pub fn load_window(
        &mut self,
        traces: Range<usize>,
        samples: Range<usize>,
    ) -> Result<TraceBlock> {
        self.info.check_trace_range(&traces)?;
        self.info.check_sample_range(&samples)?;

        if traces.is_empty() {
            return Ok(TraceBlock::empty(samples.len()));
        }

        if let Some(block) = self.source.read_window(traces.clone(), samples.clone())? {
            return Ok(block);
        }

        debug!(?traces, ?samples, "Source cannot window samples, slicing whole traces");
        self.source.read_traces(traces)?.slice_samples(samples)
    }

    /// Load a depth/time slice: samples `[sample_range)` of traces
    /// `[trace_range)`. Both default to the full extent.
    pub fn load_depth_slice(
        &mut self,
        sample_range: Option<Range<usize>>,
        trace_range: Option<Range<usize>>,
    ) -> Result<TraceBlock> {
        let samples = sample_range.unwrap_or(0..self.info.total_samples);
        let traces = trace_range.unwrap_or(0..self.info.total_traces);
        self.load_window(traces, samples)
    }

    /// Trace numbers for a range, defaulting to every trace.
    pub fn trace_axis(&self, range: Option<Range<usize>>) -> Vec<usize> {
        range.unwrap_or(0..self.info.total_traces).collect()
    }

    /// Axis values for a sample range, defaulting to every sample.
    pub fn time_axis_range(&self, range: Option<Range<usize>>) -> Vec<f64> {
        range
            .unwrap_or(0..self.info.total_samples)
            .map(|i| self.axis.value_at(i))
            .collect()
    }

    /// Statistics over `data`, or over the file when `data` is `None`.
    ///
    /// Files with more traces than the configured limit are sampled every
    /// `total_traces / limit` traces.
    pub fn statistics(&mut self, data: Option<&TraceBlock>) -> Result<DataStatistics> {
        if let Some(block) = data {
            return DataStatistics::compute(block);
        }

        if self.info.total_traces > self.stats_sample_traces {
            let step = self.info.total_traces / self.stats_sample_traces;
            warn!(
                traces = self.info.total_traces,
                step, "Large file, computing statistics over sampled traces"
            );
            let mut data = Vec::new();
            let mut count = 0;
            for index in (0..self.info.total_traces).step_by(step) {
                data.extend_from_slice(self.load_traces(index, index + 1)?.data());
                count += 1;
            }
            let sampled = TraceBlock::new(data, count, self.info.total_samples)?;
            return DataStatistics::compute(&sampled);
        }

        let all = self.load_all_data()?;
        DataStatistics::compute(&all)
    }

    /// Geometry report, with statistics when `include_stats` is set.
    pub fn summary(&mut self, include_stats: bool) -> Result<DataSummary> {
        let statistics = if include_stats {
            Some(self.statistics(None)?)
        } else {
            None
        };
        Ok(DataSummary {
            path: self.path().map(Path::to_path_buf),
            info: self.info,
            statistics,
        })
    }
}

/// Printable geometry report for a loaded file.
#[derive(Debug, Clone)]
pub struct DataSummary {
    pub path: Option<PathBuf>,
    pub info: FileInfo,
    pub statistics: Option<DataStatistics>,
}

impl fmt::Display for DataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "SEGY DATA INFORMATION")?;
        writeln!(f, "{}", rule)?;
        if let Some(path) = &self.path {
            writeln!(f, "File: {}", path.display())?;
        }
        writeln!(f)?;
        writeln!(f, "[Shape]")?;
        writeln!(f, "  Total traces:      {}", self.info.total_traces)?;
        writeln!(f, "  Samples per trace: {}", self.info.total_samples)?;
        writeln!(
            f,
            "  Data shape:        ({}, {})",
            self.info.total_traces, self.info.total_samples
        )?;
        writeln!(f)?;
        writeln!(f, "[Time/Depth]")?;
        writeln!(f, "  Sample interval:   {:.3} ms", self.info.sample_interval_ms)?;
        writeln!(f, "  Total time/depth:  {:.3} ms", self.info.total_duration_ms())?;
        if let Some(stats) = &self.statistics {
            writeln!(f)?;
            writeln!(f, "[Statistics]")?;
            writeln!(f, "{}", stats)?;
        }
        write!(f, "{}", rule)
    }
}
