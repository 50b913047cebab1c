//! Header projections for reporting.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use segy_parser::{BinaryHeader, SampleFormat, SegyFile, TraceHeader};
use serde::Serialize;

use crate::error::Result;

/// Read-only view of a SEG-Y file's headers.
#[derive(Debug)]
pub struct HeaderInfo {
    segy: SegyFile,
}

impl HeaderInfo {
    /// Open a SEG-Y file for header inspection.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            segy: SegyFile::open(path.as_ref())?,
        })
    }

    /// Textual header, one card image per line.
    pub fn textual_header(&self) -> &str {
        self.segy.textual_header()
    }

    /// Binary header fields.
    pub fn binary_header(&self) -> BinaryHeaderInfo {
        BinaryHeaderInfo::from(self.segy.binary_header())
    }

    /// Header fields of trace `index`.
    pub fn trace_header(&mut self, index: usize) -> Result<TraceHeaderInfo> {
        let header = self.segy.read_trace_header(index)?;
        Ok(TraceHeaderInfo::from(&header))
    }

    /// File-level summary derived from the binary header and trace count.
    pub fn file_summary(&self) -> Result<FileSummary> {
        let binary = self.segy.binary_header();
        let format = SampleFormat::from_code(binary.data_sample_format)?;

        let total_traces = self.segy.trace_count();
        let samples_per_trace = self.segy.samples_per_trace();
        let sample_interval_ms = binary.sample_interval_ms();
        let bytes = (total_traces * samples_per_trace * format.bytes_per_sample()) as f64;

        Ok(FileSummary {
            filepath: self.segy.path().to_path_buf(),
            total_traces,
            samples_per_trace,
            sample_interval_us: binary.sample_interval_us,
            sample_interval_ms,
            total_time_depth_ms: samples_per_trace as f64 * sample_interval_ms,
            data_format: format.description().to_string(),
            format_code: binary.data_sample_format,
            measurement_system: binary.measurement_system_name().to_string(),
            total_data_size_mb: round2(bytes / (1024.0 * 1024.0)),
            binary_header: self.binary_header(),
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Binary header fields reported by `header`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryHeaderInfo {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub aux_traces_per_ensemble: i16,
    /// Microseconds.
    pub sample_interval: u16,
    pub samples_per_trace: u16,
    pub data_sample_format: i16,
    pub ensemble_fold: i16,
    pub sorting_code: i16,
    pub measurement_system: i16,
}

impl From<&BinaryHeader> for BinaryHeaderInfo {
    fn from(header: &BinaryHeader) -> Self {
        Self {
            job_id: header.job_id,
            line_number: header.line_number,
            reel_number: header.reel_number,
            traces_per_ensemble: header.traces_per_ensemble,
            aux_traces_per_ensemble: header.aux_traces_per_ensemble,
            sample_interval: header.sample_interval_us,
            samples_per_trace: header.samples_per_trace,
            data_sample_format: header.data_sample_format,
            ensemble_fold: header.ensemble_fold,
            sorting_code: header.sorting_code,
            measurement_system: header.measurement_system,
        }
    }
}

/// Trace header fields reported by `header --trace`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceHeaderInfo {
    pub trace_sequence_line: i32,
    pub trace_sequence_file: i32,
    pub field_record: i32,
    pub trace_number: i32,
    pub ensemble_number: i32,
    pub inline_number: i32,
    pub crossline_number: i32,
    pub x_coordinate: i32,
    pub y_coordinate: i32,
    pub scalar_coordinate: i16,
    /// CDP X/Y with the coordinate scalar applied.
    pub cdp_position: (f64, f64),
    pub samples_in_trace: u16,
    pub sample_interval: u16,
    pub recording_time: Option<NaiveDateTime>,
}

impl From<&TraceHeader> for TraceHeaderInfo {
    fn from(header: &TraceHeader) -> Self {
        Self {
            trace_sequence_line: header.trace_sequence_line,
            trace_sequence_file: header.trace_sequence_file,
            field_record: header.field_record,
            trace_number: header.trace_number,
            ensemble_number: header.ensemble_number,
            inline_number: header.inline_number,
            crossline_number: header.crossline_number,
            x_coordinate: header.cdp_x,
            y_coordinate: header.cdp_y,
            scalar_coordinate: header.coordinate_scalar,
            cdp_position: header.cdp_position(),
            samples_in_trace: header.samples_in_trace,
            sample_interval: header.sample_interval_us,
            recording_time: header.recording_time(),
        }
    }
}

impl fmt::Display for TraceHeaderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  trace_sequence_line: {}", self.trace_sequence_line)?;
        writeln!(f, "  trace_sequence_file: {}", self.trace_sequence_file)?;
        writeln!(f, "  field_record: {}", self.field_record)?;
        writeln!(f, "  trace_number: {}", self.trace_number)?;
        writeln!(f, "  ensemble_number: {}", self.ensemble_number)?;
        writeln!(f, "  inline_number: {}", self.inline_number)?;
        writeln!(f, "  crossline_number: {}", self.crossline_number)?;
        writeln!(f, "  x_coordinate: {}", self.x_coordinate)?;
        writeln!(f, "  y_coordinate: {}", self.y_coordinate)?;
        writeln!(f, "  scalar_coordinate: {}", self.scalar_coordinate)?;
        writeln!(
            f,
            "  cdp_position: ({}, {})",
            self.cdp_position.0, self.cdp_position.1
        )?;
        writeln!(f, "  samples_in_trace: {}", self.samples_in_trace)?;
        write!(f, "  sample_interval: {}", self.sample_interval)?;
        if let Some(time) = self.recording_time {
            write!(f, "\n  recording_time: {}", time)?;
        }
        Ok(())
    }
}

/// File-level header summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub filepath: PathBuf,
    pub total_traces: usize,
    pub samples_per_trace: usize,
    pub sample_interval_us: u16,
    pub sample_interval_ms: f64,
    pub total_time_depth_ms: f64,
    pub data_format: String,
    pub format_code: i16,
    pub measurement_system: String,
    /// On-disk sample bytes, rounded to two decimals.
    pub total_data_size_mb: f64,
    pub binary_header: BinaryHeaderInfo,
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "SEGY FILE HEADER SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "File: {}", self.filepath.display())?;
        writeln!(f)?;
        writeln!(f, "[Data size]")?;
        writeln!(f, "  Total traces:      {}", self.total_traces)?;
        writeln!(f, "  Samples per trace: {}", self.samples_per_trace)?;
        writeln!(f, "  Total data size:   {:.2} MB", self.total_data_size_mb)?;
        writeln!(f)?;
        writeln!(f, "[Sampling]")?;
        writeln!(
            f,
            "  Sample interval:   {} us ({} ms)",
            self.sample_interval_us, self.sample_interval_ms
        )?;
        writeln!(f, "  Total time/depth:  {:.2} ms", self.total_time_depth_ms)?;
        writeln!(f)?;
        writeln!(f, "[Format]")?;
        writeln!(f, "  Format:             {}", self.data_format)?;
        writeln!(f, "  Measurement system: {}", self.measurement_system)?;
        write!(f, "{}", rule)
    }
}
