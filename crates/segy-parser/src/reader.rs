//! Positional reader over an open SEG-Y file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ebcdic::decode_textual_header;
use crate::error::{SegyError, SegyResult};
use crate::headers::{
    BinaryHeader, TraceHeader, BINARY_HEADER_LEN, TEXTUAL_HEADER_LEN, TRACE_HEADER_LEN,
};
use crate::samples::SampleFormat;

/// An open SEG-Y file.
///
/// Headers are decoded once on open; samples are read on demand with a seek
/// per request. The underlying file descriptor is released when the value is
/// dropped.
#[derive(Debug)]
pub struct SegyFile {
    path: PathBuf,
    file: File,
    textual_header: String,
    binary_header: BinaryHeader,
    format: SampleFormat,
    samples_per_trace: usize,
    trace_count: usize,
    data_offset: u64,
}

impl SegyFile {
    /// Open a SEG-Y file and decode its file headers.
    pub fn open(path: impl AsRef<Path>) -> SegyResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let file_len = file.metadata()?.len();

        let file_headers_len = (TEXTUAL_HEADER_LEN + BINARY_HEADER_LEN) as u64;
        if file_len < file_headers_len {
            return Err(SegyError::invalid_format(format!(
                "{} is {} bytes, shorter than the {} byte file headers",
                path.display(),
                file_len,
                file_headers_len
            )));
        }

        let mut textual = vec![0u8; TEXTUAL_HEADER_LEN];
        file.read_exact(&mut textual)?;
        let mut binary = vec![0u8; BINARY_HEADER_LEN];
        file.read_exact(&mut binary)?;

        let binary_header = BinaryHeader::parse(&binary)?;
        let format = SampleFormat::from_code(binary_header.data_sample_format)?;

        let extended = binary_header.extended_textual_headers.max(0) as u64;
        if binary_header.extended_textual_headers < 0 {
            warn!(
                path = %path.display(),
                "variable extended textual header count is not supported, assuming none"
            );
        }
        let data_offset = file_headers_len + extended * TEXTUAL_HEADER_LEN as u64;

        let mut samples_per_trace = binary_header.samples_per_trace as usize;
        if samples_per_trace == 0 && file_len >= data_offset + TRACE_HEADER_LEN as u64 {
            // Fall back to the first trace header.
            let mut raw = vec![0u8; TRACE_HEADER_LEN];
            file.seek(SeekFrom::Start(data_offset))?;
            file.read_exact(&mut raw)?;
            samples_per_trace = TraceHeader::parse(&raw)?.samples_in_trace as usize;
        }

        let trace_len = (TRACE_HEADER_LEN + samples_per_trace * format.bytes_per_sample()) as u64;
        let payload = file_len.saturating_sub(data_offset);
        if payload % trace_len != 0 {
            return Err(SegyError::invalid_format(format!(
                "trace payload of {} bytes is not a multiple of the {} byte trace length",
                payload, trace_len
            )));
        }
        let trace_count = (payload / trace_len) as usize;

        debug!(
            path = %path.display(),
            traces = trace_count,
            samples = samples_per_trace,
            interval_us = binary_header.sample_interval_us,
            format = format.code(),
            "Opened SEG-Y file"
        );

        Ok(Self {
            path,
            file,
            textual_header: decode_textual_header(&textual),
            binary_header,
            format,
            samples_per_trace,
            trace_count,
            data_offset,
        })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decoded textual header, one 80-column card image per line.
    pub fn textual_header(&self) -> &str {
        &self.textual_header
    }

    pub fn binary_header(&self) -> &BinaryHeader {
        &self.binary_header
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Number of traces in the file.
    pub fn trace_count(&self) -> usize {
        self.trace_count
    }

    /// Number of samples in every trace.
    pub fn samples_per_trace(&self) -> usize {
        self.samples_per_trace
    }

    /// Sample interval in milliseconds.
    pub fn sample_interval_ms(&self) -> f64 {
        self.binary_header.sample_interval_ms()
    }

    fn trace_len(&self) -> u64 {
        (TRACE_HEADER_LEN + self.samples_per_trace * self.format.bytes_per_sample()) as u64
    }

    fn trace_offset(&self, index: usize) -> u64 {
        self.data_offset + index as u64 * self.trace_len()
    }

    fn check_trace_range(&self, range: &Range<usize>) -> SegyResult<()> {
        if range.start > range.end || range.end > self.trace_count {
            return Err(SegyError::trace_out_of_range(range, self.trace_count));
        }
        Ok(())
    }

    /// Traces `range` must still be on disk; the file may have shrunk
    /// since it was opened.
    fn check_on_disk(&self, range: &Range<usize>) -> SegyResult<()> {
        let file_len = self.file.metadata()?.len();
        let available = (file_len.saturating_sub(self.data_offset) / self.trace_len()) as usize;
        if range.end > available {
            warn!(
                path = %self.path.display(),
                opened_with = self.trace_count,
                available,
                "SEG-Y file is smaller than when opened"
            );
            return Err(SegyError::trace_out_of_range(range, available));
        }
        Ok(())
    }

    /// Read the header of one trace.
    pub fn read_trace_header(&mut self, index: usize) -> SegyResult<TraceHeader> {
        if index >= self.trace_count {
            return Err(SegyError::trace_out_of_range(index, self.trace_count));
        }
        self.check_on_disk(&(index..index + 1))?;

        let mut raw = vec![0u8; TRACE_HEADER_LEN];
        self.file.seek(SeekFrom::Start(self.trace_offset(index)))?;
        self.file.read_exact(&mut raw)?;
        TraceHeader::parse(&raw)
    }

    /// Read all samples of one trace.
    pub fn read_trace(&mut self, index: usize) -> SegyResult<Vec<f32>> {
        if index >= self.trace_count {
            return Err(SegyError::trace_out_of_range(index, self.trace_count));
        }
        self.read_trace_window(index, 0..self.samples_per_trace)
    }

    /// Read a contiguous sample window of one trace.
    pub fn read_trace_window(
        &mut self,
        index: usize,
        samples: Range<usize>,
    ) -> SegyResult<Vec<f32>> {
        if index >= self.trace_count {
            return Err(SegyError::trace_out_of_range(index, self.trace_count));
        }
        if samples.start > samples.end || samples.end > self.samples_per_trace {
            return Err(SegyError::sample_out_of_range(&samples, self.samples_per_trace));
        }
        self.check_on_disk(&(index..index + 1))?;

        let width = self.format.bytes_per_sample();
        let offset =
            self.trace_offset(index) + (TRACE_HEADER_LEN + samples.start * width) as u64;
        let mut raw = vec![0u8; samples.len() * width];

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut raw)?;

        let mut out = Vec::with_capacity(samples.len());
        self.format.decode_into(&raw, &mut out);
        Ok(out)
    }

    /// Read traces `[range.start, range.end)` in one contiguous read.
    ///
    /// Returns samples in row-major order: trace 0's samples first.
    pub fn read_traces(&mut self, range: Range<usize>) -> SegyResult<Vec<f32>> {
        self.check_trace_range(&range)?;

        let trace_len = self.trace_len() as usize;
        let mut raw = vec![0u8; range.len() * trace_len];
        if !raw.is_empty() {
            self.check_on_disk(&range)?;
            self.file.seek(SeekFrom::Start(self.trace_offset(range.start)))?;
            self.file.read_exact(&mut raw)?;
        }

        let mut out = Vec::with_capacity(range.len() * self.samples_per_trace);
        for trace in raw.chunks_exact(trace_len) {
            self.format.decode_into(&trace[TRACE_HEADER_LEN..], &mut out);
        }
        Ok(out)
    }

    /// Read a window of samples from each trace in `traces`, row-major.
    pub fn read_window(
        &mut self,
        traces: Range<usize>,
        samples: Range<usize>,
    ) -> SegyResult<Vec<f32>> {
        self.check_trace_range(&traces)?;
        if samples.start > samples.end || samples.end > self.samples_per_trace {
            return Err(SegyError::sample_out_of_range(&samples, self.samples_per_trace));
        }
        if !traces.is_empty() {
            self.check_on_disk(&traces)?;
        }

        let mut out = Vec::with_capacity(traces.len() * samples.len());
        for index in traces {
            out.extend(self.read_trace_window(index, samples.clone())?);
        }
        Ok(out)
    }
}
