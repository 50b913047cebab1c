//! SEG-Y writer used to produce sample files and test fixtures.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::ebcdic::ascii_to_ebcdic;
use crate::error::{SegyError, SegyResult};
use crate::headers::{BinaryHeader, TraceHeader, TEXTUAL_HEADER_LEN};
use crate::samples::SampleFormat;

/// Layout of a file to be written.
#[derive(Debug, Clone)]
pub struct SegySpec {
    pub samples_per_trace: usize,
    pub sample_interval_us: u16,
    pub format: SampleFormat,
    /// Card-image lines for the textual header. Each is padded or cut to
    /// 80 columns; missing lines are blank `Cnn` cards.
    pub textual_lines: Vec<String>,
    /// Written to the binary header's traces-per-ensemble field.
    pub traces_per_ensemble: i16,
    pub measurement_system: i16,
}

impl SegySpec {
    /// IEEE float layout with the given geometry and a blank textual header.
    pub fn new(samples_per_trace: usize, sample_interval_us: u16) -> Self {
        Self {
            samples_per_trace,
            sample_interval_us,
            format: SampleFormat::IeeeFloat32,
            textual_lines: Vec::new(),
            traces_per_ensemble: 0,
            measurement_system: 1,
        }
    }

    pub fn with_format(mut self, format: SampleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_textual_lines(mut self, lines: Vec<String>) -> Self {
        self.textual_lines = lines;
        self
    }

    fn binary_header(&self) -> BinaryHeader {
        BinaryHeader {
            job_id: 1,
            line_number: 1,
            reel_number: 1,
            traces_per_ensemble: self.traces_per_ensemble,
            sample_interval_us: self.sample_interval_us,
            original_sample_interval_us: self.sample_interval_us,
            samples_per_trace: self.samples_per_trace as u16,
            original_samples_per_trace: self.samples_per_trace as u16,
            data_sample_format: self.format.code(),
            ensemble_fold: 1,
            sorting_code: 2,
            measurement_system: self.measurement_system,
            revision: 0x0100,
            fixed_length_traces: 1,
            extended_textual_headers: 0,
            ..Default::default()
        }
    }

    fn textual_header(&self) -> Vec<u8> {
        let mut ascii = Vec::with_capacity(TEXTUAL_HEADER_LEN);
        for card in 0..40 {
            let line = match self.textual_lines.get(card) {
                Some(line) => line.clone(),
                None => format!("C{:02}", card + 1),
            };
            let mut bytes: Vec<u8> = line.into_bytes();
            bytes.resize(80, b' ');
            ascii.extend_from_slice(&bytes);
        }
        ascii.into_iter().map(ascii_to_ebcdic).collect()
    }
}

/// Streams traces into a SEG-Y file.
///
/// File headers are written on construction; call [`SegyWriter::finish`]
/// to flush.
pub struct SegyWriter<W: Write> {
    out: W,
    spec: SegySpec,
    traces_written: usize,
}

impl SegyWriter<BufWriter<File>> {
    /// Create (or truncate) a file at `path`.
    pub fn create(path: impl AsRef<Path>, spec: SegySpec) -> SegyResult<Self> {
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), spec)
    }
}

impl<W: Write> SegyWriter<W> {
    /// Write the textual and binary headers to `out`.
    pub fn new(mut out: W, spec: SegySpec) -> SegyResult<Self> {
        if spec.samples_per_trace > u16::MAX as usize {
            return Err(SegyError::invalid_format(format!(
                "{} samples per trace does not fit the binary header",
                spec.samples_per_trace
            )));
        }

        out.write_all(&spec.textual_header())?;
        out.write_all(&spec.binary_header().to_bytes())?;

        Ok(Self {
            out,
            spec,
            traces_written: 0,
        })
    }

    /// Append one trace. The header's sample count and interval are
    /// overwritten from the `SegySpec`.
    pub fn write_trace(&mut self, header: &TraceHeader, samples: &[f32]) -> SegyResult<()> {
        if samples.len() != self.spec.samples_per_trace {
            return Err(SegyError::invalid_format(format!(
                "trace {} has {} samples, expected {}",
                self.traces_written,
                samples.len(),
                self.spec.samples_per_trace
            )));
        }

        let header = TraceHeader {
            samples_in_trace: self.spec.samples_per_trace as u16,
            sample_interval_us: self.spec.sample_interval_us,
            ..header.clone()
        };
        self.out.write_all(&header.to_bytes())?;

        let mut raw = Vec::with_capacity(samples.len() * self.spec.format.bytes_per_sample());
        for &value in samples {
            self.spec.format.encode(value, &mut raw);
        }
        self.out.write_all(&raw)?;

        self.traces_written += 1;
        Ok(())
    }

    pub fn traces_written(&self) -> usize {
        self.traces_written
    }

    /// Flush and return the inner writer.
    pub fn finish(mut self) -> SegyResult<W> {
        self.out.flush()?;
        debug!(traces = self.traces_written, "Finished writing SEG-Y");
        Ok(self.out)
    }
}
