//! SEG-Y header sections.
//!
//! Byte offsets below are zero-based within each header; the SEG-Y rev1
//! standard numbers bytes from 1 and counts the binary header from 3201.

use bytes::{Buf, BufMut, BytesMut};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{SegyError, SegyResult};

/// Size of the textual file header (40 card images of 80 columns).
pub const TEXTUAL_HEADER_LEN: usize = 3200;
/// Size of the binary file header.
pub const BINARY_HEADER_LEN: usize = 400;
/// Size of each trace header.
pub const TRACE_HEADER_LEN: usize = 240;

/// Binary file header (400 bytes following the textual header).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryHeader {
    pub job_id: i32,
    pub line_number: i32,
    pub reel_number: i32,
    pub traces_per_ensemble: i16,
    pub aux_traces_per_ensemble: i16,
    /// Sample interval in microseconds (or micro-units of depth).
    pub sample_interval_us: u16,
    pub original_sample_interval_us: u16,
    pub samples_per_trace: u16,
    pub original_samples_per_trace: u16,
    pub data_sample_format: i16,
    pub ensemble_fold: i16,
    pub sorting_code: i16,
    /// 1 = meters, 2 = feet.
    pub measurement_system: i16,
    pub revision: u16,
    pub fixed_length_traces: i16,
    pub extended_textual_headers: i16,
}

impl BinaryHeader {
    /// Parse a binary header from exactly `BINARY_HEADER_LEN` bytes.
    pub fn parse(raw: &[u8]) -> SegyResult<Self> {
        if raw.len() < BINARY_HEADER_LEN {
            return Err(SegyError::invalid_format(format!(
                "binary header needs {} bytes, got {}",
                BINARY_HEADER_LEN,
                raw.len()
            )));
        }

        let mut buf = &raw[..BINARY_HEADER_LEN];
        let job_id = buf.get_i32();
        let line_number = buf.get_i32();
        let reel_number = buf.get_i32();
        let traces_per_ensemble = buf.get_i16();
        let aux_traces_per_ensemble = buf.get_i16();
        let sample_interval_us = buf.get_u16();
        let original_sample_interval_us = buf.get_u16();
        let samples_per_trace = buf.get_u16();
        let original_samples_per_trace = buf.get_u16();
        let data_sample_format = buf.get_i16();
        let ensemble_fold = buf.get_i16();
        let sorting_code = buf.get_i16();

        let measurement_system = (&raw[54..56]).get_i16();

        let mut tail = &raw[300..306];
        let revision = tail.get_u16();
        let fixed_length_traces = tail.get_i16();
        let extended_textual_headers = tail.get_i16();

        Ok(Self {
            job_id,
            line_number,
            reel_number,
            traces_per_ensemble,
            aux_traces_per_ensemble,
            sample_interval_us,
            original_sample_interval_us,
            samples_per_trace,
            original_samples_per_trace,
            data_sample_format,
            ensemble_fold,
            sorting_code,
            measurement_system,
            revision,
            fixed_length_traces,
            extended_textual_headers,
        })
    }

    /// Encode to the 400-byte on-disk layout; unlisted fields are zero.
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(BINARY_HEADER_LEN);
        buf.put_i32(self.job_id);
        buf.put_i32(self.line_number);
        buf.put_i32(self.reel_number);
        buf.put_i16(self.traces_per_ensemble);
        buf.put_i16(self.aux_traces_per_ensemble);
        buf.put_u16(self.sample_interval_us);
        buf.put_u16(self.original_sample_interval_us);
        buf.put_u16(self.samples_per_trace);
        buf.put_u16(self.original_samples_per_trace);
        buf.put_i16(self.data_sample_format);
        buf.put_i16(self.ensemble_fold);
        buf.put_i16(self.sorting_code);
        buf.put_bytes(0, 54 - buf.len());
        buf.put_i16(self.measurement_system);
        buf.put_bytes(0, 300 - buf.len());
        buf.put_u16(self.revision);
        buf.put_i16(self.fixed_length_traces);
        buf.put_i16(self.extended_textual_headers);
        buf.put_bytes(0, BINARY_HEADER_LEN - buf.len());
        buf
    }

    /// Sample interval in milliseconds.
    pub fn sample_interval_ms(&self) -> f64 {
        self.sample_interval_us as f64 / 1000.0
    }

    /// Measurement system label.
    pub fn measurement_system_name(&self) -> &'static str {
        match self.measurement_system {
            1 => "Meters",
            2 => "Feet",
            _ => "Unknown",
        }
    }
}

/// Per-trace header (240 bytes preceding each trace's samples).
///
/// Only the fields the tooling reports are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceHeader {
    pub trace_sequence_line: i32,
    pub trace_sequence_file: i32,
    pub field_record: i32,
    pub trace_number: i32,
    pub ensemble_number: i32,
    /// Scalar applied to coordinates: negative divides, positive multiplies.
    pub coordinate_scalar: i16,
    pub samples_in_trace: u16,
    pub sample_interval_us: u16,
    pub year: i16,
    pub day_of_year: i16,
    pub hour: i16,
    pub minute: i16,
    pub second: i16,
    pub cdp_x: i32,
    pub cdp_y: i32,
    pub inline_number: i32,
    pub crossline_number: i32,
}

impl TraceHeader {
    /// Parse a trace header from exactly `TRACE_HEADER_LEN` bytes.
    pub fn parse(raw: &[u8]) -> SegyResult<Self> {
        if raw.len() < TRACE_HEADER_LEN {
            return Err(SegyError::invalid_format(format!(
                "trace header needs {} bytes, got {}",
                TRACE_HEADER_LEN,
                raw.len()
            )));
        }

        let i32_at = |offset: usize| (&raw[offset..offset + 4]).get_i32();
        let i16_at = |offset: usize| (&raw[offset..offset + 2]).get_i16();
        let u16_at = |offset: usize| (&raw[offset..offset + 2]).get_u16();

        Ok(Self {
            trace_sequence_line: i32_at(0),
            trace_sequence_file: i32_at(4),
            field_record: i32_at(8),
            trace_number: i32_at(12),
            ensemble_number: i32_at(20),
            coordinate_scalar: i16_at(70),
            samples_in_trace: u16_at(114),
            sample_interval_us: u16_at(116),
            year: i16_at(156),
            day_of_year: i16_at(158),
            hour: i16_at(160),
            minute: i16_at(162),
            second: i16_at(164),
            cdp_x: i32_at(180),
            cdp_y: i32_at(184),
            inline_number: i32_at(188),
            crossline_number: i32_at(192),
        })
    }

    /// Encode to the 240-byte on-disk layout; unlisted fields are zero.
    pub fn to_bytes(&self) -> BytesMut {
        let mut buf = BytesMut::zeroed(TRACE_HEADER_LEN);
        let put_i32 = |buf: &mut BytesMut, offset: usize, v: i32| {
            (&mut buf[offset..offset + 4]).put_i32(v)
        };
        put_i32(&mut buf, 0, self.trace_sequence_line);
        put_i32(&mut buf, 4, self.trace_sequence_file);
        put_i32(&mut buf, 8, self.field_record);
        put_i32(&mut buf, 12, self.trace_number);
        put_i32(&mut buf, 20, self.ensemble_number);
        put_i32(&mut buf, 180, self.cdp_x);
        put_i32(&mut buf, 184, self.cdp_y);
        put_i32(&mut buf, 188, self.inline_number);
        put_i32(&mut buf, 192, self.crossline_number);

        (&mut buf[70..72]).put_i16(self.coordinate_scalar);
        (&mut buf[114..116]).put_u16(self.samples_in_trace);
        (&mut buf[116..118]).put_u16(self.sample_interval_us);
        (&mut buf[156..158]).put_i16(self.year);
        (&mut buf[158..160]).put_i16(self.day_of_year);
        (&mut buf[160..162]).put_i16(self.hour);
        (&mut buf[162..164]).put_i16(self.minute);
        (&mut buf[164..166]).put_i16(self.second);
        buf
    }

    /// Recording time from the year/day/hour/minute/second fields, if set.
    pub fn recording_time(&self) -> Option<NaiveDateTime> {
        if self.year <= 0 || self.day_of_year <= 0 {
            return None;
        }
        NaiveDate::from_yo_opt(self.year as i32, self.day_of_year as u32)?.and_hms_opt(
            self.hour.max(0) as u32,
            self.minute.max(0) as u32,
            self.second.max(0) as u32,
        )
    }

    /// Apply the coordinate scalar to a raw coordinate.
    pub fn scaled_coordinate(&self, raw: i32) -> f64 {
        match self.coordinate_scalar {
            0 => raw as f64,
            s if s < 0 => raw as f64 / (-(s as f64)),
            s => raw as f64 * s as f64,
        }
    }

    /// CDP X/Y with the coordinate scalar applied.
    pub fn cdp_position(&self) -> (f64, f64) {
        (self.scaled_coordinate(self.cdp_x), self.scaled_coordinate(self.cdp_y))
    }
}
