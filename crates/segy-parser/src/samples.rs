//! Trace sample decoding.
//!
//! SEG-Y rev1 stores samples big-endian in one of a handful of encodings,
//! selected by the data sample format code in the binary header:
//!
//! | code | encoding                 | bytes |
//! |------|--------------------------|-------|
//! | 1    | IBM System/360 float     | 4     |
//! | 2    | two's complement integer | 4     |
//! | 3    | two's complement integer | 2     |
//! | 5    | IEEE 754 float           | 4     |
//! | 8    | two's complement integer | 1     |
//!
//! Every encoding is widened to `f32` on decode.

use crate::error::{SegyError, SegyResult};

/// Data sample format (binary header bytes 3225-3226).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    IbmFloat32,
    Int32,
    Int16,
    IeeeFloat32,
    Int8,
}

impl SampleFormat {
    /// Map a format code to a decodable sample format.
    pub fn from_code(code: i16) -> SegyResult<Self> {
        match code {
            1 => Ok(Self::IbmFloat32),
            2 => Ok(Self::Int32),
            3 => Ok(Self::Int16),
            5 => Ok(Self::IeeeFloat32),
            8 => Ok(Self::Int8),
            other => Err(SegyError::UnsupportedFormat(other)),
        }
    }

    /// The binary header format code.
    pub fn code(&self) -> i16 {
        match self {
            Self::IbmFloat32 => 1,
            Self::Int32 => 2,
            Self::Int16 => 3,
            Self::IeeeFloat32 => 5,
            Self::Int8 => 8,
        }
    }

    /// Size of one encoded sample.
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::IbmFloat32 | Self::Int32 | Self::IeeeFloat32 => 4,
            Self::Int16 => 2,
            Self::Int8 => 1,
        }
    }

    /// Human readable description, as printed in header summaries.
    pub fn description(&self) -> &'static str {
        match self {
            Self::IbmFloat32 => "IBM floating point (4 bytes)",
            Self::Int32 => "4-byte integer",
            Self::Int16 => "2-byte integer",
            Self::IeeeFloat32 => "IEEE floating point (4 bytes)",
            Self::Int8 => "1-byte integer",
        }
    }

    /// Decode big-endian samples from `raw`, appending to `out`.
    ///
    /// `raw.len()` must be a multiple of `bytes_per_sample()`.
    pub fn decode_into(&self, raw: &[u8], out: &mut Vec<f32>) {
        let width = self.bytes_per_sample();
        out.reserve(raw.len() / width);

        match self {
            Self::IbmFloat32 => out.extend(
                raw.chunks_exact(4)
                    .map(|b| ibm_to_f32(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))),
            ),
            Self::Int32 => out.extend(
                raw.chunks_exact(4)
                    .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f32),
            ),
            Self::Int16 => out.extend(
                raw.chunks_exact(2)
                    .map(|b| i16::from_be_bytes([b[0], b[1]]) as f32),
            ),
            Self::IeeeFloat32 => out.extend(
                raw.chunks_exact(4)
                    .map(|b| f32::from_be_bytes([b[0], b[1], b[2], b[3]])),
            ),
            Self::Int8 => out.extend(raw.iter().map(|&b| b as i8 as f32)),
        }
    }

    /// Encode one sample big-endian. Integer formats saturate.
    pub fn encode(&self, value: f32, out: &mut Vec<u8>) {
        match self {
            Self::IbmFloat32 => out.extend_from_slice(&f32_to_ibm(value).to_be_bytes()),
            Self::Int32 => out.extend_from_slice(&(value.round() as i32).to_be_bytes()),
            Self::Int16 => out.extend_from_slice(&(value.round() as i16).to_be_bytes()),
            Self::IeeeFloat32 => out.extend_from_slice(&value.to_be_bytes()),
            Self::Int8 => out.push(value.round() as i8 as u8),
        }
    }
}

impl std::fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Convert an IBM System/360 single precision float to IEEE `f32`.
///
/// Layout: 1 sign bit, 7-bit base-16 exponent biased by 64, 24-bit fraction.
/// value = sign * 0.fraction * 16^(exponent - 64)
pub fn ibm_to_f32(bits: u32) -> f32 {
    let fraction = bits & 0x00ff_ffff;
    if fraction == 0 {
        return 0.0;
    }

    let sign = if bits >> 31 == 0 { 1.0 } else { -1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let value = fraction as f64 / 16_777_216.0 * 16f64.powi(exponent);

    (sign * value) as f32
}

/// Convert an IEEE `f32` to IBM System/360 single precision.
///
/// Values below the IBM range flush to zero; values above it saturate.
/// NaN encodes as zero.
pub fn f32_to_ibm(value: f32) -> u32 {
    if value == 0.0 || value.is_nan() {
        return 0;
    }

    let sign: u32 = if value.is_sign_negative() { 0x8000_0000 } else { 0 };
    if value.is_infinite() {
        return sign | 0x7fff_ffff;
    }

    let mut fraction = (value as f64).abs();
    let mut exponent: i32 = 64;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    let mut mantissa = (fraction * 16_777_216.0).round() as u32;
    if mantissa > 0x00ff_ffff {
        // rounding carried into a new hex digit
        mantissa >>= 4;
        exponent += 1;
    }

    if exponent < 0 {
        return 0;
    }
    if exponent > 127 {
        return sign | 0x7fff_ffff;
    }

    sign | ((exponent as u32) << 24) | mantissa
}
