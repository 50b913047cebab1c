//! SEG-Y rev1 reader and writer.
//!
//! This crate provides positional access to SEG-Y seismic files: the
//! textual and binary file headers, per-trace headers, and trace samples
//! widened to `f32` regardless of the on-disk sample format.
//!
//! # File layout
//!
//! ```text
//! ┌────────────────────┐ 0
//! │ textual header     │ 3200 bytes, EBCDIC or ASCII
//! ├────────────────────┤ 3200
//! │ binary header      │ 400 bytes, big-endian
//! ├────────────────────┤ 3600
//! │ extended textual   │ n × 3200 bytes
//! ├────────────────────┤
//! │ trace 0 header     │ 240 bytes
//! │ trace 0 samples    │ ns × bytes_per_sample
//! ├────────────────────┤
//! │ trace 1 ...        │
//! └────────────────────┘
//! ```
//!
//! Structural conformance beyond what is needed to locate traces is not
//! checked.

pub mod ebcdic;
pub mod error;
pub mod headers;
pub mod reader;
pub mod samples;
pub mod writer;

pub use error::{SegyError, SegyResult};
pub use headers::{BinaryHeader, TraceHeader};
pub use reader::SegyFile;
pub use samples::{f32_to_ibm, ibm_to_f32, SampleFormat};
pub use writer::{SegySpec, SegyWriter};
