//! Chunk persistence: NPY arrays with JSON metadata sidecars.
//!
//! Each chunk becomes two files sharing a stem:
//!
//! ```text
//! {prefix}_{chunk_number:04}_t{trace_idx:03}_s{sample_idx:03}.npy
//! {prefix}_{chunk_number:04}_t{trace_idx:03}_s{sample_idx:03}_metadata.json
//! ```

mod chunk_writer;
pub mod npy;

pub use chunk_writer::{parse_chunk_file_name, ChunkWriter, WriteReport};
pub use npy::{read_npy, write_npy};
