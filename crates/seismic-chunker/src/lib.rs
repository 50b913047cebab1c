//! Grid partitioning and chunk extraction for SEG-Y files.
//!
//! The trace × sample grid of a SEG-Y file is cut into rectangular cells,
//! each cell's samples are extracted, and every chunk is persisted as an
//! NPY array plus a JSON metadata sidecar.
//!
//! # Architecture
//!
//! ```text
//! SegyFile ──► DataAccessor ──► ChunkExtractor ──► ChunkWriter ──► *.npy + *_metadata.json
//!                   │                  ▲
//!                   │ FileInfo         │ CellBoundary
//!                   ▼                  │
//!             GridPartitioner ─────────┘
//! ```
//!
//! Partitioning never touches the file: it works from [`FileInfo`] alone and
//! can be tested without I/O.
//!
//! # Example
//!
//! ```ignore
//! use seismic_chunker::{ChunkWriter, ChunkingParams, DataAccessor, GridPartitioner, extract_all};
//!
//! let mut accessor = DataAccessor::open("line.sgy")?;
//! let partitioner = GridPartitioner::new(ChunkingParams::new(20, 250.0))?;
//! let cells = partitioner.partition(&accessor.file_info())?;
//!
//! let chunks = extract_all(&cells, &mut accessor, Path::new("line.sgy"));
//! let report = ChunkWriter::default().write_all(chunks, Path::new("out"))?;
//! println!("{} chunks, {} bytes", report.chunks_written, report.bytes_written);
//! ```

pub mod accessor;
pub mod config;
pub mod error;
pub mod extract;
pub mod header;
pub mod partition;
pub mod pipeline;
pub mod source;
pub mod stats;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use accessor::{DataAccessor, DataSummary};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use extract::{extract, extract_all, ChunkExtractor, ChunkIter};
pub use header::{BinaryHeaderInfo, FileSummary, HeaderInfo, TraceHeaderInfo};
pub use partition::{
    divide_axis, divide_by_depth, divide_by_traces, partition, partition_by_depth,
    partition_by_traces, samples_per_chunk, ChunkingParams, DivisionSummary, GridPartitioner,
};
pub use pipeline::{divide_segy_file, DivisionReport};
pub use source::{MemoryTraceSource, TraceSource};
pub use stats::DataStatistics;
pub use types::{AxisVector, CellBoundary, Chunk, ChunkId, ChunkMetadata, FileInfo, TraceBlock};
pub use writer::{parse_chunk_file_name, read_npy, write_npy, ChunkWriter, WriteReport};
