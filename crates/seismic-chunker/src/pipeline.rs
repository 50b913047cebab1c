//! One-call partition-and-save over a SEG-Y file.

use std::path::Path;

use tracing::info;

use crate::accessor::DataAccessor;
use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::extract::extract_all;
use crate::partition::{DivisionSummary, GridPartitioner};
use crate::types::CellBoundary;
use crate::writer::{ChunkWriter, WriteReport};

/// Result of [`divide_segy_file`].
#[derive(Debug, Clone)]
pub struct DivisionReport {
    pub boundaries: Vec<CellBoundary>,
    pub summary: DivisionSummary,
    /// Present when chunks were written.
    pub written: Option<WriteReport>,
}

/// Partition a SEG-Y file and, when `output_dir` is given, extract and
/// write every chunk.
///
/// Parameters are validated before the file is opened. The file is closed
/// before this returns, on success or failure.
pub fn divide_segy_file(
    path: &Path,
    config: &ChunkerConfig,
    output_dir: Option<&Path>,
) -> Result<DivisionReport> {
    config.validate()?;
    let partitioner = GridPartitioner::new(config.chunking_params())?;

    let mut accessor = DataAccessor::open_with_config(path, config)?;
    let info = accessor.file_info();
    let boundaries = partitioner.partition(&info)?;
    let summary = DivisionSummary::new(path, info, &boundaries);

    info!(
        path = %path.display(),
        traces = info.total_traces,
        samples = info.total_samples,
        chunks = boundaries.len(),
        "Partitioned SEG-Y file"
    );

    let written = match output_dir {
        Some(dir) => {
            let writer = ChunkWriter::from_config(config);
            let chunks = extract_all(&boundaries, &mut accessor, path);
            Some(writer.write_all(chunks, dir)?)
        }
        None => None,
    };

    Ok(DivisionReport {
        boundaries,
        summary,
        written,
    })
}
