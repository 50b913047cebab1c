//! Chunk extraction.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::accessor::DataAccessor;
use crate::error::Result;
use crate::source::TraceSource;
use crate::types::{CellBoundary, Chunk};

/// Extract one cell's samples.
///
/// The boundary must lie inside the file; a cell that reaches past the
/// actual extent is an `OutOfRange` error rather than a truncated chunk.
pub fn extract<S: TraceSource>(
    boundary: &CellBoundary,
    accessor: &mut DataAccessor<S>,
    source_file: &Path,
) -> Result<Chunk> {
    let data = accessor.load_window(boundary.trace_range.clone(), boundary.sample_range.clone())?;
    let time_range_ms = accessor.time_axis().time_range(&boundary.sample_range);

    debug!(
        chunk = boundary.chunk_number,
        id = %boundary.chunk_id,
        traces = ?boundary.trace_range,
        samples = ?boundary.sample_range,
        "Extracted chunk"
    );

    Ok(Chunk {
        boundary: boundary.clone(),
        data,
        time_range_ms,
        source_file: source_file.to_path_buf(),
    })
}

/// Lazily extract a sequence of cells in order.
///
/// Each chunk is read only when the iterator is advanced, so at most one
/// chunk's samples are held by the extractor at a time.
pub fn extract_all<'a, S: TraceSource>(
    boundaries: &'a [CellBoundary],
    accessor: &'a mut DataAccessor<S>,
    source_file: &Path,
) -> ChunkIter<'a, S> {
    ChunkIter {
        boundaries: boundaries.iter(),
        accessor,
        source_file: source_file.to_path_buf(),
    }
}

/// Iterator returned by [`extract_all`].
pub struct ChunkIter<'a, S: TraceSource> {
    boundaries: std::slice::Iter<'a, CellBoundary>,
    accessor: &'a mut DataAccessor<S>,
    source_file: PathBuf,
}

impl<S: TraceSource> Iterator for ChunkIter<'_, S> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let boundary = self.boundaries.next()?;
        Some(extract(boundary, self.accessor, &self.source_file))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.boundaries.size_hint()
    }
}

/// Extraction bound to one accessor and source path.
pub struct ChunkExtractor<'a, S: TraceSource> {
    accessor: &'a mut DataAccessor<S>,
    source_file: PathBuf,
}

impl<'a, S: TraceSource> ChunkExtractor<'a, S> {
    /// Bind to `accessor`. The source path defaults to the accessor's file.
    pub fn new(accessor: &'a mut DataAccessor<S>) -> Self {
        let source_file = accessor.path().map(Path::to_path_buf).unwrap_or_default();
        Self {
            accessor,
            source_file,
        }
    }

    /// Override the path recorded in chunk metadata.
    pub fn with_source_file(mut self, source_file: impl Into<PathBuf>) -> Self {
        self.source_file = source_file.into();
        self
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn extract(&mut self, boundary: &CellBoundary) -> Result<Chunk> {
        extract(boundary, self.accessor, &self.source_file)
    }

    pub fn extract_all<'b>(&'b mut self, boundaries: &'b [CellBoundary]) -> ChunkIter<'b, S> {
        extract_all(boundaries, self.accessor, &self.source_file)
    }
}
