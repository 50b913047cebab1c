use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::npy::write_npy;
use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::types::{Chunk, ChunkId};

const ARRAY_SUFFIX: &str = ".npy";
const METADATA_SUFFIX: &str = "_metadata.json";

/// Outcome of [`ChunkWriter::write_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReport {
    /// `(array, metadata)` paths in write order.
    pub paths: Vec<(PathBuf, PathBuf)>,
    pub chunks_written: usize,
    /// Total bytes of array and metadata files.
    pub bytes_written: u64,
}

/// Persists chunks as an NPY array plus a JSON metadata sidecar.
#[derive(Debug, Clone)]
pub struct ChunkWriter {
    prefix: String,
}

impl Default for ChunkWriter {
    fn default() -> Self {
        Self::new("chunk")
    }
}

impl ChunkWriter {
    /// Create a writer naming files `{prefix}_...`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &ChunkerConfig) -> Self {
        Self::new(config.chunk_prefix.clone())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// File name stem shared by a chunk's array and metadata files.
    pub fn file_stem(&self, chunk_number: usize, chunk_id: ChunkId) -> String {
        format!(
            "{}_{:04}_t{:03}_s{:03}",
            self.prefix, chunk_number, chunk_id.trace_index, chunk_id.sample_index
        )
    }

    /// `(array, metadata)` paths for a chunk under `output_dir`.
    pub fn paths_for(&self, chunk: &Chunk, output_dir: &Path) -> (PathBuf, PathBuf) {
        let stem = self.file_stem(chunk.chunk_number(), chunk.chunk_id());
        (
            output_dir.join(format!("{}{}", stem, ARRAY_SUFFIX)),
            output_dir.join(format!("{}{}", stem, METADATA_SUFFIX)),
        )
    }

    /// Write one chunk into an existing directory, overwriting any files of
    /// the same name.
    pub fn write(&self, chunk: &Chunk, output_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        self.write_counted(chunk, output_dir)
            .map(|(array_path, metadata_path, _)| (array_path, metadata_path))
    }

    fn write_counted(&self, chunk: &Chunk, output_dir: &Path) -> Result<(PathBuf, PathBuf, u64)> {
        let (array_path, metadata_path) = self.paths_for(chunk, output_dir);

        let array_bytes = write_npy(&array_path, &chunk.data)?;

        let metadata = serde_json::to_vec_pretty(&chunk.metadata())?;
        fs::write(&metadata_path, &metadata).map_err(|e| {
            ChunkerError::io_failure(format!(
                "failed to write {}: {}",
                metadata_path.display(),
                e
            ))
        })?;

        debug!(
            chunk = chunk.chunk_number(),
            shape = ?chunk.shape(),
            path = %array_path.display(),
            "Wrote chunk"
        );
        Ok((array_path, metadata_path, array_bytes + metadata.len() as u64))
    }

    /// Write every chunk in order, creating `output_dir` first.
    ///
    /// Stops at the first failure. Pairs written before the failure stay on
    /// disk; nothing is rolled back. Files left over from an earlier,
    /// different partition of the same directory are not removed.
    pub fn write_all<I>(&self, chunks: I, output_dir: &Path) -> Result<WriteReport>
    where
        I: IntoIterator<Item = Result<Chunk>>,
    {
        fs::create_dir_all(output_dir).map_err(|e| {
            ChunkerError::io_failure(format!(
                "failed to create {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let mut report = WriteReport::default();
        for chunk in chunks {
            let chunk = chunk?;
            let (array_path, metadata_path, bytes) = self.write_counted(&chunk, output_dir)?;
            report.paths.push((array_path, metadata_path));
            report.chunks_written += 1;
            report.bytes_written += bytes;
        }

        info!(
            dir = %output_dir.display(),
            chunks = report.chunks_written,
            bytes = report.bytes_written,
            "Wrote chunks"
        );
        Ok(report)
    }
}

/// Recover `(chunk_number, chunk_id)` from a chunk array or metadata file
/// name. Returns `None` for names this writer does not produce.
pub fn parse_chunk_file_name(name: &str) -> Option<(usize, ChunkId)> {
    let stem = name
        .strip_suffix(METADATA_SUFFIX)
        .or_else(|| name.strip_suffix(ARRAY_SUFFIX))?;

    let mut parts = stem.rsplitn(4, '_');
    let sample_index = parts.next()?.strip_prefix('s')?.parse().ok()?;
    let trace_index = parts.next()?.strip_prefix('t')?.parse().ok()?;
    let chunk_number = parts.next()?.parse().ok()?;
    // prefix
    parts.next().filter(|p| !p.is_empty())?;

    Some((chunk_number, ChunkId::new(trace_index, sample_index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellBoundary, TraceBlock};

    fn chunk(chunk_number: usize, id: (usize, usize)) -> Chunk {
        Chunk {
            boundary: CellBoundary {
                chunk_id: ChunkId::new(id.0, id.1),
                chunk_number,
                trace_range: 40..42,
                sample_range: 125..128,
            },
            data: TraceBlock::new(vec![1.0; 6], 2, 3).expect("shape"),
            time_range_ms: (250.0, 256.0),
            source_file: PathBuf::from("mini.sgy"),
        }
    }

    #[test]
    fn test_file_names() {
        let writer = ChunkWriter::default();
        let (array, metadata) = writer.paths_for(&chunk(5, (2, 1)), Path::new("out"));
        assert_eq!(array, Path::new("out/chunk_0005_t002_s001.npy"));
        assert_eq!(metadata, Path::new("out/chunk_0005_t002_s001_metadata.json"));
    }

    #[test]
    fn test_parse_chunk_file_name() {
        assert_eq!(
            parse_chunk_file_name("chunk_0005_t002_s001.npy"),
            Some((5, ChunkId::new(2, 1)))
        );
        assert_eq!(
            parse_chunk_file_name("line_a_0123_t010_s004_metadata.json"),
            Some((123, ChunkId::new(10, 4)))
        );
        assert_eq!(
            parse_chunk_file_name("chunk_12345_t1000_s000.npy"),
            Some((12345, ChunkId::new(1000, 0)))
        );
        assert_eq!(parse_chunk_file_name("chunk_0005.npy"), None);
        assert_eq!(parse_chunk_file_name("_0005_t002_s001.npy"), None);
        assert_eq!(parse_chunk_file_name("chunk_0005_t002_s001.json"), None);
    }

    #[test]
    fn test_write_pair() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let writer = ChunkWriter::new("test");

        let (array, metadata) = writer.write(&chunk(0, (0, 0)), dir.path()).expect("write");
        assert!(array.exists());

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(&metadata).expect("read")).expect("json");
        assert_eq!(json["shape"], serde_json::json!([2, 3]));
        assert_eq!(json["source_file"], "mini.sgy");
    }

    #[test]
    fn test_write_all_stops_at_first_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let writer = ChunkWriter::default();

        let chunks = vec![
            Ok(chunk(0, (0, 0))),
            Err(ChunkerError::out_of_range("traces 40..60", "0..50")),
            Ok(chunk(2, (1, 0))),
        ];
        let err = writer.write_all(chunks, dir.path()).unwrap_err();
        assert!(matches!(err, ChunkerError::OutOfRange { .. }));

        // no rollback of the first pair
        assert!(dir.path().join("chunk_0000_t000_s000.npy").exists());
        assert!(!dir.path().join("chunk_0002_t001_s000.npy").exists());
    }

    #[test]
    fn test_write_all_empty_creates_dir() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let out = dir.path().join("nested/chunks");

        let report = ChunkWriter::default()
            .write_all(Vec::<Result<Chunk>>::new(), &out)
            .expect("write");
        assert_eq!(report, WriteReport::default());
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).expect("read dir").count(), 0);
    }
}
