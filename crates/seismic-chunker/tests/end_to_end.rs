//! End-to-end: write a SEG-Y file, partition it, save every chunk, read the
//! chunks back.

use std::fs;
use std::path::Path;

use segy_parser::{SampleFormat, SegySpec, SegyWriter, TraceHeader};
use seismic_chunker::{
    divide_segy_file, extract, extract_all, partition, parse_chunk_file_name, read_npy, ChunkId, ChunkMetadata,
    ChunkWriter, ChunkerConfig, ChunkerError, ChunkingParams, DataAccessor, GridPartitioner,
    HeaderInfo,
};
use test_utils::{assert_pair_approx_eq, create_index_traces, fixtures::survey};

fn write_segy(path: &Path, num_traces: usize, num_samples: usize, interval_us: u16) {
    let spec = SegySpec::new(num_samples, interval_us)
        .with_format(SampleFormat::IbmFloat32)
        .with_textual_lines(vec!["C01 END TO END".to_string()]);
    let data = create_index_traces(num_traces, num_samples);

    let mut writer = SegyWriter::create(path, spec).expect("Failed to create writer");
    for (i, trace) in data.chunks(num_samples.max(1)).take(num_traces).enumerate() {
        let header = TraceHeader {
            trace_sequence_file: i as i32 + 1,
            ..Default::default()
        };
        writer.write_trace(&header, trace).expect("Failed to write trace");
    }
    writer.finish().expect("Failed to flush");
}

fn mini_sample(dir: &Path) -> std::path::PathBuf {
    let spec = survey::MINI_SAMPLE;
    let path = dir.join("mini.sgy");
    write_segy(&path, spec.num_traces, spec.num_samples, spec.sample_interval_us);
    path
}

fn mini_config() -> ChunkerConfig {
    ChunkerConfig {
        traces_per_chunk: 20,
        depth_interval_ms: 250.0,
        ..Default::default()
    }
}

#[test]
fn test_mini_sample_six_chunks() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("chunks");

    let report = divide_segy_file(&path, &mini_config(), Some(&out)).expect("divide");
    assert_eq!(report.boundaries.len(), 6);
    assert_eq!(report.summary.total_chunks, 6);

    let written = report.written.expect("chunks were written");
    assert_eq!(written.chunks_written, 6);
    assert_eq!(fs::read_dir(&out).expect("read dir").count(), 12);

    let on_disk: u64 = written
        .paths
        .iter()
        .map(|(a, m)| {
            fs::metadata(a).expect("stat").len() + fs::metadata(m).expect("stat").len()
        })
        .sum();
    assert_eq!(written.bytes_written, on_disk);

    let trace_ranges: Vec<_> = report
        .boundaries
        .iter()
        .filter(|b| b.chunk_id.sample_index == 0)
        .map(|b| b.trace_range.clone())
        .collect();
    assert_eq!(trace_ranges, vec![0..20, 20..40, 40..50]);
}

#[test]
fn test_last_chunk_contents_and_metadata() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("chunks");

    divide_segy_file(&path, &mini_config(), Some(&out)).expect("divide");

    let array = read_npy(&out.join("chunk_0005_t002_s001.npy")).expect("read array");
    assert_eq!(array.shape(), (10, 125));
    assert_eq!(array.get(0, 0), Some(40_125.0));
    assert_eq!(array.get(9, 124), Some(49_249.0));

    let raw = fs::read(out.join("chunk_0005_t002_s001_metadata.json")).expect("read metadata");
    let json: serde_json::Value = serde_json::from_slice(&raw).expect("json");
    let metadata = ChunkMetadata::from_json(&json).expect("metadata");

    assert_eq!(metadata.chunk_id, (2, 1));
    assert_eq!(metadata.chunk_number, 5);
    assert_eq!(metadata.trace_range, (40, 50));
    assert_eq!(metadata.sample_range, (125, 250));
    let (t0, t1) = metadata.time_range_ms;
    assert_pair_approx_eq!((t0, t1), (250.0, 500.0), 1e-9);
    assert_eq!(metadata.shape, (10, 125));
    assert_eq!(metadata.source_file, path.to_string_lossy());
}

#[test]
fn test_every_array_matches_its_metadata() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("chunks");

    let config = ChunkerConfig {
        traces_per_chunk: 7,
        depth_interval_ms: 96.0,
        chunk_prefix: "odd".to_string(),
        ..Default::default()
    };
    let report = divide_segy_file(&path, &config, Some(&out)).expect("divide");
    let written = report.written.expect("chunks were written");

    // 50 / 7 -> 8 trace chunks, 250 / 48 -> 6 sample chunks
    assert_eq!(written.chunks_written, 48);

    for (array_path, metadata_path) in &written.paths {
        let array = read_npy(array_path).expect("read array");
        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(metadata_path).expect("read")).expect("json");
        let metadata = ChunkMetadata::from_json(&json).expect("metadata");

        assert_eq!(array.shape(), metadata.shape);
        assert!(metadata.is_consistent());

        let name = array_path
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name");
        let (number, id) = parse_chunk_file_name(name).expect("parse name");
        assert_eq!(number, metadata.chunk_number);
        assert_eq!(id.as_tuple(), metadata.chunk_id);

        // first sample encodes its absolute coordinates
        let expected = (metadata.trace_range.0 * 1000 + metadata.sample_range.0) as f32;
        assert_eq!(array.get(0, 0), Some(expected));
    }
}

#[test]
fn test_rewrite_is_byte_identical() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("chunks");

    let first = divide_segy_file(&path, &mini_config(), Some(&out))
        .expect("divide")
        .written
        .expect("written");
    let before: Vec<Vec<u8>> = first
        .paths
        .iter()
        .map(|(a, _)| fs::read(a).expect("read"))
        .collect();

    let second = divide_segy_file(&path, &mini_config(), Some(&out))
        .expect("divide")
        .written
        .expect("written");
    assert_eq!(first.paths, second.paths);
    assert_eq!(first.bytes_written, second.bytes_written);
    for ((a, _), bytes) in second.paths.iter().zip(before) {
        assert_eq!(fs::read(a).expect("read"), bytes);
    }
    assert_eq!(fs::read_dir(&out).expect("read dir").count(), 12);
}

#[test]
fn test_empty_file_writes_nothing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.sgy");
    write_segy(&path, 0, 250, 2000);
    let out = dir.path().join("chunks");

    let report = divide_segy_file(&path, &mini_config(), Some(&out)).expect("divide");
    assert!(report.boundaries.is_empty());

    let written = report.written.expect("write_all ran");
    assert_eq!(written.chunks_written, 0);
    assert_eq!(written.bytes_written, 0);
    assert!(out.is_dir());
    assert_eq!(fs::read_dir(&out).expect("read dir").count(), 0);
}

#[test]
fn test_invalid_params_rejected_before_any_output() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("chunks");

    let config = ChunkerConfig {
        depth_interval_ms: 0.5,
        ..mini_config()
    };
    let err = divide_segy_file(&path, &config, Some(&out)).unwrap_err();
    assert!(matches!(err, ChunkerError::InvalidParameter(_)));
    assert!(!out.exists());
}

#[test]
fn test_file_shrunk_after_partition_is_out_of_range() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("shrinking.sgy");
    write_segy(&path, 5, 10, 2000);

    let mut accessor = DataAccessor::open(&path).expect("open");
    let cells = partition(5, 10, 2.0, 2, 20.0).expect("partition");
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[2].trace_range, 4..5);

    // 3600 header bytes + 3 traces of 240 + 10 * 4 bytes
    fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .expect("open for truncation")
        .set_len(3600 + 3 * 280)
        .expect("truncate");

    let first = extract(&cells[0], &mut accessor, &path).expect("intact cell");
    assert_eq!(first.shape(), (2, 10));

    let err = extract(&cells[2], &mut accessor, &path).unwrap_err();
    assert!(
        matches!(err, ChunkerError::OutOfRange { .. }),
        "expected OutOfRange, got {:?}",
        err
    );
}

#[test]
fn test_missing_file_is_io_failure() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = divide_segy_file(&dir.path().join("missing.sgy"), &mini_config(), None).unwrap_err();
    assert!(matches!(err, ChunkerError::IoFailure(_)));
}

#[test]
fn test_manual_pipeline_with_prefix() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());
    let out = dir.path().join("manual");

    let mut accessor = DataAccessor::open(&path).expect("open");
    let partitioner =
        GridPartitioner::new(ChunkingParams::new(100, 500.0)).expect("partitioner");
    let cells = partitioner.partition(&accessor.file_info()).expect("partition");
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].chunk_id, ChunkId::new(0, 0));

    let chunks = extract_all(&cells, &mut accessor, &path);
    let report = ChunkWriter::new("line")
        .write_all(chunks, &out)
        .expect("write");
    assert_eq!(report.chunks_written, 1);
    assert!(out.join("line_0000_t000_s000.npy").exists());
    assert!(out.join("line_0000_t000_s000_metadata.json").exists());
}

#[test]
fn test_header_summary() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = mini_sample(dir.path());

    let mut headers = HeaderInfo::open(&path).expect("open");
    assert!(headers.textual_header().starts_with("C01 END TO END"));

    let summary = headers.file_summary().expect("summary");
    assert_eq!(summary.total_traces, 50);
    assert_eq!(summary.samples_per_trace, 250);
    assert_eq!(summary.sample_interval_us, 2000);
    assert_eq!(summary.sample_interval_ms, 2.0);
    assert_eq!(summary.total_time_depth_ms, 500.0);
    assert_eq!(summary.format_code, 1);
    assert_eq!(summary.data_format, "IBM floating point (4 bytes)");
    assert_eq!(summary.measurement_system, "Meters");
    // 50 * 250 * 4 bytes
    assert_eq!(summary.total_data_size_mb, 0.05);
    assert!(summary.to_string().contains("SEGY FILE HEADER SUMMARY"));

    let trace = headers.trace_header(49).expect("trace header");
    assert_eq!(trace.trace_sequence_file, 50);
    assert_eq!(trace.samples_in_trace, 250);
    assert!(matches!(
        headers.trace_header(50),
        Err(ChunkerError::OutOfRange { .. })
    ));
}
