//! Integration test: write SEG-Y files with SegyWriter and read them back
//! with SegyFile.

use std::path::Path;

use segy_parser::{SampleFormat, SegyError, SegyFile, SegySpec, SegyWriter, TraceHeader};
use test_utils::{create_index_traces, fixtures::survey};

fn write_file(path: &Path, num_traces: usize, num_samples: usize, format: SampleFormat) {
    let spec = SegySpec::new(num_samples, 2000)
        .with_format(format)
        .with_textual_lines(vec![
            "C01 INTEGRATION TEST FILE".to_string(),
            format!("C02 TRACES {} SAMPLES {}", num_traces, num_samples),
        ]);
    let data = create_index_traces(num_traces, num_samples);

    let mut writer = SegyWriter::create(path, spec).expect("Failed to create writer");
    for (i, trace) in data.chunks(num_samples.max(1)).take(num_traces).enumerate() {
        let header = TraceHeader {
            trace_sequence_line: i as i32 + 1,
            trace_sequence_file: i as i32 + 1,
            trace_number: i as i32 + 1,
            inline_number: i as i32 + 1,
            crossline_number: 1,
            cdp_x: i as i32 * 25,
            coordinate_scalar: -100,
            ..Default::default()
        };
        writer.write_trace(&header, trace).expect("Failed to write trace");
    }
    writer.finish().expect("Failed to flush");
}

#[test]
fn test_open_reports_geometry() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("mini.sgy");
    let spec = survey::MINI_SAMPLE;
    write_file(&path, spec.num_traces, spec.num_samples, SampleFormat::IeeeFloat32);

    let segy = SegyFile::open(&path).expect("Failed to open");
    assert_eq!(segy.trace_count(), 50);
    assert_eq!(segy.samples_per_trace(), 250);
    assert!((segy.sample_interval_ms() - 2.0).abs() < f64::EPSILON);
    assert_eq!(segy.format(), SampleFormat::IeeeFloat32);
    assert_eq!(segy.binary_header().measurement_system_name(), "Meters");
    assert!(segy.textual_header().starts_with("C01 INTEGRATION TEST FILE"));
    assert!(segy.textual_header().contains("C02 TRACES 50 SAMPLES 250"));
}

#[test]
fn test_read_traces_matches_written_values() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("values.sgy");
    write_file(&path, 12, 40, SampleFormat::IeeeFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    let data = segy.read_traces(3..6).expect("Failed to read");
    assert_eq!(data.len(), 3 * 40);
    assert_eq!(data[0], 3000.0);
    assert_eq!(data[40 + 7], 4007.0);

    let trace = segy.read_trace(11).expect("Failed to read trace");
    assert_eq!(trace[39], 11039.0);
}

#[test]
fn test_window_read_equals_slice_of_full_read() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("window.sgy");
    write_file(&path, 8, 30, SampleFormat::IeeeFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    let full = segy.read_traces(2..5).expect("Failed to read");
    let window = segy.read_window(2..5, 10..25).expect("Failed to read window");

    let expected: Vec<f32> = full
        .chunks(30)
        .flat_map(|trace| trace[10..25].to_vec())
        .collect();
    assert_eq!(window, expected);
}

#[test]
fn test_ibm_format_roundtrip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ibm.sgy");
    write_file(&path, 4, 16, SampleFormat::IbmFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    assert_eq!(segy.format(), SampleFormat::IbmFloat32);
    let data = segy.read_traces(0..4).expect("Failed to read");
    // small integers are exact in IBM float
    assert_eq!(data, create_index_traces(4, 16));
}

#[test]
fn test_int16_format() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("int16.sgy");
    write_file(&path, 3, 10, SampleFormat::Int16);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    let data = segy.read_traces(0..3).expect("Failed to read");
    assert_eq!(data[2 * 10 + 9], 2009.0);
}

#[test]
fn test_trace_header_fields() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("headers.sgy");
    write_file(&path, 5, 10, SampleFormat::IeeeFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    let header = segy.read_trace_header(4).expect("Failed to read header");
    assert_eq!(header.trace_sequence_file, 5);
    assert_eq!(header.inline_number, 5);
    assert_eq!(header.samples_in_trace, 10);
    assert_eq!(header.sample_interval_us, 2000);
    assert_eq!(header.cdp_position(), (1.0, 0.0));
}

#[test]
fn test_out_of_range_reads() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("range.sgy");
    write_file(&path, 5, 10, SampleFormat::IeeeFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    assert!(matches!(segy.read_trace(5), Err(SegyError::OutOfRange { .. })));
    assert!(matches!(segy.read_traces(3..6), Err(SegyError::OutOfRange { .. })));
    assert!(matches!(
        segy.read_window(0..2, 5..11),
        Err(SegyError::OutOfRange { .. })
    ));
    assert!(segy.read_traces(5..5).expect("empty read").is_empty());
}

#[test]
fn test_file_shrunk_after_open() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("shrunk.sgy");
    write_file(&path, 5, 10, SampleFormat::IeeeFloat32);

    let mut segy = SegyFile::open(&path).expect("Failed to open");
    assert_eq!(segy.trace_count(), 5);

    // keep the file headers and three traces
    let trace_len = 240 + 10 * 4;
    std::fs::OpenOptions::new()
        .write(true)
        .open(&path)
        .expect("open for truncation")
        .set_len(3600 + 3 * trace_len)
        .expect("truncate");

    assert_eq!(segy.read_traces(0..3).expect("intact traces").len(), 30);
    for result in [
        segy.read_traces(2..5).map(|_| ()),
        segy.read_trace(4).map(|_| ()),
        segy.read_window(3..4, 0..5).map(|_| ()),
        segy.read_trace_header(3).map(|_| ()),
    ] {
        match result {
            Err(SegyError::OutOfRange { available, .. }) => assert_eq!(available, 3),
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }
}

#[test]
fn test_empty_file_has_no_traces() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.sgy");
    write_file(&path, 0, 250, SampleFormat::IeeeFloat32);

    let segy = SegyFile::open(&path).expect("Failed to open");
    assert_eq!(segy.trace_count(), 0);
    assert_eq!(segy.samples_per_trace(), 250);
}

#[test]
fn test_truncated_file_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("truncated.sgy");
    write_file(&path, 3, 10, SampleFormat::IeeeFloat32);

    let bytes = std::fs::read(&path).expect("read");
    std::fs::write(&path, &bytes[..bytes.len() - 7]).expect("write");

    assert!(matches!(
        SegyFile::open(&path),
        Err(SegyError::InvalidFormat(_))
    ));
}

#[test]
fn test_too_short_for_headers() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("short.sgy");
    std::fs::write(&path, vec![0u8; 1000]).expect("write");

    assert!(matches!(
        SegyFile::open(&path),
        Err(SegyError::InvalidFormat(_))
    ));
}
