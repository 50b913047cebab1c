//! Synthetic SEG-Y sample files.
//!
//! Each trace is two sine components with exponential decay plus Gaussian
//! noise, normalized to a peak amplitude of 1.0.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segy_parser::{SampleFormat, SegySpec, SegyWriter, TraceHeader};
use tracing::{debug, info};

/// Standard deviation of the additive noise.
const NOISE_STD: f64 = 0.1;

/// Trace spacing written to CDP X, in centimeters (scalar -100).
const CDP_SPACING_CM: i32 = 2500;

/// Geometry of a synthetic file.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub num_traces: usize,
    pub num_samples: usize,
    pub sample_interval_us: u16,
    /// Fixed seed for reproducible noise; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            num_traces: 50,
            num_samples: 250,
            sample_interval_us: 2000,
            seed: None,
        }
    }
}

impl SampleSpec {
    fn textual_lines(&self) -> Vec<String> {
        vec![
            "C01 MINI SEGY SAMPLE FILE FOR TESTING".to_string(),
            "C02 Created with segy-tool create-sample".to_string(),
            "C03".to_string(),
            "C04 FILE INFORMATION:".to_string(),
            format!("C05 Number of traces: {}", self.num_traces),
            format!("C06 Samples per trace: {}", self.num_samples),
            format!(
                "C07 Sample interval: {} microseconds ({} ms)",
                self.sample_interval_us,
                self.sample_interval_us as f64 / 1000.0
            ),
            "C08".to_string(),
            "C09 DATA CONTENT:".to_string(),
            "C10 Synthetic seismic data with sine waves and random noise".to_string(),
            "C11 For testing and demonstration purposes only".to_string(),
        ]
    }
}

/// One synthetic trace: samples span `[0, duration]` inclusive.
fn synth_trace(index: usize, spec: &SampleSpec, rng: &mut impl Rng) -> Vec<f32> {
    let duration_s = spec.num_samples as f64 * spec.sample_interval_us as f64 / 1_000_000.0;
    let step = if spec.num_samples > 1 {
        duration_s / (spec.num_samples - 1) as f64
    } else {
        0.0
    };

    let freq1 = 20.0 + (index % 10) as f64 * 5.0;
    let freq2 = 10.0 + (index % 5) as f64 * 3.0;

    let raw: Vec<f64> = (0..spec.num_samples)
        .map(|i| {
            let t = i as f64 * step;
            let signal = (2.0 * PI * freq1 * t).sin() + 0.5 * (2.0 * PI * freq2 * t).sin();
            signal * (-t * 2.0).exp() + gaussian(rng) * NOISE_STD
        })
        .collect();

    let peak = raw.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };
    raw.iter().map(|v| (v * scale) as f32).collect()
}

/// Standard normal variate (Box-Muller).
fn gaussian(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Write a synthetic IEEE-float SEG-Y file. Returns the file size in bytes.
pub fn create_sample_segy(path: &Path, spec: &SampleSpec) -> Result<u64> {
    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut segy_spec = SegySpec::new(spec.num_samples, spec.sample_interval_us)
        .with_format(SampleFormat::IeeeFloat32)
        .with_textual_lines(spec.textual_lines());
    segy_spec.traces_per_ensemble = spec.num_traces.min(i16::MAX as usize) as i16;
    let mut writer = SegyWriter::create(path, segy_spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for i in 0..spec.num_traces {
        let number = i as i32 + 1;
        let header = TraceHeader {
            trace_sequence_line: number,
            trace_sequence_file: number,
            field_record: 1,
            trace_number: number,
            ensemble_number: number,
            inline_number: number,
            crossline_number: 1,
            cdp_x: i as i32 * CDP_SPACING_CM,
            cdp_y: 0,
            coordinate_scalar: -100,
            ..Default::default()
        };
        writer.write_trace(&header, &synth_trace(i, spec, &mut rng))?;

        if (i + 1) % 10 == 0 || i + 1 == spec.num_traces {
            debug!(written = i + 1, total = spec.num_traces, "Writing traces");
        }
    }
    writer.finish()?;

    let size = std::fs::metadata(path)?.len();
    info!(
        path = %path.display(),
        traces = spec.num_traces,
        samples = spec.num_samples,
        bytes = size,
        "Created sample SEG-Y file"
    );
    Ok(size)
}
