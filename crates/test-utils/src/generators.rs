//! Synthetic trace generators.
//!
//! These generators create predictable, verifiable sample patterns that can
//! be used across the test suite. Every generator returns traces in
//! row-major order: all samples of trace 0, then trace 1, and so on.

/// Creates traces whose values encode their own coordinates.
///
/// Each sample value is calculated as: `trace * 1000 + sample`
///
/// This makes it easy to verify that a chunk holds exactly the window it
/// claims: the value at `[t, s]` of the full grid is `t * 1000 + s`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_traces;
///
/// let data = create_index_traces(3, 5);
/// assert_eq!(data.len(), 15);
/// assert_eq!(data[0], 0.0);     // trace 0, sample 0
/// assert_eq!(data[1], 1.0);     // trace 0, sample 1
/// assert_eq!(data[5], 1000.0);  // trace 1, sample 0
/// ```
pub fn create_index_traces(num_traces: usize, num_samples: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(num_traces * num_samples);
    for trace in 0..num_traces {
        for sample in 0..num_samples {
            data.push((trace * 1000 + sample) as f32);
        }
    }
    data
}

/// Creates seismic-looking traces: two sine components with exponential
/// decay, normalized to a peak amplitude of 1.0 per trace.
///
/// Deterministic (no noise), so values can be compared across runs.
pub fn create_decaying_traces(
    num_traces: usize,
    num_samples: usize,
    sample_interval_ms: f64,
) -> Vec<f32> {
    let mut data = Vec::with_capacity(num_traces * num_samples);
    for trace in 0..num_traces {
        let freq1 = 20.0 + (trace % 10) as f64 * 5.0;
        let freq2 = 10.0 + (trace % 5) as f64 * 3.0;

        let raw: Vec<f64> = (0..num_samples)
            .map(|sample| {
                let t = sample as f64 * sample_interval_ms / 1000.0;
                let signal = (2.0 * std::f64::consts::PI * freq1 * t).sin()
                    + 0.5 * (2.0 * std::f64::consts::PI * freq2 * t).sin();
                signal * (-t * 2.0).exp()
            })
            .collect();

        let peak = raw.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };
        data.extend(raw.iter().map(|v| (v * scale) as f32));
    }
    data
}

/// Creates traces where every sample has the same value.
pub fn create_constant_traces(num_traces: usize, num_samples: usize, value: f32) -> Vec<f32> {
    vec![value; num_traces * num_samples]
}

/// Creates zero traces with a single unit spike at `spike_sample` in each
/// trace (clamped to the last sample).
pub fn create_spike_traces(num_traces: usize, num_samples: usize, spike_sample: usize) -> Vec<f32> {
    let mut data = vec![0.0; num_traces * num_samples];
    if num_samples == 0 {
        return data;
    }
    let spike = spike_sample.min(num_samples - 1);
    for trace in 0..num_traces {
        data[trace * num_samples + spike] = 1.0;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_index_traces() {
        let data = create_index_traces(4, 3);
        assert_eq!(data.len(), 12);
        assert_eq!(data[3 * 3 + 2], 3002.0);
    }

    #[test]
    fn test_create_decaying_traces_normalized() {
        let data = create_decaying_traces(5, 250, 2.0);
        assert_eq!(data.len(), 1250);
        for trace in data.chunks(250) {
            let peak = trace.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()));
            assert!((peak - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_decaying_traces_deterministic() {
        assert_eq!(
            create_decaying_traces(3, 100, 4.0),
            create_decaying_traces(3, 100, 4.0)
        );
    }

    #[test]
    fn test_create_constant_traces() {
        let data = create_constant_traces(2, 5, 0.25);
        assert!(data.iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_create_spike_traces() {
        let data = create_spike_traces(2, 10, 4);
        assert_eq!(data[4], 1.0);
        assert_eq!(data[14], 1.0);
        assert_eq!(data.iter().sum::<f32>(), 2.0);
    }
}
