//! Common test fixtures for SEG-Y chunking tests.
//!
//! This module provides survey geometries and chunking parameters that show
//! up repeatedly across the test suite.

/// Survey geometries for synthetic SEG-Y files.
pub mod survey {
    /// The default mini sample: 50 traces × 250 samples at 2 ms.
    pub const MINI_SAMPLE: SurveySpec = SurveySpec {
        num_traces: 50,
        num_samples: 250,
        sample_interval_us: 2000,
    };

    /// Tiny survey, fast enough for every unit test.
    pub const TINY: SurveySpec = SurveySpec {
        num_traces: 20,
        num_samples: 100,
        sample_interval_us: 2000,
    };

    /// Medium survey (100 traces × 500 samples).
    pub const MEDIUM: SurveySpec = SurveySpec {
        num_traces: 100,
        num_samples: 500,
        sample_interval_us: 2000,
    };

    /// Trace count that does not divide evenly by 100.
    pub const ODD_TRACE_COUNT: SurveySpec = SurveySpec {
        num_traces: 237,
        num_samples: 250,
        sample_interval_us: 2000,
    };

    /// 4 ms sampling, 1000 samples (4 s record).
    pub const LONG_RECORD: SurveySpec = SurveySpec {
        num_traces: 10,
        num_samples: 1000,
        sample_interval_us: 4000,
    };

    /// Survey geometry for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct SurveySpec {
        pub num_traces: usize,
        pub num_samples: usize,
        pub sample_interval_us: u16,
    }

    impl SurveySpec {
        /// Returns the total number of samples in the survey.
        pub fn size(&self) -> usize {
            self.num_traces * self.num_samples
        }

        /// Returns the sample interval in milliseconds.
        pub fn sample_interval_ms(&self) -> f64 {
            self.sample_interval_us as f64 / 1000.0
        }

        /// Returns the record length in milliseconds.
        pub fn duration_ms(&self) -> f64 {
            self.num_samples as f64 * self.sample_interval_ms()
        }
    }
}

/// Chunking parameters.
pub mod chunking {
    /// Default traces per chunk used by the command line tool.
    pub const DEFAULT_TRACES_PER_CHUNK: usize = 100;

    /// Default depth/time interval per chunk in milliseconds.
    pub const DEFAULT_DEPTH_INTERVAL_MS: f64 = 500.0;

    /// (traces per chunk, depth interval ms) pairs that exercise partial
    /// last chunks on the mini sample.
    pub const PARTIAL_CASES: [(usize, f64); 4] = [(20, 250.0), (7, 100.0), (50, 96.0), (3, 2.0)];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_survey_spec_derived_values() {
        let spec = survey::MINI_SAMPLE;
        assert_eq!(spec.size(), 12_500);
        assert!((spec.sample_interval_ms() - 2.0).abs() < f64::EPSILON);
        assert!((spec.duration_ms() - 500.0).abs() < f64::EPSILON);
    }
}
