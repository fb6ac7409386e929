//! DC-blocking high-pass post-filter
//!
//! Second-order IIR stage with a fixed 100 Hz corner. The transfer function has
//! a double zero at DC:
//!
//! ```text
//!        1 - (1 + R1) z^-1 + R1 z^-2
//! H(z) = ---------------------------      R1 = e^-W,  W = 2 pi 100 / fs
//!        1 - B1 z^-1 - B2 z^-2
//! ```

use rir_core::Sample;
use std::f64::consts::PI;

use crate::{MonoProcessor, Processor, ProcessorConfig};

/// Corner frequency of the DC blocker (Hz)
pub const DC_BLOCKER_CUTOFF_HZ: f64 = 100.0;

/// Recursive DC blocker
#[derive(Debug, Clone)]
pub struct DcBlocker {
    r1: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    y1: f64,
    y2: f64,
}

impl DcBlocker {
    pub fn new(sample_rate: f64) -> Self {
        let mut filter = Self {
            r1: 0.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            y1: 0.0,
            y2: 0.0,
        };
        filter.set_sample_rate(sample_rate);
        filter
    }

    /// Filter a whole buffer in place from a zero state
    pub fn apply(buffer: &mut [Sample], sample_rate: f64) {
        Self::new(sample_rate).process_block(buffer);
    }
}

impl Processor for DcBlocker {
    fn reset(&mut self) {
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl MonoProcessor for DcBlocker {
    #[inline]
    fn process_sample(&mut self, input: Sample) -> Sample {
        let y0 = self.b1 * self.y1 + self.b2 * self.y2 + input;
        let output = y0 + self.a1 * self.y1 + self.r1 * self.y2;
        self.y2 = self.y1;
        self.y1 = y0;
        output
    }
}

impl ProcessorConfig for DcBlocker {
    fn set_sample_rate(&mut self, sample_rate: f64) {
        let w = 2.0 * PI * DC_BLOCKER_CUTOFF_HZ / sample_rate;
        self.r1 = (-w).exp();
        self.b1 = 2.0 * self.r1 * w.cos();
        self.b2 = -self.r1 * self.r1;
        self.a1 = -(1.0 + self.r1);
    }
}
