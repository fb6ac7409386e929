//! Windowed-sinc fractional delay kernel
//!
//! Each image arrives at a non-integer sample time. Its impulse is spread over
//! `Tw` output samples by a Hann-windowed sinc centred on the fractional part
//! of the arrival time. The sinc cutoff sits at Nyquist, so the kernel is also
//! the anti-aliasing low-pass for the pulse.

use std::f64::consts::PI;

/// Half the kernel length in seconds (8 ms total)
pub const KERNEL_HALF_WIDTH_SECS: f64 = 0.004;

/// Normalized sinc cutoff (1 = Nyquist)
const CUTOFF: f64 = 1.0;

/// Unnormalized sinc, sin(x) / x, with sinc(0) = 1
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { x.sin() / x }
}

/// Round half away from zero
#[inline]
pub fn round_half_away(x: f64) -> i64 {
    if x >= 0.0 {
        (x + 0.5) as i64
    } else {
        (x - 0.5) as i64
    }
}

/// Number of kernel taps for a sample rate, always even
#[inline]
pub fn tap_count(sample_rate: f64) -> usize {
    2 * round_half_away(KERNEL_HALF_WIDTH_SECS * sample_rate).max(0) as usize
}

/// Tap generator with a scratch buffer reused for every image
#[derive(Debug, Clone)]
pub struct FractionalDelayKernel {
    taps: Vec<f64>,
}

impl FractionalDelayKernel {
    pub fn new(sample_rate: f64) -> Self {
        Self::with_len(tap_count(sample_rate))
    }

    pub fn with_len(len: usize) -> Self {
        Self { taps: vec![0.0; len] }
    }

    /// Tap count (Tw)
    #[inline]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Offset of tap 0 relative to the integer arrival sample
    #[inline]
    pub fn start_offset(&self) -> i64 {
        1 - (self.taps.len() / 2) as i64
    }

    /// Fill the taps for a sub-sample arrival offset `frac` in [0, 1)
    pub fn taps(&mut self, frac: f64) -> &[f64] {
        let tw = self.taps.len() as f64;
        for (n, tap) in self.taps.iter_mut().enumerate() {
            let t = n as f64 + 1.0 - frac;
            let window = 0.5 * (1.0 - (2.0 * PI * (t / tw)).cos());
            *tap = window * CUTOFF * sinc(PI * CUTOFF * (t - 0.5 * tw));
        }
        &self.taps
    }
}
