//! rir-dsp: Image-source room impulse response engine
//!
//! ## Modules
//! - `beam` - Omni, dipole and cardioid-family microphone gains
//! - `kernel` - Hann-windowed sinc fractional delay taps
//! - `lattice` - Image lattice walk with reflection-order pruning
//! - `highpass` - 100 Hz DC-blocking post-filter
//!
//! ## Usage
//!
//! ```rust
//! use rir_core::{ReflectionOrderLimit, RirParams, RoomGeometry, Vec3, WallReflectionCoefficients};
//!
//! let params = RirParams::new(
//!     16000.0,
//!     RoomGeometry::new(4.0, 3.0, 2.0).unwrap(),
//!     Vec3::new(2.0, 1.5, 1.0),
//!     Vec3::new(2.5, 1.5, 1.0),
//! )
//! .with_walls(WallReflectionCoefficients::uniform(0.7))
//! .with_order(ReflectionOrderLimit::Max(4));
//!
//! let mut rir = vec![0.0; 2048];
//! rir_dsp::compute_impulse_response(&params, &mut rir);
//! assert!(rir.iter().any(|&s| s != 0.0));
//! ```

pub mod beam;
pub mod highpass;
pub mod kernel;
pub mod lattice;

pub use beam::beam_gain;
pub use highpass::DcBlocker;
pub use kernel::{FractionalDelayKernel, tap_count};
pub use lattice::{ImageLatticeAccumulator, LatticeStats};

use rir_core::{AccumulationMode, RirParams, Sample};

/// Trait for all DSP processors
pub trait Processor: Send + Sync {
    /// Reset processor state
    fn reset(&mut self);
}

/// Mono processor trait
pub trait MonoProcessor: Processor {
    /// Process a single sample
    fn process_sample(&mut self, input: Sample) -> Sample;

    /// Process a block of samples
    fn process_block(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

/// Processor configuration for sample rate changes
pub trait ProcessorConfig {
    fn set_sample_rate(&mut self, sample_rate: f64);
}

/// Compute the room impulse response for one source/microphone pair
///
/// The response length is `buffer.len()`. Contributions are *added* to the
/// buffer, so it must be zeroed by the caller. When `params.high_pass` is set
/// the DC blocker runs over the whole buffer once accumulation has finished.
///
/// Inputs are not validated here (see [`RirParams::validate`]). An image that
/// coincides with the microphone yields non-finite samples.
pub fn compute_impulse_response(params: &RirParams, buffer: &mut [Sample]) -> LatticeStats {
    let lattice = ImageLatticeAccumulator::new(params, buffer.len());

    let stats = match params.accumulation {
        AccumulationMode::Serial => lattice.accumulate(buffer),
        AccumulationMode::Parallel => lattice.accumulate_parallel(buffer),
    };

    if params.high_pass {
        DcBlocker::apply(buffer, params.sample_rate);
    }

    log::debug!(
        "RIR {} samples @ {} Hz: extents {:?}, {} taps, {} visited / {} admitted / {} injected",
        buffer.len(),
        params.sample_rate,
        lattice.extents(),
        lattice.tap_len(),
        stats.visited,
        stats.admitted,
        stats.injected
    );

    stats
}
