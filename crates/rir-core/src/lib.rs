//! rir-core: Shared types, errors, and configuration for room impulse response synthesis
//!
//! This crate provides the value types every other crate in the workspace
//! speaks: spatial vectors, room geometry, wall reflection coefficients,
//! microphone beam patterns and orientation, and the bundled parameter set
//! handed to the image-source engine.

mod error;
mod microphone;
mod params;
mod position;
mod room;

pub use error::*;
pub use microphone::*;
pub use params::*;
pub use position::*;
pub use room::*;

/// Type alias for impulse response samples
pub type Sample = f64;

/// Default speed of sound in air (m/s)
pub const DEFAULT_SOUND_SPEED: f64 = 340.0;
