//! rir-room: Scene layer for room impulse response rendering
//!
//! Validates rooms, microphones and speakers before anything reaches the
//! image-source engine in `rir-dsp`:
//! - Rooms defined by wall coefficients or by reverberation time
//! - Microphones with polar patterns, speakers placed absolutely or around a microphone
//! - JSON scene documents

mod config;
mod room;
mod scene;
mod transducer;

pub use config::*;
pub use room::*;
pub use scene::*;
pub use transducer::*;
