//! First-order microphone beam patterns
//!
//! Every directional pattern is an affine blend of the dipole response:
//! `a + (1 - a) * dipole`, with `a` = 0.5 (cardioid), 0.75 (subcardioid)
//! or 0.25 (hypercardioid).
//!
//! A zero-length offset (image on top of the microphone) makes the polar angle
//! undefined and the directional patterns return NaN. Omni is unaffected.

use rir_core::{BeamPatternKind, MicrophoneOrientation, Vec3};
use std::f64::consts::FRAC_PI_2;

/// Cosine of the angle between the arrival direction and the microphone axis
///
/// `offset` points from the microphone to the image source. Range [-1, 1].
#[inline]
pub fn dipole(offset: Vec3, orientation: MicrophoneOrientation) -> f64 {
    let theta = (offset.z / offset.norm()).acos();
    let phi = offset.y.atan2(offset.x);

    (FRAC_PI_2 - orientation.elevation).sin() * theta.sin() * (orientation.azimuth - phi).cos()
        + (FRAC_PI_2 - orientation.elevation).cos() * theta.cos()
}

#[inline]
pub fn omni(_offset: Vec3, _orientation: MicrophoneOrientation) -> f64 {
    1.0
}

#[inline]
pub fn cardioid(offset: Vec3, orientation: MicrophoneOrientation) -> f64 {
    0.5 + 0.5 * dipole(offset, orientation)
}

#[inline]
pub fn subcardioid(offset: Vec3, orientation: MicrophoneOrientation) -> f64 {
    0.75 + 0.25 * dipole(offset, orientation)
}

#[inline]
pub fn hypercardioid(offset: Vec3, orientation: MicrophoneOrientation) -> f64 {
    0.25 + 0.75 * dipole(offset, orientation)
}

/// Gain function signature shared by all patterns
pub type BeamFn = fn(Vec3, MicrophoneOrientation) -> f64;

/// Resolve a pattern to its gain function once, outside the lattice loop
#[inline]
pub fn beam_fn(kind: BeamPatternKind) -> BeamFn {
    match kind {
        BeamPatternKind::Omni => omni,
        BeamPatternKind::Dipole => dipole,
        BeamPatternKind::Cardioid => cardioid,
        BeamPatternKind::Subcardioid => subcardioid,
        BeamPatternKind::Hypercardioid => hypercardioid,
    }
}

/// Evaluate a pattern's gain for one arrival direction
#[inline]
pub fn beam_gain(kind: BeamPatternKind, offset: Vec3, orientation: MicrophoneOrientation) -> f64 {
    beam_fn(kind)(offset, orientation)
}
