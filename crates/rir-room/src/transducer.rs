//! Microphones and speakers placed in a room

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use rir_core::{BeamPatternKind, MicrophoneOrientation, RirResult, Vec3};

static NEXT_SPEAKER_ID: AtomicU32 = AtomicU32::new(0);

/// Receiver with a polar pattern and a look direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Microphone {
    position: Vec3,
    pattern: BeamPatternKind,
    orientation: MicrophoneOrientation,
}

impl Microphone {
    /// Omnidirectional microphone
    pub fn omni(position: Vec3) -> Self {
        Self {
            position,
            pattern: BeamPatternKind::Omni,
            orientation: MicrophoneOrientation::default(),
        }
    }

    /// Microphone with a polar pattern facing `orientation` (radians)
    pub fn directional(
        position: Vec3,
        pattern: BeamPatternKind,
        orientation: MicrophoneOrientation,
    ) -> RirResult<Self> {
        orientation.validate()?;
        Ok(Self {
            position,
            pattern,
            orientation,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pattern(&self) -> BeamPatternKind {
        self.pattern
    }

    pub fn orientation(&self) -> MicrophoneOrientation {
        self.orientation
    }

    /// Place a speaker on a sphere around the microphone
    ///
    /// Azimuth is measured in the x/y plane from +x, elevation above it,
    /// both in degrees.
    pub fn place_speaker(&self, radius: f64, azimuth_deg: f64, elevation_deg: f64) -> Speaker {
        Speaker::new(self.position + Vec3::from_spherical_deg(radius, azimuth_deg, elevation_deg))
    }
}

impl fmt::Display for Microphone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mic_{}_x_{:.1}_y_{:.1}_z_{:.1}",
            self.pattern.name(),
            self.position.x,
            self.position.y,
            self.position.z
        )
    }
}

/// Point source
#[derive(Debug, Clone, PartialEq)]
pub struct Speaker {
    position: Vec3,
    name: String,
}

impl Speaker {
    /// Speaker with a generated `Speaker_<n>` name
    pub fn new(position: Vec3) -> Self {
        let id = NEXT_SPEAKER_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            position,
            name: format!("Speaker_{id}"),
        }
    }

    pub fn named(position: Vec3, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_x_{:.1}_y_{:.1}_z_{:.1}",
            self.name, self.position.x, self.position.y, self.position.z
        )
    }
}
