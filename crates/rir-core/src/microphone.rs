//! Microphone directivity and orientation

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use crate::{RirError, RirResult};

/// Facing direction of a directional microphone (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MicrophoneOrientation {
    pub azimuth: f64,
    pub elevation: f64,
}

impl MicrophoneOrientation {
    #[inline]
    pub const fn new(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }

    /// Orientation given in degrees
    pub fn from_degrees(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self::new(azimuth_deg.to_radians(), elevation_deg.to_radians())
    }

    /// Azimuth must lie in [-pi, pi] and elevation in [-pi/2, pi/2]
    pub fn validate(&self) -> RirResult<()> {
        if !(-PI..=PI).contains(&self.azimuth) {
            return Err(RirError::InvalidOrientation(format!(
                "azimuth {} outside [-pi, pi]",
                self.azimuth
            )));
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&self.elevation) {
            return Err(RirError::InvalidOrientation(format!(
                "elevation {} outside [-pi/2, pi/2]",
                self.elevation
            )));
        }
        Ok(())
    }
}

/// First-order microphone polar patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamPatternKind {
    /// Equal sensitivity in every direction
    #[default]
    Omni,
    /// Figure-of-eight, cos(angle)
    Dipole,
    /// 0.5 + 0.5 cos(angle)
    Cardioid,
    /// 0.75 + 0.25 cos(angle)
    Subcardioid,
    /// 0.25 + 0.75 cos(angle)
    Hypercardioid,
}

impl BeamPatternKind {
    pub const ALL: [BeamPatternKind; 5] = [
        Self::Omni,
        Self::Dipole,
        Self::Cardioid,
        Self::Subcardioid,
        Self::Hypercardioid,
    ];

    /// Map a single-character pattern code. Unknown codes fall back to omni.
    pub fn from_code(code: char) -> Self {
        match code {
            'd' => Self::Dipole,
            'c' => Self::Cardioid,
            's' => Self::Subcardioid,
            'h' => Self::Hypercardioid,
            _ => Self::Omni,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Omni => 'o',
            Self::Dipole => 'd',
            Self::Cardioid => 'c',
            Self::Subcardioid => 's',
            Self::Hypercardioid => 'h',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Omni => "omni",
            Self::Dipole => "dipole",
            Self::Cardioid => "cardioid",
            Self::Subcardioid => "subcardioid",
            Self::Hypercardioid => "hypercardioid",
        }
    }

    /// Whether the orientation influences the gain
    #[inline]
    pub fn is_directional(self) -> bool {
        self != Self::Omni
    }
}

impl fmt::Display for BeamPatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BeamPatternKind {
    type Err = RirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| RirError::InvalidParam(format!("unknown beam pattern: {s}")))
    }
}
