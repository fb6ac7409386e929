//! Parameter set consumed by the image-source engine

use serde::{Deserialize, Serialize};

use crate::{
    BeamPatternKind, DEFAULT_SOUND_SPEED, MicrophoneOrientation, RirError, RirResult,
    RoomGeometry, Vec3, WallReflectionCoefficients,
};

/// Cap on the number of wall bounces an image may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ReflectionOrderLimit {
    /// Every image inside the response horizon contributes
    #[default]
    Unlimited,
    /// Only images with at most this many reflections contribute
    Max(u32),
}

impl ReflectionOrderLimit {
    /// Raw integer sentinel for [`ReflectionOrderLimit::Unlimited`]
    pub const UNLIMITED_RAW: i32 = -1;

    /// Parse the integer form: `-1` is unlimited, any other negative is rejected
    pub fn from_raw(raw: i32) -> RirResult<Self> {
        match raw {
            Self::UNLIMITED_RAW => Ok(Self::Unlimited),
            n if n >= 0 => Ok(Self::Max(n as u32)),
            n => Err(RirError::InvalidReflectionOrder(n)),
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Self::Unlimited => Self::UNLIMITED_RAW,
            Self::Max(n) => n.min(i32::MAX as u32) as i32,
        }
    }

    /// True if an image of the given reflection order passes the limit
    #[inline]
    pub fn admits(self, order: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Max(max) => order <= max,
        }
    }
}

impl TryFrom<i32> for ReflectionOrderLimit {
    type Error = RirError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}

impl From<ReflectionOrderLimit> for i32 {
    fn from(limit: ReflectionOrderLimit) -> Self {
        limit.as_raw()
    }
}

/// How the lattice walk is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulationMode {
    /// Single thread, lattice order
    #[default]
    Serial,
    /// Slabs of the lattice on the rayon pool, merged in slab order
    Parallel,
}

fn default_sound_speed() -> f64 {
    DEFAULT_SOUND_SPEED
}

/// Every scalar input of one impulse response computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RirParams {
    /// Speed of sound (m/s)
    #[serde(default = "default_sound_speed")]
    pub sound_speed: f64,
    /// Sample rate (Hz)
    pub sample_rate: f64,
    pub room: RoomGeometry,
    /// Microphone position (m)
    pub mic: Vec3,
    /// Source position (m)
    pub source: Vec3,
    #[serde(default)]
    pub walls: WallReflectionCoefficients,
    #[serde(default)]
    pub orientation: MicrophoneOrientation,
    #[serde(default)]
    pub pattern: BeamPatternKind,
    #[serde(default)]
    pub order: ReflectionOrderLimit,
    /// Run the DC-blocking high-pass after accumulation
    #[serde(default)]
    pub high_pass: bool,
    #[serde(default)]
    pub accumulation: AccumulationMode,
}

impl RirParams {
    /// Omni, anechoic, unlimited-order parameters for a scene
    pub fn new(sample_rate: f64, room: RoomGeometry, mic: Vec3, source: Vec3) -> Self {
        Self {
            sound_speed: DEFAULT_SOUND_SPEED,
            sample_rate,
            room,
            mic,
            source,
            walls: WallReflectionCoefficients::default(),
            orientation: MicrophoneOrientation::default(),
            pattern: BeamPatternKind::default(),
            order: ReflectionOrderLimit::default(),
            high_pass: false,
            accumulation: AccumulationMode::default(),
        }
    }

    pub fn with_sound_speed(mut self, sound_speed: f64) -> Self {
        self.sound_speed = sound_speed;
        self
    }

    pub fn with_walls(mut self, walls: WallReflectionCoefficients) -> Self {
        self.walls = walls;
        self
    }

    pub fn with_pattern(mut self, pattern: BeamPatternKind, orientation: MicrophoneOrientation) -> Self {
        self.pattern = pattern;
        self.orientation = orientation;
        self
    }

    pub fn with_order(mut self, order: ReflectionOrderLimit) -> Self {
        self.order = order;
        self
    }

    pub fn with_high_pass(mut self, enabled: bool) -> Self {
        self.high_pass = enabled;
        self
    }

    pub fn with_accumulation(mut self, mode: AccumulationMode) -> Self {
        self.accumulation = mode;
        self
    }

    /// Meters travelled by sound during one sample period (cTs)
    #[inline]
    pub fn meters_per_sample(&self) -> f64 {
        self.sound_speed / self.sample_rate
    }

    /// Check the scalar inputs the engine itself never checks
    ///
    /// Positions are only required to be finite here; whether they lie inside
    /// the room is a scene-level concern.
    pub fn validate(&self) -> RirResult<()> {
        if !self.sound_speed.is_finite() || self.sound_speed <= 0.0 {
            return Err(RirError::InvalidParam(format!(
                "sound speed must be positive, got {}",
                self.sound_speed
            )));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(RirError::InvalidParam(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }
        self.room.validate()?;
        if !self.mic.is_finite() {
            return Err(RirError::InvalidParam("microphone position is not finite".into()));
        }
        if !self.source.is_finite() {
            return Err(RirError::InvalidParam("source position is not finite".into()));
        }
        if self.walls.as_array().iter().any(|b| !b.is_finite()) {
            return Err(RirError::InvalidParam("wall coefficients must be finite".into()));
        }
        Ok(())
    }
}
