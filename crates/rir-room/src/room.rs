//! Room definitions
//!
//! A room is either described directly by its wall reflection coefficients or
//! by a target reverberation time, from which uniform coefficients are derived
//! with Sabine's formula once the speed of sound is known.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use rir_core::{
    ReflectionOrderLimit, RirError, RirResult, RoomGeometry, Vec3, WallReflectionCoefficients,
};

static NEXT_ROOM_ID: AtomicU32 = AtomicU32::new(0);

/// How the walls of a room reflect sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoomAcoustics {
    /// Explicit per-wall coefficients
    Reflective { walls: WallReflectionCoefficients },
    /// Reverberation time in seconds (RT60)
    Reverberant { rt60: f64 },
}

/// Shoebox room with its acoustics and reflection-order limit
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    geometry: RoomGeometry,
    order: ReflectionOrderLimit,
    name: String,
    acoustics: RoomAcoustics,
}

impl Room {
    /// Room defined by six wall coefficients in [0, 1]
    ///
    /// `order` is the reflection-order limit, `-1` for unlimited.
    pub fn reflective(geometry: RoomGeometry, walls: &[f64], order: i32) -> RirResult<Self> {
        let walls = WallReflectionCoefficients::from_slice(walls)?;
        Self::build(geometry, order, RoomAcoustics::Reflective { walls }, "Reflect")
    }

    /// Room defined by its reverberation time (seconds)
    pub fn reverberant(geometry: RoomGeometry, rt60: f64, order: i32) -> RirResult<Self> {
        if !rt60.is_finite() || rt60 < 0.0 {
            return Err(RirError::InvalidParam(format!(
                "RT60 must be >= 0 seconds, got {rt60}"
            )));
        }
        Self::build(geometry, order, RoomAcoustics::Reverberant { rt60 }, "Reverb")
    }

    fn build(
        geometry: RoomGeometry,
        order: i32,
        acoustics: RoomAcoustics,
        suffix: &str,
    ) -> RirResult<Self> {
        geometry.validate()?;
        let order = ReflectionOrderLimit::from_raw(order)?;
        let id = NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed);

        Ok(Self {
            geometry,
            order,
            name: format!("Room_{id}_{suffix}"),
            acoustics,
        })
    }

    /// Replace the generated name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let suffix = match self.acoustics {
            RoomAcoustics::Reflective { .. } => "Reflect",
            RoomAcoustics::Reverberant { .. } => "Reverb",
        };
        self.name = format!("{}_{suffix}", name.into());
        self
    }

    pub fn geometry(&self) -> &RoomGeometry {
        &self.geometry
    }

    pub fn order(&self) -> ReflectionOrderLimit {
        self.order
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn acoustics(&self) -> &RoomAcoustics {
        &self.acoustics
    }

    /// Reverberation time, for rooms defined by one
    pub fn rt60(&self) -> Option<f64> {
        match self.acoustics {
            RoomAcoustics::Reverberant { rt60 } => Some(rt60),
            RoomAcoustics::Reflective { .. } => None,
        }
    }

    /// Resolve the acoustics to wall coefficients for a given speed of sound
    pub fn wall_coefficients(&self, sound_speed: f64) -> RirResult<WallReflectionCoefficients> {
        match &self.acoustics {
            RoomAcoustics::Reflective { walls } => Ok(*walls),
            RoomAcoustics::Reverberant { rt60 } => {
                WallReflectionCoefficients::from_reverberation_time(&self.geometry, *rt60, sound_speed)
            }
        }
    }

    /// True if the point lies inside the room or on a wall
    pub fn contains(&self, position: &Vec3) -> bool {
        self.geometry.contains(position)
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.geometry)
    }
}
