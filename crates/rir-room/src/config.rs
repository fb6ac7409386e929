//! JSON scene description

use serde::{Deserialize, Serialize};

use rir_core::{
    BeamPatternKind, MicrophoneOrientation, ReflectionOrderLimit, RirError, RirResult,
    RoomGeometry, Vec3,
};

use crate::room::{Room, RoomAcoustics};
use crate::scene::{Field, ImpulseResponse, RenderOptions, Scene};
use crate::transducer::{Microphone, Speaker};

fn unlimited_order() -> i32 {
    ReflectionOrderLimit::UNLIMITED_RAW
}

/// Room section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Dimensions in meters
    pub size: [f64; 3],
    #[serde(default = "unlimited_order")]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub acoustics: RoomAcoustics,
}

/// Microphone section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MicrophoneConfig {
    pub position: [f64; 3],
    #[serde(default)]
    pub pattern: BeamPatternKind,
    /// Look direction in radians
    #[serde(default)]
    pub orientation: MicrophoneOrientation,
}

/// Speaker position relative to the microphone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeakerPlacement {
    pub radius: f64,
    pub azimuth_deg: f64,
    #[serde(default)]
    pub elevation_deg: f64,
}

/// Speaker section: an absolute position or a placement around the microphone
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeakerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<SpeakerPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Complete scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub field: Field,
    pub room: RoomConfig,
    pub microphone: MicrophoneConfig,
    pub speaker: SpeakerConfig,
    #[serde(default)]
    pub render: RenderOptions,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> RirResult<Self> {
        serde_json::from_str(json).map_err(|e| RirError::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> RirResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RirError::Serialization(e.to_string()))
    }

    /// Validate every section and assemble the scene
    pub fn build(&self) -> RirResult<(Scene, Field, RenderOptions)> {
        let room = self.room.build()?;
        let microphone = self.microphone.build()?;
        let speaker = self.speaker.build(&microphone)?;
        let scene = Scene::new(room, microphone, speaker)?;
        Ok((scene, self.field, self.render))
    }

    /// Build and render in one step
    pub fn render(&self) -> RirResult<ImpulseResponse> {
        let (scene, field, options) = self.build()?;
        scene.render(&field, &options)
    }
}

impl RoomConfig {
    fn build(&self) -> RirResult<Room> {
        let [x, y, z] = self.size;
        let geometry = RoomGeometry::new(x, y, z)?;

        let room = match &self.acoustics {
            RoomAcoustics::Reflective { walls } => {
                Room::reflective(geometry, walls.as_array(), self.order)?
            }
            RoomAcoustics::Reverberant { rt60 } => Room::reverberant(geometry, *rt60, self.order)?,
        };

        Ok(match &self.name {
            Some(name) => room.with_name(name.clone()),
            None => room,
        })
    }
}

impl MicrophoneConfig {
    fn build(&self) -> RirResult<Microphone> {
        let position = Vec3::from(self.position);
        if self.pattern.is_directional() {
            Microphone::directional(position, self.pattern, self.orientation)
        } else {
            Ok(Microphone::omni(position))
        }
    }
}

impl SpeakerConfig {
    fn build(&self, microphone: &Microphone) -> RirResult<Speaker> {
        let speaker = match (self.position, self.placement) {
            (Some(position), None) => Speaker::new(Vec3::from(position)),
            (None, Some(p)) => microphone.place_speaker(p.radius, p.azimuth_deg, p.elevation_deg),
            (Some(_), Some(_)) => {
                return Err(RirError::InvalidParam(
                    "speaker takes either a position or a placement, not both".into(),
                ));
            }
            (None, None) => {
                return Err(RirError::InvalidParam(
                    "speaker needs a position or a placement".into(),
                ));
            }
        };

        Ok(match &self.name {
            Some(name) => Speaker::named(speaker.position(), name.clone()),
            None => speaker,
        })
    }
}
