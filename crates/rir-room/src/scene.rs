//! Scene assembly and rendering
//!
//! A [`Scene`] pairs one room with one microphone and one speaker. Rendering
//! resolves the room acoustics to wall coefficients, allocates the output
//! buffer and hands everything to the image-source engine.

use serde::{Deserialize, Serialize};

use rir_core::{
    AccumulationMode, DEFAULT_SOUND_SPEED, RirError, RirParams, RirResult, Sample, Vec3,
};
use rir_dsp::compute_impulse_response;

use crate::room::Room;
use crate::transducer::{Microphone, Speaker};

fn default_sound_speed() -> f64 {
    DEFAULT_SOUND_SPEED
}

/// Propagation medium and sampling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub sample_rate: f64,
    #[serde(default = "default_sound_speed")]
    pub sound_speed: f64,
}

impl Field {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            sound_speed: DEFAULT_SOUND_SPEED,
        }
    }

    pub fn with_sound_speed(mut self, sound_speed: f64) -> Self {
        self.sound_speed = sound_speed;
        self
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(16000.0)
    }
}

/// Output settings for a render
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Response length in samples
    pub length: Option<usize>,
    /// Response length in seconds, used when `length` is unset
    pub duration_secs: Option<f64>,
    /// Run the 100 Hz DC blocker after accumulation
    pub high_pass: bool,
    pub accumulation: AccumulationMode,
}

impl RenderOptions {
    pub fn with_length(length: usize) -> Self {
        Self {
            length: Some(length),
            ..Default::default()
        }
    }

    pub fn with_duration(duration_secs: f64) -> Self {
        Self {
            duration_secs: Some(duration_secs),
            ..Default::default()
        }
    }

    pub fn high_pass(mut self, enabled: bool) -> Self {
        self.high_pass = enabled;
        self
    }

    pub fn accumulation(mut self, mode: AccumulationMode) -> Self {
        self.accumulation = mode;
        self
    }

    /// Number of output samples
    ///
    /// Falls back to the room's reverberation time when neither a length nor
    /// a duration is given.
    pub fn resolve_length(&self, sample_rate: f64, room: &Room) -> RirResult<usize> {
        if let Some(length) = self.length {
            return Ok(length);
        }

        let secs = match (self.duration_secs, room.rt60()) {
            (Some(secs), _) => secs,
            (None, Some(rt60)) if rt60 > 0.0 => rt60,
            _ => {
                return Err(RirError::InvalidParam(
                    "response length or duration required".into(),
                ));
            }
        };

        if !secs.is_finite() || secs < 0.0 {
            return Err(RirError::InvalidParam(format!(
                "duration must be >= 0 seconds, got {secs}"
            )));
        }
        Ok((secs * sample_rate).ceil() as usize)
    }
}

/// Rendered room impulse response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpulseResponse {
    pub samples: Vec<Sample>,
    pub sample_rate: f64,
}

impl ImpulseResponse {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> Sample {
        self.samples.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }

    /// Index of the largest absolute sample, if any
    pub fn peak_index(&self) -> Option<usize> {
        self.samples
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
    }

    /// Sum of squared samples
    pub fn energy(&self) -> f64 {
        self.samples.iter().map(|s| s * s).sum()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}

/// One room, one microphone, one speaker
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    room: Room,
    microphone: Microphone,
    speaker: Speaker,
}

impl Scene {
    /// Assemble a scene; both transducers must lie inside the room
    pub fn new(room: Room, microphone: Microphone, speaker: Speaker) -> RirResult<Self> {
        check_inside(&room, "microphone", microphone.position())?;
        check_inside(&room, "speaker", speaker.position())?;
        Ok(Self {
            room,
            microphone,
            speaker,
        })
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn microphone(&self) -> &Microphone {
        &self.microphone
    }

    pub fn speaker(&self) -> &Speaker {
        &self.speaker
    }

    /// Engine parameters for this scene
    pub fn params(
        &self,
        field: &Field,
        high_pass: bool,
        accumulation: AccumulationMode,
    ) -> RirResult<RirParams> {
        let walls = self.room.wall_coefficients(field.sound_speed)?;

        let params = RirParams::new(
            field.sample_rate,
            *self.room.geometry(),
            self.microphone.position(),
            self.speaker.position(),
        )
        .with_sound_speed(field.sound_speed)
        .with_walls(walls)
        .with_pattern(self.microphone.pattern(), self.microphone.orientation())
        .with_order(self.room.order())
        .with_high_pass(high_pass)
        .with_accumulation(accumulation);

        params.validate()?;
        Ok(params)
    }

    /// Render the impulse response from the speaker to the microphone
    pub fn render(&self, field: &Field, options: &RenderOptions) -> RirResult<ImpulseResponse> {
        let params = self.params(field, options.high_pass, options.accumulation)?;
        let len = options.resolve_length(field.sample_rate, &self.room)?;

        let mut samples: Vec<Sample> = Vec::new();
        samples
            .try_reserve_exact(len)
            .map_err(|_| RirError::Allocation { len })?;
        samples.resize(len, 0.0);

        let stats = compute_impulse_response(&params, &mut samples);

        log::info!(
            "Rendered {} -> {} in {}: {} samples @ {} Hz, {} images admitted",
            self.speaker.name(),
            self.microphone,
            self.room,
            len,
            field.sample_rate,
            stats.admitted
        );

        Ok(ImpulseResponse {
            samples,
            sample_rate: field.sample_rate,
        })
    }
}

fn check_inside(room: &Room, what: &'static str, position: Vec3) -> RirResult<()> {
    if room.contains(&position) {
        Ok(())
    } else {
        Err(RirError::PositionOutsideRoom {
            what,
            x: position.x,
            y: position.y,
            z: position.z,
        })
    }
}
