//! Shoebox room geometry and wall reflection coefficients

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{RirError, RirResult, Vec3};

/// Rectangular room dimensions in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RoomGeometry {
    /// Create room, rejecting non-positive or non-finite lengths
    pub fn new(x: f64, y: f64, z: f64) -> RirResult<Self> {
        let room = Self { x, y, z };
        room.validate()?;
        Ok(room)
    }

    pub fn validate(&self) -> RirResult<()> {
        for (axis, len) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !len.is_finite() || len <= 0.0 {
                return Err(RirError::InvalidRoom(format!(
                    "{axis} dimension must be positive, got {len}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Total wall surface
    #[inline]
    pub fn surface_area(&self) -> f64 {
        2.0 * (self.x * self.y + self.x * self.z + self.y * self.z)
    }

    /// True if the point lies inside the room or on one of its walls
    pub fn contains(&self, p: &Vec3) -> bool {
        (0.0..=self.x).contains(&p.x)
            && (0.0..=self.y).contains(&p.y)
            && (0.0..=self.z).contains(&p.z)
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for RoomGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x_{:.1}_y_{:.1}_z_{:.1}", self.x, self.y, self.z)
    }
}

/// Per-wall pressure reflection coefficients
///
/// Ordered `[x-near, x-far, y-near, y-far, z-near, z-far]`. The near wall of an
/// axis is the one through the origin. A coefficient of 0 makes the wall fully
/// absorptive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallReflectionCoefficients(pub [f64; 6]);

impl WallReflectionCoefficients {
    /// Wrap coefficients without range checks
    #[inline]
    pub const fn new(betas: [f64; 6]) -> Self {
        Self(betas)
    }

    /// Wrap coefficients, requiring each to lie in [0, 1]
    pub fn try_new(betas: [f64; 6]) -> RirResult<Self> {
        let coeffs = Self(betas);
        coeffs.validate()?;
        Ok(coeffs)
    }

    /// Build from a slice that must hold exactly six values in [0, 1]
    pub fn from_slice(betas: &[f64]) -> RirResult<Self> {
        let arr: [f64; 6] = betas
            .try_into()
            .map_err(|_| RirError::CoefficientCount(betas.len()))?;
        Self::try_new(arr)
    }

    /// Same coefficient on every wall
    #[inline]
    pub const fn uniform(beta: f64) -> Self {
        Self([beta; 6])
    }

    /// Fully absorptive walls (free field)
    #[inline]
    pub const fn anechoic() -> Self {
        Self::uniform(0.0)
    }

    /// Derive uniform coefficients from a target reverberation time
    ///
    /// Inverts Sabine's formula: `alpha = 24 ln(10) V / (c S T60)` and
    /// `beta = sqrt(1 - alpha)`. A zero RT60 yields anechoic walls.
    pub fn from_reverberation_time(
        room: &RoomGeometry,
        rt60: f64,
        sound_speed: f64,
    ) -> RirResult<Self> {
        if !rt60.is_finite() || rt60 < 0.0 {
            return Err(RirError::InvalidParam(format!(
                "reverberation time must be >= 0, got {rt60}"
            )));
        }
        if !sound_speed.is_finite() || sound_speed <= 0.0 {
            return Err(RirError::InvalidParam(format!(
                "sound speed must be positive, got {sound_speed}"
            )));
        }
        room.validate()?;

        if rt60 == 0.0 {
            return Ok(Self::anechoic());
        }

        let alpha = 24.0 * std::f64::consts::LN_10 * room.volume()
            / (sound_speed * room.surface_area() * rt60);
        if alpha > 1.0 {
            return Err(RirError::UnreachableReverberationTime { rt60 });
        }

        let beta = (1.0 - alpha).sqrt();
        log::debug!("RT60 {rt60} s -> absorption {alpha:.4}, beta {beta:.4}");
        Ok(Self::uniform(beta))
    }

    pub fn validate(&self) -> RirResult<()> {
        for (index, &value) in self.0.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(RirError::InvalidReflectionCoefficient { index, value });
            }
        }
        Ok(())
    }

    /// Coefficient of the wall through the origin on `axis` (0 = x, 1 = y, 2 = z)
    #[inline]
    pub fn near(&self, axis: usize) -> f64 {
        self.0[2 * axis]
    }

    /// Coefficient of the opposite wall on `axis`
    #[inline]
    pub fn far(&self, axis: usize) -> f64 {
        self.0[2 * axis + 1]
    }

    #[inline]
    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }
}

impl Default for WallReflectionCoefficients {
    fn default() -> Self {
        Self::anechoic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_validation() {
        assert!(RoomGeometry::new(4.0, 3.0, 2.0).is_ok());
        assert!(RoomGeometry::new(0.0, 3.0, 2.0).is_err());
        assert!(RoomGeometry::new(4.0, -1.0, 2.0).is_err());
        assert!(RoomGeometry::new(4.0, 3.0, f64::NAN).is_err());
    }

    #[test]
    fn test_room_measures() {
        let room = RoomGeometry::new(4.0, 3.0, 2.0).unwrap();
        assert!((room.volume() - 24.0).abs() < 1e-12);
        assert!((room.surface_area() - 52.0).abs() < 1e-12);
        assert_eq!(room.to_string(), "x_4.0_y_3.0_z_2.0");
    }

    #[test]
    fn test_room_contains() {
        let room = RoomGeometry::new(4.0, 3.0, 2.0).unwrap();
        assert!(room.contains(&Vec3::new(2.0, 1.5, 1.0)));
        assert!(room.contains(&Vec3::new(0.0, 3.0, 2.0)));
        assert!(!room.contains(&Vec3::new(4.1, 1.0, 1.0)));
        assert!(!room.contains(&Vec3::new(1.0, -0.1, 1.0)));
    }

    #[test]
    fn test_coefficient_layout() {
        let betas = WallReflectionCoefficients::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(betas.near(0), 0.1);
        assert_eq!(betas.far(0), 0.2);
        assert_eq!(betas.near(1), 0.3);
        assert_eq!(betas.far(1), 0.4);
        assert_eq!(betas.near(2), 0.5);
        assert_eq!(betas.far(2), 0.6);
    }

    #[test]
    fn test_coefficient_validation() {
        assert!(WallReflectionCoefficients::try_new([0.9; 6]).is_ok());
        assert_eq!(
            WallReflectionCoefficients::try_new([0.9, 0.9, 1.2, 0.9, 0.9, 0.9]),
            Err(RirError::InvalidReflectionCoefficient { index: 2, value: 1.2 })
        );
        assert_eq!(
            WallReflectionCoefficients::from_slice(&[0.5; 5]),
            Err(RirError::CoefficientCount(5))
        );
        assert!(WallReflectionCoefficients::from_slice(&[0.5; 6]).is_ok());
    }

    #[test]
    fn test_sabine_inversion() {
        let room = RoomGeometry::new(5.0, 4.0, 6.0).unwrap();
        let betas = WallReflectionCoefficients::from_reverberation_time(&room, 0.4, 340.0).unwrap();

        let alpha = 24.0 * std::f64::consts::LN_10 * room.volume()
            / (340.0 * room.surface_area() * 0.4);
        let expected = (1.0 - alpha).sqrt();
        for &beta in betas.as_array() {
            approx::assert_relative_eq!(beta, expected, epsilon = 1e-12);
        }

        // Longer reverberation means more reflective walls
        let livelier = WallReflectionCoefficients::from_reverberation_time(&room, 1.0, 340.0).unwrap();
        assert!(livelier.near(0) > betas.near(0));
    }

    #[test]
    fn test_sabine_edge_cases() {
        let room = RoomGeometry::new(5.0, 4.0, 6.0).unwrap();
        assert_eq!(
            WallReflectionCoefficients::from_reverberation_time(&room, 0.0, 340.0).unwrap(),
            WallReflectionCoefficients::anechoic()
        );
        assert!(matches!(
            WallReflectionCoefficients::from_reverberation_time(&room, 0.01, 340.0),
            Err(RirError::UnreachableReverberationTime { .. })
        ));
        assert!(WallReflectionCoefficients::from_reverberation_time(&room, -1.0, 340.0).is_err());
    }

    #[test]
    fn test_coefficients_serialize_as_array() {
        let betas = WallReflectionCoefficients::uniform(0.5);
        let json = serde_json::to_string(&betas).unwrap();
        assert_eq!(json, "[0.5,0.5,0.5,0.5,0.5,0.5]");
    }
}
