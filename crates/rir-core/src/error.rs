//! Error types for room impulse response synthesis

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RirError {
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    #[error("{what} position ({x}, {y}, {z}) lies outside the room")]
    PositionOutsideRoom {
        what: &'static str,
        x: f64,
        y: f64,
        z: f64,
    },

    #[error("Reflection coefficient {index} out of range [0, 1]: {value}")]
    InvalidReflectionCoefficient { index: usize, value: f64 },

    #[error("Expected 6 wall reflection coefficients, got {0}")]
    CoefficientCount(usize),

    #[error("Invalid reflection order: {0} (must be >= -1)")]
    InvalidReflectionOrder(i32),

    #[error("Invalid microphone orientation: {0}")]
    InvalidOrientation(String),

    #[error("Reverberation time {rt60} s cannot be reached in this room")]
    UnreachableReverberationTime { rt60: f64 },

    #[error("Failed to allocate impulse response buffer of {len} samples")]
    Allocation { len: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type RirResult<T> = Result<T, RirError>;
