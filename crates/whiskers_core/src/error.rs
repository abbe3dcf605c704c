//! Error types for cat construction and per-target evaluation.
//!
//! Only configuration-time failures reach callers. Transition and target
//! problems are absorbed by the component that meets them.

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatError {
    /// A personality trait is outside [0, 1] or not finite.
    #[error("personality trait `{name}` must be within [0, 1], got {value}")]
    InvalidTrait { name: &'static str, value: f32 },

    #[error("invalid boundaries ({min_x}, {min_y})..({max_x}, {max_y}): {reason}")]
    InvalidBoundaries {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        reason: &'static str,
    },

    #[error("invalid position ({x}, {y})")]
    InvalidPosition { x: f32, y: f32 },

    /// Malformed interaction target. Isolated to that target.
    #[error("invalid target {id}: {reason}")]
    InvalidTarget { id: Uuid, reason: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatError>;

impl CatError {
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors that must abort creation of a cat.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, CatError::InvalidTarget { .. })
    }
}
