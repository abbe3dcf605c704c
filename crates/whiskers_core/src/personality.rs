//! Trait validation and named presets.

use crate::error::{CatError, Result};
use whiskers_data::{Boundaries, Personality, Position};

/// Names accepted by [`PersonalityLogic::preset`].
pub const PRESET_NAMES: [&str; 6] = [
    "playful",
    "lazy",
    "curious",
    "independent",
    "social",
    "balanced",
];

pub trait PersonalityLogic: Sized {
    fn validate(&self) -> Result<()>;
    fn preset(name: &str) -> Option<Self>;
    /// Traits as `(name, value)` pairs in declaration order.
    fn traits(&self) -> [(&'static str, f32); 5];
}

impl PersonalityLogic for Personality {
    fn validate(&self) -> Result<()> {
        for (name, value) in self.traits() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CatError::InvalidTrait { name, value });
            }
        }
        Ok(())
    }

    fn preset(name: &str) -> Option<Self> {
        let p = |curiosity, energy, independence, sociability, rest_bias| Personality {
            curiosity,
            energy,
            independence,
            sociability,
            rest_bias,
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "playful" => Some(p(0.7, 0.9, 0.2, 0.8, 0.2)),
            "lazy" => Some(p(0.3, 0.1, 0.6, 0.4, 0.9)),
            "curious" => Some(p(0.95, 0.6, 0.4, 0.5, 0.4)),
            "independent" => Some(p(0.5, 0.5, 0.9, 0.2, 0.5)),
            "social" => Some(p(0.6, 0.6, 0.1, 0.95, 0.4)),
            "balanced" => Some(Personality::default()),
            _ => None,
        }
    }

    fn traits(&self) -> [(&'static str, f32); 5] {
        [
            ("curiosity", self.curiosity),
            ("energy", self.energy),
            ("independence", self.independence),
            ("sociability", self.sociability),
            ("rest_bias", self.rest_bias),
        ]
    }
}

pub trait BoundariesLogic {
    fn validate(&self) -> Result<()>;
}

impl BoundariesLogic for Boundaries {
    fn validate(&self) -> Result<()> {
        let err = |reason| CatError::InvalidBoundaries {
            min_x: self.min_x,
            min_y: self.min_y,
            max_x: self.max_x,
            max_y: self.max_y,
            reason,
        };
        let values = [self.min_x, self.min_y, self.max_x, self.max_y];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(err("values must be finite"));
        }
        if self.min_x >= self.max_x {
            return Err(err("min_x must be less than max_x"));
        }
        if self.min_y >= self.max_y {
            return Err(err("min_y must be less than max_y"));
        }
        Ok(())
    }
}

pub fn validate_position(p: &Position) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(CatError::InvalidPosition { x: p.x, y: p.y })
    }
}
