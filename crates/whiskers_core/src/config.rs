//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to the `config.toml` file.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults; missing sections keep defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1280.0
//! height = 720.0
//! initial_cats = 12
//! seed = 42
//!
//! [brain]
//! min_interest = 0.35
//!
//! [detection]
//! pointer = 600.0
//! ```

use crate::error::{CatError, Result};
use serde::{Deserialize, Serialize};
use whiskers_data::TargetCategory;

/// Range used for any target kind without a valid configured range.
pub const DEFAULT_DETECTION_RANGE: f32 = 300.0;

/// Viewport and population setup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub initial_cats: usize,
    pub seed: Option<u64>,
    pub deterministic: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            initial_cats: 8,
            seed: None,
            deterministic: false,
        }
    }
}

/// Decision-loop tuning shared by every cat's brain.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// Minimum interest a target needs before the cat goes for it.
    pub min_interest: f32,
    /// Distance at which a target counts as reached.
    pub reach_distance: f32,
    /// Beyond this distance an approaching cat runs instead of walking.
    pub run_distance: f32,
    pub consume_ms: u32,
    pub play_ms: u32,
    pub rest_threshold: f32,
    pub wake_threshold: f32,
    pub rest_gain_per_sec: f32,
    pub rest_recovery_per_sec: f32,
    pub boredom_gain_per_sec: f32,
    /// Shortest stay in idle before the cat considers wandering off.
    pub idle_min_ms: u32,
    pub wander_radius: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            min_interest: 0.35,
            reach_distance: 24.0,
            run_distance: 180.0,
            consume_ms: 3000,
            play_ms: 4000,
            rest_threshold: 0.8,
            wake_threshold: 0.15,
            rest_gain_per_sec: 0.01,
            rest_recovery_per_sec: 0.08,
            boredom_gain_per_sec: 0.1,
            idle_min_ms: 1500,
            wander_radius: 250.0,
        }
    }
}

impl BrainConfig {
    /// Rejects tunings that would stall or break the decision loop.
    pub fn validate(&self) -> Result<()> {
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        let check = |ok: bool, msg: &str| if ok { Ok(()) } else { Err(CatError::config(msg)) };

        check(unit(self.min_interest), "Minimum interest must be in [0.0, 1.0]")?;
        check(
            unit(self.rest_threshold) && unit(self.wake_threshold),
            "Rest thresholds must be in [0.0, 1.0]",
        )?;
        check(
            self.wake_threshold < self.rest_threshold,
            "Wake threshold must be below rest threshold",
        )?;
        check(
            self.reach_distance.is_finite() && self.reach_distance > 0.0,
            "Reach distance must be positive and finite",
        )?;
        check(
            self.run_distance.is_finite() && self.run_distance >= self.reach_distance,
            "Run distance must be finite and not shorter than reach distance",
        )?;
        let rates = [
            self.rest_gain_per_sec,
            self.rest_recovery_per_sec,
            self.boredom_gain_per_sec,
        ];
        check(
            rates.iter().all(|r| r.is_finite() && *r >= 0.0),
            "Motivation rates must be finite and non-negative",
        )?;
        check(
            self.wander_radius.is_finite() && self.wander_radius > 0.0,
            "Wander radius must be positive and finite",
        )
    }
}

/// Movement speeds, in pixels per second.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MovementConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 60.0,
            run_speed: 160.0,
        }
    }
}

impl MovementConfig {
    pub fn validate(&self) -> Result<()> {
        let speed = |v: f32| v.is_finite() && v > 0.0;
        if !speed(self.walk_speed) || !speed(self.run_speed) {
            return Err(CatError::config("Movement speeds must be positive and finite"));
        }
        if self.run_speed < self.walk_speed {
            return Err(CatError::config("Run speed must not be slower than walk speed"));
        }
        Ok(())
    }
}

/// Per-category sensing ranges. Absent or invalid entries fall back to
/// [`DEFAULT_DETECTION_RANGE`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub food: Option<f32>,
    pub water: Option<f32>,
    pub toy: Option<f32>,
    pub pointer: Option<f32>,
    pub other: Option<f32>,
}

impl DetectionConfig {
    pub fn range_for(&self, category: TargetCategory) -> f32 {
        let configured = match category {
            TargetCategory::Food => self.food,
            TargetCategory::Water => self.water,
            TargetCategory::Toy => self.toy,
            TargetCategory::Pointer => self.pointer,
            TargetCategory::Other => self.other,
        };
        match configured {
            Some(range) if range.is_finite() && range > 0.0 => range,
            _ => DEFAULT_DETECTION_RANGE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub brain: BrainConfig,
    pub movement: MovementConfig,
    pub detection: DetectionConfig,
    pub target_fps: u64,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Detection ranges are not checked here; invalid ranges
    /// fall back to the default range at lookup time.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.width.is_finite() && self.world.width > 0.0,
            "World width must be positive"
        );
        anyhow::ensure!(
            self.world.height.is_finite() && self.world.height > 0.0,
            "World height must be positive"
        );
        anyhow::ensure!(
            self.world.initial_cats <= 1000,
            "Initial cat count too large (max 1000)"
        );

        self.brain.validate()?;
        self.movement.validate()?;

        anyhow::ensure!(self.target_fps > 0, "Target FPS must be positive");
        anyhow::ensure!(self.target_fps <= 240, "Target FPS too high (max 240)");

        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Stable hash of the behavior-relevant sections.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.movement).as_bytes());
        hasher.update(format!("{:?}", self.detection).as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Frame duration implied by `target_fps`, in milliseconds.
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.target_fps.max(1) as f32
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            brain: BrainConfig::default(),
            movement: MovementConfig::default(),
            detection: DetectionConfig::default(),
            target_fps: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = AppConfig {
            world: WorldConfig {
                width: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_min_interest() {
        let config = AppConfig {
            brain: BrainConfig {
                min_interest: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            target_fps = 30

            [world]
            initial_cats = 3

            [detection]
            pointer = 600.0
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.world.initial_cats, 3);
        assert_eq!(config.world.width, 1280.0);
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.detection.range_for(TargetCategory::Pointer), 600.0);
        assert_eq!(
            config.detection.range_for(TargetCategory::Food),
            DEFAULT_DETECTION_RANGE
        );
    }

    #[test]
    fn test_infinite_wander_radius_rejected() {
        let brain = BrainConfig {
            wander_radius: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(brain.validate(), Err(CatError::Config(_))));
        let config = AppConfig {
            brain,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_speeds_rejected() {
        let movement = MovementConfig {
            walk_speed: f32::NAN,
            ..Default::default()
        };
        assert!(movement.validate().is_err());
        assert!(MovementConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_range_falls_back() {
        let detection = DetectionConfig {
            water: Some(-5.0),
            toy: Some(f32::NAN),
            ..Default::default()
        };
        assert_eq!(
            detection.range_for(TargetCategory::Water),
            DEFAULT_DETECTION_RANGE
        );
        assert_eq!(
            detection.range_for(TargetCategory::Toy),
            DEFAULT_DETECTION_RANGE
        );
    }

    #[test]
    fn test_fingerprint_consistency() {
        assert_eq!(
            AppConfig::default().fingerprint(),
            AppConfig::default().fingerprint()
        );
    }
}
