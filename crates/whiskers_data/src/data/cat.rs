use super::behavior::{Behavior, CatStateType};
use super::spatial::Position;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Five independent traits, each in [0, 1].
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Personality {
    pub curiosity: f32,
    /// Playfulness.
    pub energy: f32,
    pub independence: f32,
    pub sociability: f32,
    /// How quickly the need to rest builds up.
    #[serde(default = "default_rest_bias")]
    pub rest_bias: f32,
}

fn default_rest_bias() -> f32 {
    0.5
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            curiosity: 0.5,
            energy: 0.5,
            independence: 0.5,
            sociability: 0.5,
            rest_bias: 0.5,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[serde(rename_all = "lowercase")]
pub enum CoatPattern {
    #[default]
    Solid,
    Tabby,
    Tuxedo,
    Calico,
    Spotted,
}

/// Parameters handed to the render target when a cat's visual is created.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Appearance {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub pattern: CoatPattern,
    /// Size multiplier (1.0 = normal).
    pub size: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            r: 230,
            g: 150,
            b: 70,
            pattern: CoatPattern::Tabby,
            size: 1.0,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 64.0,
            height: 64.0,
        }
    }
}

/// Defining parameters of a cat, enough to recreate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct CatDefinition {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub seed: Option<String>,
    pub personality: Personality,
    pub appearance: Appearance,
    pub dimensions: Dimensions,
}

/// Serializable view of a live cat for an external store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct CatSnapshot {
    pub definition: CatDefinition,
    pub behavior: Behavior,
    pub visual: CatStateType,
    pub position: Position,
    /// Set when the definition or behavior changed since the last save.
    pub dirty: bool,
}

impl CatSnapshot {
    pub fn id(&self) -> Uuid {
        self.definition.id
    }
}
