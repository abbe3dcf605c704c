use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Brain-level intent of a cat.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    #[default]
    Idle,
    Wandering,
    Approaching,
    Consuming,
    Playing,
    Resting,
}

impl Behavior {
    pub const ALL: [Behavior; 6] = [
        Behavior::Idle,
        Behavior::Wandering,
        Behavior::Approaching,
        Behavior::Consuming,
        Behavior::Playing,
        Behavior::Resting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Idle => "idle",
            Behavior::Wandering => "wandering",
            Behavior::Approaching => "approaching",
            Behavior::Consuming => "consuming",
            Behavior::Playing => "playing",
            Behavior::Resting => "resting",
        }
    }

    /// True while the cat is occupied with a target.
    pub fn is_engaged(&self) -> bool {
        matches!(
            self,
            Behavior::Approaching | Behavior::Consuming | Behavior::Playing
        )
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Need scalars driving self-directed behavior. Each stays in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motivation {
    pub rest: f32,
    pub boredom: f32,
}

impl Motivation {
    pub fn clamp(&mut self) {
        self.rest = self.rest.clamp(0.0, 1.0);
        self.boredom = self.boredom.clamp(0.0, 1.0);
    }
}

/// Decision state owned by a single cat's brain.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BrainState {
    pub behavior: Behavior,
    pub motivation: Motivation,
}

impl BrainState {
    pub fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            motivation: Motivation::default(),
        }
    }
}

/// Closed set of visual states. Exactly one is active per cat.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Archive,
    RkyvSerialize,
    RkyvDeserialize,
)]
#[archive(check_bytes)]
#[serde(rename_all = "lowercase")]
pub enum CatStateType {
    #[default]
    Idle,
    Walking,
    Running,
    Sitting,
    Sleeping,
    Playing,
}

impl CatStateType {
    pub const COUNT: usize = 6;

    pub const ALL: [CatStateType; Self::COUNT] = [
        CatStateType::Idle,
        CatStateType::Walking,
        CatStateType::Running,
        CatStateType::Sitting,
        CatStateType::Sleeping,
        CatStateType::Playing,
    ];

    /// Stable slot index, used for fixed-size per-state tables.
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            CatStateType::Idle => 0,
            CatStateType::Walking => 1,
            CatStateType::Running => 2,
            CatStateType::Sitting => 3,
            CatStateType::Sleeping => 4,
            CatStateType::Playing => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CatStateType::Idle => "idle",
            CatStateType::Walking => "walking",
            CatStateType::Running => "running",
            CatStateType::Sitting => "sitting",
            CatStateType::Sleeping => "sleeping",
            CatStateType::Playing => "playing",
        }
    }
}

impl fmt::Display for CatStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
