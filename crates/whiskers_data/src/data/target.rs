use super::spatial::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tagged kind of an interactive object in the environment.
///
/// Serialized as its kebab-case tag (`"food-basic"`, `"laser"`, ...). Unknown
/// tags round-trip through [`TargetKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
    FoodBasic,
    FoodFancy,
    Water,
    Yarn,
    /// Laser dot or mouse pointer.
    Pointer,
    Other(String),
}

/// Coarse grouping used for detection ranges and engagement outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetCategory {
    Food,
    Water,
    Toy,
    Pointer,
    Other,
}

impl TargetKind {
    pub fn tag(&self) -> &str {
        match self {
            TargetKind::FoodBasic => "food-basic",
            TargetKind::FoodFancy => "food-fancy",
            TargetKind::Water => "water",
            TargetKind::Yarn => "yarn",
            TargetKind::Pointer => "laser",
            TargetKind::Other(tag) => tag,
        }
    }

    pub fn category(&self) -> TargetCategory {
        match self {
            TargetKind::FoodBasic | TargetKind::FoodFancy => TargetCategory::Food,
            TargetKind::Water => TargetCategory::Water,
            TargetKind::Yarn => TargetCategory::Toy,
            TargetKind::Pointer => TargetCategory::Pointer,
            TargetKind::Other(_) => TargetCategory::Other,
        }
    }

    /// Food and water are consumed; everything else is played with.
    pub fn is_consumable(&self) -> bool {
        matches!(
            self.category(),
            TargetCategory::Food | TargetCategory::Water
        )
    }
}

impl From<&str> for TargetKind {
    fn from(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "food" | "food-basic" | "basic-food" | "kibble" => TargetKind::FoodBasic,
            "food-fancy" | "fancy-food" | "treat" => TargetKind::FoodFancy,
            "water" => TargetKind::Water,
            "yarn" | "yarn-ball" => TargetKind::Yarn,
            "pointer" | "laser" | "laser-pointer" => TargetKind::Pointer,
            other => TargetKind::Other(other.to_string()),
        }
    }
}

impl From<String> for TargetKind {
    fn from(tag: String) -> Self {
        TargetKind::from(tag.as_str())
    }
}

impl From<TargetKind> for String {
    fn from(kind: TargetKind) -> Self {
        kind.tag().to_string()
    }
}

impl FromStr for TargetKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TargetKind::from(s))
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Optional sub-state of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMotion {
    Still,
    Rolling,
    Dragging,
}

impl TargetMotion {
    pub fn is_moving(&self) -> bool {
        matches!(self, TargetMotion::Rolling | TargetMotion::Dragging)
    }
}

/// Object in the environment a cat may engage with. Read-only from the cat's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTarget {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub position: Position,
    #[serde(default)]
    pub motion: Option<TargetMotion>,
}

impl InteractionTarget {
    pub fn new(kind: impl Into<TargetKind>, position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            position,
            motion: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_motion(mut self, motion: TargetMotion) -> Self {
        self.motion = Some(motion);
        self
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some_and(|m| m.is_moving())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aliases() {
        assert_eq!(TargetKind::from("laser"), TargetKind::Pointer);
        assert_eq!(TargetKind::from("Pointer"), TargetKind::Pointer);
        assert_eq!(TargetKind::from("food"), TargetKind::FoodBasic);
        assert_eq!(
            TargetKind::from("catnip"),
            TargetKind::Other("catnip".to_string())
        );
    }

    #[test]
    fn test_target_json_uses_type_tag() {
        let target = InteractionTarget::new(TargetKind::Yarn, Position::new(1.0, 2.0))
            .with_motion(TargetMotion::Rolling);
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["type"], "yarn");
        assert_eq!(json["motion"], "rolling");

        let back: InteractionTarget = serde_json::from_value(json).unwrap();
        assert_eq!(back, target);
    }
}
