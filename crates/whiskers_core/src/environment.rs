//! The world a cat senses: interaction targets and the viewport.

use crate::error::Result;
use crate::personality::BoundariesLogic;
use uuid::Uuid;
use whiskers_data::{Boundaries, InteractionTarget, Position, TargetMotion};

/// Supplies targets and bounds to the driver each tick.
pub trait EnvironmentSource {
    fn targets(&self) -> &[InteractionTarget];
    fn boundaries(&self) -> Boundaries;
    /// New bounds if the viewport changed since the last call.
    fn take_boundary_change(&mut self) -> Option<Boundaries>;
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    targets: Vec<InteractionTarget>,
    boundaries: Boundaries,
    pending_resize: bool,
}

impl Environment {
    pub fn new(boundaries: Boundaries) -> Result<Self> {
        boundaries.validate()?;
        Ok(Self {
            targets: Vec::new(),
            boundaries,
            pending_resize: false,
        })
    }

    pub fn add_target(&mut self, target: InteractionTarget) -> Uuid {
        let id = target.id;
        self.targets.push(target);
        id
    }

    pub fn remove_target(&mut self, id: Uuid) -> Option<InteractionTarget> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    pub fn move_target(&mut self, id: Uuid, position: Position) -> bool {
        match self.target_mut(id) {
            Some(target) => {
                target.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_motion(&mut self, id: Uuid, motion: Option<TargetMotion>) -> bool {
        match self.target_mut(id) {
            Some(target) => {
                target.motion = motion;
                true
            }
            None => false,
        }
    }

    pub fn target(&self, id: Uuid) -> Option<&InteractionTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    fn target_mut(&mut self, id: Uuid) -> Option<&mut InteractionTarget> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Viewport resize; picked up by the driver on its next tick.
    pub fn resize(&mut self, boundaries: Boundaries) -> Result<()> {
        boundaries.validate()?;
        if boundaries != self.boundaries {
            self.boundaries = boundaries;
            self.pending_resize = true;
        }
        Ok(())
    }
}

impl EnvironmentSource for Environment {
    fn targets(&self) -> &[InteractionTarget] {
        &self.targets
    }

    fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    fn take_boundary_change(&mut self) -> Option<Boundaries> {
        std::mem::take(&mut self.pending_resize).then_some(self.boundaries)
    }
}
