//! Keeps the brain, the animation pool and the event stream in step when a cat
//! is paused, resumed or torn down.

use crate::brain::Brain;
use crate::events::{CatEventKind, EventAggregator};
use crate::pool::AnimationPool;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Inactive,
    Active,
    Destroyed,
}

/// The components a lifecycle change touches, borrowed from the owning cat.
pub struct LifecycleParts<'a> {
    pub brain: &'a mut Brain,
    pub pool: &'a mut AnimationPool,
    pub events: &'a mut EventAggregator,
    pub tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == LifecycleState::Destroyed
    }

    /// Returns `false` when the cat was not active.
    pub fn pause(&mut self, parts: LifecycleParts<'_>) -> bool {
        if self.state != LifecycleState::Active {
            return false;
        }
        parts.brain.stop();
        parts.pool.pause();
        self.state = LifecycleState::Inactive;
        parts.events.emit(parts.tick, CatEventKind::Paused);
        true
    }

    /// Returns `false` when the cat was already active or has been destroyed.
    pub fn resume(&mut self, parts: LifecycleParts<'_>) -> bool {
        if self.state != LifecycleState::Inactive {
            return false;
        }
        parts.pool.resume();
        if !parts.brain.start() {
            parts.pool.pause();
            return false;
        }
        self.state = LifecycleState::Active;
        parts.events.emit(parts.tick, CatEventKind::Resumed);
        true
    }

    /// Safe to call from any state, any number of times.
    pub fn destroy(&mut self, parts: LifecycleParts<'_>) -> bool {
        if self.state == LifecycleState::Destroyed {
            return false;
        }
        parts.brain.release();
        parts.pool.destroy();
        self.state = LifecycleState::Destroyed;
        parts.events.emit(parts.tick, CatEventKind::Destroyed);
        parts.events.clear_listeners();
        true
    }
}
