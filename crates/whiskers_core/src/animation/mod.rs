//! Visual state machine with validated, timed transitions.
//!
//! Requests that the transition table does not allow are redirected to idle,
//! which is reachable from every state. Callers re-request the original state
//! once idle has been reached.

pub mod easing;
pub mod transitions;

pub use easing::Easing;
pub use transitions::{
    allowed_targets, duration_for_key, is_valid_transition, transition_duration, transition_key,
    DEFAULT_TRANSITION_MS, TRANSITION_DURATIONS,
};

use serde::{Deserialize, Serialize};
use whiskers_data::CatStateType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: CatStateType,
    pub to: CatStateType,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Transition {
    fn between(from: CatStateType, to: CatStateType) -> Self {
        Self {
            from,
            to,
            duration_ms: transition_duration(from, to),
            easing: Easing::for_transition(from, to),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionOutcome {
    /// Already in the requested state.
    Unchanged(CatStateType),
    Applied(Transition),
    /// The requested state was unreachable; the machine went to idle instead.
    Redirected {
        requested: CatStateType,
        transition: Transition,
    },
}

impl TransitionOutcome {
    /// The transition that actually started, if any.
    pub fn transition(&self) -> Option<&Transition> {
        match self {
            TransitionOutcome::Unchanged(_) => None,
            TransitionOutcome::Applied(t) => Some(t),
            TransitionOutcome::Redirected { transition, .. } => Some(transition),
        }
    }

    pub fn resulting_state(&self) -> CatStateType {
        match self {
            TransitionOutcome::Unchanged(state) => *state,
            TransitionOutcome::Applied(t) => t.to,
            TransitionOutcome::Redirected { transition, .. } => transition.to,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    transition: Transition,
    elapsed_ms: f32,
}

#[derive(Debug, Clone)]
pub struct AnimationStateMachine {
    current: CatStateType,
    active: Option<ActiveTransition>,
    redirects: u64,
}

impl Default for AnimationStateMachine {
    fn default() -> Self {
        Self::new(CatStateType::Idle)
    }
}

impl AnimationStateMachine {
    pub fn new(initial: CatStateType) -> Self {
        Self {
            current: initial,
            active: None,
            redirects: 0,
        }
    }

    pub fn current(&self) -> CatStateType {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_transition(&self) -> Option<&Transition> {
        self.active.as_ref().map(|a| &a.transition)
    }

    /// Number of requests that were redirected to idle.
    pub fn redirects(&self) -> u64 {
        self.redirects
    }

    pub fn request(&mut self, to: CatStateType) -> TransitionOutcome {
        let from = self.current;
        if from == to {
            return TransitionOutcome::Unchanged(from);
        }

        if is_valid_transition(from, to) {
            let transition = self.begin(to);
            tracing::debug!(%from, %to, duration_ms = transition.duration_ms, "Visual transition");
            TransitionOutcome::Applied(transition)
        } else {
            self.redirects += 1;
            let transition = self.begin(CatStateType::Idle);
            tracing::debug!(%from, requested = %to, "Unreachable visual state, redirecting to idle");
            TransitionOutcome::Redirected {
                requested: to,
                transition,
            }
        }
    }

    fn begin(&mut self, to: CatStateType) -> Transition {
        let transition = Transition::between(self.current, to);
        self.current = to;
        self.active = Some(ActiveTransition {
            transition,
            elapsed_ms: 0.0,
        });
        transition
    }

    /// Advances the running transition. Returns true when it completes during
    /// this call.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.elapsed_ms += dt_ms.max(0.0);
        if active.elapsed_ms >= active.transition.duration_ms as f32 {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Eased progress of the running transition; 1.0 when settled.
    pub fn progress(&self) -> f32 {
        match &self.active {
            Some(active) => {
                let duration = active.transition.duration_ms.max(1) as f32;
                active.transition.easing.apply(active.elapsed_ms / duration)
            }
            None => 1.0,
        }
    }

    /// Drops any in-flight transition and jumps straight to `state`.
    pub fn reset(&mut self, state: CatStateType) {
        self.current = state;
        self.active = None;
    }
}
