//! Pre-built animation resources, one set per visual state.
//!
//! Every tween a cat will ever use is created when the pool is built. Switching
//! visual state pauses the old set and restarts the new one, so the number of
//! allocations over a cat's lifetime is fixed at
//! `CatStateType::COUNT * tweens-per-state` no matter how often it changes state.

use crate::animation::Easing;
use serde::{Deserialize, Serialize};
use whiskers_data::CatStateType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweenProperty {
    OffsetY,
    Scale,
    Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub name: &'static str,
    pub property: TweenProperty,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f32,
    /// Play back and forth instead of snapping to the start.
    pub yoyo: bool,
    pub repeat: bool,
    pub easing: Easing,
}

const fn spec(
    name: &'static str,
    property: TweenProperty,
    from: f32,
    to: f32,
    duration_ms: f32,
    repeat: bool,
    easing: Easing,
) -> TweenSpec {
    TweenSpec {
        name,
        property,
        from,
        to,
        duration_ms,
        yoyo: repeat,
        repeat,
        easing,
    }
}

use TweenProperty::{OffsetY, Rotation, Scale};

/// Primary tween first, then secondaries.
pub fn tween_specs(state: CatStateType) -> &'static [TweenSpec] {
    const IDLE: [TweenSpec; 2] = [
        spec("breathe", Scale, 1.0, 1.03, 1800.0, true, Easing::QuadOut),
        spec("tail", Rotation, -4.0, 4.0, 1200.0, true, Easing::CubicInOut),
    ];
    const WALKING: [TweenSpec; 2] = [
        spec("bob", OffsetY, 0.0, -3.0, 300.0, true, Easing::CubicInOut),
        spec("tail", Rotation, -8.0, 8.0, 600.0, true, Easing::CubicInOut),
    ];
    const RUNNING: [TweenSpec; 2] = [
        spec("bound", OffsetY, 0.0, -6.0, 180.0, true, Easing::QuadOut),
        spec("stretch", Scale, 1.0, 1.06, 180.0, true, Easing::CubicInOut),
    ];
    const SITTING: [TweenSpec; 2] = [
        spec("settle", OffsetY, 0.0, 2.0, 500.0, false, Easing::QuadOut),
        spec("tail", Rotation, -10.0, 10.0, 1500.0, true, Easing::CubicInOut),
    ];
    const SLEEPING: [TweenSpec; 2] = [
        spec("breathe", Scale, 1.0, 1.05, 2600.0, true, Easing::QuadOut),
        spec("curl", Rotation, 0.0, -6.0, 2000.0, false, Easing::QuadOut),
    ];
    const PLAYING: [TweenSpec; 2] = [
        spec("bounce", OffsetY, 0.0, -12.0, 400.0, true, Easing::ElasticOut),
        spec("pounce", Rotation, -15.0, 15.0, 800.0, true, Easing::CubicInOut),
    ];
    match state {
        CatStateType::Idle => &IDLE,
        CatStateType::Walking => &WALKING,
        CatStateType::Running => &RUNNING,
        CatStateType::Sitting => &SITTING,
        CatStateType::Sleeping => &SLEEPING,
        CatStateType::Playing => &PLAYING,
    }
}

/// A reusable timed effect. Created paused.
#[derive(Debug, Clone)]
pub struct Tween {
    spec: TweenSpec,
    elapsed_ms: f32,
    paused: bool,
}

impl Tween {
    fn new(spec: TweenSpec) -> Self {
        Self {
            spec,
            elapsed_ms: 0.0,
            paused: true,
        }
    }

    pub fn spec(&self) -> &TweenSpec {
        &self.spec
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        !self.spec.repeat && self.elapsed_ms >= self.spec.duration_ms
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
    }

    pub fn advance(&mut self, dt_ms: f32) {
        if self.paused || dt_ms <= 0.0 {
            return;
        }
        let duration = self.spec.duration_ms.max(1.0);
        self.elapsed_ms += dt_ms;
        if self.spec.repeat {
            // Keep elapsed bounded; one full yoyo cycle spans two durations.
            let cycle = if self.spec.yoyo { duration * 2.0 } else { duration };
            self.elapsed_ms %= cycle;
        } else {
            self.elapsed_ms = self.elapsed_ms.min(duration);
        }
    }

    pub fn value(&self) -> f32 {
        let duration = self.spec.duration_ms.max(1.0);
        let mut t = self.elapsed_ms / duration;
        if self.spec.repeat && self.spec.yoyo && t > 1.0 {
            t = 2.0 - t;
        }
        let eased = self.spec.easing.apply(t.min(1.0));
        self.spec.from + (self.spec.to - self.spec.from) * eased
    }
}

/// Sampled pose pushed to the render target each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub offset_y: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Default for AnimationFrame {
    fn default() -> Self {
        Self {
            offset_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct StateResources {
    tweens: Vec<Tween>,
}

impl StateResources {
    fn build(state: CatStateType, allocations: &mut usize) -> Self {
        let specs = tween_specs(state);
        let mut tweens = Vec::with_capacity(specs.len());
        for spec in specs {
            tweens.push(Tween::new(*spec));
            *allocations += 1;
        }
        Self { tweens }
    }

    fn pause(&mut self) {
        self.tweens.iter_mut().for_each(Tween::pause);
    }

    fn resume(&mut self) {
        self.tweens.iter_mut().for_each(Tween::resume);
    }

    fn restart(&mut self) {
        self.tweens.iter_mut().for_each(Tween::restart);
    }
}

#[derive(Debug, Clone)]
pub struct AnimationPool {
    slots: [StateResources; CatStateType::COUNT],
    active: Option<CatStateType>,
    suspended: bool,
    destroyed: bool,
    allocations: usize,
    released: usize,
    activations: u64,
}

impl Default for AnimationPool {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPool {
    /// Builds every state's resources up front, all paused.
    pub fn new() -> Self {
        let mut allocations = 0;
        let slots = CatStateType::ALL.map(|state| StateResources::build(state, &mut allocations));
        Self {
            slots,
            active: None,
            suspended: true,
            destroyed: false,
            allocations,
            released: 0,
            activations: 0,
        }
    }

    /// Upper bound on allocations for the pool's whole lifetime.
    pub fn capacity() -> usize {
        CatStateType::ALL
            .iter()
            .map(|s| tween_specs(*s).len())
            .sum()
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn released(&self) -> usize {
        self.released
    }

    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn active(&self) -> Option<CatStateType> {
        self.active
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn tweens(&self, state: CatStateType) -> &[Tween] {
        &self.slots[state.index()].tweens
    }

    /// Pauses the previous state's tweens and restarts the target's. The target
    /// keeps running only if the pool is not suspended.
    pub fn activate(&mut self, state: CatStateType) -> bool {
        if self.destroyed {
            return false;
        }
        if let Some(previous) = self.active {
            self.slots[previous.index()].pause();
        }
        let slot = &mut self.slots[state.index()];
        slot.restart();
        if self.suspended {
            slot.pause();
        } else {
            slot.resume();
        }
        self.active = Some(state);
        self.activations += 1;
        true
    }

    /// Suspends only the active state's tweens.
    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.suspended = true;
        if let Some(state) = self.active {
            self.slots[state.index()].pause();
        }
    }

    pub fn resume(&mut self) {
        if self.destroyed {
            return;
        }
        self.suspended = false;
        if let Some(state) = self.active {
            self.slots[state.index()].resume();
        }
    }

    /// Advances the active tweens and samples the combined pose.
    pub fn advance(&mut self, dt_ms: f32) -> AnimationFrame {
        let mut frame = AnimationFrame::default();
        let Some(state) = self.active else {
            return frame;
        };
        for tween in &mut self.slots[state.index()].tweens {
            tween.advance(dt_ms);
            let value = tween.value();
            match tween.spec.property {
                TweenProperty::OffsetY => frame.offset_y += value,
                TweenProperty::Scale => frame.scale *= value,
                TweenProperty::Rotation => frame.rotation += value,
            }
        }
        frame
    }

    /// Releases every state's resources, not just the active one.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        for slot in &mut self.slots {
            self.released += slot.tweens.len();
            slot.tweens = Vec::new();
        }
        self.active = None;
        self.suspended = true;
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_builds_every_state_paused() {
        let pool = AnimationPool::new();
        assert_eq!(pool.allocations(), AnimationPool::capacity());
        for state in CatStateType::ALL {
            assert!(!pool.tweens(state).is_empty());
            assert!(pool.tweens(state).iter().all(Tween::is_paused));
        }
    }

    #[test]
    fn test_activate_pauses_previous_and_resumes_target() {
        let mut pool = AnimationPool::new();
        pool.resume();
        pool.activate(CatStateType::Walking);
        pool.activate(CatStateType::Running);
        assert!(pool.tweens(CatStateType::Walking).iter().all(Tween::is_paused));
        assert!(pool
            .tweens(CatStateType::Running)
            .iter()
            .all(|t| !t.is_paused()));
    }

    #[test]
    fn test_activation_while_suspended_stays_paused() {
        let mut pool = AnimationPool::new();
        pool.activate(CatStateType::Idle);
        assert!(pool.tweens(CatStateType::Idle).iter().all(Tween::is_paused));
        pool.resume();
        assert!(pool.tweens(CatStateType::Idle).iter().all(|t| !t.is_paused()));
    }

    #[test]
    fn test_repeated_activation_never_allocates() {
        let mut pool = AnimationPool::new();
        let before = pool.allocations();
        for i in 0..500 {
            pool.activate(CatStateType::ALL[i % CatStateType::COUNT]);
            pool.advance(16.0);
        }
        assert_eq!(pool.allocations(), before);
        assert_eq!(pool.activations(), 500);
    }

    #[test]
    fn test_destroy_releases_all_states() {
        let mut pool = AnimationPool::new();
        pool.activate(CatStateType::Sitting);
        pool.destroy();
        assert_eq!(pool.released(), pool.allocations());
        assert!(pool.active().is_none());
        assert!(!pool.activate(CatStateType::Idle));
        pool.destroy();
        assert_eq!(pool.released(), pool.allocations());
    }

    #[test]
    fn test_yoyo_tween_returns_to_start() {
        let mut tween = Tween::new(tween_specs(CatStateType::Walking)[0]);
        tween.resume();
        tween.advance(300.0);
        assert!((tween.value() + 3.0).abs() < 1e-4);
        tween.advance(300.0);
        assert!(tween.value().abs() < 1e-4);
    }

    #[test]
    fn test_paused_tween_does_not_advance() {
        let mut tween = Tween::new(tween_specs(CatStateType::Idle)[0]);
        tween.advance(900.0);
        assert_eq!(tween.value(), 1.0);
    }
}
