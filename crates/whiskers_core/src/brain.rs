//! Per-cat decision loop.
//!
//! Each tick the brain updates its motivation, resolves its current activity
//! against the environment, scores nearby targets and settles on a behavior
//! plus a movement intent. It never looks at other cats.

use crate::config::BrainConfig;
use crate::detector::{Detection, DetectionEvent};
use crate::interest::try_evaluate_interest;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use whiskers_data::{
    Behavior, Boundaries, BrainState, InteractionTarget, Personality, Position, TargetKind,
};

/// How long a finished target is ignored, in milliseconds.
pub const COMPLETION_COOLDOWN_MS: f32 = 8000.0;

/// Rest added when a play session ends.
const PLAY_FATIGUE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum MovementIntent {
    Hold,
    Walk { toward: Position },
    Run { toward: Position },
}

impl MovementIntent {
    pub fn goal(&self) -> Option<Position> {
        match self {
            MovementIntent::Hold => None,
            MovementIntent::Walk { toward } | MovementIntent::Run { toward } => Some(*toward),
        }
    }
}

/// Everything the brain may sense during one tick.
pub struct BrainContext<'a> {
    pub personality: &'a Personality,
    pub position: Position,
    pub boundaries: &'a Boundaries,
    pub targets: &'a [InteractionTarget],
    pub detection: Detection<'a>,
    pub dt_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainDecision {
    pub previous: Behavior,
    pub previous_target: Option<Uuid>,
    pub behavior: Behavior,
    pub target: Option<Uuid>,
    pub movement: MovementIntent,
    /// Target finished this tick: eaten, drunk or played out.
    pub completed: Option<Uuid>,
    /// Targets skipped because they were malformed or could not be evaluated.
    pub skipped_targets: usize,
}

impl BrainDecision {
    /// True when the behavior or the target it is aimed at changed.
    pub fn behavior_changed(&self) -> bool {
        self.previous != self.behavior || self.previous_target != self.target
    }
}

#[derive(Debug, Clone)]
pub struct Brain {
    state: BrainState,
    target: Option<Uuid>,
    wander_goal: Option<Position>,
    behavior_elapsed_ms: f32,
    cooldown: Option<(Uuid, f32)>,
    ticking: bool,
    released: bool,
    config: BrainConfig,
    rng: ChaCha8Rng,
    ticks: u64,
}

impl Brain {
    pub fn new(config: BrainConfig, seed: u64) -> Self {
        Self {
            state: BrainState::default(),
            target: None,
            wander_goal: None,
            behavior_elapsed_ms: 0.0,
            cooldown: None,
            ticking: false,
            released: false,
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ticks: 0,
        }
    }

    pub fn state(&self) -> &BrainState {
        &self.state
    }

    pub fn behavior(&self) -> Behavior {
        self.state.behavior
    }

    pub fn target(&self) -> Option<Uuid> {
        self.target
    }

    pub fn wander_goal(&self) -> Option<Position> {
        self.wander_goal
    }

    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BrainConfig) {
        self.config = config;
    }

    /// Ticks actually processed; ticks while stopped are not counted.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Starts ticking. A released brain cannot be restarted.
    pub fn start(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.ticking = true;
        true
    }

    pub fn stop(&mut self) {
        self.ticking = false;
    }

    /// Stops the brain for good and drops everything it was holding on to.
    pub fn release(&mut self) {
        self.stop();
        self.target = None;
        self.wander_goal = None;
        self.cooldown = None;
        self.released = true;
    }

    /// Overrides the motivation vector, clamped to [0, 1].
    pub fn set_motivation(&mut self, rest: f32, boredom: f32) {
        self.state.motivation.rest = rest;
        self.state.motivation.boredom = boredom;
        self.state.motivation.clamp();
    }

    pub fn tick(&mut self, ctx: &BrainContext<'_>) -> Option<BrainDecision> {
        if !self.ticking {
            return None;
        }
        self.ticks += 1;

        let dt_ms = ctx.dt_ms.max(0.0);
        let dt_s = dt_ms / 1000.0;
        let previous = self.state.behavior;
        let previous_target = self.target;
        self.behavior_elapsed_ms += dt_ms;
        self.tick_cooldown(dt_ms);
        self.update_motivation(ctx.personality, dt_s);
        self.track_target(ctx);

        let completed = self.resolve_activity(ctx);

        let mut skipped_targets = ctx.detection.rejected;
        if !self.state.behavior.is_engaged() {
            let (best, skipped) = self.select_target(ctx);
            skipped_targets += skipped;
            if let Some(id) = best {
                self.target = Some(id);
                self.enter(Behavior::Approaching);
            }
        }

        let rest = self.state.motivation.rest;
        match self.state.behavior {
            Behavior::Idle => {
                if rest >= self.config.rest_threshold {
                    self.enter(Behavior::Resting);
                } else if self.behavior_elapsed_ms >= self.config.idle_min_ms as f32
                    && self.wants_to_wander(ctx.personality, dt_s)
                {
                    let goal = self.pick_wander_goal(ctx);
                    self.enter(Behavior::Wandering);
                    self.wander_goal = Some(goal);
                }
            }
            Behavior::Wandering if rest >= self.config.rest_threshold => {
                self.enter(Behavior::Resting);
            }
            _ => {}
        }

        let movement = self.movement_intent(ctx);
        if previous != self.state.behavior || previous_target != self.target {
            tracing::debug!(
                from = %previous,
                to = %self.state.behavior,
                target = ?self.target,
                "Behavior change"
            );
        }

        Some(BrainDecision {
            previous,
            previous_target,
            behavior: self.state.behavior,
            target: self.target,
            movement,
            completed,
            skipped_targets,
        })
    }

    /// Applies what the detector saw happen to the current target. Losing
    /// sight of it ends the engagement; a bowl pushed out of reach mid-meal
    /// has to be approached again.
    fn track_target(&mut self, ctx: &BrainContext<'_>) {
        let Some(current) = self.target else {
            return;
        };
        for event in ctx.detection.events {
            match event {
                DetectionEvent::Disappeared { id } if *id == current => {
                    tracing::debug!(target_id = %current, "Lost sight of target");
                    self.enter(Behavior::Idle);
                    return;
                }
                DetectionEvent::Moved { id, to, .. }
                    if *id == current
                        && self.state.behavior == Behavior::Consuming
                        && ctx.position.distance_to(to) > self.config.reach_distance =>
                {
                    tracing::debug!(target_id = %current, "Target moved out of reach");
                    self.enter(Behavior::Approaching);
                }
                _ => {}
            }
        }
    }

    /// Carries the current activity forward; returns a target finished this tick.
    fn resolve_activity(&mut self, ctx: &BrainContext<'_>) -> Option<Uuid> {
        let current = self.target.and_then(|id| find_target(ctx.targets, id));
        let reach = self.config.reach_distance;
        let elapsed = self.behavior_elapsed_ms;

        match self.state.behavior {
            Behavior::Approaching => match current {
                None => self.enter(Behavior::Idle),
                Some(t) if ctx.position.distance_to(&t.position) <= reach => {
                    if t.kind.is_consumable() {
                        self.enter(Behavior::Consuming);
                    } else {
                        self.enter(Behavior::Playing);
                    }
                }
                Some(_) => {}
            },
            Behavior::Consuming => match current {
                None => self.enter(Behavior::Idle),
                Some(t) if elapsed >= self.config.consume_ms as f32 => {
                    let id = t.id;
                    self.finish(id);
                    return Some(id);
                }
                Some(_) => {}
            },
            Behavior::Playing => match current {
                None => self.enter(Behavior::Idle),
                Some(t) if elapsed >= self.config.play_ms as f32 => {
                    let id = t.id;
                    self.finish(id);
                    self.state.motivation.rest += PLAY_FATIGUE;
                    self.state.motivation.clamp();
                    return Some(id);
                }
                Some(t) if ctx.position.distance_to(&t.position) > reach * 3.0 => {
                    // The toy got away; chase it.
                    self.enter(Behavior::Approaching);
                }
                Some(_) => {}
            },
            Behavior::Resting => {
                if self.state.motivation.rest <= self.config.wake_threshold {
                    self.enter(Behavior::Idle);
                }
            }
            Behavior::Wandering => match self.wander_goal {
                Some(goal) if ctx.position.distance_to(&goal) > reach => {}
                _ => self.enter(Behavior::Idle),
            },
            Behavior::Idle => {}
        }
        None
    }

    /// Highest-scoring nearby target at or above the interest threshold.
    /// Targets that fail evaluation are skipped without aborting the scan.
    fn select_target(&self, ctx: &BrainContext<'_>) -> (Option<Uuid>, usize) {
        let mut best: Option<(Uuid, f32)> = None;
        let mut skipped = 0;

        for &idx in ctx.detection.nearby {
            let Some(target) = ctx.targets.get(idx) else {
                skipped += 1;
                tracing::warn!(index = idx, "Detector returned an index outside the target list");
                continue;
            };
            if self.cooldown.is_some_and(|(id, _)| id == target.id) {
                continue;
            }
            match try_evaluate_interest(ctx.personality, &self.state, target, &ctx.position) {
                Ok(score) => {
                    if score >= self.config.min_interest
                        && best.map_or(true, |(_, top)| score > top)
                    {
                        best = Some((target.id, score));
                    }
                }
                Err(err) => {
                    skipped += 1;
                    tracing::warn!(%err, "Skipping target");
                }
            }
        }

        (best.map(|(id, _)| id), skipped)
    }

    fn enter(&mut self, behavior: Behavior) {
        if behavior != self.state.behavior {
            self.state.behavior = behavior;
            self.behavior_elapsed_ms = 0.0;
        }
        if !behavior.is_engaged() {
            self.target = None;
        } else {
            self.state.motivation.boredom = 0.0;
        }
        if behavior != Behavior::Wandering {
            self.wander_goal = None;
        }
    }

    fn finish(&mut self, target: Uuid) {
        self.cooldown = Some((target, COMPLETION_COOLDOWN_MS));
        self.enter(Behavior::Idle);
    }

    fn tick_cooldown(&mut self, dt_ms: f32) {
        if let Some((_, remaining)) = self.cooldown.as_mut() {
            *remaining -= dt_ms;
            if *remaining <= 0.0 {
                self.cooldown = None;
            }
        }
    }

    fn update_motivation(&mut self, personality: &Personality, dt_s: f32) {
        let cfg = &self.config;
        let bias = 0.5 + personality.rest_bias;
        let m = &mut self.state.motivation;

        match self.state.behavior {
            Behavior::Resting => m.rest -= cfg.rest_recovery_per_sec * dt_s,
            Behavior::Idle | Behavior::Consuming => m.rest += cfg.rest_gain_per_sec * 0.25 * bias * dt_s,
            Behavior::Wandering | Behavior::Approaching => m.rest += cfg.rest_gain_per_sec * bias * dt_s,
            Behavior::Playing => m.rest += cfg.rest_gain_per_sec * 2.0 * bias * dt_s,
        }

        match self.state.behavior {
            Behavior::Idle => {
                m.boredom += cfg.boredom_gain_per_sec * (0.5 + personality.curiosity) * dt_s;
            }
            Behavior::Wandering | Behavior::Resting => {
                m.boredom -= cfg.boredom_gain_per_sec * 0.5 * dt_s;
            }
            Behavior::Approaching | Behavior::Consuming | Behavior::Playing => m.boredom = 0.0,
        }

        m.clamp();
    }

    fn wants_to_wander(&mut self, personality: &Personality, dt_s: f32) -> bool {
        let boredom = self.state.motivation.boredom;
        if boredom >= 1.0 {
            return true;
        }
        let chance_per_sec = boredom * (0.25 + personality.energy * 0.75);
        self.rng.gen::<f32>() < chance_per_sec * dt_s
    }

    fn pick_wander_goal(&mut self, ctx: &BrainContext<'_>) -> Position {
        let radius = self.config.wander_radius.max(0.0)
            * (0.5 + ctx.personality.independence * 0.5);
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = self.rng.gen_range((radius * 0.25)..=radius);
        ctx.boundaries.clamp(Position::new(
            ctx.position.x + angle.cos() * distance,
            ctx.position.y + angle.sin() * distance,
        ))
    }

    fn movement_intent(&self, ctx: &BrainContext<'_>) -> MovementIntent {
        let current = self.target.and_then(|id| find_target(ctx.targets, id));
        match (self.state.behavior, current) {
            (Behavior::Approaching, Some(t)) => {
                let distance = ctx.position.distance_to(&t.position);
                if distance > self.config.run_distance
                    || t.is_moving()
                    || t.kind == TargetKind::Pointer
                {
                    MovementIntent::Run {
                        toward: t.position,
                    }
                } else {
                    MovementIntent::Walk {
                        toward: t.position,
                    }
                }
            }
            (Behavior::Playing, Some(t))
                if t.is_moving()
                    && ctx.position.distance_to(&t.position) > self.config.reach_distance =>
            {
                MovementIntent::Run {
                    toward: t.position,
                }
            }
            (Behavior::Wandering, _) => self
                .wander_goal
                .map_or(MovementIntent::Hold, |toward| MovementIntent::Walk { toward }),
            _ => MovementIntent::Hold,
        }
    }
}

fn find_target(targets: &[InteractionTarget], id: Uuid) -> Option<&InteractionTarget> {
    targets
        .iter()
        .find(|t| t.id == id && t.position.is_finite())
}
