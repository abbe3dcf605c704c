//! A single autonomous cat.
//!
//! The cat owns its personality, brain, visual state machine, animation pool
//! and event stream. One call to [`Cat::tick`] runs sensing, scoring, the
//! behavior decision and visual sync, in that order.

use crate::animation::{AnimationStateMachine, TransitionOutcome};
use crate::brain::{Brain, BrainContext, BrainDecision, MovementIntent};
use crate::config::{AppConfig, BrainConfig, DetectionConfig, MovementConfig};
use crate::detector::InteractionDetector;
use crate::error::Result;
use crate::events::{CatEvent, CatEventKind, EventAggregator, EventSink, SubscriptionId};
use crate::lifecycle::{Lifecycle, LifecycleParts, LifecycleState};
use crate::personality::{validate_position, BoundariesLogic, PersonalityLogic};
use crate::pool::{AnimationFrame, AnimationPool};
use crate::render::{CatUpdate, VisualRequest};
use crate::seed::hash_seed;
use uuid::Uuid;
use whiskers_data::{
    Appearance, Behavior, Boundaries, BrainState, CatDefinition, CatSnapshot, CatStateType,
    Dimensions, InteractionTarget, Personality, Position,
};

/// Everything needed to build a cat, gathered before construction.
#[derive(Debug, Clone)]
pub struct CatSettings {
    /// Fresh id when `None`.
    pub id: Option<Uuid>,
    pub name: String,
    pub personality: Personality,
    pub appearance: Appearance,
    pub dimensions: Dimensions,
    /// Spawn point; the centre of the bounds when `None`.
    pub position: Option<Position>,
    pub initial_state: CatStateType,
    /// Bounds supplied by the owner when `None`.
    pub boundaries: Option<Boundaries>,
    pub brain: BrainConfig,
    pub movement: MovementConfig,
    pub detection: DetectionConfig,
    /// Text seed the definition came from, if any.
    pub seed: Option<String>,
    /// Seed for the decision RNG. Derived from `seed` or drawn at random when absent.
    pub rng_seed: Option<u64>,
}

impl Default for CatSettings {
    fn default() -> Self {
        Self {
            id: None,
            name: "Cat".to_string(),
            personality: Personality::default(),
            appearance: Appearance::default(),
            dimensions: Dimensions::default(),
            position: None,
            initial_state: CatStateType::Idle,
            boundaries: None,
            brain: BrainConfig::default(),
            movement: MovementConfig::default(),
            detection: DetectionConfig::default(),
            seed: None,
            rng_seed: None,
        }
    }
}

impl CatSettings {
    pub fn from_definition(definition: CatDefinition) -> Self {
        Self {
            id: Some(definition.id),
            name: definition.name,
            personality: definition.personality,
            appearance: definition.appearance,
            dimensions: definition.dimensions,
            seed: definition.seed,
            ..Self::default()
        }
    }

    /// Applies the tuning sections of an application config.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.brain = config.brain.clone();
        self.movement = config.movement;
        self.detection = config.detection.clone();
        self
    }
}

/// Maps a brain decision to the visual state that should be playing.
pub fn visual_for(behavior: Behavior, movement: &MovementIntent) -> CatStateType {
    match behavior {
        Behavior::Idle => CatStateType::Idle,
        Behavior::Wandering => CatStateType::Walking,
        Behavior::Approaching => match movement {
            MovementIntent::Run { .. } => CatStateType::Running,
            _ => CatStateType::Walking,
        },
        Behavior::Consuming => CatStateType::Sitting,
        Behavior::Playing => CatStateType::Playing,
        Behavior::Resting => CatStateType::Sleeping,
    }
}

#[derive(Debug)]
pub struct Cat {
    definition: CatDefinition,
    position: Position,
    boundaries: Boundaries,
    movement: MovementConfig,
    brain: Brain,
    detector: InteractionDetector,
    animation: AnimationStateMachine,
    pool: AnimationPool,
    events: EventAggregator,
    lifecycle: Lifecycle,
    tick: u64,
    dirty: bool,
    frame: AnimationFrame,
}

impl Cat {
    /// Validates the settings and builds an inactive cat. All animation
    /// resources are allocated here, paused.
    pub fn new(settings: CatSettings) -> Result<Self> {
        settings.personality.validate()?;
        settings.brain.validate()?;
        settings.movement.validate()?;
        let boundaries = settings.boundaries.unwrap_or_default();
        boundaries.validate()?;
        if let Some(position) = &settings.position {
            validate_position(position)?;
        }
        let position = boundaries.clamp(settings.position.unwrap_or_else(|| boundaries.center()));

        let rng_seed = settings
            .rng_seed
            .or_else(|| settings.seed.as_deref().map(hash_seed))
            .unwrap_or_else(rand::random);

        let definition = CatDefinition {
            id: settings.id.unwrap_or_else(Uuid::new_v4),
            name: settings.name,
            seed: settings.seed,
            personality: settings.personality,
            appearance: settings.appearance,
            dimensions: settings.dimensions,
        };

        let mut pool = AnimationPool::new();
        pool.activate(settings.initial_state);

        tracing::debug!(id = %definition.id, name = %definition.name, "Cat created");

        Ok(Self {
            events: EventAggregator::new(definition.id),
            definition,
            position,
            boundaries,
            movement: settings.movement,
            brain: Brain::new(settings.brain, rng_seed),
            detector: InteractionDetector::new(settings.detection),
            animation: AnimationStateMachine::new(settings.initial_state),
            pool,
            lifecycle: Lifecycle::new(),
            tick: 0,
            dirty: true,
            frame: AnimationFrame::default(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn definition(&self) -> &CatDefinition {
        &self.definition
    }

    pub fn personality(&self) -> &Personality {
        &self.definition.personality
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    pub fn brain_state(&self) -> &BrainState {
        self.brain.state()
    }

    pub fn behavior(&self) -> Behavior {
        self.brain.behavior()
    }

    /// Target the brain is currently engaged with.
    pub fn target(&self) -> Option<Uuid> {
        self.brain.target()
    }

    pub fn visual(&self) -> CatStateType {
        self.animation.current()
    }

    pub fn is_transitioning(&self) -> bool {
        self.animation.is_transitioning()
    }

    pub fn frame(&self) -> AnimationFrame {
        self.frame
    }

    pub fn pool(&self) -> &AnimationPool {
        &self.pool
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// Ticks that ran the brain.
    pub fn brain_ticks(&self) -> u64 {
        self.brain.ticks()
    }

    pub fn visual_request(&self) -> VisualRequest {
        VisualRequest {
            id: self.id(),
            name: self.definition.name.clone(),
            appearance: self.definition.appearance,
            dimensions: self.definition.dimensions,
            position: self.position,
            visual: self.visual(),
        }
    }

    /// Replaces the whole trait vector.
    pub fn set_personality(&mut self, personality: Personality) -> Result<()> {
        personality.validate()?;
        self.definition.personality = personality;
        self.dirty = true;
        Ok(())
    }

    /// New bounds after a viewport resize; the cat is pulled inside them.
    pub fn set_boundaries(&mut self, boundaries: Boundaries) -> Result<()> {
        boundaries.validate()?;
        self.boundaries = boundaries;
        self.position = boundaries.clamp(self.position);
        Ok(())
    }

    pub fn set_motivation(&mut self, rest: f32, boredom: f32) {
        self.brain.set_motivation(rest, boredom);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn snapshot(&self) -> CatSnapshot {
        CatSnapshot {
            definition: self.definition.clone(),
            behavior: self.behavior(),
            visual: self.visual(),
            position: self.position,
            dirty: self.dirty,
        }
    }

    pub fn subscribe(&mut self, sink: impl EventSink + 'static) -> SubscriptionId {
        self.events.subscribe(sink)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = CatEvent> + '_ {
        self.events.drain()
    }

    pub fn pause(&mut self) -> bool {
        let (lifecycle, parts) = self.lifecycle_parts();
        lifecycle.pause(parts)
    }

    pub fn resume(&mut self) -> bool {
        let (lifecycle, parts) = self.lifecycle_parts();
        lifecycle.resume(parts)
    }

    pub fn destroy(&mut self) -> bool {
        let (lifecycle, parts) = self.lifecycle_parts();
        let destroyed = lifecycle.destroy(parts);
        if destroyed {
            tracing::debug!(id = %self.definition.id, "Cat destroyed");
        }
        destroyed
    }

    fn lifecycle_parts(&mut self) -> (&mut Lifecycle, LifecycleParts<'_>) {
        (
            &mut self.lifecycle,
            LifecycleParts {
                brain: &mut self.brain,
                pool: &mut self.pool,
                events: &mut self.events,
                tick: self.tick,
            },
        )
    }

    /// Runs one frame. Returns `None` for paused or destroyed cats, which do
    /// no sensing or deciding at all.
    pub fn tick(&mut self, targets: &[InteractionTarget], dt_ms: f32) -> Option<CatUpdate> {
        if !self.lifecycle.is_active() {
            return None;
        }
        self.tick += 1;
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        let detection = self.detector.scan(&self.position, targets);
        let decision = self.brain.tick(&BrainContext {
            personality: &self.definition.personality,
            position: self.position,
            boundaries: &self.boundaries,
            targets,
            detection,
            dt_ms,
        })?;

        if decision.behavior_changed() {
            self.dirty = true;
            self.events.emit(
                self.tick,
                CatEventKind::BehaviorChanged {
                    from: decision.previous,
                    to: decision.behavior,
                    target: decision.target,
                },
            );
        }

        self.apply_movement(&decision.movement, dt_ms);
        self.sync_visual(&decision, dt_ms);
        self.frame = self.pool.advance(dt_ms);

        Some(CatUpdate {
            id: self.id(),
            position: self.position,
            visual: self.animation.current(),
            behavior: decision.behavior,
            transition_progress: self.animation.progress(),
            frame: self.frame,
            completed: decision.completed,
        })
    }

    fn apply_movement(&mut self, movement: &MovementIntent, dt_ms: f32) {
        let speed = match movement {
            MovementIntent::Hold => return,
            MovementIntent::Walk { .. } => self.movement.walk_speed,
            MovementIntent::Run { .. } => self.movement.run_speed,
        };
        if let Some(goal) = movement.goal() {
            let step = speed * dt_ms / 1000.0;
            self.position = self
                .boundaries
                .clamp(self.position.step_toward(&goal, step));
        }
    }

    /// Starts a transition toward the decided visual once any running
    /// transition has finished.
    fn sync_visual(&mut self, decision: &BrainDecision, dt_ms: f32) {
        self.animation.advance(dt_ms);
        if self.animation.is_transitioning() {
            return;
        }

        let desired = visual_for(decision.behavior, &decision.movement);
        let outcome = self.animation.request(desired);
        let (transition, requested) = match outcome {
            TransitionOutcome::Unchanged(_) => return,
            TransitionOutcome::Applied(t) => (t, None),
            TransitionOutcome::Redirected {
                requested,
                transition,
            } => (transition, Some(requested)),
        };

        self.pool.activate(transition.to);
        self.dirty = true;
        self.events.emit(
            self.tick,
            CatEventKind::StateChanged {
                from: transition.from,
                to: transition.to,
                duration_ms: transition.duration_ms,
                requested,
            },
        );
    }
}
