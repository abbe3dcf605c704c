use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::model::config::AppConfig;
use crate::model::CatSettings;
use crate::model::environment::{Environment, EnvironmentSource};
use crate::model::metrics::Metrics;
use crate::model::registry::CatRegistry;
use crate::model::render::RenderTarget;
use whiskers_data::{Boundaries, InteractionTarget, Position, TargetKind, TargetMotion};

/// Radius of the pointer's demo path as a share of the smaller viewport side.
const POINTER_ORBIT: f32 = 0.3;
/// Full pointer orbits per minute.
const POINTER_RPM: f32 = 6.0;

/// Reads `path` if it exists, falling back to defaults when it is missing.
/// A file that exists but does not parse or validate is an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
}

pub struct Simulation<R: RenderTarget> {
    config: AppConfig,
    registry: CatRegistry,
    environment: Environment,
    render: R,
    metrics: Metrics,
    rng: ChaCha8Rng,
    pointer: Option<Uuid>,
    elapsed_ms: f64,
}

impl<R: RenderTarget> Simulation<R> {
    /// Validates the config and spawns `world.initial_cats` cats.
    pub fn new(config: AppConfig, render: R) -> Result<Self> {
        config.validate()?;
        let boundaries = Boundaries::from_size(config.world.width, config.world.height);
        let environment = Environment::new(boundaries)?;
        let seed = match config.world.seed {
            Some(seed) => seed,
            None if config.world.deterministic => 0,
            None => rand::random(),
        };

        tracing::info!(
            seed,
            fingerprint = %config.fingerprint(),
            cats = config.world.initial_cats,
            "Starting simulation"
        );

        let mut sim = Self {
            registry: CatRegistry::new(boundaries, config.clone()),
            config,
            environment,
            render,
            metrics: Metrics::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            pointer: None,
            elapsed_ms: 0.0,
        };

        for i in 0..sim.config.world.initial_cats {
            sim.spawn_cat(&format!("{seed}-{i}"))?;
        }
        Ok(sim)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &CatRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CatRegistry {
        &mut self.registry
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn spawn_cat(&mut self, seed: &str) -> Result<Uuid> {
        let id = self.registry.create_from_seed(seed, &mut self.render)?;
        self.metrics.increment_counter("cats_created");
        Ok(id)
    }

    /// Adds a cat built from `settings`, tuned by this simulation's config.
    pub fn add_cat(&mut self, settings: CatSettings) -> Result<Uuid> {
        let id = self
            .registry
            .create(settings.with_config(&self.config), &mut self.render)?;
        self.metrics.increment_counter("cats_created");
        Ok(id)
    }

    pub fn destroy_cat(&mut self, id: Uuid) -> bool {
        self.registry.destroy(id, &mut self.render)
    }

    /// Scatters food, water and toys at random, plus one moving pointer.
    pub fn scatter_targets(&mut self, count: usize) {
        let bounds = self.environment.boundaries();
        for i in 0..count {
            let kind = match i % 4 {
                0 => TargetKind::FoodBasic,
                1 => TargetKind::Water,
                2 => TargetKind::Yarn,
                _ => TargetKind::FoodFancy,
            };
            let position = Position::new(
                self.rng.gen_range(bounds.min_x..=bounds.max_x),
                self.rng.gen_range(bounds.min_y..=bounds.max_y),
            );
            self.environment
                .add_target(InteractionTarget::new(kind, position));
        }
        if self.pointer.is_none() {
            let pointer = InteractionTarget::new(TargetKind::Pointer, bounds.center())
                .with_motion(TargetMotion::Dragging);
            self.pointer = Some(self.environment.add_target(pointer));
        }
    }

    /// Viewport resize; cats pick it up on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.environment
            .resize(Boundaries::from_size(width, height))?;
        Ok(())
    }

    pub fn set_visible(&mut self, visible: bool) -> usize {
        self.registry.set_visibility(visible)
    }

    /// One frame. Returns how many cats ticked.
    pub fn tick(&mut self) -> usize {
        let start = Instant::now();
        let dt_ms = self.config.frame_ms();
        self.elapsed_ms += dt_ms as f64;
        self.move_pointer();

        let ticked = self
            .registry
            .tick_all(&mut self.environment, &mut self.render, dt_ms);

        // Kinds are read before any removal so two cats sharing a bowl both
        // count as meals.
        let finished: Vec<(Uuid, bool)> = self
            .registry
            .completed_targets()
            .iter()
            .filter_map(|&id| {
                let target = self.environment.target(id)?;
                Some((id, target.kind.is_consumable()))
            })
            .collect();
        for (id, consumable) in finished {
            if consumable {
                self.environment.remove_target(id);
                self.metrics.increment_counter("meals");
            } else {
                self.metrics.increment_counter("play_sessions");
            }
        }

        for event in self.registry.drain_events() {
            tracing::debug!(cat = %event.cat_id, event = event.kind.name(), tick = event.tick, "Cat event");
            self.metrics.increment_counter(event.kind.name());
        }

        self.metrics
            .record_tick(start.elapsed(), ticked, self.registry.len());
        ticked
    }

    fn move_pointer(&mut self) {
        let Some(id) = self.pointer else {
            return;
        };
        let bounds = self.environment.boundaries();
        let radius = bounds.width().min(bounds.height()) * POINTER_ORBIT;
        let angle = (self.elapsed_ms / 60_000.0 * POINTER_RPM as f64 * std::f64::consts::TAU) as f32;
        let center = bounds.center();
        let position = Position::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        );
        if !self.environment.move_target(id, position) {
            self.pointer = None;
        }
    }

    /// Destroys every cat. Returns how many were removed.
    pub fn shutdown(&mut self) -> usize {
        let removed = self.registry.clear(&mut self.render);
        for event in self.registry.drain_events() {
            self.metrics.increment_counter(event.kind.name());
        }
        tracing::info!(
            removed,
            ticks = self.metrics.tick_count(),
            meals = self.metrics.counter("meals"),
            "Simulation stopped"
        );
        removed
    }
}
