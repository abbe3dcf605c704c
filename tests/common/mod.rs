pub mod macros;

use whiskers_lib::app::Simulation;
use whiskers_lib::model::config::AppConfig;
use whiskers_lib::model::render::RecordingRenderTarget;
use whiskers_lib::model::CatSettings;
use whiskers_lib::model::data::{InteractionTarget, Personality, Position, TargetKind};
use uuid::Uuid;

#[allow(dead_code)]
pub struct SimulationBuilder {
    config: AppConfig,
    cats: Vec<CatSettings>,
    targets: Vec<InteractionTarget>,
}

#[allow(dead_code)]
impl SimulationBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_cats = 0;
        config.world.seed = Some(7);
        Self {
            config,
            cats: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_cat(mut self, settings: CatSettings) -> Self {
        self.cats.push(settings);
        self
    }

    /// A cat at `position` with a fixed decision seed.
    pub fn with_cat_at(self, x: f32, y: f32, personality: Personality) -> Self {
        let rng_seed = self.cats.len() as u64 + 1;
        self.with_cat(CatSettings {
            position: Some(Position::new(x, y)),
            personality,
            rng_seed: Some(rng_seed),
            ..CatSettings::default()
        })
    }

    pub fn with_target(mut self, kind: TargetKind, x: f32, y: f32) -> Self {
        self.targets
            .push(InteractionTarget::new(kind, Position::new(x, y)));
        self
    }

    pub fn build(self) -> (Simulation<RecordingRenderTarget>, Vec<Uuid>) {
        let mut sim = Simulation::new(self.config, RecordingRenderTarget::new())
            .expect("valid test config");
        for target in self.targets {
            sim.environment_mut().add_target(target);
        }
        let ids = self
            .cats
            .into_iter()
            .map(|settings| sim.add_cat(settings).expect("valid test cat"))
            .collect();
        (sim, ids)
    }
}

/// Names of the events a cat emitted, oldest first.
#[allow(dead_code)]
pub fn event_names(events: &[whiskers_lib::model::events::CatEvent], cat: Uuid) -> Vec<&'static str> {
    events
        .iter()
        .filter(|e| e.cat_id == cat)
        .map(|e| e.kind.name())
        .collect()
}
