//! Explicitly owned collection of live cats and the public control surface.
//!
//! The registry is handed to whatever drives the frame loop; nothing about it
//! is global. Every control operation goes through each cat's own
//! pause/resume/destroy contract, including the page-visibility signal.

use crate::cat::{Cat, CatSettings};
use crate::config::AppConfig;
use crate::environment::EnvironmentSource;
use crate::error::Result;
use crate::events::{CatEvent, EventSink, SubscriptionId};
use crate::personality::BoundariesLogic;
use crate::render::RenderTarget;
use crate::seed::cat_from_seed;
use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;
use whiskers_data::Boundaries;

#[derive(Debug)]
pub struct CatRegistry {
    cats: Vec<Cat>,
    index: HashMap<Uuid, usize>,
    boundaries: Boundaries,
    config: AppConfig,
    visible: bool,
    /// Cats paused by the visibility signal rather than by a caller.
    hidden_paused: HashSet<Uuid>,
    /// Events of destroyed cats not yet drained.
    retired: VecDeque<CatEvent>,
    completed: Vec<Uuid>,
}

impl Default for CatRegistry {
    fn default() -> Self {
        Self::new(Boundaries::default(), AppConfig::default())
    }
}

impl CatRegistry {
    pub fn new(boundaries: Boundaries, config: AppConfig) -> Self {
        Self {
            cats: Vec::new(),
            index: HashMap::new(),
            boundaries,
            config,
            visible: true,
            hidden_paused: HashSet::new(),
            retired: VecDeque::new(),
            completed: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.cats.iter().filter(|c| c.is_active()).count()
    }

    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Settings template carrying this registry's tuning and bounds.
    pub fn settings(&self) -> CatSettings {
        CatSettings {
            boundaries: Some(self.boundaries),
            ..CatSettings::default()
        }
        .with_config(&self.config)
    }

    pub fn get(&self, id: Uuid) -> Option<&Cat> {
        self.index.get(&id).map(|&i| &self.cats[i])
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Cat> {
        self.index.get(&id).map(|&i| &mut self.cats[i])
    }

    /// Cats in creation order.
    pub fn list(&self) -> impl Iterator<Item = &Cat> {
        self.cats.iter()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.cats.iter().map(Cat::id).collect()
    }

    /// Builds a cat, asks the render target for its visual and starts it.
    /// While the page is hidden the cat stays paused until it becomes visible.
    pub fn create(
        &mut self,
        mut settings: CatSettings,
        render: &mut dyn RenderTarget,
    ) -> Result<Uuid> {
        if settings.boundaries.is_none() {
            settings.boundaries = Some(self.boundaries);
        }
        if let Some(id) = settings.id {
            if self.index.contains_key(&id) {
                tracing::warn!(%id, "Id already registered, assigning a fresh one");
                settings.id = None;
            }
        }

        let mut cat = Cat::new(settings)?;
        let id = cat.id();
        render.create_visual(&cat.visual_request());

        if self.visible {
            cat.resume();
        } else {
            self.hidden_paused.insert(id);
        }

        tracing::info!(%id, name = cat.name(), "Cat registered");
        self.index.insert(id, self.cats.len());
        self.cats.push(cat);
        Ok(id)
    }

    /// Same seed, same cat (apart from its id).
    pub fn create_from_seed(&mut self, seed: &str, render: &mut dyn RenderTarget) -> Result<Uuid> {
        let seeded = cat_from_seed(seed, &self.boundaries)?;
        let settings = CatSettings {
            position: Some(seeded.position),
            rng_seed: Some(seeded.rng_seed),
            boundaries: Some(self.boundaries),
            ..CatSettings::from_definition(seeded.definition)
        }
        .with_config(&self.config);
        self.create(settings, render)
    }

    /// Tears a cat down and removes it. Its final events stay drainable.
    pub fn destroy(&mut self, id: Uuid, render: &mut dyn RenderTarget) -> bool {
        let Some(idx) = self.index.remove(&id) else {
            return false;
        };
        let mut cat = self.cats.remove(idx);
        for (i, c) in self.cats.iter().enumerate().skip(idx) {
            self.index.insert(c.id(), i);
        }
        self.hidden_paused.remove(&id);

        cat.destroy();
        self.retired.extend(cat.drain_events());
        render.remove_visual(id);
        tracing::info!(%id, "Cat removed");
        true
    }

    pub fn pause(&mut self, id: Uuid) -> bool {
        self.hidden_paused.remove(&id);
        self.get_mut(id).is_some_and(Cat::pause)
    }

    pub fn resume(&mut self, id: Uuid) -> bool {
        self.hidden_paused.remove(&id);
        self.get_mut(id).is_some_and(Cat::resume)
    }

    /// Returns how many cats actually paused.
    pub fn pause_all(&mut self) -> usize {
        self.hidden_paused.clear();
        self.cats.iter_mut().map(Cat::pause).filter(|&paused| paused).count()
    }

    pub fn resume_all(&mut self) -> usize {
        self.hidden_paused.clear();
        self.cats.iter_mut().map(Cat::resume).filter(|&resumed| resumed).count()
    }

    /// Page-visibility signal. Hiding pauses every running cat; showing
    /// resumes only the cats that hiding paused.
    pub fn set_visibility(&mut self, visible: bool) -> usize {
        if visible == self.visible {
            return 0;
        }
        self.visible = visible;

        let mut changed = 0;
        if visible {
            for cat in &mut self.cats {
                if self.hidden_paused.remove(&cat.id()) && cat.resume() {
                    changed += 1;
                }
            }
            self.hidden_paused.clear();
        } else {
            for cat in &mut self.cats {
                if cat.pause() {
                    self.hidden_paused.insert(cat.id());
                    changed += 1;
                }
            }
        }
        tracing::info!(visible, changed, "Visibility changed");
        changed
    }

    /// Applies new viewport bounds to every cat.
    pub fn set_boundaries(&mut self, boundaries: Boundaries) -> Result<()> {
        boundaries.validate()?;
        for cat in &mut self.cats {
            cat.set_boundaries(boundaries)?;
        }
        self.boundaries = boundaries;
        Ok(())
    }

    pub fn set_config(&mut self, config: AppConfig) {
        self.config = config;
    }

    /// One frame for every cat. Paused and destroyed cats are skipped.
    /// Returns how many cats ticked; finished targets are available from
    /// [`CatRegistry::completed_targets`].
    pub fn tick_all(
        &mut self,
        environment: &mut dyn EnvironmentSource,
        render: &mut dyn RenderTarget,
        dt_ms: f32,
    ) -> usize {
        if let Some(boundaries) = environment.take_boundary_change() {
            if let Err(err) = self.set_boundaries(boundaries) {
                tracing::warn!(%err, "Ignoring invalid boundary change");
            }
        }

        self.completed.clear();
        let targets = environment.targets();
        let mut ticked = 0;
        for cat in &mut self.cats {
            let Some(update) = cat.tick(targets, dt_ms) else {
                continue;
            };
            ticked += 1;
            if let Some(id) = update.completed {
                self.completed.push(id);
            }
            render.update_visual(&update);
        }
        ticked
    }

    /// Targets finished during the last [`CatRegistry::tick_all`].
    pub fn completed_targets(&self) -> &[Uuid] {
        &self.completed
    }

    pub fn subscribe(
        &mut self,
        id: Uuid,
        sink: impl EventSink + 'static,
    ) -> Option<SubscriptionId> {
        self.get_mut(id).map(|cat| cat.subscribe(sink))
    }

    /// All queued events. Each cat's events come out in emission order.
    pub fn drain_events(&mut self) -> Vec<CatEvent> {
        let mut events: Vec<CatEvent> = self.retired.drain(..).collect();
        for cat in &mut self.cats {
            events.extend(cat.drain_events());
        }
        events
    }

    /// Destroys every cat. Returns how many were removed.
    pub fn clear(&mut self, render: &mut dyn RenderTarget) -> usize {
        let mut removed = 0;
        for id in self.ids() {
            if self.destroy(id, render) {
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use crate::lifecycle::LifecycleState;
    use crate::render::{NullRenderTarget, RecordingRenderTarget};
    use whiskers_data::{InteractionTarget, Personality, Position, TargetKind};

    fn registry() -> CatRegistry {
        CatRegistry::new(Boundaries::from_size(800.0, 600.0), AppConfig::default())
    }

    #[test]
    fn test_create_registers_renders_and_starts() {
        let mut reg = registry();
        let mut render = RecordingRenderTarget::new();
        let id = reg.create(reg.settings(), &mut render).unwrap();

        assert_eq!(reg.len(), 1);
        assert!(reg.get(id).unwrap().is_active());
        assert_eq!(render.created().map(|r| r.id).collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn test_invalid_settings_create_nothing() {
        let mut reg = registry();
        let mut render = RecordingRenderTarget::new();
        let settings = CatSettings {
            personality: Personality {
                curiosity: 3.0,
                ..Default::default()
            },
            ..reg.settings()
        };
        assert!(reg.create(settings, &mut render).is_err());
        assert!(reg.is_empty());
        assert!(render.commands.is_empty());
    }

    #[test]
    fn test_seeding_into_inverted_bounds_is_an_error() {
        let mut reg = CatRegistry::new(Boundaries::new(10.0, 0.0, 0.0, 10.0), AppConfig::default());
        let mut render = RecordingRenderTarget::new();
        let result = reg.create_from_seed("x", &mut render);
        assert!(matches!(result, Err(crate::CatError::InvalidBoundaries { .. })));
        assert!(reg.is_empty());
        assert!(render.commands.is_empty());
    }

    #[test]
    fn test_create_from_seed_is_reproducible() {
        let mut reg = registry();
        let a = reg.create_from_seed("marmalade", &mut NullRenderTarget).unwrap();
        let b = reg.create_from_seed("marmalade", &mut NullRenderTarget).unwrap();
        assert_ne!(a, b);
        let (a, b) = (reg.get(a).unwrap(), reg.get(b).unwrap());
        assert_eq!(a.personality(), b.personality());
        assert_eq!(a.name(), b.name());
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn test_destroy_removes_and_keeps_final_events() {
        let mut reg = registry();
        let mut render = RecordingRenderTarget::new();
        let first = reg.create(reg.settings(), &mut render).unwrap();
        let second = reg.create(reg.settings(), &mut render).unwrap();

        assert!(reg.destroy(first, &mut render));
        assert!(!reg.destroy(first, &mut render));
        assert!(reg.get(first).is_none());
        assert!(reg.get(second).is_some());
        assert_eq!(render.removed().collect::<Vec<_>>(), vec![first]);

        let events: Vec<_> = reg
            .drain_events()
            .into_iter()
            .filter(|e| e.cat_id == first)
            .map(|e| e.kind.name())
            .collect();
        assert_eq!(events, vec!["resumed", "destroyed"]);
    }

    #[test]
    fn test_pause_all_and_resume_all() {
        let mut reg = registry();
        for _ in 0..3 {
            reg.create(reg.settings(), &mut NullRenderTarget).unwrap();
        }
        let one = reg.ids()[0];
        assert!(reg.pause(one));
        assert_eq!(reg.pause_all(), 2);
        assert_eq!(reg.pause_all(), 0);
        assert_eq!(reg.active_count(), 0);
        assert_eq!(reg.resume_all(), 3);
        assert_eq!(reg.active_count(), 3);
    }

    #[test]
    fn test_visibility_resumes_only_what_it_paused() {
        let mut reg = registry();
        for _ in 0..3 {
            reg.create(reg.settings(), &mut NullRenderTarget).unwrap();
        }
        let manual = reg.ids()[1];
        reg.pause(manual);

        assert_eq!(reg.set_visibility(false), 2);
        assert_eq!(reg.active_count(), 0);

        // Created while hidden: waits for visibility.
        let late = reg.create(reg.settings(), &mut NullRenderTarget).unwrap();
        assert_eq!(
            reg.get(late).unwrap().lifecycle_state(),
            LifecycleState::Inactive
        );

        assert_eq!(reg.set_visibility(true), 3);
        assert!(!reg.get(manual).unwrap().is_active());
        assert!(reg.get(late).unwrap().is_active());
        assert_eq!(reg.set_visibility(true), 0);
    }

    #[test]
    fn test_tick_all_skips_paused_and_reports_updates() {
        let mut reg = registry();
        let mut render = RecordingRenderTarget::new();
        let running = reg.create(reg.settings(), &mut render).unwrap();
        let paused = reg.create(reg.settings(), &mut render).unwrap();
        reg.pause(paused);

        let mut env = Environment::new(reg.boundaries()).unwrap();
        env.add_target(InteractionTarget::new(
            TargetKind::Pointer,
            Position::new(500.0, 300.0),
        ));

        assert_eq!(reg.tick_all(&mut env, &mut render, 16.0), 1);
        assert_eq!(render.updates_for(running).count(), 1);
        assert_eq!(render.updates_for(paused).count(), 0);
        assert_eq!(reg.get(paused).unwrap().brain_ticks(), 0);
    }

    #[test]
    fn test_resize_reaches_every_cat() {
        let mut reg = registry();
        let id = reg
            .create(
                CatSettings {
                    position: Some(Position::new(700.0, 500.0)),
                    ..reg.settings()
                },
                &mut NullRenderTarget,
            )
            .unwrap();

        let mut env = Environment::new(reg.boundaries()).unwrap();
        env.resize(Boundaries::from_size(320.0, 240.0)).unwrap();
        reg.tick_all(&mut env, &mut NullRenderTarget, 16.0);

        assert_eq!(reg.boundaries(), Boundaries::from_size(320.0, 240.0));
        let cat = reg.get(id).unwrap();
        assert!(cat.boundaries().contains(&cat.position()));
    }

    #[test]
    fn test_clear_destroys_everything() {
        let mut reg = registry();
        let mut render = RecordingRenderTarget::new();
        for _ in 0..4 {
            reg.create(reg.settings(), &mut render).unwrap();
        }
        assert_eq!(reg.clear(&mut render), 4);
        assert!(reg.is_empty());
        assert_eq!(render.removed().count(), 4);
        let destroyed = reg
            .drain_events()
            .iter()
            .filter(|e| e.kind.name() == "destroyed")
            .count();
        assert_eq!(destroyed, 4);
    }
}
