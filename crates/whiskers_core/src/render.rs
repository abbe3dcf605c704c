//! Boundary to whatever draws the cats.

use crate::pool::AnimationFrame;
use serde::Serialize;
use uuid::Uuid;
use whiskers_data::{Appearance, Behavior, CatStateType, Dimensions, Position};

/// Per-tick state pushed to the render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatUpdate {
    pub id: Uuid,
    pub position: Position,
    pub visual: CatStateType,
    pub behavior: Behavior,
    /// Eased progress of the running visual transition; 1.0 when settled.
    pub transition_progress: f32,
    pub frame: AnimationFrame,
    /// Target the cat finished with during this tick.
    pub completed: Option<Uuid>,
}

/// What a render target needs to create a cat's visual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualRequest {
    pub id: Uuid,
    pub name: String,
    pub appearance: Appearance,
    pub dimensions: Dimensions,
    pub position: Position,
    pub visual: CatStateType,
}

pub trait RenderTarget {
    fn create_visual(&mut self, request: &VisualRequest);
    fn remove_visual(&mut self, id: Uuid);
    fn update_visual(&mut self, update: &CatUpdate);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderTarget;

impl RenderTarget for NullRenderTarget {
    fn create_visual(&mut self, _request: &VisualRequest) {}
    fn remove_visual(&mut self, _id: Uuid) {}
    fn update_visual(&mut self, _update: &CatUpdate) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Create(VisualRequest),
    Remove(Uuid),
    Update(CatUpdate),
}

/// Keeps every command it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderTarget {
    pub commands: Vec<RenderCommand>,
}

impl RecordingRenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> impl Iterator<Item = &VisualRequest> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Create(r) => Some(r),
            _ => None,
        })
    }

    pub fn removed(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Remove(id) => Some(*id),
            _ => None,
        })
    }

    pub fn updates_for(&self, id: Uuid) -> impl Iterator<Item = &CatUpdate> {
        self.commands.iter().filter_map(move |c| match c {
            RenderCommand::Update(u) if u.id == id => Some(u),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderTarget for RecordingRenderTarget {
    fn create_visual(&mut self, request: &VisualRequest) {
        self.commands.push(RenderCommand::Create(request.clone()));
    }

    fn remove_visual(&mut self, id: Uuid) {
        self.commands.push(RenderCommand::Remove(id));
    }

    fn update_visual(&mut self, update: &CatUpdate) {
        self.commands.push(RenderCommand::Update(*update));
    }
}
