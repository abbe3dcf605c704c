use std::collections::HashMap;
use uuid::Uuid;
use whiskers_core::render::{CatUpdate, RenderTarget, VisualRequest};

/// Render target that draws nothing and logs instead. Keeps the latest update
/// per cat so the driver can report on them.
#[derive(Debug, Default)]
pub struct TracingRenderTarget {
    latest: HashMap<Uuid, Option<CatUpdate>>,
    updates: u64,
}

impl TracingRenderTarget {
    pub fn visual_count(&self) -> usize {
        self.latest.len()
    }

    pub fn latest(&self, id: Uuid) -> Option<&CatUpdate> {
        self.latest.get(&id).and_then(Option::as_ref)
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

impl RenderTarget for TracingRenderTarget {
    fn create_visual(&mut self, request: &VisualRequest) {
        tracing::info!(
            id = %request.id,
            name = %request.name,
            pattern = ?request.appearance.pattern,
            x = request.position.x,
            y = request.position.y,
            "Visual created"
        );
        self.latest.insert(request.id, None);
    }

    fn remove_visual(&mut self, id: Uuid) {
        tracing::info!(%id, "Visual removed");
        self.latest.remove(&id);
    }

    fn update_visual(&mut self, update: &CatUpdate) {
        tracing::trace!(
            id = %update.id,
            visual = %update.visual,
            x = update.position.x,
            y = update.position.y,
            "Visual update"
        );
        self.updates += 1;
        if let Some(slot) = self.latest.get_mut(&update.id) {
            *slot = Some(*update);
        }
    }
}
