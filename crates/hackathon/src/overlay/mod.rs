//! Self-contained UI units. Each one owns the entities it spawned and
//! removes all of them on unmount; mount and unmount are idempotent.

pub mod hint;
pub mod loading;
pub mod notice;
pub mod result;

pub use hint::HintOverlay;
pub use loading::LoadingOverlay;
pub use notice::TransientNotice;
pub use result::{ResultAction, ResultKind, ResultOverlay};

use glam::Vec2;
use hackday_engine::{Entity, EngineContext, EntityId, LabelComponent, RenderLayer, ShapeComponent};

/// Colors shared by every panel.
pub mod palette {
    pub const PAPER: u32 = 0xf3e9d9;
    pub const INK: u32 = 0x4a3f35;
    pub const BORDER: u32 = 0x614f3f;
    pub const DIM: u32 = 0x000000;
    pub const SELECTED: u32 = 0xffe08a;
    pub const CORRECT: u32 = 0x7bd389;
    pub const WRONG: u32 = 0xe57373;
    pub const BUTTON: u32 = 0xe2d3bd;
}

/// Entities spawned by one UI unit.
#[derive(Debug, Default)]
pub struct OwnedEntities {
    ids: Vec<EntityId>,
}

impl OwnedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        ctx: &mut EngineContext,
        build: impl FnOnce(Entity) -> Entity,
    ) -> EntityId {
        let id = ctx.spawn_with(build);
        self.ids.push(id);
        id
    }

    /// Solid panel on the UI layer.
    pub fn panel(
        &mut self,
        ctx: &mut EngineContext,
        tag: &str,
        center: Vec2,
        size: Vec2,
        depth: i32,
        shape: ShapeComponent,
    ) -> EntityId {
        self.spawn(ctx, |e| {
            e.with_tag(tag)
                .with_pos(center)
                .with_size(size)
                .with_depth(depth)
                .with_layer(RenderLayer::Ui)
                .with_shape(shape)
        })
    }

    /// Text on the UI layer.
    pub fn text(
        &mut self,
        ctx: &mut EngineContext,
        tag: &str,
        center: Vec2,
        size: Vec2,
        depth: i32,
        label: LabelComponent,
    ) -> EntityId {
        self.spawn(ctx, |e| {
            e.with_tag(tag)
                .with_pos(center)
                .with_size(size)
                .with_depth(depth)
                .with_layer(RenderLayer::Ui)
                .with_label(label)
        })
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Despawn everything (and any tweens on it).
    pub fn clear(&mut self, ctx: &mut EngineContext) {
        for id in self.ids.drain(..) {
            ctx.despawn(id);
        }
    }
}

/// Replace the text of a label entity.
pub(crate) fn set_text(ctx: &mut EngineContext, id: EntityId, text: &str) {
    if let Some(label) = ctx.scene.get_mut(id).and_then(|e| e.label.as_mut()) {
        if label.text != text {
            label.text = text.to_owned();
        }
    }
}

/// Recolor a shape entity.
pub(crate) fn set_fill(ctx: &mut EngineContext, id: EntityId, fill: u32) {
    if let Some(shape) = ctx.scene.get_mut(id).and_then(|e| e.shape.as_mut()) {
        shape.fill = fill;
    }
}

/// Whether a visible entity exists under `point`.
pub(crate) fn hit(ctx: &EngineContext, id: EntityId, point: Vec2) -> bool {
    ctx.scene.get(id).is_some_and(|e| e.hit(point))
}
