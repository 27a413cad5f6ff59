use glam::Vec2;
use hackday_engine::{
    Easing, EngineContext, EntityId, LabelComponent, ShapeComponent, TimerId, Tween,
};

use super::{palette, set_text, OwnedEntities};

const PANEL: Vec2 = Vec2::new(550.0, 250.0);
const DOT_INTERVAL: f32 = 0.45;
const FADE_IN: f32 = 0.14;
const DEPTH: i32 = 20_000;

/// Modal "Loading..." card shown while a question fetch is pending.
#[derive(Debug, Default)]
pub struct LoadingOverlay {
    owned: OwnedEntities,
    title: Option<EntityId>,
    dots: usize,
    timer: Option<TimerId>,
}

impl LoadingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.title.is_some()
    }

    /// Show the card centered in `viewport`. No-op if already shown.
    pub fn mount(&mut self, ctx: &mut EngineContext, viewport: Vec2) {
        if self.is_mounted() {
            return;
        }
        let center = viewport * 0.5;
        let dim = ShapeComponent::filled(palette::DIM).with_alpha(0.45);
        self.owned.panel(ctx, "loading-dim", center, viewport, DEPTH, dim);
        self.owned.panel(
            ctx,
            "loading-panel",
            center,
            PANEL,
            DEPTH + 1,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(14.0),
        );
        let title = self.owned.text(
            ctx,
            "loading-title",
            center - Vec2::new(0.0, 30.0),
            Vec2::new(PANEL.x, 48.0),
            DEPTH + 2,
            LabelComponent::new("Loading", 40.0, palette::INK),
        );
        self.owned.text(
            ctx,
            "loading-subtitle",
            center + Vec2::new(0.0, 40.0),
            Vec2::new(PANEL.x, 24.0),
            DEPTH + 2,
            LabelComponent::new("Finding you a challenge", 20.0, palette::INK),
        );
        for &id in self.owned.ids() {
            if let Some(e) = ctx.scene.get_mut(id) {
                let target = e.alpha;
                e.alpha = 0.0;
                ctx.tweens.add(id, Tween::alpha(0.0, target, FADE_IN, Easing::QuadOut));
            }
        }
        self.title = Some(title);
        self.dots = 0;
        self.timer = Some(ctx.timers.every(DOT_INTERVAL));
    }

    /// Advance the dots. Returns `true` if `timer` belonged to this overlay.
    pub fn on_timer(&mut self, ctx: &mut EngineContext, timer: TimerId) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.dots = (self.dots + 1) % 4;
        if let Some(title) = self.title {
            set_text(ctx, title, &format!("Loading{}", ".".repeat(self.dots)));
        }
        true
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        if let Some(timer) = self.timer.take() {
            ctx.timers.cancel(timer);
        }
        self.owned.clear(ctx);
        self.title = None;
    }
}
