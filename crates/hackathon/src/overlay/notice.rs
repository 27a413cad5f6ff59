use glam::Vec2;
use hackday_engine::{
    Easing, EngineContext, EntityId, LabelComponent, RenderLayer, ShapeComponent, SpriteComponent,
    TimerId, Tween,
};

use super::{hit, palette, OwnedEntities};

const SIZE: Vec2 = Vec2::new(420.0, 120.0);
const MARGIN: f32 = 24.0;
const POP_IN: f32 = 0.25;
const DEPTH: i32 = 15_000;

/// Panel centre for a viewport: tucked into the lower-right corner.
fn anchor(viewport: Vec2) -> Vec2 {
    viewport - SIZE * 0.5 - Vec2::splat(MARGIN)
}

/// Mentor popup in the lower-right corner that hides itself after a while.
#[derive(Debug, Default)]
pub struct TransientNotice {
    owned: OwnedEntities,
    panel: Option<EntityId>,
    message: String,
    timer: Option<TimerId>,
}

impl TransientNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.panel.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.is_mounted().then_some(self.message.as_str())
    }

    /// Show `message`, replacing whatever notice is up.
    pub fn show(&mut self, ctx: &mut EngineContext, message: &str, viewport: Vec2, duration: f32) {
        self.hide(ctx);
        self.message = message.to_owned();
        self.build(ctx, viewport, true);
        self.timer = Some(ctx.timers.after(duration));
    }

    /// Re-anchor a visible notice to the new viewport corner. The auto-hide
    /// timer keeps running.
    pub fn relayout(&mut self, ctx: &mut EngineContext, viewport: Vec2) {
        if !self.is_mounted() {
            return;
        }
        self.owned.clear(ctx);
        self.build(ctx, viewport, false);
    }

    fn build(&mut self, ctx: &mut EngineContext, viewport: Vec2, pop_in: bool) {
        let center = anchor(viewport);
        let panel = self.owned.panel(
            ctx,
            "notice-panel",
            center,
            SIZE,
            DEPTH,
            ShapeComponent::filled(palette::PAPER)
                .with_stroke(palette::BORDER)
                .with_radius(12.0),
        );
        let portrait = Vec2::splat(SIZE.y - 24.0);
        let portrait_pos = Vec2::new(center.x - SIZE.x * 0.5 + 12.0 + portrait.x * 0.5, center.y);
        self.owned.spawn(ctx, |e| {
            e.with_tag("notice-mentor")
                .with_pos(portrait_pos)
                .with_size(portrait)
                .with_depth(DEPTH + 1)
                .with_layer(RenderLayer::Ui)
                .with_sprite(SpriteComponent::new("mentor"))
        });
        let text_w = SIZE.x - portrait.x - 36.0;
        self.owned.text(
            ctx,
            "notice-text",
            Vec2::new(portrait_pos.x + portrait.x * 0.5 + 12.0 + text_w * 0.5, center.y),
            Vec2::new(text_w, SIZE.y - 24.0),
            DEPTH + 1,
            LabelComponent::new(&self.message, 18.0, palette::INK),
        );
        self.panel = Some(panel);
        if !pop_in {
            return;
        }

        // Rise from below the bottom edge.
        let hidden = Vec2::new(center.x, viewport.y + SIZE.y);
        for &id in self.owned.ids() {
            if let Some(e) = ctx.scene.get_mut(id) {
                let to = e.pos;
                let from = to + (hidden - center);
                e.pos = from;
                ctx.tweens.add(id, Tween::position(from, to, POP_IN, Easing::BackOut));
            }
        }
    }

    /// Hide when the auto-hide timer fires. Returns `true` if the timer was ours.
    pub fn on_timer(&mut self, ctx: &mut EngineContext, timer: TimerId) -> bool {
        if self.timer != Some(timer) {
            return false;
        }
        self.timer = None;
        self.hide(ctx);
        true
    }

    /// Dismiss on click. Returns `true` if the click landed on the notice.
    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> bool {
        match self.panel {
            Some(panel) if hit(ctx, panel, point) => {
                self.hide(ctx);
                true
            }
            _ => false,
        }
    }

    pub fn hide(&mut self, ctx: &mut EngineContext) {
        if let Some(timer) = self.timer.take() {
            ctx.timers.cancel(timer);
        }
        self.owned.clear(ctx);
        self.panel = None;
        self.message.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(1280.0, 800.0);

    #[test]
    fn auto_hides_after_duration() {
        let mut ctx = EngineContext::new();
        let mut notice = TransientNotice::new();
        notice.show(&mut ctx, "Psst", VIEW, 2.0);
        assert_eq!(notice.message(), Some("Psst"));

        for id in ctx.advance(1.0) {
            assert!(!notice.on_timer(&mut ctx, id));
        }
        assert!(notice.is_mounted());
        let fired = ctx.advance(1.0);
        assert_eq!(fired.len(), 1);
        assert!(notice.on_timer(&mut ctx, fired[0]));
        assert!(!notice.is_mounted());
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn new_notice_replaces_old() {
        let mut ctx = EngineContext::new();
        let mut notice = TransientNotice::new();
        notice.show(&mut ctx, "one", VIEW, 5.0);
        let count = ctx.scene.len();
        notice.show(&mut ctx, "two", VIEW, 5.0);
        assert_eq!(ctx.scene.len(), count);
        assert_eq!(ctx.timers.len(), 1);
        assert_eq!(notice.message(), Some("two"));
    }

    #[test]
    fn pops_into_lower_right_and_dismisses_on_click() {
        let mut ctx = EngineContext::new();
        let mut notice = TransientNotice::new();
        notice.show(&mut ctx, "hello", VIEW, 5.0);
        ctx.advance(POP_IN);
        let panel = ctx.scene.find_by_tag("notice-panel").unwrap().pos;
        assert!((panel - Vec2::new(1046.0, 716.0)).length() < 1e-3);

        assert!(!notice.pointer_down(&mut ctx, Vec2::new(100.0, 100.0)));
        assert!(notice.pointer_down(&mut ctx, panel));
        assert!(!notice.is_mounted());
        assert!(ctx.timers.is_empty());
    }

    #[test]
    fn relayout_follows_the_new_corner_and_keeps_the_timer() {
        let mut ctx = EngineContext::new();
        let mut notice = TransientNotice::new();
        notice.show(&mut ctx, "hello", VIEW, 5.0);
        ctx.advance(0.1);
        let count = ctx.scene.len();

        notice.relayout(&mut ctx, Vec2::new(1000.0, 600.0));
        let panel = ctx.scene.find_by_tag("notice-panel").unwrap().pos;
        assert_eq!(panel, Vec2::new(766.0, 516.0));
        assert_eq!(ctx.scene.len(), count);
        assert!(ctx.tweens.is_empty());
        assert_eq!(notice.message(), Some("hello"));

        let fired = ctx.advance(4.9);
        assert_eq!(fired.len(), 1);
        assert!(notice.on_timer(&mut ctx, fired[0]));
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn relayout_without_a_notice_spawns_nothing() {
        let mut ctx = EngineContext::new();
        let mut notice = TransientNotice::new();
        notice.relayout(&mut ctx, VIEW);
        assert!(ctx.scene.is_empty());
        assert!(!notice.is_mounted());
    }
}
