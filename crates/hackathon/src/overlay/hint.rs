use glam::Vec2;
use hackday_engine::{
    EngineContext, EntityId, LabelComponent, Rect, RenderLayer, ShapeComponent, SpriteComponent,
};

use super::{hit, palette, set_text, OwnedEntities};

const DEPTH: i32 = 10_500;
const NO_HINTS: &str = "You're on your own for this one.";

/// Mentor portrait and speech bubble in the dialog's side column.
#[derive(Debug, Default)]
pub struct HintOverlay {
    owned: OwnedEntities,
    hints: Vec<String>,
    index: usize,
    mentor: Option<EntityId>,
    bubble: Option<EntityId>,
}

impl HintOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mentor.is_some()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Current hint text, if the question has any.
    pub fn current(&self) -> Option<&str> {
        self.hints.get(self.index).map(String::as_str)
    }

    pub fn mount(&mut self, ctx: &mut EngineContext, hints: &[String], column: Rect) {
        if self.is_mounted() {
            return;
        }
        self.hints = hints.to_vec();
        self.index = 0;

        let center = column.center();
        let portrait = Vec2::splat(column.w.min(160.0));
        let mentor_pos = Vec2::new(center.x, column.y + portrait.y * 0.5 + 12.0);
        let mentor = self.owned.spawn(ctx, |e| {
            e.with_tag("hint-mentor")
                .with_pos(mentor_pos)
                .with_size(portrait)
                .with_depth(DEPTH + 1)
                .with_layer(RenderLayer::Ui)
                .with_sprite(SpriteComponent::new("mentor").with_animation("talk"))
        });

        let bubble_top = mentor_pos.y + portrait.y * 0.5 + 16.0;
        let bubble_size = Vec2::new(column.w, (column.bottom() - bubble_top - 40.0).max(60.0));
        let bubble_center = Vec2::new(center.x, bubble_top + bubble_size.y * 0.5);
        self.owned.panel(
            ctx,
            "hint-bubble-bg",
            bubble_center,
            bubble_size,
            DEPTH,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(12.0),
        );
        let text = self.current().unwrap_or(NO_HINTS).to_owned();
        let bubble = self.owned.text(
            ctx,
            "hint-bubble",
            bubble_center,
            bubble_size - Vec2::splat(16.0),
            DEPTH + 1,
            LabelComponent::new(text, 18.0, palette::INK),
        );
        self.owned.text(
            ctx,
            "hint-caption",
            Vec2::new(center.x, column.bottom() - 16.0),
            Vec2::new(column.w, 20.0),
            DEPTH + 1,
            LabelComponent::new("Click the mentor for another hint", 14.0, palette::INK),
        );
        self.mentor = Some(mentor);
        self.bubble = Some(bubble);
    }

    /// Show the next hint, wrapping to the first.
    pub fn next(&mut self, ctx: &mut EngineContext) {
        if self.hints.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.hints.len();
        if let (Some(bubble), Some(text)) = (self.bubble, self.hints.get(self.index)) {
            set_text(ctx, bubble, text);
        }
    }

    /// Returns `true` if the click landed on the mentor.
    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> bool {
        match self.mentor {
            Some(mentor) if hit(ctx, mentor, point) => {
                self.next(ctx);
                true
            }
            _ => false,
        }
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        self.owned.clear(ctx);
        self.hints.clear();
        self.index = 0;
        self.mentor = None;
        self.bubble = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> Rect {
        Rect::new(900.0, 100.0, 200.0, 600.0)
    }

    fn bubble_text(ctx: &EngineContext) -> String {
        ctx.scene
            .find_by_tag("hint-bubble")
            .and_then(|e| e.label.as_ref())
            .map(|l| l.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn clicking_the_mentor_cycles_and_wraps() {
        let mut ctx = EngineContext::new();
        let mut hint = HintOverlay::new();
        let hints = vec!["first".to_owned(), "second".to_owned()];
        hint.mount(&mut ctx, &hints, column());
        assert_eq!(bubble_text(&ctx), "first");

        let mentor = ctx.scene.find_by_tag("hint-mentor").unwrap().pos;
        assert!(hint.pointer_down(&mut ctx, mentor));
        assert_eq!(bubble_text(&ctx), "second");
        assert!(hint.pointer_down(&mut ctx, mentor));
        assert_eq!(bubble_text(&ctx), "first");
        assert!(!hint.pointer_down(&mut ctx, Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn no_hints_shows_fallback() {
        let mut ctx = EngineContext::new();
        let mut hint = HintOverlay::new();
        hint.mount(&mut ctx, &[], column());
        hint.next(&mut ctx);
        assert_eq!(bubble_text(&ctx), NO_HINTS);
        assert_eq!(hint.current(), None);
    }

    #[test]
    fn remount_starts_from_first_hint() {
        let mut ctx = EngineContext::new();
        let mut hint = HintOverlay::new();
        let hints = vec!["a".to_owned(), "b".to_owned()];
        hint.mount(&mut ctx, &hints, column());
        hint.next(&mut ctx);
        hint.unmount(&mut ctx);
        assert!(ctx.scene.is_empty());
        hint.mount(&mut ctx, &hints, column());
        assert_eq!(hint.current(), Some("a"));
    }
}
