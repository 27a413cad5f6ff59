use glam::Vec2;
use hackday_engine::{Easing, EngineContext, EntityId, LabelComponent, ShapeComponent, Tween};

use super::{hit, palette, OwnedEntities};

const PANEL: Vec2 = Vec2::new(620.0, 340.0);
const BUTTON: Vec2 = Vec2::new(220.0, 64.0);
const DEPTH: i32 = 21_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Won,
    TimeUp,
}

impl ResultKind {
    fn title(self) -> &'static str {
        match self {
            ResultKind::Won => "Congrats!",
            ResultKind::TimeUp => "Time's up!",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            ResultKind::Won => "You Won!",
            ResultKind::TimeUp => "The demo deadline has passed.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    PlayAgain,
    Quit,
}

/// End-of-round card with "Play Again" and "Quit".
#[derive(Debug, Default)]
pub struct ResultOverlay {
    owned: OwnedEntities,
    kind: Option<ResultKind>,
    play_again: Option<EntityId>,
    quit: Option<EntityId>,
}

impl ResultOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.kind.is_some()
    }

    pub fn kind(&self) -> Option<ResultKind> {
        self.kind
    }

    /// Show the card. A card that is already up stays as it is.
    pub fn mount(&mut self, ctx: &mut EngineContext, kind: ResultKind, viewport: Vec2) {
        if self.is_mounted() {
            return;
        }
        let center = viewport * 0.5;
        let dim = ShapeComponent::filled(palette::DIM).with_alpha(0.55);
        self.owned.panel(ctx, "result-dim", center, viewport, DEPTH, dim);
        let panel = self.owned.panel(
            ctx,
            "result-panel",
            center,
            PANEL,
            DEPTH + 1,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(16.0),
        );
        ctx.tweens.add(panel, Tween::size(PANEL * 0.8, PANEL, 0.2, Easing::BackOut));
        self.owned.text(
            ctx,
            "result-title",
            center - Vec2::new(0.0, 100.0),
            Vec2::new(PANEL.x, 56.0),
            DEPTH + 2,
            LabelComponent::new(kind.title(), 48.0, palette::INK),
        );
        self.owned.text(
            ctx,
            "result-subtitle",
            center - Vec2::new(0.0, 35.0),
            Vec2::new(PANEL.x, 32.0),
            DEPTH + 2,
            LabelComponent::new(kind.subtitle(), 26.0, palette::INK),
        );
        let row_y = center.y + 80.0;
        let play_again_at = Vec2::new(center.x - 130.0, row_y);
        let play_again = self.button(ctx, "result-play-again", play_again_at, "Play Again");
        let quit = self.button(ctx, "result-quit", Vec2::new(center.x + 130.0, row_y), "Quit");
        self.kind = Some(kind);
        self.play_again = Some(play_again);
        self.quit = Some(quit);
    }

    fn button(&mut self, ctx: &mut EngineContext, tag: &str, center: Vec2, text: &str) -> EntityId {
        let id = self.owned.panel(
            ctx,
            tag,
            center,
            BUTTON,
            DEPTH + 2,
            ShapeComponent::filled(palette::BUTTON).with_stroke(palette::BORDER).with_radius(10.0),
        );
        self.owned.text(
            ctx,
            &format!("{tag}-label"),
            center,
            BUTTON,
            DEPTH + 3,
            LabelComponent::new(text, 26.0, palette::INK),
        );
        id
    }

    pub fn pointer_down(&self, ctx: &EngineContext, point: Vec2) -> Option<ResultAction> {
        if self.play_again.is_some_and(|id| hit(ctx, id, point)) {
            Some(ResultAction::PlayAgain)
        } else if self.quit.is_some_and(|id| hit(ctx, id, point)) {
            Some(ResultAction::Quit)
        } else {
            None
        }
    }

    /// Recenter after a viewport change.
    pub fn relayout(&mut self, ctx: &mut EngineContext, viewport: Vec2) {
        if let Some(kind) = self.kind {
            self.unmount(ctx);
            self.mount(ctx, kind, viewport);
        }
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        self.owned.clear(ctx);
        self.kind = None;
        self.play_again = None;
        self.quit = None;
    }
}
