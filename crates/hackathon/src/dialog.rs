//! Modal frame that hosts one minigame plus the mentor hint column.

use glam::Vec2;
use hackday_engine::{EngineContext, EntityId, LabelComponent, Rect, ShapeComponent};
use rand::Rng;

use crate::config::DialogLayout;
use crate::minigame::Minigame;
use crate::npc::MinigameKind;
use crate::overlay::{hit, palette, HintOverlay, OwnedEntities};
use crate::questions::Question;

const DEPTH: i32 = 10_000;
const HEADER_H: f32 = 40.0;
const CLOSE_SIZE: Vec2 = Vec2::new(36.0, 36.0);

/// What the dialog reports back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Closed,
    Answered { kind: MinigameKind, correct: bool },
}

/// Screen rectangles for one viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogGeometry {
    pub frame: Rect,
    /// Minigame area.
    pub main: Rect,
    /// Hint column.
    pub side: Rect,
}

impl DialogGeometry {
    pub fn compute(layout: &DialogLayout, viewport: Vec2) -> Self {
        let frame = Rect::from_center(viewport * 0.5, viewport * layout.screen_ratio);
        let inner_x = frame.x + layout.padding;
        let inner_y = frame.y + layout.padding + HEADER_H;
        let inner_w = (frame.w - 2.0 * layout.padding).max(0.0);
        let inner_h = (frame.h - 2.0 * layout.padding - HEADER_H).max(0.0);
        let main_w = ((inner_w - layout.gap) * layout.main_ratio).max(0.0);
        let side_w = (inner_w - layout.gap - main_w).max(0.0);
        Self {
            frame,
            main: Rect::new(inner_x, inner_y, main_w, inner_h),
            side: Rect::new(inner_x + main_w + layout.gap, inner_y, side_w, inner_h),
        }
    }
}

#[derive(Debug)]
pub struct MiniGameDialog {
    layout: DialogLayout,
    shell: OwnedEntities,
    close_button: Option<EntityId>,
    unit: Option<Minigame>,
    hint: HintOverlay,
    question: Option<Question>,
}

impl MiniGameDialog {
    pub fn new(layout: DialogLayout) -> Self {
        Self {
            layout,
            shell: OwnedEntities::new(),
            close_button: None,
            unit: None,
            hint: HintOverlay::new(),
            question: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.unit.is_some()
    }

    pub fn kind(&self) -> Option<MinigameKind> {
        self.unit.as_ref().map(Minigame::kind)
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn minigame(&self) -> Option<&Minigame> {
        self.unit.as_ref()
    }

    pub fn geometry(&self, viewport: Vec2) -> DialogGeometry {
        DialogGeometry::compute(&self.layout, viewport)
    }

    /// Mount a fresh unit for `question`, replacing whatever was open.
    pub fn open<R: Rng + ?Sized>(
        &mut self,
        ctx: &mut EngineContext,
        question: Question,
        viewport: Vec2,
        rng: &mut R,
    ) {
        self.unmount_content(ctx);
        let geometry = self.geometry(viewport);
        if self.shell.is_empty() {
            self.mount_shell(ctx, viewport, &geometry);
        }
        self.unit = Some(Minigame::mount(ctx, &question, geometry.main, rng));
        self.hint.mount(ctx, question.hints(), geometry.side);
        log::debug!("dialog open: {:?}", question.kind());
        self.question = Some(question);
    }

    pub fn close(&mut self, ctx: &mut EngineContext) {
        self.unmount_content(ctx);
        self.shell.clear(ctx);
        self.close_button = None;
        self.question = None;
    }

    /// Rebuild for a new viewport and reopen the same question from scratch.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        ctx: &mut EngineContext,
        viewport: Vec2,
        rng: &mut R,
    ) {
        let Some(question) = self.question.take() else {
            return;
        };
        self.close(ctx);
        self.open(ctx, question, viewport, rng);
    }

    pub fn select(&mut self, ctx: &mut EngineContext, index: usize) {
        if let Some(unit) = &mut self.unit {
            unit.select(ctx, index);
        }
    }

    pub fn submit(&mut self, ctx: &mut EngineContext) -> Option<DialogEvent> {
        let unit = self.unit.as_mut()?;
        let correct = unit.submit(ctx)?;
        Some(DialogEvent::Answered {
            kind: unit.kind(),
            correct,
        })
    }

    pub fn next_hint(&mut self, ctx: &mut EngineContext) {
        self.hint.next(ctx);
    }

    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> Option<DialogEvent> {
        self.unit.as_ref()?;
        if self.close_button.is_some_and(|id| hit(ctx, id, point)) {
            self.close(ctx);
            return Some(DialogEvent::Closed);
        }
        if self.hint.pointer_down(ctx, point) {
            return None;
        }
        let unit = self.unit.as_mut()?;
        let correct = unit.pointer_down(ctx, point)?;
        Some(DialogEvent::Answered {
            kind: unit.kind(),
            correct,
        })
    }

    pub fn pointer_move(&mut self, ctx: &mut EngineContext, point: Vec2) {
        if let Some(unit) = &mut self.unit {
            unit.pointer_move(ctx, point);
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut EngineContext, point: Vec2) {
        if let Some(unit) = &mut self.unit {
            unit.pointer_up(ctx, point);
        }
    }

    fn mount_shell(&mut self, ctx: &mut EngineContext, viewport: Vec2, geometry: &DialogGeometry) {
        self.shell.panel(
            ctx,
            "dialog-dim",
            viewport * 0.5,
            viewport,
            DEPTH - 1,
            ShapeComponent::filled(palette::DIM).with_alpha(0.4),
        );
        self.shell.panel(
            ctx,
            "dialog-frame",
            geometry.frame.center(),
            geometry.frame.size(),
            DEPTH,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(18.0),
        );
        let close_center = Vec2::new(
            geometry.frame.right() - self.layout.padding - CLOSE_SIZE.x * 0.5,
            geometry.frame.y + self.layout.padding + CLOSE_SIZE.y * 0.5,
        );
        let close = self.shell.panel(
            ctx,
            "dialog-close",
            close_center,
            CLOSE_SIZE,
            DEPTH + 1,
            ShapeComponent::filled(palette::BUTTON).with_stroke(palette::BORDER).with_radius(6.0),
        );
        self.shell.text(
            ctx,
            "dialog-close-label",
            close_center,
            CLOSE_SIZE,
            DEPTH + 2,
            LabelComponent::new("X", 22.0, palette::INK),
        );
        self.close_button = Some(close);
    }

    fn unmount_content(&mut self, ctx: &mut EngineContext) {
        if let Some(mut unit) = self.unit.take() {
            unit.unmount(ctx);
        }
        self.hint.unmount(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{ChoicePrompt, ReorderPrompt};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEW: Vec2 = Vec2::new(1280.0, 800.0);

    fn choice() -> Question {
        Question::Choice(ChoicePrompt {
            question: "2 + 2?".into(),
            choices: vec!["3".into(), "4".into()],
            correct: 1,
            hints: vec!["Count on your fingers.".into()],
        })
    }

    fn reorder() -> Question {
        Question::Reorder(ReorderPrompt {
            question: "Sort".into(),
            answer: vec!["a".into(), "b".into(), "c".into()],
            hints: Vec::new(),
        })
    }

    #[test]
    fn geometry_splits_main_and_side() {
        let g = DialogGeometry::compute(&DialogLayout::default(), VIEW);
        assert!((g.frame.size() - Vec2::new(1152.0, 720.0)).length() < 1e-2);
        assert!((g.main.w - (1152.0 - 48.0 - 18.0) * 0.78).abs() < 1e-3);
        assert!((g.side.x - (g.main.right() + 18.0)).abs() < 1e-3);
        assert!((g.side.right() - (g.frame.right() - 24.0)).abs() < 1e-3);
    }

    #[test]
    fn submit_reports_kind_and_result() {
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dialog = MiniGameDialog::new(DialogLayout::default());
        dialog.open(&mut ctx, choice(), VIEW, &mut rng);
        assert!(dialog.is_open());
        assert_eq!(dialog.submit(&mut ctx), None);
        dialog.select(&mut ctx, 1);
        assert_eq!(
            dialog.submit(&mut ctx),
            Some(DialogEvent::Answered {
                kind: MinigameKind::Choice,
                correct: true
            })
        );
        assert!(dialog.is_open());
    }

    #[test]
    fn close_button_closes_and_cleans_up() {
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dialog = MiniGameDialog::new(DialogLayout::default());
        dialog.open(&mut ctx, reorder(), VIEW, &mut rng);
        let close = ctx.scene.find_by_tag("dialog-close").unwrap().pos;
        assert_eq!(dialog.pointer_down(&mut ctx, close), Some(DialogEvent::Closed));
        assert!(!dialog.is_open());
        assert!(ctx.scene.is_empty());
        dialog.close(&mut ctx);
        assert_eq!(dialog.pointer_down(&mut ctx, close), None);
    }

    #[test]
    fn reopen_replaces_the_unit() {
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dialog = MiniGameDialog::new(DialogLayout::default());
        dialog.open(&mut ctx, choice(), VIEW, &mut rng);
        dialog.open(&mut ctx, reorder(), VIEW, &mut rng);
        assert_eq!(dialog.kind(), Some(MinigameKind::Reorder));
        assert!(ctx.scene.find_by_tag("choice-question").is_none());
        assert_eq!(ctx.scene.find_all_by_tag("dialog-frame").len(), 1);
    }

    #[test]
    fn resize_reopens_same_question_fresh() {
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dialog = MiniGameDialog::new(DialogLayout::default());
        dialog.open(&mut ctx, choice(), VIEW, &mut rng);
        dialog.select(&mut ctx, 0);

        dialog.resize(&mut ctx, Vec2::new(1000.0, 700.0), &mut rng);
        assert_eq!(dialog.question(), Some(&choice()));
        match dialog.minigame() {
            Some(Minigame::Choice(quiz)) => assert_eq!(quiz.selected(), None),
            other => panic!("unexpected unit: {other:?}"),
        }
        let frame = ctx.scene.find_by_tag("dialog-frame").unwrap();
        assert!((frame.size - Vec2::new(900.0, 630.0)).length() < 1e-2);
    }

    #[test]
    fn mentor_click_cycles_hints_without_answering() {
        let mut ctx = EngineContext::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dialog = MiniGameDialog::new(DialogLayout::default());
        dialog.open(&mut ctx, choice(), VIEW, &mut rng);
        let mentor = ctx.scene.find_by_tag("hint-mentor").unwrap().pos;
        assert_eq!(dialog.pointer_down(&mut ctx, mentor), None);
        assert!(dialog.is_open());
    }
}
