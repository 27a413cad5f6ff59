use glam::Vec2;
use hackday_engine::{EngineContext, EntityId, LabelComponent, Rect, ShapeComponent};

use crate::overlay::{hit, palette, set_fill, OwnedEntities};
use crate::questions::ChoicePrompt;

use super::{DEPTH, SUBMIT_SIZE};

const ROW_H: f32 = 52.0;
const ROW_GAP: f32 = 12.0;
const QUESTION_H: f32 = 84.0;

/// Multiple-choice quiz. One submission, then it locks.
#[derive(Debug)]
pub struct ChoiceQuestion {
    owned: OwnedEntities,
    rows: Vec<EntityId>,
    submit_button: EntityId,
    correct: usize,
    selected: Option<usize>,
    locked: bool,
}

impl ChoiceQuestion {
    pub fn mount(ctx: &mut EngineContext, prompt: &ChoicePrompt, area: Rect) -> Self {
        let mut owned = OwnedEntities::new();
        let cx = area.center().x;
        owned.text(
            ctx,
            "choice-question",
            Vec2::new(cx, area.y + QUESTION_H * 0.5),
            Vec2::new(area.w, QUESTION_H),
            DEPTH,
            LabelComponent::new(prompt.question.as_str(), 24.0, palette::INK),
        );

        let row_size = Vec2::new(area.w - 40.0, ROW_H);
        let mut rows = Vec::with_capacity(prompt.choices.len());
        for (i, choice) in prompt.choices.iter().enumerate() {
            let y = area.y + QUESTION_H + ROW_GAP + ROW_H * 0.5 + i as f32 * (ROW_H + ROW_GAP);
            let center = Vec2::new(cx, y);
            let row = owned.panel(
                ctx,
                "choice-option",
                center,
                row_size,
                DEPTH,
                ShapeComponent::filled(palette::BUTTON)
                    .with_stroke(palette::BORDER)
                    .with_radius(8.0),
            );
            owned.text(
                ctx,
                "choice-option-label",
                center,
                row_size,
                DEPTH + 1,
                LabelComponent::new(format!("{}. {choice}", i + 1), 20.0, palette::INK),
            );
            rows.push(row);
        }

        let submit_center = Vec2::new(cx, area.bottom() - SUBMIT_SIZE.y * 0.5 - 8.0);
        let submit_button = owned.panel(
            ctx,
            "choice-submit",
            submit_center,
            SUBMIT_SIZE,
            DEPTH,
            ShapeComponent::filled(palette::BUTTON).with_stroke(palette::BORDER).with_radius(10.0),
        );
        owned.text(
            ctx,
            "choice-submit-label",
            submit_center,
            SUBMIT_SIZE,
            DEPTH + 1,
            LabelComponent::new("Submit", 22.0, palette::INK),
        );

        Self {
            owned,
            rows,
            submit_button,
            correct: prompt.correct,
            selected: None,
            locked: false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Highlight `index` and clear the previous selection.
    pub fn select(&mut self, ctx: &mut EngineContext, index: usize) {
        if self.locked || index >= self.rows.len() {
            return;
        }
        if let Some(&prev) = self.selected.and_then(|i| self.rows.get(i)) {
            set_fill(ctx, prev, palette::BUTTON);
        }
        set_fill(ctx, self.rows[index], palette::SELECTED);
        self.selected = Some(index);
    }

    /// Grade the selection. `None` without a selection or once locked.
    pub fn submit(&mut self, ctx: &mut EngineContext) -> Option<bool> {
        if self.locked {
            return None;
        }
        let selected = self.selected?;
        self.locked = true;
        if let Some(&row) = self.rows.get(self.correct) {
            set_fill(ctx, row, palette::CORRECT);
        }
        let correct = selected == self.correct;
        if let (false, Some(&row)) = (correct, self.rows.get(selected)) {
            set_fill(ctx, row, palette::WRONG);
        }
        Some(correct)
    }

    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> Option<bool> {
        if hit(ctx, self.submit_button, point) {
            return self.submit(ctx);
        }
        if let Some(index) = self.rows.iter().position(|&row| hit(ctx, row, point)) {
            self.select(ctx, index);
        }
        None
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        self.owned.clear(ctx);
        self.rows.clear();
        self.selected = None;
    }
}
