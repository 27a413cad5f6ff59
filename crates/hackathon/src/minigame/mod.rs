//! Interactive question widgets mounted inside the dialog.

pub mod choice;
pub mod reorder;

pub use choice::ChoiceQuestion;
pub use reorder::ReorderQuestion;

use glam::Vec2;
use hackday_engine::{EngineContext, Rect};
use rand::Rng;

use crate::npc::MinigameKind;
use crate::questions::Question;

pub(crate) const DEPTH: i32 = 10_200;
pub(crate) const SUBMIT_SIZE: Vec2 = Vec2::new(200.0, 56.0);

/// The unit currently mounted in the dialog.
#[derive(Debug)]
pub enum Minigame {
    Choice(ChoiceQuestion),
    Reorder(ReorderQuestion),
}

impl Minigame {
    pub fn mount<R: Rng + ?Sized>(
        ctx: &mut EngineContext,
        question: &Question,
        area: Rect,
        rng: &mut R,
    ) -> Self {
        match question {
            Question::Choice(prompt) => Minigame::Choice(ChoiceQuestion::mount(ctx, prompt, area)),
            Question::Reorder(prompt) => {
                Minigame::Reorder(ReorderQuestion::mount(ctx, prompt, area, rng))
            }
        }
    }

    pub fn kind(&self) -> MinigameKind {
        match self {
            Minigame::Choice(_) => MinigameKind::Choice,
            Minigame::Reorder(_) => MinigameKind::Reorder,
        }
    }

    /// Select a choice by index. Reorder puzzles ignore it.
    pub fn select(&mut self, ctx: &mut EngineContext, index: usize) {
        if let Minigame::Choice(quiz) = self {
            quiz.select(ctx, index);
        }
    }

    /// Grade the current answer; `None` when nothing is reported.
    pub fn submit(&mut self, ctx: &mut EngineContext) -> Option<bool> {
        match self {
            Minigame::Choice(quiz) => quiz.submit(ctx),
            Minigame::Reorder(quiz) => quiz.submit(ctx),
        }
    }

    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> Option<bool> {
        match self {
            Minigame::Choice(quiz) => quiz.pointer_down(ctx, point),
            Minigame::Reorder(quiz) => quiz.pointer_down(ctx, point),
        }
    }

    pub fn pointer_move(&mut self, ctx: &mut EngineContext, point: Vec2) {
        if let Minigame::Reorder(quiz) = self {
            quiz.pointer_move(ctx, point);
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut EngineContext, point: Vec2) {
        if let Minigame::Reorder(quiz) = self {
            quiz.pointer_up(ctx, point);
        }
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        match self {
            Minigame::Choice(quiz) => quiz.unmount(ctx),
            Minigame::Reorder(quiz) => quiz.unmount(ctx),
        }
    }
}
