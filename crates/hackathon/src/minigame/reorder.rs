use glam::Vec2;
use hackday_engine::{EngineContext, EntityId, LabelComponent, Rect, ShapeComponent};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::overlay::{hit, palette, set_fill, OwnedEntities};
use crate::questions::ReorderPrompt;

use super::{DEPTH, SUBMIT_SIZE};

const QUESTION_H: f32 = 72.0;
const REGION_GAP: f32 = 12.0;
const CARD_GAP: f32 = 8.0;
const MAX_CARD_H: f32 = 44.0;
const DRAG_LIFT: i32 = 5;

#[derive(Debug)]
struct Card {
    label: String,
    panel: EntityId,
    text: EntityId,
    /// Slot in the source area.
    home: Vec2,
    placed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    card: usize,
    grab_dy: f32,
}

/// Drag-and-drop ordering puzzle. Retry until correct, then it locks.
#[derive(Debug)]
pub struct ReorderQuestion {
    owned: OwnedEntities,
    target: Vec<String>,
    cards: Vec<Card>,
    drop_area: Rect,
    submit_button: EntityId,
    drag: Option<Drag>,
    locked: bool,
}

impl ReorderQuestion {
    pub fn mount<R: Rng + ?Sized>(
        ctx: &mut EngineContext,
        prompt: &ReorderPrompt,
        area: Rect,
        rng: &mut R,
    ) -> Self {
        let mut owned = OwnedEntities::new();
        let cx = area.center().x;
        owned.text(
            ctx,
            "reorder-question",
            Vec2::new(cx, area.y + QUESTION_H * 0.5),
            Vec2::new(area.w, QUESTION_H),
            DEPTH,
            LabelComponent::new(prompt.question.as_str(), 22.0, palette::INK),
        );

        let top = area.y + QUESTION_H + CARD_GAP;
        let bottom = area.bottom() - SUBMIT_SIZE.y - 3.0 * CARD_GAP;
        let region_h = ((bottom - top - REGION_GAP) * 0.5).max(0.0);
        let source_area = Rect::new(area.x, top, area.w, region_h);
        let drop_area = Rect::new(area.x, top + region_h + REGION_GAP, area.w, region_h);
        owned.panel(
            ctx,
            "reorder-source",
            source_area.center(),
            source_area.size(),
            DEPTH - 1,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(8.0),
        );
        owned.panel(
            ctx,
            "reorder-drop",
            drop_area.center(),
            drop_area.size(),
            DEPTH - 1,
            ShapeComponent::filled(palette::SELECTED)
                .with_alpha(0.35)
                .with_stroke(palette::BORDER)
                .with_radius(8.0),
        );

        let mut labels = prompt.answer.clone();
        labels.shuffle(rng);

        let n = labels.len().max(1) as f32;
        let card_h = ((region_h - CARD_GAP * (n + 1.0)) / n).clamp(1.0, MAX_CARD_H);
        let card_size = Vec2::new(area.w - 2.0 * CARD_GAP, card_h);
        let cards = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let top = source_area.y + CARD_GAP + i as f32 * (card_h + CARD_GAP);
                let home = Vec2::new(cx, top + card_h * 0.5);
                let panel = owned.panel(
                    ctx,
                    "reorder-card",
                    home,
                    card_size,
                    DEPTH,
                    ShapeComponent::filled(palette::BUTTON)
                        .with_stroke(palette::BORDER)
                        .with_radius(6.0),
                );
                let text = owned.text(
                    ctx,
                    "reorder-card-label",
                    home,
                    card_size,
                    DEPTH + 1,
                    LabelComponent::new(label.as_str(), 18.0, palette::INK),
                );
                Card {
                    label,
                    panel,
                    text,
                    home,
                    placed: false,
                }
            })
            .collect();

        let submit_center = Vec2::new(cx, area.bottom() - SUBMIT_SIZE.y * 0.5 - CARD_GAP);
        let submit_button = owned.panel(
            ctx,
            "reorder-submit",
            submit_center,
            SUBMIT_SIZE,
            DEPTH,
            ShapeComponent::filled(palette::BUTTON).with_stroke(palette::BORDER).with_radius(10.0),
        );
        owned.text(
            ctx,
            "reorder-submit-label",
            submit_center,
            SUBMIT_SIZE,
            DEPTH + 1,
            LabelComponent::new("Submit", 22.0, palette::INK),
        );

        Self {
            owned,
            target: prompt.answer.clone(),
            cards,
            drop_area,
            submit_button,
            drag: None,
            locked: false,
        }
    }

    pub fn drop_area(&self) -> Rect {
        self.drop_area
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn placed_count(&self) -> usize {
        self.cards.iter().filter(|c| c.placed).count()
    }

    /// Labels in their presented (shuffled) order.
    pub fn presented(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.label.as_str())
    }

    /// Where the card showing `label` currently sits.
    pub fn card_center(&self, ctx: &EngineContext, label: &str) -> Option<Vec2> {
        let card = self.cards.iter().find(|c| c.label == label)?;
        ctx.scene.get(card.panel).map(|e| e.pos)
    }

    /// Placed labels sorted top to bottom.
    pub fn submitted_order(&self, ctx: &EngineContext) -> Vec<&str> {
        let mut placed: Vec<(f32, &str)> = self
            .cards
            .iter()
            .filter(|c| c.placed)
            .filter_map(|c| ctx.scene.get(c.panel).map(|e| (e.pos.y, c.label.as_str())))
            .collect();
        placed.sort_by(|a, b| a.0.total_cmp(&b.0));
        placed.into_iter().map(|(_, label)| label).collect()
    }

    /// Grade the arrangement. `None` while any card is unplaced or once solved.
    pub fn submit(&mut self, ctx: &mut EngineContext) -> Option<bool> {
        if self.locked || self.cards.is_empty() || self.placed_count() < self.cards.len() {
            return None;
        }
        let submitted = self.submitted_order(ctx);
        let correct = submitted.iter().copied().eq(self.target.iter().map(String::as_str));
        let fill = if correct { palette::CORRECT } else { palette::WRONG };
        for card in &self.cards {
            set_fill(ctx, card.panel, fill);
        }
        self.locked = correct;
        Some(correct)
    }

    pub fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) -> Option<bool> {
        if self.locked {
            return None;
        }
        if hit(ctx, self.submit_button, point) {
            return self.submit(ctx);
        }
        // Last spawned draws on top.
        let grabbed = self.cards.iter().rposition(|c| hit(ctx, c.panel, point))?;
        let card = &self.cards[grabbed];
        let y = ctx.scene.get(card.panel).map_or(card.home.y, |e| e.pos.y);
        for id in [card.panel, card.text] {
            if let Some(e) = ctx.scene.get_mut(id) {
                e.depth += DRAG_LIFT;
            }
        }
        set_fill(ctx, card.panel, palette::SELECTED);
        self.drag = Some(Drag {
            card: grabbed,
            grab_dy: y - point.y,
        });
        None
    }

    /// Follow the pointer vertically; x stays pinned.
    pub fn pointer_move(&mut self, ctx: &mut EngineContext, point: Vec2) {
        let Some(drag) = self.drag else {
            return;
        };
        if let Some(card) = self.cards.get(drag.card) {
            for id in [card.panel, card.text] {
                if let Some(e) = ctx.scene.get_mut(id) {
                    e.pos.y = point.y + drag.grab_dy;
                }
            }
        }
    }

    pub fn pointer_up(&mut self, ctx: &mut EngineContext, point: Vec2) {
        self.pointer_move(ctx, point);
        let Some(drag) = self.drag.take() else {
            return;
        };
        let drop_area = self.drop_area;
        let Some(card) = self.cards.get_mut(drag.card) else {
            return;
        };
        let y = ctx.scene.get(card.panel).map_or(card.home.y, |e| e.pos.y);
        card.placed = drop_area.y < y && y < drop_area.bottom();
        for id in [card.panel, card.text] {
            if let Some(e) = ctx.scene.get_mut(id) {
                e.depth -= DRAG_LIFT;
                if !card.placed {
                    e.pos = card.home;
                }
            }
        }
        set_fill(ctx, card.panel, palette::BUTTON);
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        self.owned.clear(ctx);
        self.cards.clear();
        self.drag = None;
    }
}
