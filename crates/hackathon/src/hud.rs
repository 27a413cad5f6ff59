//! Countdown clock and completion bar pinned to the top-left corner.

use glam::Vec2;
use hackday_engine::{
    EngineContext, EntityId, LabelComponent, RenderLayer, ShapeComponent, TimerId,
};

use crate::overlay::{palette, set_text, OwnedEntities};

pub const BAR_W: f32 = 220.0;
const BAR_H: f32 = 16.0;
const BOX: Vec2 = Vec2::new(330.0, 48.0);
const MARGIN: f32 = 16.0;
const DEPTH: i32 = 5_000;

/// Result of routing a timer id to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Not the clock's timer.
    Ignored,
    Ticked(u32),
    /// The countdown just reached zero. Reported once per `start`.
    TimeUp,
}

/// `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Default)]
pub struct ScoreBoard {
    owned: OwnedEntities,
    clock: Option<EntityId>,
    fill: Option<EntityId>,
    bar_left: f32,
    remaining: u32,
    progress: f32,
    timer: Option<TimerId>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Filled width of the completion bar.
    pub fn bar_width(&self) -> f32 {
        (BAR_W * self.progress).floor()
    }

    pub fn mount(&mut self, ctx: &mut EngineContext) {
        if self.clock.is_some() {
            return;
        }
        let origin = Vec2::splat(MARGIN);
        let center = origin + BOX * 0.5;
        self.hud_shape(
            ctx,
            "hud-box",
            center,
            BOX,
            DEPTH,
            ShapeComponent::filled(palette::PAPER).with_stroke(palette::BORDER).with_radius(8.0),
        );

        let clock_center = Vec2::new(origin.x + 48.0, center.y);
        let clock = self.owned.spawn(ctx, |e| {
            e.with_tag("hud-clock")
                .with_pos(clock_center)
                .with_size(Vec2::new(80.0, BOX.y))
                .with_depth(DEPTH + 1)
                .with_layer(RenderLayer::Hud)
                .with_label(LabelComponent::new(format_clock(0), 24.0, palette::INK))
        });

        self.bar_left = origin.x + BOX.x - BAR_W - 12.0;
        let track = Vec2::new(self.bar_left + BAR_W * 0.5, center.y);
        self.hud_shape(
            ctx,
            "hud-bar-track",
            track,
            Vec2::new(BAR_W, BAR_H),
            DEPTH + 1,
            ShapeComponent::filled(palette::BUTTON).with_radius(4.0),
        );
        let fill = self.hud_shape(
            ctx,
            "hud-bar-fill",
            Vec2::new(self.bar_left, center.y),
            Vec2::new(0.0, BAR_H),
            DEPTH + 2,
            ShapeComponent::filled(palette::CORRECT).with_radius(4.0),
        );
        self.clock = Some(clock);
        self.fill = Some(fill);
        self.redraw_clock(ctx);
        self.redraw_bar(ctx);
    }

    fn hud_shape(
        &mut self,
        ctx: &mut EngineContext,
        tag: &str,
        center: Vec2,
        size: Vec2,
        depth: i32,
        shape: ShapeComponent,
    ) -> EntityId {
        self.owned.spawn(ctx, |e| {
            e.with_tag(tag)
                .with_pos(center)
                .with_size(size)
                .with_depth(depth)
                .with_layer(RenderLayer::Hud)
                .with_shape(shape)
        })
    }

    /// (Re)start the countdown from `total` seconds.
    pub fn start(&mut self, ctx: &mut EngineContext, total: u32) {
        self.stop_timer(ctx);
        self.remaining = total;
        self.redraw_clock(ctx);
        if total > 0 {
            self.timer = Some(ctx.timers.every(1.0));
        }
    }

    pub fn stop_timer(&mut self, ctx: &mut EngineContext) {
        if let Some(timer) = self.timer.take() {
            ctx.timers.cancel(timer);
        }
    }

    pub fn on_timer(&mut self, ctx: &mut EngineContext, timer: TimerId) -> ClockTick {
        if self.timer != Some(timer) {
            return ClockTick::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.redraw_clock(ctx);
        if self.remaining > 0 {
            return ClockTick::Ticked(self.remaining);
        }
        self.stop_timer(ctx);
        ClockTick::TimeUp
    }

    pub fn set_progress(&mut self, ctx: &mut EngineContext, progress: f32) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        self.redraw_bar(ctx);
    }

    /// `done / total`, or zero when there is nothing to count.
    pub fn set_progress_by_count(&mut self, ctx: &mut EngineContext, done: i32, total: i32) {
        let progress = if total <= 0 { 0.0 } else { done as f32 / total as f32 };
        self.set_progress(ctx, progress);
    }

    pub fn unmount(&mut self, ctx: &mut EngineContext) {
        self.stop_timer(ctx);
        self.owned.clear(ctx);
        self.clock = None;
        self.fill = None;
    }

    fn redraw_clock(&self, ctx: &mut EngineContext) {
        if let Some(clock) = self.clock {
            set_text(ctx, clock, &format_clock(self.remaining));
        }
    }

    fn redraw_bar(&self, ctx: &mut EngineContext) {
        let width = self.bar_width();
        if let Some(fill) = self.fill.and_then(|id| ctx.scene.get_mut(id)) {
            fill.size.x = width;
            fill.pos.x = self.bar_left + width * 0.5;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clock_text(ctx: &EngineContext) -> String {
        ctx.scene
            .find_by_tag("hud-clock")
            .and_then(|e| e.label.as_ref())
            .map(|l| l.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(180), "3:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn counts_down_and_reports_time_up_once() {
        let mut ctx = EngineContext::new();
        let mut hud = ScoreBoard::new();
        hud.mount(&mut ctx);
        hud.start(&mut ctx, 3);
        assert_eq!(clock_text(&ctx), "0:03");

        let mut ticks = Vec::new();
        for _ in 0..6 {
            for id in ctx.advance(1.0) {
                ticks.push(hud.on_timer(&mut ctx, id));
            }
        }
        assert_eq!(ticks, vec![ClockTick::Ticked(2), ClockTick::Ticked(1), ClockTick::TimeUp]);
        assert_eq!(clock_text(&ctx), "0:00");
        assert!(!hud.is_running());
    }

    #[test]
    fn restart_replaces_the_timer() {
        let mut ctx = EngineContext::new();
        let mut hud = ScoreBoard::new();
        hud.start(&mut ctx, 10);
        hud.start(&mut ctx, 10);
        assert_eq!(ctx.timers.len(), 1);
        hud.stop_timer(&mut ctx);
        assert!(ctx.timers.is_empty());
    }

    #[test]
    fn progress_by_count_handles_empty_total() {
        let mut ctx = EngineContext::new();
        let mut hud = ScoreBoard::new();
        hud.set_progress_by_count(&mut ctx, 3, 0);
        assert_eq!(hud.progress(), 0.0);
        hud.set_progress_by_count(&mut ctx, 1, 4);
        assert_eq!(hud.progress(), 0.25);
        assert_eq!(hud.bar_width(), 55.0);
    }

    #[test]
    fn fill_tracks_progress() {
        let mut ctx = EngineContext::new();
        let mut hud = ScoreBoard::new();
        hud.mount(&mut ctx);
        hud.set_progress(&mut ctx, 0.5);
        let fill = ctx.scene.find_by_tag("hud-bar-fill").unwrap();
        assert_eq!(fill.size.x, 110.0);
        hud.unmount(&mut ctx);
        assert!(ctx.scene.is_empty());
    }

    proptest! {
        #[test]
        fn progress_always_clamped(p in -10.0f32..10.0) {
            let mut ctx = EngineContext::new();
            let mut hud = ScoreBoard::new();
            hud.set_progress(&mut ctx, p);
            prop_assert!((0.0..=1.0).contains(&hud.progress()));
            prop_assert!(hud.bar_width() <= BAR_W);
        }
    }
}
