//! Idle nudges and random NPC alerts. Both stay quiet while any overlay is up.

use hackday_engine::{EngineContext, TimerId};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::SessionConfig;
use crate::npc::NpcId;

/// Something the session should surface as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    IdleNudge,
    Alert(NpcId),
}

#[derive(Debug, Clone, Copy)]
struct Tuning {
    poll: f32,
    idle_threshold: f64,
    idle_cooldown: f64,
    alert_min: f32,
    alert_max: f32,
    alert_chance: f64,
    alert_cooldown: f64,
}

#[derive(Debug)]
pub struct InterruptScheduler {
    tuning: Tuning,
    rng: Pcg32,
    idle_poll: Option<TimerId>,
    alert: Option<TimerId>,
    last_activity: f64,
    last_idle_nudge: Option<f64>,
    last_alert: Option<f64>,
}

impl InterruptScheduler {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            tuning: Tuning {
                poll: config.idle_poll_interval,
                idle_threshold: config.idle_threshold as f64,
                idle_cooldown: config.idle_cooldown as f64,
                alert_min: config.alert_min_delay.min(config.alert_max_delay),
                alert_max: config.alert_max_delay.max(config.alert_min_delay),
                alert_chance: config.alert_chance.clamp(0.0, 1.0),
                alert_cooldown: config.alert_cooldown as f64,
            },
            // Separate stream from the card shuffles.
            rng: Pcg32::seed_from_u64(config.seed ^ 0x616c_6572_7473),
            idle_poll: None,
            alert: None,
            last_activity: 0.0,
            last_idle_nudge: None,
            last_alert: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.idle_poll.is_some()
    }

    pub fn last_activity(&self) -> f64 {
        self.last_activity
    }

    /// Arm both timers, forgetting any previous history.
    pub fn start(&mut self, ctx: &mut EngineContext) {
        self.stop(ctx);
        self.last_activity = ctx.timers.now();
        self.last_idle_nudge = None;
        self.last_alert = None;
        self.idle_poll = Some(ctx.timers.every(self.tuning.poll));
        self.schedule_alert(ctx);
    }

    pub fn stop(&mut self, ctx: &mut EngineContext) {
        for timer in [self.idle_poll.take(), self.alert.take()].into_iter().flatten() {
            ctx.timers.cancel(timer);
        }
    }

    /// The player moved this tick.
    pub fn note_activity(&mut self, now: f64) {
        self.last_activity = now;
    }

    /// Route a fired timer. `suppressed` is true while an overlay is open;
    /// the alert loop still reschedules itself.
    pub fn on_timer(
        &mut self,
        ctx: &mut EngineContext,
        timer: TimerId,
        npc_count: usize,
        suppressed: bool,
    ) -> Option<Interrupt> {
        let now = ctx.timers.now();
        if self.idle_poll == Some(timer) {
            if suppressed || now - self.last_activity <= self.tuning.idle_threshold {
                return None;
            }
            if self.last_idle_nudge.is_some_and(|t| now - t <= self.tuning.idle_cooldown) {
                return None;
            }
            self.last_idle_nudge = Some(now);
            return Some(Interrupt::IdleNudge);
        }
        if self.alert != Some(timer) {
            return None;
        }
        self.schedule_alert(ctx);
        if suppressed || npc_count == 0 {
            return None;
        }
        if self.last_alert.is_some_and(|t| now - t <= self.tuning.alert_cooldown) {
            return None;
        }
        if !self.rng.random_bool(self.tuning.alert_chance) {
            trace!("alert roll failed");
            return None;
        }
        self.last_alert = Some(now);
        Some(Interrupt::Alert(NpcId(self.rng.random_range(0..npc_count))))
    }

    fn schedule_alert(&mut self, ctx: &mut EngineContext) {
        let delay = self.rng.random_range(self.tuning.alert_min..=self.tuning.alert_max);
        self.alert = Some(ctx.timers.after(delay));
    }
}
