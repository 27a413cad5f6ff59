//! The per-round controller: movement, NPC proximity, the talk → fetch →
//! dialog flow, scoring, the countdown and interrupts.
//!
//! Everything happens inside [`SessionController::tick`], in a fixed order:
//! input and answers, fetch completions, movement, proximity, talk prompt,
//! interact, then timers. Answers are handled before timers so a winning
//! answer on the last second beats the clock.

use glam::Vec2;
use hackday_engine::{
    EngineContext, EntityId, Game, GameConfig, GameEvent, InputEvent, InputQueue, KeyState,
    Kinematics, LabelComponent, RenderLayer, SpriteComponent, TimerId,
};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{ProgressMode, SessionConfig};
use crate::dialog::{DialogEvent, MiniGameDialog};
use crate::hud::{ClockTick, ScoreBoard};
use crate::interrupts::{Interrupt, InterruptScheduler};
use crate::layout::{
    world_bounds, NpcSlot, NPC_SLOTS, PLAYER_BODY_HALF, PLAYER_SPAWN, PROMPT_RISE, SOLIDS, WORLD_H,
    WORLD_W,
};
use crate::npc::{MinigameKind, NpcId, Roster};
use crate::overlay::{LoadingOverlay, ResultAction, ResultKind, ResultOverlay, TransientNotice};
use crate::player::{Player, Steering};
use crate::questions::{PlayerProfile, Question, QuestionFeed};
use crate::repository::{Completion, QuestionRepository};

/// Browser key codes the session reacts to.
pub mod keys {
    pub const LEFT: u32 = 37;
    pub const UP: u32 = 38;
    pub const RIGHT: u32 = 39;
    pub const DOWN: u32 = 40;
    pub const INTERACT: u32 = 69;
    pub const ESCAPE: u32 = 27;
}

/// Custom input kinds (shell → session).
pub mod events {
    /// `a` = zero-based choice index.
    pub const SELECT_OPTION: u32 = 1;
    pub const SUBMIT: u32 = 2;
    pub const CLOSE_DIALOG: u32 = 3;
    pub const PLAY_AGAIN: u32 = 4;
    pub const QUIT: u32 = 5;
    /// `a`, `b` = new viewport width and height.
    pub const RESIZE: u32 = 6;
    pub const RETRY_QUESTIONS: u32 = 7;
    pub const NEXT_HINT: u32 = 8;
}

/// Game event kinds (session → shell).
pub mod game_events {
    /// `a` = progress, `b` = remaining seconds.
    pub const PROGRESS: f32 = 1.0;
    pub const VICTORY: f32 = 2.0;
    pub const ROUND_EXPIRED: f32 = 3.0;
    pub const QUIT: f32 = 4.0;
    pub const FETCH_ERROR: f32 = 5.0;
}

/// Sound ids (session → shell).
pub mod sounds {
    use hackday_engine::SoundEvent;

    pub const MUSIC_START: SoundEvent = SoundEvent(1);
    pub const MUSIC_STOP: SoundEvent = SoundEvent(2);
    pub const CORRECT: SoundEvent = SoundEvent(3);
    pub const WRONG: SoundEvent = SoundEvent(4);
    pub const VICTORY: SoundEvent = SoundEvent(5);
    pub const TIME_UP: SoundEvent = SoundEvent(6);
}

const TALK_PROMPT: &str = "Press E to talk";
const IDLE_MESSAGE: &str = "Stuck? Walk up to someone and press E. The judges won't wait forever!";
const ERROR_MESSAGE: &str = "Couldn't reach the question bank. Hit retry and try again.";

/// Round-level hooks for the host.
pub trait SessionObserver {
    fn on_victory(&mut self) {}
    fn on_expired(&mut self) {}
}

impl SessionObserver for () {}

/// Externally visible round state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub progress: f32,
    pub has_won: bool,
    /// Bumped on every new wait and every cancellation; never reset.
    pub fetch_token: u64,
    pub nearest_npc: Option<NpcId>,
    pub error: Option<String>,
    pub challenges_done: u32,
}

pub struct SessionController<K: Kinematics, R: QuestionRepository> {
    config: SessionConfig,
    profile: PlayerProfile,
    slots: Vec<NpcSlot>,
    body: K,
    repo: R,
    observer: Box<dyn SessionObserver>,
    rng: Pcg32,
    keys: KeyState,
    viewport: Vec2,
    fixed_dt: f32,

    player: Option<Player>,
    roster: Roster,
    floor: Option<EntityId>,
    prompt: Option<EntityId>,
    dialog: MiniGameDialog,
    loading: LoadingOverlay,
    result: ResultOverlay,
    notice: TransientNotice,
    hud: ScoreBoard,
    interrupts: InterruptScheduler,

    state: SessionState,
    /// NPC whose question we're waiting on.
    waiting_for: Option<NpcId>,
    /// NPC whose question is in the dialog.
    talking_to: Option<NpcId>,
    running: bool,
}

impl<K: Kinematics, R: QuestionRepository> SessionController<K, R> {
    pub fn new(config: SessionConfig, profile: PlayerProfile, body: K, repo: R) -> Self {
        let viewport = Vec2::new(config.viewport_width, config.viewport_height);
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            dialog: MiniGameDialog::new(config.dialog),
            interrupts: InterruptScheduler::new(&config),
            slots: NPC_SLOTS.to_vec(),
            profile,
            body,
            repo,
            observer: Box::new(()),
            keys: KeyState::new(),
            viewport,
            fixed_dt: GameConfig::default().fixed_dt,
            player: None,
            roster: Roster::default(),
            floor: None,
            prompt: None,
            loading: LoadingOverlay::new(),
            result: ResultOverlay::new(),
            notice: TransientNotice::new(),
            hud: ScoreBoard::new(),
            state: SessionState::default(),
            waiting_for: None,
            talking_to: None,
            running: false,
            config,
        }
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Use a different NPC roster. Takes effect on the next `init`.
    pub fn with_npcs(mut self, slots: &[NpcSlot]) -> Self {
        self.slots = slots.to_vec();
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn player_position(&self) -> Vec2 {
        self.body.position()
    }

    pub fn body(&self) -> &K {
        &self.body
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn dialog(&self) -> &MiniGameDialog {
        &self.dialog
    }

    pub fn hud(&self) -> &ScoreBoard {
        &self.hud
    }

    pub fn result(&self) -> Option<ResultKind> {
        self.result.kind()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_mounted()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.message()
    }

    /// Any overlay that freezes the player.
    pub fn overlay_open(&self) -> bool {
        self.dialog.is_open() || self.loading.is_mounted() || self.result.is_mounted()
    }

    // -- Lifecycle --

    /// Build the venue, spawn everyone and start the clock.
    pub fn init(&mut self, ctx: &mut EngineContext) {
        if self.running {
            self.teardown(ctx);
        }
        self.body.reset();
        self.body.set_bounds(world_bounds());
        for solid in SOLIDS {
            self.body.add_static(solid);
        }
        self.floor = Some(ctx.spawn_with(|e| {
            e.with_tag("venue")
                .with_pos(Vec2::new(WORLD_W, WORLD_H) * 0.5)
                .with_size(Vec2::new(WORLD_W, WORLD_H))
                .with_layer(RenderLayer::Floor)
                .with_sprite(SpriteComponent::new("venue"))
        }));
        self.roster = Roster::spawn(ctx, &mut self.body, &self.slots);
        self.body.spawn_body(PLAYER_SPAWN, PLAYER_BODY_HALF);
        let scale = self.config.player_scale;
        self.player = Some(Player::spawn(ctx, &self.profile.username, PLAYER_SPAWN, scale));
        self.prompt = Some(ctx.spawn_with(|e| {
            e.with_tag("talk-prompt")
                .with_size(Vec2::new(200.0, 24.0))
                .with_depth(50)
                .with_layer(RenderLayer::Actors)
                .with_visible(false)
                .with_label(LabelComponent::new(TALK_PROMPT, 20.0, 0xffffff))
        }));

        let token = self.state.fetch_token;
        self.state = SessionState {
            fetch_token: token,
            ..SessionState::default()
        };
        self.waiting_for = None;
        self.talking_to = None;
        self.keys.release_all();
        self.repo.reset();

        self.hud.mount(ctx);
        self.hud.set_progress(ctx, 0.0);
        self.hud.start(ctx, self.config.round_seconds);
        self.interrupts.start(ctx);
        ctx.emit_sound(sounds::MUSIC_START);
        self.running = true;
        info!(
            "round started: {}s, {} npcs, player {:?}",
            self.config.round_seconds,
            self.roster.len(),
            self.profile.username
        );
    }

    /// Release everything the session spawned. Safe to call twice.
    pub fn teardown(&mut self, ctx: &mut EngineContext) {
        if !self.running {
            return;
        }
        self.dialog.close(ctx);
        self.loading.unmount(ctx);
        self.result.unmount(ctx);
        self.notice.hide(ctx);
        self.hud.unmount(ctx);
        self.interrupts.stop(ctx);
        self.roster.despawn(ctx);
        if let Some(player) = self.player.take() {
            player.despawn(ctx);
        }
        for id in [self.prompt.take(), self.floor.take()].into_iter().flatten() {
            ctx.despawn(id);
        }
        self.body.reset();
        // Anything still in flight is stale from here on.
        self.state.fetch_token += 1;
        self.waiting_for = None;
        self.talking_to = None;
        ctx.emit_sound(sounds::MUSIC_STOP);
        self.running = false;
        info!("round torn down");
    }

    /// Play again: a clean round with the same config.
    pub fn restart(&mut self, ctx: &mut EngineContext) {
        info!("restarting round");
        self.teardown(ctx);
        self.init(ctx);
    }

    fn quit(&mut self, ctx: &mut EngineContext) {
        self.teardown(ctx);
        ctx.emit_event(GameEvent::new(game_events::QUIT));
    }

    // -- Tick --

    pub fn tick(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) {
        if !self.running {
            return;
        }
        self.keys.apply(input);
        for event in input.iter() {
            self.handle_input(ctx, *event);
            if !self.running {
                return;
            }
        }

        for completion in self.repo.poll() {
            self.handle_completion(ctx, completion);
        }

        let frozen = self.overlay_open();
        let vel = if frozen {
            Vec2::ZERO
        } else {
            Steering {
                left: self.keys.is_down(keys::LEFT),
                right: self.keys.is_down(keys::RIGHT),
                up: self.keys.is_down(keys::UP),
                down: self.keys.is_down(keys::DOWN),
            }
            .velocity(self.config.player_speed)
        };
        self.body.set_velocity(vel);
        self.body.step(dt);
        let pos = self.body.position();
        if let Some(player) = &mut self.player {
            if !frozen {
                player.animate(ctx, vel);
            }
            player.place(ctx, pos);
        }
        if vel != Vec2::ZERO {
            self.interrupts.note_activity(ctx.timers.now());
        }

        let nearest = self.roster.nearest(pos, self.config.interaction_radius);
        if self.waiting_for.is_some() && self.waiting_for != nearest {
            debug!("walked away while loading; cancelling wait");
            self.cancel_wait(ctx);
        }
        self.state.nearest_npc = nearest;
        self.update_prompt(ctx, nearest);

        if self.keys.just_pressed(keys::INTERACT) {
            if let Some(npc) = nearest {
                self.interact(ctx, npc);
            }
        }

        for timer in ctx.advance(dt) {
            self.dispatch_timer(ctx, timer);
            if !self.running {
                return;
            }
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(ctx, Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.dialog.pointer_move(ctx, Vec2::new(x, y)),
            InputEvent::PointerUp { x, y } => self.dialog.pointer_up(ctx, Vec2::new(x, y)),
            InputEvent::KeyDown { key_code: keys::ESCAPE } => self.dismiss(ctx),
            InputEvent::KeyDown { .. } | InputEvent::KeyUp { .. } => {}
            InputEvent::Custom { kind, a, b, .. } => self.handle_custom(ctx, kind, a, b),
        }
    }

    fn handle_custom(&mut self, ctx: &mut EngineContext, kind: u32, a: f32, b: f32) {
        match kind {
            events::SELECT_OPTION if a >= 0.0 => self.dialog.select(ctx, a as usize),
            events::SUBMIT => {
                if let Some(event) = self.dialog.submit(ctx) {
                    self.on_dialog_event(ctx, event);
                }
            }
            events::CLOSE_DIALOG => self.dismiss(ctx),
            events::PLAY_AGAIN if self.result.is_mounted() => self.restart(ctx),
            events::QUIT => self.quit(ctx),
            events::RESIZE => self.resize(ctx, Vec2::new(a, b)),
            events::RETRY_QUESTIONS => self.retry_questions(),
            events::NEXT_HINT => self.dialog.next_hint(ctx),
            _ => debug!("ignored custom event {kind}"),
        }
    }

    fn pointer_down(&mut self, ctx: &mut EngineContext, point: Vec2) {
        if self.result.is_mounted() {
            match self.result.pointer_down(ctx, point) {
                Some(ResultAction::PlayAgain) => self.restart(ctx),
                Some(ResultAction::Quit) => self.quit(ctx),
                None => {}
            }
            return;
        }
        if self.notice.pointer_down(ctx, point) {
            return;
        }
        if let Some(event) = self.dialog.pointer_down(ctx, point) {
            self.on_dialog_event(ctx, event);
        }
    }

    fn on_dialog_event(&mut self, ctx: &mut EngineContext, event: DialogEvent) {
        match event {
            DialogEvent::Closed => self.talking_to = None,
            DialogEvent::Answered { kind, correct } => self.record_outcome(ctx, kind, correct),
        }
    }

    /// Close the dialog, or stop waiting for a question.
    fn dismiss(&mut self, ctx: &mut EngineContext) {
        if self.dialog.is_open() {
            self.dialog.close(ctx);
            self.talking_to = None;
        } else if self.loading.is_mounted() {
            self.cancel_wait(ctx);
        }
    }

    fn resize(&mut self, ctx: &mut EngineContext, viewport: Vec2) {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return;
        }
        self.viewport = viewport;
        self.dialog.resize(ctx, viewport, &mut self.rng);
        self.result.relayout(ctx, viewport);
        self.notice.relayout(ctx, viewport);
        if self.loading.is_mounted() {
            self.loading.unmount(ctx);
            self.loading.mount(ctx, viewport);
        }
    }

    /// Forget recorded fetch failures so the next talk tries again.
    pub fn retry_questions(&mut self) {
        for feed in QuestionFeed::ALL {
            self.repo.clear_error(feed);
        }
        self.state.error = None;
    }

    // -- Talk → fetch → dialog --

    fn update_prompt(&mut self, ctx: &mut EngineContext, nearest: Option<NpcId>) {
        let Some(prompt) = self.prompt else {
            return;
        };
        let anchor = nearest.and_then(|id| self.roster.get(id)).map(|npc| npc.pos);
        if let Some(e) = ctx.scene.get_mut(prompt) {
            e.visible = anchor.is_some();
            if let Some(pos) = anchor {
                e.pos = Vec2::new(pos.x, pos.y - PROMPT_RISE);
            }
        }
    }

    fn interact(&mut self, ctx: &mut EngineContext, npc: NpcId) {
        if self.dialog.is_open() || self.result.is_mounted() {
            return;
        }
        let Some(feed) = self.roster.get(npc).map(|n| n.feed) else {
            return;
        };
        if let Some(err) = self.repo.error(feed) {
            debug!("{feed:?} has a recorded failure; waiting for retry");
            self.fail(ctx, err);
            return;
        }
        if !self.repo.is_loading(feed) {
            if let Some(question) = self.repo.question(feed) {
                self.open_dialog(ctx, npc, question);
                return;
            }
        }
        self.state.fetch_token += 1;
        self.waiting_for = Some(npc);
        self.loading.mount(ctx, self.viewport);
        debug!("waiting on {feed:?} with token {}", self.state.fetch_token);
        self.repo.request(feed, &self.profile, self.state.fetch_token);
    }

    fn handle_completion(&mut self, ctx: &mut EngineContext, completion: Completion) {
        if completion.token != self.state.fetch_token || self.waiting_for.is_none() {
            debug!(
                "discarding stale {:?} completion (token {})",
                completion.feed, completion.token
            );
            // Nobody was waiting, so the failure must not block the next talk.
            if completion.outcome.is_err() {
                self.repo.clear_error(completion.feed);
            }
            return;
        }
        self.loading.unmount(ctx);
        let Some(npc) = self.waiting_for.take() else {
            return;
        };
        match completion.outcome {
            Ok(()) => match self.repo.question(completion.feed) {
                Some(question) => self.open_dialog(ctx, npc, question),
                None => warn!("{:?} completed without a question", completion.feed),
            },
            Err(err) => {
                warn!("{:?} fetch failed: {err}", completion.feed);
                self.fail(ctx, err.to_string());
            }
        }
    }

    fn fail(&mut self, ctx: &mut EngineContext, error: String) {
        self.state.error = Some(error);
        self.notice.show(ctx, ERROR_MESSAGE, self.viewport, self.config.notice_duration);
        ctx.emit_event(GameEvent::new(game_events::FETCH_ERROR));
    }

    fn cancel_wait(&mut self, ctx: &mut EngineContext) {
        self.state.fetch_token += 1;
        self.waiting_for = None;
        self.loading.unmount(ctx);
    }

    fn open_dialog(&mut self, ctx: &mut EngineContext, npc: NpcId, question: Question) {
        self.notice.hide(ctx);
        self.dialog.open(ctx, question, self.viewport, &mut self.rng);
        self.talking_to = Some(npc);
    }

    // -- Scoring --

    /// Apply one graded answer. Ignored once the round is won.
    pub fn record_outcome(&mut self, ctx: &mut EngineContext, kind: MinigameKind, correct: bool) {
        if self.state.has_won || !self.running {
            return;
        }
        // A choice locks after any answer; a reorder only once solved.
        if correct || kind == MinigameKind::Choice {
            if let Some(feed) = self.talking_to.and_then(|id| self.roster.get(id)).map(|n| n.feed) {
                self.repo.consume(feed);
            }
        }
        if !correct {
            ctx.emit_sound(sounds::WRONG);
            return;
        }
        ctx.emit_sound(sounds::CORRECT);
        self.state.challenges_done += 1;
        match self.config.progress {
            ProgressMode::PerKind { .. } => {
                let inc = self.config.progress.increment(kind).unwrap_or(0.0);
                self.hud.set_progress(ctx, self.state.progress + inc);
            }
            ProgressMode::PerChallenge { total } => {
                let done = i32::try_from(self.state.challenges_done).unwrap_or(i32::MAX);
                let total = i32::try_from(total).unwrap_or(i32::MAX);
                self.hud.set_progress_by_count(ctx, done, total);
            }
        }
        self.state.progress = self.hud.progress();
        debug!("correct {kind:?}; progress {:.2}", self.state.progress);
        ctx.emit_event(GameEvent::with_payload(
            game_events::PROGRESS,
            self.state.progress,
            self.hud.remaining() as f32,
            0.0,
        ));
        if self.state.progress >= 1.0 {
            self.win(ctx);
        }
    }

    fn win(&mut self, ctx: &mut EngineContext) {
        if self.state.has_won {
            return;
        }
        self.state.has_won = true;
        info!("round won with {}s left", self.hud.remaining());
        self.hud.stop_timer(ctx);
        self.observer.on_victory();
        ctx.emit_event(GameEvent::new(game_events::VICTORY));
        ctx.emit_sound(sounds::VICTORY);
        self.close_everything(ctx);
        self.result.mount(ctx, ResultKind::Won, self.viewport);
    }

    fn expire(&mut self, ctx: &mut EngineContext) {
        if self.state.has_won || self.result.is_mounted() {
            return;
        }
        info!("round expired at progress {:.2}", self.state.progress);
        self.observer.on_expired();
        ctx.emit_event(GameEvent::new(game_events::ROUND_EXPIRED));
        ctx.emit_sound(sounds::TIME_UP);
        self.close_everything(ctx);
        self.result.mount(ctx, ResultKind::TimeUp, self.viewport);
    }

    fn close_everything(&mut self, ctx: &mut EngineContext) {
        self.dialog.close(ctx);
        self.talking_to = None;
        if self.waiting_for.is_some() {
            self.cancel_wait(ctx);
        }
        self.notice.hide(ctx);
    }

    // -- Timers --

    fn dispatch_timer(&mut self, ctx: &mut EngineContext, timer: TimerId) {
        match self.hud.on_timer(ctx, timer) {
            ClockTick::Ignored => {}
            ClockTick::Ticked(_) => return,
            ClockTick::TimeUp => {
                self.expire(ctx);
                return;
            }
        }
        if self.loading.on_timer(ctx, timer) || self.notice.on_timer(ctx, timer) {
            return;
        }
        let suppressed = self.overlay_open();
        match self.interrupts.on_timer(ctx, timer, self.roster.len(), suppressed) {
            Some(Interrupt::IdleNudge) => {
                debug!("idle nudge");
                self.notice.show(ctx, IDLE_MESSAGE, self.viewport, self.config.notice_duration);
            }
            Some(Interrupt::Alert(npc)) => {
                let Some(key) = self.roster.get(npc).map(|n| n.key) else {
                    return;
                };
                debug!("random alert on {key}");
                self.roster.raise_alert(ctx, npc);
                let message = format!("{key} needs a hand. Go talk to them!");
                self.notice.show(ctx, &message, self.viewport, self.config.notice_duration);
            }
            None => {}
        }
    }
}

impl<K: Kinematics, R: QuestionRepository> Game for SessionController<K, R> {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_W,
            world_height: WORLD_H,
            fixed_dt: self.fixed_dt,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        SessionController::init(self, ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let dt = self.fixed_dt;
        self.tick(ctx, input, dt);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::FetchError;
    use crate::layout::NPC_SLOTS;
    use crate::minigame::Minigame;
    use crate::repository::tests::ScriptedSource;
    use crate::repository::QuestionBank;
    use hackday_engine::BoundedBody;

    const DT: f32 = 1.0 / 60.0;
    const SINGLE: &str = concat!(
        r#"{"question":"Which is a Rust keyword?","choices":["fn","func","def"],"#,
        r#""answer":1,"hints":["Short."]}"#,
    );
    const REORDER: &str = r#"{"question":"Sort","answer":["a","b","c"],"hints":[]}"#;

    type Session = SessionController<BoundedBody, QuestionBank<ScriptedSource>>;

    #[derive(Clone, Default)]
    struct Counts {
        victories: Rc<Cell<u32>>,
        expiries: Rc<Cell<u32>>,
    }

    impl SessionObserver for Counts {
        fn on_victory(&mut self) {
            self.victories.set(self.victories.get() + 1);
        }

        fn on_expired(&mut self) {
            self.expiries.set(self.expiries.get() + 1);
        }
    }

    /// Quiet config: no interrupts unless a test asks for them.
    fn quiet() -> SessionConfig {
        SessionConfig {
            idle_threshold: 10_000.0,
            alert_chance: 0.0,
            ..SessionConfig::default()
        }
    }

    /// Three NPCs 60 units from the spawn point: single choice to the
    /// right, reorder to the left, batch above.
    fn near_slots() -> Vec<NpcSlot> {
        vec![
            NpcSlot { pos: PLAYER_SPAWN + Vec2::new(60.0, 0.0), ..NPC_SLOTS[0] },
            NpcSlot { pos: PLAYER_SPAWN + Vec2::new(-60.0, 0.0), ..NPC_SLOTS[1] },
            NpcSlot { pos: PLAYER_SPAWN + Vec2::new(0.0, -60.0), ..NPC_SLOTS[2] },
        ]
    }

    fn session_with(config: SessionConfig, slots: &[NpcSlot]) -> (EngineContext, Session, Counts) {
        let counts = Counts::default();
        let mut ctx = EngineContext::new();
        let mut session = SessionController::new(
            config,
            PlayerProfile::default(),
            BoundedBody::new(),
            QuestionBank::new(ScriptedSource::default()),
        )
        .with_observer(counts.clone())
        .with_npcs(slots);
        session.init(&mut ctx);
        (ctx, session, counts)
    }

    fn tick(ctx: &mut EngineContext, session: &mut Session, events: &[InputEvent]) {
        let mut input = InputQueue::new();
        for &event in events {
            input.push(event);
        }
        session.tick(ctx, &input, DT);
    }

    fn idle(ctx: &mut EngineContext, session: &mut Session, frames: u32) {
        for _ in 0..frames {
            tick(ctx, session, &[]);
        }
    }

    fn hold(ctx: &mut EngineContext, session: &mut Session, key: u32, frames: u32) {
        tick(ctx, session, &[InputEvent::KeyDown { key_code: key }]);
        idle(ctx, session, frames.saturating_sub(1));
        tick(ctx, session, &[InputEvent::KeyUp { key_code: key }]);
    }

    fn press_e(ctx: &mut EngineContext, session: &mut Session) {
        tick(ctx, session, &[InputEvent::KeyDown { key_code: keys::INTERACT }]);
        tick(ctx, session, &[InputEvent::KeyUp { key_code: keys::INTERACT }]);
    }

    fn custom(kind: u32, a: f32) -> InputEvent {
        InputEvent::Custom { kind, a, b: 0.0, c: 0.0 }
    }

    fn events_of(ctx: &EngineContext, kind: f32) -> usize {
        ctx.events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn diagonal_walk_moves_at_configured_speed() {
        let (mut ctx, mut session, _) = session_with(quiet(), &NPC_SLOTS);
        let keys_down = [
            InputEvent::KeyDown { key_code: keys::LEFT },
            InputEvent::KeyDown { key_code: keys::UP },
        ];
        tick(&mut ctx, &mut session, &keys_down);
        let v = session.body().velocity();
        assert!((v.length() - 300.0).abs() < 1e-3);
        assert!(v.x < 0.0 && v.y < 0.0);
        assert!(session.player_position().x < PLAYER_SPAWN.x);
    }

    #[test]
    fn prompt_tracks_nearest_with_earlier_entry_on_ties() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        idle(&mut ctx, &mut session, 1);
        // Left and right NPCs are both 60 away; the batch one too.
        assert_eq!(session.state().nearest_npc, Some(NpcId(0)));
        let prompt = ctx.scene.find_by_tag("talk-prompt").unwrap();
        assert!(prompt.visible);
        assert_eq!(prompt.pos, near_slots()[0].pos - Vec2::new(0.0, PROMPT_RISE));
    }

    #[test]
    fn prompt_hides_out_of_range() {
        let (mut ctx, mut session, _) = session_with(quiet(), &NPC_SLOTS);
        idle(&mut ctx, &mut session, 1);
        assert_eq!(session.state().nearest_npc, None);
        assert!(!ctx.scene.find_by_tag("talk-prompt").unwrap().visible);
    }

    #[test]
    fn cached_batch_opens_at_once_and_freezes_movement() {
        let slots = [NpcSlot { pos: PLAYER_SPAWN + Vec2::new(60.0, 0.0), ..NPC_SLOTS[2] }];
        let (mut ctx, mut session, _) = session_with(quiet(), &slots);
        press_e(&mut ctx, &mut session);
        assert!(session.dialog().is_open());
        assert!(!session.is_loading());
        assert!(session.repository().source().sent.is_empty());

        let before = session.player_position();
        hold(&mut ctx, &mut session, keys::LEFT, 30);
        assert_eq!(session.player_position(), before);
        assert_eq!(session.body().velocity(), Vec2::ZERO);
    }

    #[test]
    fn fetch_then_open_on_current_completion() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        assert!(session.is_loading());
        assert_eq!(session.state().fetch_token, 1);

        session.repository_mut().source_mut().answer(1, Ok(SINGLE));
        idle(&mut ctx, &mut session, 1);
        assert!(!session.is_loading());
        assert!(session.dialog().is_open());
        match session.dialog().question() {
            Some(Question::Choice(p)) => assert_eq!(p.correct, 0),
            other => panic!("unexpected question {other:?}"),
        }
    }

    #[test]
    fn escape_cancels_and_stale_result_changes_nothing() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        assert!(session.is_loading());

        tick(&mut ctx, &mut session, &[InputEvent::KeyDown { key_code: keys::ESCAPE }]);
        assert!(!session.is_loading());
        let token = session.state().fetch_token;
        assert_eq!(token, 2);

        session.repository_mut().source_mut().answer(1, Ok(SINGLE));
        idle(&mut ctx, &mut session, 1);
        assert!(!session.dialog().is_open());
        assert!(!session.is_loading());
        assert_eq!(session.state().fetch_token, token);
        assert_eq!(session.state().error, None);

        // The cache was still filled; the next talk opens straight away.
        press_e(&mut ctx, &mut session);
        assert!(session.dialog().is_open());
        assert_eq!(session.repository().source().sent.len(), 1);
    }

    #[test]
    fn failure_after_cancel_is_not_surfaced() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        tick(&mut ctx, &mut session, &[InputEvent::KeyDown { key_code: keys::ESCAPE }]);
        tick(&mut ctx, &mut session, &[InputEvent::KeyUp { key_code: keys::ESCAPE }]);

        session.repository_mut().source_mut().answer(1, Err(FetchError::Status(500)));
        idle(&mut ctx, &mut session, 1);
        assert_eq!(session.state().error, None);
        assert_eq!(session.repository().error(QuestionFeed::SingleChoice), None);
        assert_eq!(session.notice(), None);
        assert_eq!(events_of(&ctx, game_events::FETCH_ERROR), 0);

        press_e(&mut ctx, &mut session);
        assert!(session.is_loading());
        assert_eq!(session.state().error, None);
        assert_eq!(session.repository().source().sent.len(), 2);
    }

    #[test]
    fn losing_the_npc_cancels_the_wait() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        assert!(session.is_loading());
        session.roster.despawn(&mut ctx);
        idle(&mut ctx, &mut session, 1);
        assert!(!session.is_loading());
        assert_eq!(session.state().fetch_token, 2);
    }

    #[test]
    fn second_press_while_loading_retags() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        press_e(&mut ctx, &mut session);
        assert_eq!(session.state().fetch_token, 2);
        assert_eq!(session.repository().source().sent.len(), 1);

        session.repository_mut().source_mut().answer(1, Ok(SINGLE));
        idle(&mut ctx, &mut session, 1);
        assert!(session.dialog().is_open());
    }

    #[test]
    fn failure_unfreezes_and_blocks_until_retry() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        session.repository_mut().source_mut().answer(1, Err(FetchError::Status(500)));
        idle(&mut ctx, &mut session, 1);

        assert!(!session.is_loading());
        assert!(!session.overlay_open());
        assert!(session.state().error.is_some());
        assert_eq!(session.notice(), Some(ERROR_MESSAGE));
        assert_eq!(events_of(&ctx, game_events::FETCH_ERROR), 1);

        press_e(&mut ctx, &mut session);
        assert_eq!(session.repository().source().sent.len(), 1);
        assert!(!session.is_loading());

        tick(&mut ctx, &mut session, &[custom(events::RETRY_QUESTIONS, 0.0)]);
        assert_eq!(session.state().error, None);
        press_e(&mut ctx, &mut session);
        assert_eq!(session.repository().source().sent.len(), 2);
        assert!(session.is_loading());
    }

    #[test]
    fn answering_through_the_dialog_scores() {
        let slots = [NpcSlot { pos: PLAYER_SPAWN + Vec2::new(60.0, 0.0), ..NPC_SLOTS[2] }];
        let (mut ctx, mut session, _) = session_with(quiet(), &slots);
        press_e(&mut ctx, &mut session);
        let correct = match session.dialog().question() {
            Some(Question::Choice(p)) => p.correct,
            other => panic!("unexpected question {other:?}"),
        };
        let answer = [custom(events::SELECT_OPTION, correct as f32), custom(events::SUBMIT, 0.0)];
        tick(&mut ctx, &mut session, &answer);
        assert_eq!(session.state().progress, 0.25);
        assert_eq!(session.hud().bar_width(), 55.0);
        assert!(ctx.sounds.contains(&sounds::CORRECT));
        assert!(session.dialog().is_open());

        // The batch moved on.
        tick(&mut ctx, &mut session, &[custom(events::CLOSE_DIALOG, 0.0)]);
        assert!(!session.dialog().is_open());
        press_e(&mut ctx, &mut session);
        match session.dialog().question() {
            Some(Question::Choice(p)) => assert_ne!(p.question, "What is Java primarily used for?"),
            other => panic!("unexpected question {other:?}"),
        }
    }

    #[test]
    fn end_to_end_win() {
        let config = SessionConfig { round_seconds: 120, ..quiet() };
        let (mut ctx, mut session, counts) = session_with(config, &near_slots());

        session.record_outcome(&mut ctx, MinigameKind::Choice, true);
        assert_eq!(session.state().progress, 0.25);
        assert_eq!(session.hud().bar_width(), 55.0);

        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        assert_eq!(session.state().progress, 0.75);
        assert_eq!(session.hud().bar_width(), 165.0);

        session.record_outcome(&mut ctx, MinigameKind::Choice, true);
        assert_eq!(session.state().progress, 1.0);
        assert!(session.state().has_won);
        assert_eq!(session.result(), Some(ResultKind::Won));
        assert_eq!(counts.victories.get(), 1);
        assert_eq!(events_of(&ctx, game_events::VICTORY), 1);

        // Later outcomes change nothing.
        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        assert_eq!(session.state().challenges_done, 3);
        assert_eq!(counts.victories.get(), 1);

        // The clock stopped, so no expiry follows.
        idle(&mut ctx, &mut session, 60 * 130);
        assert_eq!(counts.expiries.get(), 0);
        assert_eq!(session.result(), Some(ResultKind::Won));
    }

    #[test]
    fn wrong_answers_do_not_score() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        session.record_outcome(&mut ctx, MinigameKind::Reorder, false);
        assert_eq!(session.state().progress, 0.0);
        assert!(ctx.sounds.contains(&sounds::WRONG));
    }

    #[test]
    fn per_challenge_mode_counts_answers() {
        let config = SessionConfig { progress: ProgressMode::PerChallenge { total: 2 }, ..quiet() };
        let (mut ctx, mut session, counts) = session_with(config, &near_slots());
        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        assert_eq!(session.state().progress, 0.5);
        session.record_outcome(&mut ctx, MinigameKind::Choice, true);
        assert!(session.state().has_won);
        assert_eq!(counts.victories.get(), 1);
    }

    #[test]
    fn time_up_fires_once_and_clock_keeps_running_under_dialog() {
        let config = SessionConfig { round_seconds: 2, ..quiet() };
        let slots = [NpcSlot { pos: PLAYER_SPAWN + Vec2::new(60.0, 0.0), ..NPC_SLOTS[2] }];
        let (mut ctx, mut session, counts) = session_with(config, &slots);
        press_e(&mut ctx, &mut session);
        assert!(session.dialog().is_open());

        idle(&mut ctx, &mut session, 60 * 5);
        assert_eq!(session.hud().remaining(), 0);
        assert_eq!(counts.expiries.get(), 1);
        assert_eq!(session.result(), Some(ResultKind::TimeUp));
        assert!(!session.dialog().is_open());
        assert_eq!(events_of(&ctx, game_events::ROUND_EXPIRED), 1);

        // Talking is blocked behind the result card.
        press_e(&mut ctx, &mut session);
        assert!(!session.dialog().is_open());
    }

    #[test]
    fn win_on_the_last_second_beats_the_clock() {
        let config = SessionConfig { round_seconds: 1, ..quiet() };
        let (mut ctx, mut session, counts) = session_with(config, &near_slots());
        idle(&mut ctx, &mut session, 59);
        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        idle(&mut ctx, &mut session, 120);
        assert_eq!(counts.victories.get(), 1);
        assert_eq!(counts.expiries.get(), 0);
    }

    #[test]
    fn restart_resets_without_duplicate_timers() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        let fresh_timers = ctx.timers.len();
        let fresh_entities = ctx.scene.len();

        session.record_outcome(&mut ctx, MinigameKind::Reorder, true);
        press_e(&mut ctx, &mut session);
        idle(&mut ctx, &mut session, 90);
        let token = session.state().fetch_token;

        session.restart(&mut ctx);
        assert_eq!(session.state().progress, 0.0);
        assert!(!session.state().has_won);
        assert!(session.state().fetch_token > token);
        assert!(!session.is_loading());
        assert_eq!(session.hud().remaining(), 180);
        assert_eq!(ctx.timers.len(), fresh_timers);
        assert_eq!(ctx.scene.len(), fresh_entities);
        assert_eq!(session.player_position(), PLAYER_SPAWN);
    }

    #[test]
    fn play_again_and_quit_buttons() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        for _ in 0..4 {
            session.record_outcome(&mut ctx, MinigameKind::Choice, true);
        }
        assert_eq!(session.result(), Some(ResultKind::Won));
        let again = ctx.scene.find_by_tag("result-play-again").unwrap().pos;
        tick(&mut ctx, &mut session, &[InputEvent::PointerDown { x: again.x, y: again.y }]);
        assert_eq!(session.result(), None);
        assert!(session.is_running());
        assert_eq!(session.state().progress, 0.0);

        tick(&mut ctx, &mut session, &[custom(events::QUIT, 0.0)]);
        assert!(!session.is_running());
        assert_eq!(events_of(&ctx, game_events::QUIT), 1);
    }

    #[test]
    fn teardown_is_idempotent_and_leaves_nothing() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        ctx.clear_frame_data();

        session.teardown(&mut ctx);
        session.teardown(&mut ctx);
        assert!(ctx.scene.is_empty());
        assert!(ctx.timers.is_empty());
        assert!(ctx.tweens.is_empty());
        assert_eq!(ctx.sounds, vec![sounds::MUSIC_STOP]);

        // A late response after teardown is ignored.
        session.repository_mut().source_mut().answer(1, Ok(SINGLE));
        idle(&mut ctx, &mut session, 1);
        assert!(ctx.scene.is_empty());
    }

    #[test]
    fn resize_reopens_the_same_reorder_fresh() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        // Step left to make the reorder NPC the nearest.
        hold(&mut ctx, &mut session, keys::LEFT, 6);
        assert_eq!(session.state().nearest_npc, Some(NpcId(1)));
        press_e(&mut ctx, &mut session);
        session.repository_mut().source_mut().answer(1, Ok(REORDER));
        idle(&mut ctx, &mut session, 1);
        assert_eq!(session.dialog().kind(), Some(MinigameKind::Reorder));

        let resize = InputEvent::Custom { kind: events::RESIZE, a: 1000.0, b: 700.0, c: 0.0 };
        tick(&mut ctx, &mut session, &[resize]);
        assert_eq!(session.dialog().kind(), Some(MinigameKind::Reorder));
        match session.dialog().minigame() {
            Some(Minigame::Reorder(quiz)) => assert_eq!(quiz.placed_count(), 0),
            other => panic!("unexpected unit {other:?}"),
        }
    }

    #[test]
    fn resize_moves_a_visible_notice() {
        let (mut ctx, mut session, _) = session_with(quiet(), &near_slots());
        press_e(&mut ctx, &mut session);
        session.repository_mut().source_mut().answer(1, Err(FetchError::Status(503)));
        idle(&mut ctx, &mut session, 1);
        assert_eq!(session.notice(), Some(ERROR_MESSAGE));

        let resize = InputEvent::Custom { kind: events::RESIZE, a: 1000.0, b: 700.0, c: 0.0 };
        tick(&mut ctx, &mut session, &[resize]);
        assert_eq!(session.notice(), Some(ERROR_MESSAGE));
        let panel = ctx.scene.find_by_tag("notice-panel").unwrap();
        assert_eq!(panel.pos, Vec2::new(766.0, 616.0));
    }

    #[test]
    fn random_alert_marks_an_npc_and_shows_a_notice() {
        let config = SessionConfig {
            alert_min_delay: 1.0,
            alert_max_delay: 1.0,
            alert_chance: 1.0,
            alert_cooldown: 0.0,
            ..quiet()
        };
        let (mut ctx, mut session, _) = session_with(config, &NPC_SLOTS);
        idle(&mut ctx, &mut session, 61);
        let alerted = session.roster().alerted().unwrap();
        let marker = session.roster().get(alerted).unwrap().marker;
        assert!(ctx.scene.get(marker).unwrap().visible);
        assert!(session.notice().is_some());
    }

    #[test]
    fn alerts_stay_quiet_under_the_dialog() {
        let config = SessionConfig {
            alert_min_delay: 1.0,
            alert_max_delay: 1.0,
            alert_chance: 1.0,
            alert_cooldown: 0.0,
            ..quiet()
        };
        let slots = [NpcSlot { pos: PLAYER_SPAWN + Vec2::new(60.0, 0.0), ..NPC_SLOTS[2] }];
        let (mut ctx, mut session, _) = session_with(config, &slots);
        press_e(&mut ctx, &mut session);
        idle(&mut ctx, &mut session, 60 * 3);
        assert_eq!(session.roster().alerted(), None);
        assert_eq!(session.notice(), None);
    }
}
