//! WASM entry points for the hackathon simulator.
//!
//! The JS shell calls `game_init` once, then `game_tick(dt)` every animation
//! frame, forwarding input through the `game_*` handlers and reading the
//! scene, sound and event buffers back after each tick.

pub mod http;
pub mod runner;

pub use http::HttpQuestionSource;
pub use runner::GameRunner;

use std::cell::RefCell;

use hackathon::session::{events, game_events};
use hackathon::{PlayerProfile, QuestionBank, SessionConfig, SessionController};
use hackday_engine::InputEvent;
use wasm_bindgen::prelude::*;

#[cfg(feature = "physics")]
type Body = hackday_engine::PhysicsWorld;
#[cfg(not(feature = "physics"))]
type Body = hackday_engine::BoundedBody;

pub type Session = SessionController<Body, QuestionBank<HttpQuestionSource>>;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner<Session>>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls before `game_init` are dropped.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner<Session>) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("hackday: call ignored, game_init() has not run");
                None
            }
        }
    })
}

/// Build and start a session. `config_json` may be empty or a partial
/// override of the defaults.
#[wasm_bindgen]
pub fn game_init(
    config_json: &str,
    base_url: &str,
    username: &str,
    experience: u32,
    language: &str,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        SessionConfig::default()
    } else {
        SessionConfig::from_json(config_json).map_err(|err| JsValue::from_str(&err.to_string()))?
    };
    let celebration = config.celebration_seconds;
    let profile = PlayerProfile {
        username: username.to_owned(),
        experience,
        language: language.to_owned(),
    };

    // A second init replaces the running session; tear the old one down first.
    with_runner_if_present(|r| r.with_game(|game, ctx| game.teardown(ctx)));

    let session = SessionController::new(
        config,
        profile,
        Body::new(),
        QuestionBank::new(HttpQuestionSource::new(base_url)),
    );
    let mut runner = GameRunner::new(session).with_celebration(game_events::VICTORY, celebration);
    runner.init();

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("hackday: initialized for {username}");
    Ok(())
}

fn with_runner_if_present(f: impl FnOnce(&mut GameRunner<Session>)) {
    RUNNER.with(|cell| {
        if let Some(runner) = cell.borrow_mut().as_mut() {
            f(runner);
        }
    });
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn game_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn game_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

#[wasm_bindgen]
pub fn game_resize(width: f32, height: f32) {
    game_custom_event(events::RESIZE, width, height, 0.0);
}

#[wasm_bindgen]
pub fn game_retry_questions() {
    game_custom_event(events::RETRY_QUESTIONS, 0.0, 0.0, 0.0);
}

/// Start a fresh round immediately, whatever state the current one is in.
#[wasm_bindgen]
pub fn game_restart() {
    with_runner(|r| r.with_game(|game, ctx| game.restart(ctx)));
}

/// Stop the round and release everything it spawned.
#[wasm_bindgen]
pub fn game_teardown() {
    with_runner(|r| r.with_game(|game, ctx| game.teardown(ctx)));
}

// ---- Frame output ----

#[wasm_bindgen]
pub fn get_scene_json() -> String {
    with_runner(|r| match r.scene_json() {
        Ok(json) => json,
        Err(err) => {
            log::error!("hackday: scene serialization failed: {err}");
            "[]".to_owned()
        }
    })
    .unwrap_or_else(|| "[]".to_owned())
}

#[wasm_bindgen]
pub fn get_sound_events_ptr() -> *const u8 {
    with_runner(|r| r.sound_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_sound_events_len() -> u32 {
    with_runner(|r| r.sound_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_sounds() -> u32 {
    with_runner(|r| r.max_sounds()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height()).unwrap_or(0.0)
}

// ---- Session state ----

#[wasm_bindgen]
pub fn is_celebrating() -> bool {
    with_runner(|r| r.is_celebrating()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_progress() -> f32 {
    with_runner(|r| r.game().state().progress).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn get_remaining_seconds() -> u32 {
    with_runner(|r| r.game().hud().remaining()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn has_won() -> bool {
    with_runner(|r| r.game().state().has_won).unwrap_or(false)
}

#[wasm_bindgen]
pub fn is_running() -> bool {
    with_runner(|r| r.game().is_running()).unwrap_or(false)
}

/// Last question-service failure, empty when there is none.
#[wasm_bindgen]
pub fn get_fetch_error() -> String {
    with_runner(|r| r.game().state().error.clone().unwrap_or_default()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hackathon::session::sounds;
    use hackathon::{QuestionSource, SourceResponse};
    use hackday_engine::BoundedBody;

    /// Transport that never answers.
    struct Offline;

    impl QuestionSource for Offline {
        fn send(
            &mut self,
            _feed: hackathon::QuestionFeed,
            _profile: &PlayerProfile,
            _ticket: u64,
        ) {
        }

        fn receive(&mut self) -> Vec<SourceResponse> {
            Vec::new()
        }
    }

    type OfflineSession = SessionController<BoundedBody, QuestionBank<Offline>>;

    fn started() -> GameRunner<OfflineSession> {
        let session = SessionController::new(
            SessionConfig::default(),
            PlayerProfile::default(),
            BoundedBody::new(),
            QuestionBank::new(Offline),
        );
        let mut runner = GameRunner::new(session);
        runner.init();
        runner
    }

    #[test]
    fn music_starts_with_the_first_frame() {
        let mut runner = started();
        runner.tick(0.02);
        assert_eq!(runner.sound_events(), &[sounds::MUSIC_START.0 as u8]);
    }

    #[test]
    fn shell_teardown_and_restart_reach_the_audio() {
        let mut runner = started();
        runner.tick(0.02);

        runner.with_game(|game, ctx| game.restart(ctx));
        runner.tick(0.02);
        assert_eq!(
            runner.sound_events(),
            &[sounds::MUSIC_STOP.0 as u8, sounds::MUSIC_START.0 as u8]
        );

        runner.with_game(|game, ctx| game.teardown(ctx));
        runner.tick(0.02);
        assert_eq!(runner.sound_events(), &[sounds::MUSIC_STOP.0 as u8]);
        assert!(!runner.game().is_running());
    }
}
