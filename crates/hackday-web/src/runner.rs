use hackday_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent, InputQueue,
};

/// Generic game runner that wires up the engine loop.
///
/// The crate root keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Flat buffer of sound event IDs for the JS side to read.
    sound_buffer: Vec<u8>,
    /// Frame-stable copy of the game events, capped at `max_events`.
    event_buffer: Vec<GameEvent>,
    celebration: Option<Celebration>,
    celebration_remaining: f32,
}

/// Game event that opens the celebration window, and how long it stays open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celebration {
    pub kind: f32,
    pub seconds: f32,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let sound_buffer = Vec::with_capacity(config.max_sounds);
        let event_buffer = Vec::with_capacity(config.max_events);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
            sound_buffer,
            event_buffer,
            celebration: None,
            celebration_remaining: 0.0,
        }
    }

    /// Keep `is_celebrating` true for `seconds` after a frame emits `kind`.
    pub fn with_celebration(mut self, kind: f32, seconds: f32) -> Self {
        self.celebration = Some(Celebration { kind, seconds });
        self
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: fixed-step updates, then pack the frame output.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Input is seen by the first step only so a click or key press
        // never lands twice when a slow frame runs several steps.
        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            if step == 0 {
                self.input.drain();
            }
        }

        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }

        self.event_buffer.clear();
        self.event_buffer
            .extend(self.ctx.events.iter().take(self.config.max_events).copied());

        self.update_celebration(dt);

        // Anything emitted between frames (init, restart, teardown) has
        // been packed above; start the next frame empty.
        self.ctx.clear_frame_data();
    }

    fn update_celebration(&mut self, dt: f32) {
        let Some(celebration) = self.celebration else {
            return;
        };
        if self.event_buffer.iter().any(|e| e.kind == celebration.kind) {
            log::info!("celebrating for {}s", celebration.seconds);
            self.celebration_remaining = celebration.seconds;
        } else {
            self.celebration_remaining = (self.celebration_remaining - dt).max(0.0);
        }
    }

    /// Direct access to the game and its context between frames.
    pub fn with_game<R>(&mut self, f: impl FnOnce(&mut G, &mut EngineContext) -> R) -> R {
        f(&mut self.game, &mut self.ctx)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration_remaining > 0.0
    }

    pub fn celebration_remaining(&self) -> f32 {
        self.celebration_remaining
    }

    /// Visible entities for the renderer.
    pub fn scene_json(&self) -> serde_json::Result<String> {
        self.ctx.scene.to_json()
    }

    // ---- Pointer accessors for the JS side ----

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn sound_events(&self) -> &[u8] {
        &self.sound_buffer
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.event_buffer
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}
