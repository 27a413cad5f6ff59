use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use crate::core::time::{TimerId, Timers};
use crate::extensions::tween::TweenState;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed-step tick. Input holds everything the shell pushed since the last tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
#[derive(Debug)]
pub struct EngineContext {
    pub scene: Scene,
    pub timers: Timers,
    pub tweens: TweenState,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            timers: Timers::new(),
            tweens: TweenState::new(),
            sounds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate an ID, let `build` fill the entity in, and spawn it.
    pub fn spawn_with(&mut self, build: impl FnOnce(Entity) -> Entity) -> EntityId {
        let id = self.next_id();
        self.scene.spawn(build(Entity::new(id)));
        id
    }

    /// Despawn an entity and drop any tweens still targeting it.
    pub fn despawn(&mut self, id: EntityId) {
        self.tweens.remove_entity(id);
        self.scene.despawn(id);
    }

    /// Emit a sound event to be forwarded to JS.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to JS.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Advance tweens and timers by `dt`. Returns the timers that fired.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerId> {
        self.tweens.tick(dt, &mut self.scene);
        self.timers.advance(dt)
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
