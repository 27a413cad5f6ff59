pub mod api;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{EntityId, GameEvent, SoundEvent};
pub use components::entity::Entity;
pub use components::layer::RenderLayer;
pub use components::sprite::{LabelComponent, ShapeComponent, SpriteComponent};
pub use crate::core::kinematics::{BoundedBody, Kinematics, Rect};
pub use crate::core::scene::Scene;
pub use crate::core::time::{FixedTimestep, TimerId, Timers};
pub use input::queue::{InputEvent, InputQueue, KeyState};

#[cfg(feature = "physics")]
pub use crate::core::physics::PhysicsWorld;

pub use extensions::{
    ease, ease_vec2, lerp, lerp_vec2, Easing, Tween, TweenId, TweenLoop, TweenState, TweenTarget,
};
