use glam::Vec2;
use hackday_engine::{EngineContext, EntityId, LabelComponent, RenderLayer, SpriteComponent};

use crate::layout::PLAYER_FRAME;

pub const ANIM_IDLE: &str = "player-idle";
pub const ANIM_WALK_LEFT: &str = "player-walk-left";
pub const ANIM_WALK_RIGHT: &str = "player-walk-right";

/// Name tag height above the body, per unit of sprite scale.
pub const HEAD_OFFSET_PER_SCALE: f32 = 6.0;

const NAME_TAG_PX: f32 = 18.0;
const NAME_TAG_COLOR: u32 = 0xffffff;
const PLAYER_DEPTH: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Held direction keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Steering {
    /// Velocity for these keys. Opposite keys cancel; diagonals are
    /// scaled by 1/√2 so every direction moves at exactly `speed`.
    pub fn velocity(self, speed: f32) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if dir.x != 0.0 && dir.y != 0.0 {
            dir *= std::f32::consts::FRAC_1_SQRT_2;
        }
        dir * speed
    }
}

/// Animation key and horizontal flip for a velocity. Vertical-only motion
/// reuses the side walk.
pub fn animation_for(vel: Vec2) -> (&'static str, bool) {
    if vel.x < 0.0 {
        (ANIM_WALK_LEFT, true)
    } else if vel.x > 0.0 {
        (ANIM_WALK_RIGHT, false)
    } else if vel.y != 0.0 {
        (ANIM_WALK_RIGHT, false)
    } else {
        (ANIM_IDLE, false)
    }
}

/// The player's visuals. Position itself lives in the kinematics body.
#[derive(Debug)]
pub struct Player {
    pub name: String,
    pub sprite: EntityId,
    pub name_tag: EntityId,
    pub last_dir: Facing,
    head_offset: f32,
}

impl Player {
    pub fn spawn(ctx: &mut EngineContext, name: &str, pos: Vec2, scale: f32) -> Self {
        let sprite = ctx.spawn_with(|e| {
            e.with_tag("player")
                .with_pos(pos)
                .with_size(PLAYER_FRAME * scale)
                .with_depth(PLAYER_DEPTH)
                .with_layer(RenderLayer::Actors)
                .with_sprite(SpriteComponent::new("player").with_animation(ANIM_IDLE))
        });
        let head_offset = HEAD_OFFSET_PER_SCALE * scale;
        let name_tag = ctx.spawn_with(|e| {
            e.with_tag("player-name")
                .with_pos(pos - Vec2::new(0.0, head_offset))
                .with_size(Vec2::new(160.0, NAME_TAG_PX))
                .with_depth(PLAYER_DEPTH + 1)
                .with_layer(RenderLayer::Actors)
                .with_label(LabelComponent::new(name, NAME_TAG_PX, NAME_TAG_COLOR))
        });
        Self {
            name: name.to_owned(),
            sprite,
            name_tag,
            last_dir: Facing::default(),
            head_offset,
        }
    }

    /// Pick animation, flip and facing from this tick's velocity.
    pub fn animate(&mut self, ctx: &mut EngineContext, vel: Vec2) {
        let (anim, flip) = animation_for(vel);
        if let Some(sprite) = ctx
            .scene
            .get_mut(self.sprite)
            .and_then(|e| e.sprite.as_mut())
        {
            sprite.play(anim);
            if vel.x != 0.0 {
                sprite.flip_x = flip;
            }
        }
        if vel.x < 0.0 {
            self.last_dir = Facing::Left;
        } else if vel.x > 0.0 {
            self.last_dir = Facing::Right;
        } else if vel.y < 0.0 {
            self.last_dir = Facing::Up;
        } else if vel.y > 0.0 {
            self.last_dir = Facing::Down;
        }
    }

    /// Snap sprite and name tag to the body position.
    pub fn place(&self, ctx: &mut EngineContext, pos: Vec2) {
        if let Some(e) = ctx.scene.get_mut(self.sprite) {
            e.pos = pos;
        }
        if let Some(e) = ctx.scene.get_mut(self.name_tag) {
            e.pos = self.name_tag_pos(pos);
        }
    }

    pub fn name_tag_pos(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x, pos.y - self.head_offset)
    }

    pub fn despawn(&self, ctx: &mut EngineContext) {
        ctx.despawn(self.sprite);
        ctx.despawn(self.name_tag);
    }
}
