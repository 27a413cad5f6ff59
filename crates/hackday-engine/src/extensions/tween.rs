// extensions/tween.rs
//
// Property animation for scene entities. Overlays register tweens on the
// entities they own; despawning an entity through EngineContext drops them.

use glam::Vec2;

use super::easing::{ease, ease_vec2, Easing};
use crate::api::types::EntityId;
use crate::core::scene::Scene;

/// What property a tween animates.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Vec2, to: Vec2 },
    /// Animate Entity.pos.y only
    PositionY { from: f32, to: f32 },
    /// Animate Entity.size
    Size { from: Vec2, to: Vec2 },
    /// Animate Entity.alpha
    Alpha { from: f32, to: f32 },
}

/// What happens when a tween reaches its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Reverse direction forever.
    PingPong,
    /// Go there and back `times` times, then stop on the start value.
    Yoyo { times: u32 },
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration of one leg in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// For ping-pong and yoyo: current direction (true = forward).
    forward: bool,
    /// Completed legs, used by yoyo.
    legs: u32,
}

impl Tween {
    fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            forward: true,
            legs: 0,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn position_y(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::PositionY { from, to }, duration, easing)
    }

    pub fn size(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Size { from, to }, duration, easing)
    }

    pub fn alpha(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, duration, easing)
    }

    /// Fade in from transparent.
    pub fn fade_in(duration: f32, easing: Easing) -> Self {
        Self::alpha(0.0, 1.0, duration, easing)
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Normalized progress of the current leg [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Apply the tween at eased position `t` along from→to.
    fn apply(&self, t: f32, scene: &mut Scene, entity_id: EntityId) {
        let Some(entity) = scene.get_mut(entity_id) else {
            return;
        };
        match self.target {
            TweenTarget::Position { from, to } => {
                entity.pos = ease_vec2(from, to, t, self.easing);
            }
            TweenTarget::PositionY { from, to } => {
                entity.pos.y = ease(from, to, t, self.easing);
            }
            TweenTarget::Size { from, to } => {
                entity.size = ease_vec2(from, to, t, self.easing);
            }
            TweenTarget::Alpha { from, to } => {
                entity.alpha = ease(from, to, t, self.easing);
            }
        }
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

enum Leg {
    Running,
    Turned,
    Done,
}

impl Tween {
    /// Move `dt` along the current leg and write the value to the entity.
    fn advance(&mut self, dt: f32, scene: &mut Scene, entity: EntityId) -> Leg {
        self.elapsed += dt;
        let t = if self.forward {
            self.progress()
        } else {
            1.0 - self.progress()
        };
        self.apply(t, scene, entity);

        if self.elapsed < self.duration {
            return Leg::Running;
        }
        match self.loop_mode {
            TweenLoop::Once => Leg::Done,
            TweenLoop::PingPong => self.turn(),
            TweenLoop::Yoyo { times } => {
                self.legs += 1;
                if self.legs >= times.saturating_mul(2) {
                    self.apply(0.0, scene, entity);
                    Leg::Done
                } else {
                    self.turn()
                }
            }
        }
    }

    fn turn(&mut self) -> Leg {
        self.elapsed = 0.0;
        self.forward = !self.forward;
        Leg::Turned
    }
}

/// Active tweens, applied in the order they were added so two tweens on
/// one entity always resolve the same way.
#[derive(Debug, Default)]
pub struct TweenState {
    active: Vec<(TweenId, EntityId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.active.push((id, entity, tween));
        id
    }

    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.active.len();
        self.active.retain(|(t, _, _)| *t != id);
        self.active.len() != before
    }

    /// Drop every tween targeting `entity`.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.active.retain(|(_, e, _)| *e != entity);
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.active
            .iter()
            .find(|(t, _, _)| *t == id)
            .map(|(_, _, tween)| tween)
    }

    pub fn is_animating(&self, entity: EntityId) -> bool {
        self.active.iter().any(|(_, e, _)| *e == entity)
    }

    /// Advance every tween and write into the scene.
    /// Returns how many finished this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) -> usize {
        let before = self.active.len();
        self.active.retain_mut(|(_, entity, tween)| {
            !matches!(tween.advance(dt, scene, *entity), Leg::Done)
        });
        before - self.active.len()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
