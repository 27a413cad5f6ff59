use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Inclusive point test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Strict overlap test: touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Collision and movement capability for a top-down scene:
/// any number of static blockers and a single velocity-driven body.
pub trait Kinematics {
    /// Add an immovable blocker.
    fn add_static(&mut self, rect: Rect);

    /// Create (or replace) the moving body, centered at `pos`.
    fn spawn_body(&mut self, pos: Vec2, half_extents: Vec2);

    /// Keep the body inside these bounds.
    fn set_bounds(&mut self, bounds: Rect);

    fn set_velocity(&mut self, vel: Vec2);

    fn velocity(&self) -> Vec2;

    /// Center of the moving body. `Vec2::ZERO` before `spawn_body`.
    fn position(&self) -> Vec2;

    /// Integrate one step, resolving against blockers and bounds.
    fn step(&mut self, dt: f32);

    /// Drop every blocker and the body.
    fn reset(&mut self);
}

/// Deterministic AABB mover: moves one axis at a time and pushes the body
/// back out of any blocker it entered on that axis.
#[derive(Debug, Clone, Default)]
pub struct BoundedBody {
    statics: Vec<Rect>,
    bounds: Option<Rect>,
    pos: Vec2,
    half: Vec2,
    vel: Vec2,
}

impl BoundedBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn static_count(&self) -> usize {
        self.statics.len()
    }

    fn resolve_x(&mut self, dx: f32) {
        for s in &self.statics {
            let body = Rect::from_center(self.pos, self.half * 2.0);
            if !body.overlaps(s) {
                continue;
            }
            if dx > 0.0 {
                self.pos.x = s.x - self.half.x;
            } else if dx < 0.0 {
                self.pos.x = s.right() + self.half.x;
            }
            self.vel.x = 0.0;
        }
    }

    fn resolve_y(&mut self, dy: f32) {
        for s in &self.statics {
            let body = Rect::from_center(self.pos, self.half * 2.0);
            if !body.overlaps(s) {
                continue;
            }
            if dy > 0.0 {
                self.pos.y = s.y - self.half.y;
            } else if dy < 0.0 {
                self.pos.y = s.bottom() + self.half.y;
            }
            self.vel.y = 0.0;
        }
    }

    fn clamp_to_bounds(&mut self) {
        let Some(b) = self.bounds else { return };
        let min = Vec2::new(b.x, b.y) + self.half;
        let max = Vec2::new(b.right(), b.bottom()) - self.half;
        let clamped = self.pos.clamp(min, max.max(min));
        if clamped.x != self.pos.x {
            self.vel.x = 0.0;
        }
        if clamped.y != self.pos.y {
            self.vel.y = 0.0;
        }
        self.pos = clamped;
    }
}

impl Kinematics for BoundedBody {
    fn add_static(&mut self, rect: Rect) {
        self.statics.push(rect);
    }

    fn spawn_body(&mut self, pos: Vec2, half_extents: Vec2) {
        self.pos = pos;
        self.half = half_extents;
        self.vel = Vec2::ZERO;
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn step(&mut self, dt: f32) {
        let delta = self.vel * dt;
        self.pos.x += delta.x;
        self.resolve_x(delta.x);
        self.pos.y += delta.y;
        self.resolve_y(delta.y);
        self.clamp_to_bounds();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover() -> BoundedBody {
        let mut body = BoundedBody::new();
        body.set_bounds(Rect::new(0.0, 0.0, 500.0, 500.0));
        body.spawn_body(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0));
        body
    }

    #[test]
    fn rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn moves_with_velocity() {
        let mut body = mover();
        body.set_velocity(Vec2::new(300.0, 0.0));
        body.step(0.5);
        assert_eq!(body.position(), Vec2::new(250.0, 100.0));
    }

    #[test]
    fn stops_flush_against_blocker() {
        let mut body = mover();
        body.add_static(Rect::new(150.0, 50.0, 200.0, 100.0));
        body.set_velocity(Vec2::new(300.0, 0.0));
        body.step(0.5);
        assert_eq!(body.position().x, 140.0);
        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn slides_along_blocker_on_free_axis() {
        let mut body = mover();
        body.add_static(Rect::new(111.0, 0.0, 40.0, 400.0));
        body.set_velocity(Vec2::new(100.0, 100.0));
        body.step(0.1);
        assert_eq!(body.position(), Vec2::new(101.0, 110.0));
    }

    #[test]
    fn clamped_to_bounds() {
        let mut body = mover();
        body.set_velocity(Vec2::new(-1000.0, 0.0));
        body.step(1.0);
        assert_eq!(body.position().x, 10.0);
    }

    #[test]
    fn reset_drops_everything() {
        let mut body = mover();
        body.add_static(Rect::new(0.0, 0.0, 1.0, 1.0));
        body.reset();
        assert_eq!(body.static_count(), 0);
        assert_eq!(body.position(), Vec2::ZERO);
    }
}
