// extensions/easing.rs
//
// Curves for UI tweens: pop-ins, fades, bobbing markers.

use glam::Vec2;
use std::f32::consts::PI;

/// Shape of a tween's progress over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Decelerates into the target.
    QuadOut,
    /// Smooth at both ends; used for blinking.
    SineInOut,
    /// Shoots past the target, then settles on it.
    BackOut,
}

impl Easing {
    /// Eased progress for `t`, clamped to [0, 1] first. Only `BackOut`
    /// leaves the unit range.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let rest = 1.0 - t;
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - rest * rest,
            Easing::SineInOut => 0.5 - 0.5 * (PI * t).cos(),
            Easing::BackOut => {
                const OVERSHOOT: f32 = 1.70158;
                let u = t - 1.0;
                1.0 + u * u * ((OVERSHOOT + 1.0) * u + OVERSHOOT)
            }
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a.lerp(b, t)
}

/// Value between `a` and `b` at time `t` along `easing`.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}
