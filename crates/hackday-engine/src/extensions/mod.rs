// extensions/mod.rs
//
// Optional animation helpers. Decoupled from the session logic: overlays opt in
// by registering tweens on the entities they own.

pub mod easing;
pub mod tween;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
pub use tween::{Tween, TweenId, TweenLoop, TweenState, TweenTarget};
