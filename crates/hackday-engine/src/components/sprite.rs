use serde::Serialize;

/// Sprite component: a named texture plus the animation currently playing on it.
/// The JS host owns the sheets and frame timing; Rust only picks the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteComponent {
    /// Texture key, e.g. `"player"` or `"npc2"`.
    pub texture: String,
    /// Animation key, e.g. `"player-walk-left"`. `None` shows frame 0.
    pub animation: Option<String>,
    /// Mirror horizontally.
    pub flip_x: bool,
}

impl SpriteComponent {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            animation: None,
            flip_x: false,
        }
    }

    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }

    /// Switch animation. Returns `true` if the key changed.
    pub fn play(&mut self, animation: &str) -> bool {
        if self.animation.as_deref() == Some(animation) {
            return false;
        }
        self.animation = Some(animation.to_owned());
        true
    }
}

/// Filled rectangle, optionally outlined. Colors are `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeComponent {
    pub fill: u32,
    pub fill_alpha: f32,
    pub stroke: Option<u32>,
    pub corner_radius: f32,
}

impl ShapeComponent {
    pub fn filled(fill: u32) -> Self {
        Self {
            fill,
            fill_alpha: 1.0,
            stroke: None,
            corner_radius: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = alpha;
        self
    }

    pub fn with_stroke(mut self, stroke: u32) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}

/// Text drawn centered on the entity position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelComponent {
    pub text: String,
    pub font_px: f32,
    pub color: u32,
}

impl LabelComponent {
    pub fn new(text: impl Into<String>, font_px: f32, color: u32) -> Self {
        Self {
            text: text.into(),
            font_px,
            color,
        }
    }
}
