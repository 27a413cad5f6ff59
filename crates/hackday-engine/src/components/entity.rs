use glam::Vec2;
use serde::Serialize;

use crate::api::types::EntityId;
use crate::components::layer::RenderLayer;
use crate::components::sprite::{LabelComponent, ShapeComponent, SpriteComponent};
use crate::core::kinematics::Rect;

/// Fat Entity: a single struct with optional visual components.
/// Designed for simplicity over ECS purity; the JS host draws whatever it finds.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Hidden entities stay in the scene but are not drawn or hit-tested.
    pub visible: bool,
    /// Center position. World units on world layers, pixels on screen layers.
    pub pos: Vec2,
    /// Rendered size (width, height).
    pub size: Vec2,
    /// Draw order inside the layer (higher draws later).
    pub depth: i32,
    /// Opacity multiplier for every component.
    pub alpha: f32,
    pub layer: RenderLayer,
    pub sprite: Option<SpriteComponent>,
    pub shape: Option<ShapeComponent>,
    pub label: Option<LabelComponent>,
}

impl Entity {
    /// Create a new visible entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            depth: 0,
            alpha: 1.0,
            layer: RenderLayer::default(),
            sprite: None,
            shape: None,
            label: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteComponent) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn with_shape(mut self, shape: ShapeComponent) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_label(mut self, label: LabelComponent) -> Self {
        self.label = Some(label);
        self
    }

    /// Axis-aligned bounds around the center position.
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    /// Pointer hit test. Hidden entities never match.
    pub fn hit(&self, point: Vec2) -> bool {
        self.visible && self.bounds().contains(point)
    }
}
