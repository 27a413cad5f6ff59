use serde::Serialize;

/// Render layer: controls draw order and coordinate space for entities.
///
/// Layers are drawn back-to-front: Floor first, Ui last.
/// `Floor` and `Actors` live in world space; `Hud` and `Ui` are pinned to
/// the viewport and receive pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RenderLayer {
    Floor = 0,
    #[default]
    Actors = 1,
    Hud = 2,
    Ui = 3,
}

impl RenderLayer {
    /// Total number of render layers.
    pub const COUNT: usize = 4;

    /// Whether entities on this layer are positioned in screen space.
    pub fn is_screen_space(self) -> bool {
        matches!(self, Self::Hud | Self::Ui)
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_actors() {
        assert_eq!(RenderLayer::default(), RenderLayer::Actors);
    }

    #[test]
    fn ordering_is_back_to_front() {
        assert!(RenderLayer::Floor < RenderLayer::Actors);
        assert!(RenderLayer::Actors < RenderLayer::Hud);
        assert!(RenderLayer::Hud < RenderLayer::Ui);
        assert_eq!(RenderLayer::Ui.as_u8() as usize, RenderLayer::COUNT - 1);
    }

    #[test]
    fn only_overlay_layers_are_screen_space() {
        assert!(!RenderLayer::Floor.is_screen_space());
        assert!(!RenderLayer::Actors.is_screen_space());
        assert!(RenderLayer::Hud.is_screen_space());
        assert!(RenderLayer::Ui.is_screen_space());
    }
}
