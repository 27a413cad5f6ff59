//! Every tunable of a round, overridable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::npc::MinigameKind;

/// How a correct answer moves the completion meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProgressMode {
    /// Fixed increment per minigame kind.
    PerKind { choice: f32, reorder: f32 },
    /// Every correct answer counts as one of `total` challenges.
    PerChallenge { total: u32 },
}

impl Default for ProgressMode {
    fn default() -> Self {
        ProgressMode::PerKind {
            choice: 0.25,
            reorder: 0.5,
        }
    }
}

impl ProgressMode {
    /// Increment for one correct answer of `kind` in per-kind mode.
    pub fn increment(&self, kind: MinigameKind) -> Option<f32> {
        match (*self, kind) {
            (ProgressMode::PerKind { choice, .. }, MinigameKind::Choice) => Some(choice),
            (ProgressMode::PerKind { reorder, .. }, MinigameKind::Reorder) => Some(reorder),
            (ProgressMode::PerChallenge { .. }, _) => None,
        }
    }
}

/// Geometry of the modal dialog relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogLayout {
    /// Fraction of the viewport covered by the dialog.
    pub screen_ratio: f32,
    pub padding: f32,
    pub gap: f32,
    /// Fraction of the inner width given to the minigame; the rest is the hint column.
    pub main_ratio: f32,
}

impl Default for DialogLayout {
    fn default() -> Self {
        Self {
            screen_ratio: 0.9,
            padding: 24.0,
            gap: 18.0,
            main_ratio: 0.78,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub round_seconds: u32,
    pub interaction_radius: f32,
    pub player_speed: f32,
    /// Sprite scale of the player; the name tag floats `6 * scale` above the feet.
    pub player_scale: f32,
    pub idle_poll_interval: f32,
    pub idle_threshold: f32,
    pub idle_cooldown: f32,
    pub alert_min_delay: f32,
    pub alert_max_delay: f32,
    /// Probability in [0, 1] that a due alert actually shows.
    pub alert_chance: f64,
    pub alert_cooldown: f32,
    pub notice_duration: f32,
    pub progress: ProgressMode,
    pub dialog: DialogLayout,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Seed for card shuffles and alert scheduling.
    pub seed: u64,
    /// How long the host keeps the victory celebration up.
    pub celebration_seconds: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_seconds: 180,
            interaction_radius: 120.0,
            player_speed: 300.0,
            player_scale: 6.0,
            idle_poll_interval: 1.0,
            idle_threshold: 20.0,
            idle_cooldown: 45.0,
            alert_min_delay: 25.0,
            alert_max_delay: 60.0,
            alert_chance: 0.6,
            alert_cooldown: 30.0,
            notice_duration: 5.2,
            progress: ProgressMode::default(),
            dialog: DialogLayout::default(),
            viewport_width: 1280.0,
            viewport_height: 800.0,
            seed: 0x6861_636b,
            celebration_seconds: 6.0,
        }
    }
}

impl SessionConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert_min_delay > self.alert_max_delay {
            return Err(ConfigError::OutOfRange {
                field: "alert_min_delay",
                reason: format!(
                    "{} is greater than alert_max_delay {}",
                    self.alert_min_delay, self.alert_max_delay
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.alert_chance) {
            return Err(ConfigError::OutOfRange {
                field: "alert_chance",
                reason: format!("{} is not a probability", self.alert_chance),
            });
        }
        if self.idle_poll_interval <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "idle_poll_interval",
                reason: "must be positive".into(),
            });
        }
        if self.notice_duration <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "notice_duration",
                reason: "must be positive".into(),
            });
        }
        if let ProgressMode::PerChallenge { total: 0 } = self.progress {
            return Err(ConfigError::OutOfRange {
                field: "progress.total",
                reason: "a round needs at least one challenge".into(),
            });
        }
        Ok(())
    }
}
