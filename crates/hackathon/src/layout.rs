//! The venue: world size, blockers, spawn points.

use glam::Vec2;
use hackday_engine::Rect;

use crate::npc::MinigameKind;
use crate::questions::QuestionFeed;

pub const WORLD_W: f32 = 1500.0;
pub const WORLD_H: f32 = 1000.0;

/// Player feet start near the bottom center.
pub const PLAYER_SPAWN: Vec2 = Vec2::new(WORLD_W / 2.0, WORLD_H - 130.0);
/// Half extents of the player's collision box.
pub const PLAYER_BODY_HALF: Vec2 = Vec2::new(14.0, 8.0);
/// Rendered player size at scale 1.
pub const PLAYER_FRAME: Vec2 = Vec2::new(16.0, 16.0);

/// Tables, walls and planters.
pub const SOLIDS: [Rect; 12] = [
    // Desks
    Rect::new(440.0, 350.0, 200.0, 70.0),
    Rect::new(1050.0, 350.0, 200.0, 70.0),
    Rect::new(420.0, 600.0, 220.0, 70.0),
    Rect::new(1100.0, 600.0, 220.0, 70.0),
    // Back wall and stage
    Rect::new(0.0, 0.0, 3000.0, 200.0),
    Rect::new(750.0, 0.0, 220.0, 300.0),
    // Left wall and plant
    Rect::new(0.0, 0.0, 200.0, 500.0),
    Rect::new(0.0, 300.0, 100.0, 200.0),
    // Right wall and plant
    Rect::new(1500.0, 0.0, 200.0, 500.0),
    Rect::new(1500.0, 300.0, 100.0, 200.0),
    // Front counters
    Rect::new(0.0, 970.0, 700.0, 200.0),
    Rect::new(1500.0, 970.0, 750.0, 200.0),
];

/// Size of the blocker at an NPC's feet.
pub const NPC_FOOT: Vec2 = Vec2::new(10.0, 10.0);
/// The foot blocker sits this far above the sprite anchor.
pub const NPC_FOOT_RISE: f32 = 55.0;
/// The talk prompt sits this far above the NPC anchor.
pub const PROMPT_RISE: f32 = 125.0;
/// Rendered NPC size.
pub const NPC_FRAME: Vec2 = Vec2::new(96.0, 96.0);

/// One roster slot: texture key, anchor, minigame, backing feed.
#[derive(Debug, Clone, Copy)]
pub struct NpcSlot {
    pub key: &'static str,
    pub pos: Vec2,
    pub kind: MinigameKind,
    pub feed: QuestionFeed,
}

pub const NPC_SLOTS: [NpcSlot; 3] = [
    NpcSlot {
        key: "npc1",
        pos: Vec2::new(250.0, 300.0),
        kind: MinigameKind::Choice,
        feed: QuestionFeed::SingleChoice,
    },
    NpcSlot {
        key: "npc2",
        pos: Vec2::new(800.0, 600.0),
        kind: MinigameKind::Reorder,
        feed: QuestionFeed::Reorder,
    },
    NpcSlot {
        key: "npc3",
        pos: Vec2::new(1300.0, 400.0),
        kind: MinigameKind::Choice,
        feed: QuestionFeed::ChoiceBatch,
    },
];

/// Blocker under an NPC's feet.
pub fn npc_foot_blocker(anchor: Vec2) -> Rect {
    Rect::new(anchor.x, anchor.y - NPC_FOOT_RISE, NPC_FOOT.x, NPC_FOOT.y)
}

pub fn world_bounds() -> Rect {
    Rect::new(0.0, 0.0, WORLD_W, WORLD_H)
}
