use glam::Vec2;
use hackday_engine::{
    Easing, EngineContext, EntityId, Kinematics, LabelComponent, RenderLayer, SpriteComponent,
    Tween, TweenId, TweenLoop,
};

use crate::layout::{npc_foot_blocker, NpcSlot, NPC_FRAME};
use crate::questions::QuestionFeed;

/// Which minigame an NPC hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinigameKind {
    Choice,
    Reorder,
}

/// Index into the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NpcId(pub usize);

const NPC_DEPTH: i32 = 5;
const MARKER_RISE: f32 = 150.0;
const MARKER_BLINK_SECS: f32 = 0.35;
const PING_RISE: f32 = 14.0;
const PING_LEG_SECS: f32 = 0.12;

#[derive(Debug)]
pub struct Npc {
    pub id: NpcId,
    pub key: &'static str,
    pub pos: Vec2,
    pub kind: MinigameKind,
    pub feed: QuestionFeed,
    pub sprite: EntityId,
    pub marker: EntityId,
}

/// Fixed, ordered NPC roster. Only alert-marker visibility changes after spawn.
#[derive(Debug, Default)]
pub struct Roster {
    npcs: Vec<Npc>,
    alerted: Option<(NpcId, TweenId)>,
}

impl Roster {
    /// Spawn sprites, alert markers and foot blockers for every slot.
    pub fn spawn(ctx: &mut EngineContext, body: &mut impl Kinematics, slots: &[NpcSlot]) -> Self {
        let npcs = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                body.add_static(npc_foot_blocker(slot.pos));
                let sprite = ctx.spawn_with(|e| {
                    e.with_tag(slot.key)
                        .with_pos(slot.pos - Vec2::new(0.0, NPC_FRAME.y * 0.5))
                        .with_size(NPC_FRAME)
                        .with_depth(NPC_DEPTH)
                        .with_layer(RenderLayer::Actors)
                        .with_sprite(
                            SpriteComponent::new(slot.key)
                                .with_animation(format!("{}-idle", slot.key)),
                        )
                });
                let marker = ctx.spawn_with(|e| {
                    e.with_tag("npc-alert")
                        .with_pos(slot.pos - Vec2::new(0.0, MARKER_RISE))
                        .with_size(Vec2::new(28.0, 28.0))
                        .with_depth(NPC_DEPTH + 1)
                        .with_layer(RenderLayer::Actors)
                        .with_visible(false)
                        .with_label(LabelComponent::new("!", 32.0, 0xff4d4d))
                });
                Npc {
                    id: NpcId(i),
                    key: slot.key,
                    pos: slot.pos,
                    kind: slot.kind,
                    feed: slot.feed,
                    sprite,
                    marker,
                }
            })
            .collect();
        Self { npcs, alerted: None }
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.iter()
    }

    pub fn len(&self) -> usize {
        self.npcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.npcs.is_empty()
    }

    /// Closest NPC strictly inside `radius`. Equal distances keep the
    /// earlier roster entry.
    pub fn nearest(&self, from: Vec2, radius: f32) -> Option<NpcId> {
        let mut best: Option<(NpcId, f32)> = None;
        for npc in &self.npcs {
            let d = from.distance(npc.pos);
            if d < radius && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((npc.id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Currently blinking NPC, if any.
    pub fn alerted(&self) -> Option<NpcId> {
        self.alerted.map(|(id, _)| id)
    }

    /// Bob the NPC and move the blinking marker onto it.
    pub fn raise_alert(&mut self, ctx: &mut EngineContext, id: NpcId) {
        self.clear_alert(ctx);
        let Some(npc) = self.npcs.get(id.0) else {
            return;
        };
        if !ctx.tweens.is_animating(npc.sprite) {
            let y = npc.pos.y - NPC_FRAME.y * 0.5;
            ctx.tweens.add(
                npc.sprite,
                Tween::position_y(y, y - PING_RISE, PING_LEG_SECS, Easing::QuadOut)
                    .with_loop(TweenLoop::Yoyo { times: 2 }),
            );
        }
        ctx.scene.set_visible(npc.marker, true);
        let blink = ctx.tweens.add(
            npc.marker,
            Tween::alpha(1.0, 0.2, MARKER_BLINK_SECS, Easing::SineInOut)
                .with_loop(TweenLoop::PingPong),
        );
        self.alerted = Some((id, blink));
    }

    /// Hide the marker and stop its blink.
    pub fn clear_alert(&mut self, ctx: &mut EngineContext) {
        if let Some((id, blink)) = self.alerted.take() {
            ctx.tweens.remove(blink);
            if let Some(npc) = self.npcs.get(id.0) {
                ctx.scene.set_visible(npc.marker, false);
                if let Some(marker) = ctx.scene.get_mut(npc.marker) {
                    marker.alpha = 1.0;
                }
            }
        }
    }

    pub fn despawn(&mut self, ctx: &mut EngineContext) {
        self.clear_alert(ctx);
        for npc in self.npcs.drain(..) {
            ctx.despawn(npc.sprite);
            ctx.despawn(npc.marker);
        }
    }
}
