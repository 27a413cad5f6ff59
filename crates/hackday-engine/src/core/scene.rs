use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Flat store of every visual object in the round: venue, actors, HUD and
/// overlay widgets. Small enough that linear lookups by id are fine.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(128),
        }
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Insertion order of the rest is kept so
    /// equal-depth widgets keep drawing in spawn order.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Show or hide an entity. Unknown IDs are ignored.
    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(e) = self.get_mut(id) {
            e.visible = visible;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag == tag)
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.tag == tag).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Visible entities back to front: by layer, then depth, then spawn order.
    pub fn draw_order(&self) -> Vec<&Entity> {
        let mut visible: Vec<&Entity> = self.entities.iter().filter(|e| e.visible).collect();
        visible.sort_by_key(|e| (e.layer, e.depth));
        visible
    }

    /// Draw list for the JS renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.draw_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layer::RenderLayer;
    use glam::Vec2;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec2::new(10.0, 20.0));
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn despawn_keeps_the_rest_in_order() {
        let mut scene = Scene::new();
        for i in 1..=4 {
            scene.spawn(Entity::new(EntityId(i)));
        }
        assert!(scene.despawn(EntityId(2)).is_some());
        assert!(scene.despawn(EntityId(2)).is_none());
        let ids: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(3), EntityId(4)]);
    }

    #[test]
    fn find_by_tag() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("player"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("npc1"));
        assert_eq!(scene.find_by_tag("player").unwrap().id, EntityId(1));
        assert!(scene.find_by_tag("npc9").is_none());
    }

    #[test]
    fn draw_order_sorts_by_layer_then_depth() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_layer(RenderLayer::Hud));
        scene.spawn(Entity::new(EntityId(2)).with_layer(RenderLayer::Floor));
        scene.spawn(Entity::new(EntityId(3)).with_depth(10));
        scene.spawn(Entity::new(EntityId(4)).with_depth(5));
        scene.spawn(Entity::new(EntityId(5)).with_depth(5));
        let ids: Vec<_> = scene.draw_order().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![2, 4, 5, 3, 1]);
    }

    #[test]
    fn json_skips_hidden_entities() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_tag("shown"));
        scene.spawn(Entity::new(EntityId(2)).with_tag("hidden").with_visible(false));
        let json = scene.to_json().unwrap();
        assert!(json.contains("shown"));
        assert!(!json.contains("hidden"));
    }
}
