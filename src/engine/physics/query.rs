// The physics contract actors are written against

use glam::Vec2;

use super::collision::{CollisionGroups, LayerMask};
use crate::engine::EntityId;

/// Body access and world queries an actor controller needs each tick
///
/// Integration (gravity, contacts) stays on the other side of this trait;
/// controllers only read positions, write velocity intent and ask questions.
pub trait ActorPhysics {
    /// Whether the entity has a body in this world
    fn contains(&self, entity: EntityId) -> bool;

    /// Tag/layer the entity was registered with
    fn group_of(&self, entity: EntityId) -> Option<CollisionGroups>;

    fn position(&self, entity: EntityId) -> Option<Vec2>;

    fn velocity(&self, entity: EntityId) -> Option<Vec2>;

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec2);

    /// Move the entity directly, bypassing integration
    fn translate(&mut self, entity: EntityId, delta: Vec2);

    /// Every entity with a collider in `mask` overlapping the given circle
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId>;

    /// Whether a collider in `mask`, other than the entity's own, touches the circle
    fn probe(&self, entity: EntityId, center: Vec2, radius: f32, mask: LayerMask) -> bool;

    /// Distance between two entities' origins
    fn distance(&self, a: EntityId, b: EntityId) -> Option<f32> {
        Some(self.position(a)?.distance(self.position(b)?))
    }
}
