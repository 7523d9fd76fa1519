// Melee attack resolution

use crate::engine::physics::ActorPhysics;
use crate::engine::EntityId;

use super::actors::PlayerController;

/// Entities inside the player's attack circle.
///
/// Only colliders in the player's attack mask are considered; the caller
/// decides what a hit does to each of them.
pub fn resolve_attack(player: &PlayerController, physics: &dyn ActorPhysics) -> Vec<EntityId> {
    let Some(center) = player.hit_point(physics) else {
        return Vec::new();
    };
    let stats = player.stats();
    let hits = physics.overlap_circle(center, stats.attack_range, stats.attack_mask);

    if !hits.is_empty() {
        log::debug!("{} attack hit {} entities", player.entity(), hits.len());
    }
    hits
}
