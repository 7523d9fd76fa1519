use crate::engine::EntityId;

use super::spawner::PrefabId;

/// Gameplay setup errors
///
/// Everything here is a precondition violation caught when an actor, spawner
/// or prefab is created, never halfway through a tick.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{entity} is missing required component `{component}`")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("Spawner has no prefabs to choose from")]
    EmptyPrefabs,

    #[error("Spawner has no spawn points")]
    EmptySpawnPoints,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("A player is already registered: {0}")]
    PlayerAlreadyRegistered(EntityId),

    #[error("Unknown prefab: {0}")]
    UnknownPrefab(PrefabId),

    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
}
