// Physics adapter over rapier2d
//
// Gameplay code sees `ActorPhysics`; `PhysicsWorld` is the rapier-backed
// implementation that also owns stepping and contact reporting.

pub mod body;
mod collision;
mod query;
mod world;

pub use body::presets;
pub use collision::{CollisionGroups, LayerMask};
pub use query::ActorPhysics;
pub use world::{ContactEvent, PhysicsWorld};
