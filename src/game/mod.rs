// Gameplay
//
// Actor controllers, attack resolution, spawning and the scene that ties
// them to a physics world.

pub mod actors;
pub mod combat;
pub mod error;
pub mod scene;
pub mod spawner;

pub use error::GameError;
pub use scene::{Scene, TickSummary};
