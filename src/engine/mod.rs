// Engine modules: fixed-step loop, timers, input, physics

pub mod entity;
pub mod game_loop;
pub mod input;
pub mod physics;
pub mod timer;

pub use entity::EntityId;
