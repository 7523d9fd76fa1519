// Actor controllers
//
// This module contains the per-actor behaviour driven once per fixed tick:
// - Player movement, jump and attack gating
// - Enemy chase and death sequence
// - Debounced animator writes and the presentation sinks behind them
// - Tuning values for both actor kinds

pub mod animator;
pub mod enemy;
pub mod player;
pub mod sinks;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use enemy::{DeathOutcome, EnemyController, TargetRef};
pub use player::{PlayerController, PlayerTick};
pub use sinks::{
    ActorParts, AnimParam, AnimatorSink, AudioSink, LogSinks, RecordingSinks, SinkCall, SinkFactory,
    SinkLog, SoundCue,
};
pub use state::{ActionGates, Facing, LifeState};
pub use stats::{ChaseMode, DeathMode, EnemyStats, GroundDetection, PlayerStats};
