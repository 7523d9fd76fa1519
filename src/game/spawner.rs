// Timed random spawner

use std::fmt;
use std::time::Duration;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::GameError;

/// Handle to an enemy template registered with the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrefabId(pub u32);

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prefab#{}", self.0)
    }
}

/// Where a spawned object appears
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    /// Radians
    pub rotation: f32,
}

impl SpawnPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            rotation: 0.0,
        }
    }
}

/// Instantiation asked of the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub prefab: PrefabId,
    pub position: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone)]
pub struct SpawnerConfig {
    pub prefabs: Vec<PrefabId>,
    pub points: Vec<SpawnPoint>,
    /// Time between spawns
    pub interval: Duration,
    /// Countdown before the first spawn
    pub initial_delay: Duration,
    pub seed: u64,
}

impl SpawnerConfig {
    pub fn new(prefabs: Vec<PrefabId>, points: Vec<SpawnPoint>, interval: Duration) -> Self {
        Self {
            prefabs,
            points,
            interval,
            initial_delay: interval,
            seed: 0,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.prefabs.is_empty() {
            return Err(GameError::EmptyPrefabs);
        }
        if self.points.is_empty() {
            return Err(GameError::EmptySpawnPoints);
        }
        if self.interval.is_zero() {
            return Err(GameError::InvalidConfig(
                "spawn interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counts down and emits one random prefab/point pair per interval
#[derive(Debug)]
pub struct Spawner {
    config: SpawnerConfig,
    countdown: Duration,
    rng: ChaCha8Rng,
    spawned: u64,
}

impl Spawner {
    pub fn new(config: SpawnerConfig) -> Result<Self, GameError> {
        config.validate()?;

        Ok(Self {
            countdown: config.initial_delay,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            spawned: 0,
            config,
        })
    }

    /// Advance the countdown. A tick yields at most one request, however
    /// long it was.
    pub fn tick(&mut self, dt: Duration) -> Option<SpawnRequest> {
        self.countdown = self.countdown.saturating_sub(dt);
        if !self.countdown.is_zero() {
            return None;
        }
        self.countdown = self.config.interval;

        let prefab = self.config.prefabs[self.rng.gen_range(0..self.config.prefabs.len())];
        let point = self.config.points[self.rng.gen_range(0..self.config.points.len())];
        self.spawned += 1;

        log::trace!("Spawner requests {} at {:?}", prefab, point.position);
        Some(SpawnRequest {
            prefab,
            position: point.position,
            rotation: point.rotation,
        })
    }

    /// Time left before the next request
    pub fn countdown(&self) -> Duration {
        self.countdown
    }

    /// Requests emitted so far
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}
