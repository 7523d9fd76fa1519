// Actor tuning values
//
// Like the rest of the prototype, actors are tuned through a single base
// table per kind. Scenes may clone and tweak them; `validate` rejects values
// the controllers can't work with.

use std::time::Duration;

use glam::Vec2;

use crate::engine::physics::LayerMask;
use crate::game::GameError;

/// How an actor notices it is back on the ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundDetection {
    /// Collision-start with a Floor/Environment collider (reported by the scene)
    Contact,
    /// Circle probe at the foot anchor every tick
    Probe {
        /// Foot anchor relative to the actor origin
        offset: Vec2,
        radius: f32,
        mask: LayerMask,
    },
}

/// How an enemy closes in on its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseMode {
    /// Step toward the target, clamped so it never overshoots
    MoveTowards,
    /// Step along the normalized direction to the target (can overshoot)
    Translate,
    /// Step along x only, toward the target's side
    HorizontalOnly,
}

/// What happens when an enemy is hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathMode {
    /// Removed from the world on the spot
    Immediate,
    /// Death sound and animation, then removal after `delay`
    Sequence { delay: Duration },
}

/// Delay between a death event and removal
pub const DEATH_DELAY: Duration = Duration::from_millis(350);

/// Radius of the foot probe
pub const GROUND_PROBE_RADIUS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct PlayerStats {
    // Movement
    /// Horizontal speed at full intent (units/second)
    pub move_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_force: f32,
    pub ground: GroundDetection,

    // Combat
    /// Hit point offset from the player origin when facing right
    pub hit_point: Vec2,
    /// Radius of the attack circle around the hit point
    pub attack_range: f32,
    /// Layers the attack can hit
    pub attack_mask: LayerMask,

    // Dimensions (for physics collider)
    pub width: f32,
    pub height: f32,
}

pub const BASE_PLAYER: PlayerStats = PlayerStats {
    move_speed: 5.0,
    jump_force: 7.0,
    ground: GroundDetection::Contact,

    hit_point: Vec2::new(0.8, 0.0),
    attack_range: 0.6,
    attack_mask: LayerMask::ENEMIES,

    width: 1.0,
    height: 2.0,
};

impl Default for PlayerStats {
    fn default() -> Self {
        BASE_PLAYER
    }
}

impl PlayerStats {
    pub fn standard() -> Self {
        BASE_PLAYER
    }

    /// Same stats, but detecting ground with a probe under the feet
    pub fn with_ground_probe(mut self) -> Self {
        self.ground = GroundDetection::Probe {
            offset: Vec2::new(0.0, -self.height / 2.0),
            radius: GROUND_PROBE_RADIUS,
            mask: LayerMask::WALKABLE,
        };
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.move_speed >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "move_speed must be >= 0, got {}",
                self.move_speed
            )));
        }
        if !(self.attack_range >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "attack_range must be >= 0, got {}",
                self.attack_range
            )));
        }
        if let GroundDetection::Probe { radius, .. } = self.ground {
            if !(radius > 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "ground probe radius must be > 0, got {}",
                    radius
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct EnemyStats {
    /// Chase speed (units/second), 0 to 10
    pub velocity: f32,
    /// Chase only starts within this distance of the target
    pub distance_threshold: f32,
    pub chase: ChaseMode,
    pub death: DeathMode,

    pub width: f32,
    pub height: f32,
}

/// Upper bound for enemy chase speed
pub const MAX_ENEMY_VELOCITY: f32 = 10.0;

pub const BASE_ENEMY: EnemyStats = EnemyStats {
    velocity: 2.0,
    distance_threshold: 5.0,
    chase: ChaseMode::MoveTowards,
    death: DeathMode::Sequence { delay: DEATH_DELAY },

    width: 1.0,
    height: 1.0,
};

impl Default for EnemyStats {
    fn default() -> Self {
        BASE_ENEMY
    }
}

impl EnemyStats {
    pub fn standard() -> Self {
        BASE_ENEMY
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(0.0..=MAX_ENEMY_VELOCITY).contains(&self.velocity) {
            return Err(GameError::InvalidConfig(format!(
                "enemy velocity must be within 0..={}, got {}",
                MAX_ENEMY_VELOCITY, self.velocity
            )));
        }
        if !(self.distance_threshold >= 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "distance_threshold must be >= 0, got {}",
                self.distance_threshold
            )));
        }
        Ok(())
    }
}
