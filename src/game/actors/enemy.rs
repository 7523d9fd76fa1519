// Enemy chase and death controller

use std::time::Duration;

use glam::Vec2;

use crate::core::math::{move_towards, sign_or_zero};
use crate::engine::physics::ActorPhysics;
use crate::engine::EntityId;
use crate::game::GameError;

use super::animator::AnimatorDriver;
use super::sinks::{ActorParts, AnimParam, AudioSink, SoundCue};
use super::state::{Facing, LifeCycle, LifeState};
use super::stats::{ChaseMode, DeathMode, EnemyStats};

/// Who an enemy chases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetRef {
    /// No player in the scene yet; chasing is disabled
    #[default]
    Unregistered,
    Player(EntityId),
}

/// What the scene has to do after a death event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// Already dying or gone
    Ignored,
    /// Destroy the body now
    RemoveNow,
    /// Destroy the body once the delay has passed
    ScheduleRemoval(Duration),
}

#[derive(Debug)]
pub struct EnemyController {
    entity: EntityId,
    stats: EnemyStats,

    animator: AnimatorDriver,
    audio: Box<dyn AudioSink>,

    life: LifeCycle,
    facing: Facing,
    /// Velocity of the previous tick's chase step
    velocity: Vec2,
}

impl EnemyController {
    pub fn new(
        entity: EntityId,
        stats: EnemyStats,
        parts: ActorParts,
        physics: &dyn ActorPhysics,
    ) -> Result<Self, GameError> {
        stats.validate()?;

        if !physics.contains(entity) {
            return Err(GameError::MissingComponent {
                entity,
                component: "body",
            });
        }
        let animator = parts.animator.ok_or(GameError::MissingComponent {
            entity,
            component: "animator",
        })?;
        let audio = parts.audio.ok_or(GameError::MissingComponent {
            entity,
            component: "audio",
        })?;

        Ok(Self {
            entity,
            stats,
            animator: AnimatorDriver::new(animator),
            audio,
            life: LifeCycle::new(),
            facing: Facing::Right,
            velocity: Vec2::ZERO,
        })
    }

    /// Chase the target for one tick. Returns whether the enemy moved.
    pub fn tick(&mut self, dt: f32, target: TargetRef, physics: &mut dyn ActorPhysics) -> bool {
        if !self.life.state().is_alive() {
            return false;
        }

        // Facing follows last tick's velocity, so it trails a turn by a frame
        if let Some(facing) = Facing::from_horizontal(self.velocity.x) {
            self.facing = facing;
        }

        let step = self.chase_step(dt, target, physics);
        if step != Vec2::ZERO {
            physics.translate(self.entity, step);
        }
        self.velocity = if dt > 0.0 { step / dt } else { Vec2::ZERO };

        let moved = step != Vec2::ZERO;
        if self.animator.set_bool(AnimParam::IsMoving, moved) && moved {
            self.audio.play_one_shot(SoundCue::Walk);
        }
        moved
    }

    /// Displacement toward the target this tick, zero when out of range
    fn chase_step(&self, dt: f32, target: TargetRef, physics: &dyn ActorPhysics) -> Vec2 {
        let TargetRef::Player(player) = target else {
            return Vec2::ZERO;
        };
        let (Some(position), Some(goal)) = (physics.position(self.entity), physics.position(player))
        else {
            return Vec2::ZERO;
        };
        if position.distance(goal) > self.stats.distance_threshold {
            return Vec2::ZERO;
        }

        let max_step = self.stats.velocity * dt;
        match self.stats.chase {
            ChaseMode::MoveTowards => move_towards(position, goal, max_step) - position,
            ChaseMode::Translate => (goal - position).normalize_or_zero() * max_step,
            ChaseMode::HorizontalOnly => Vec2::new(sign_or_zero(goal.x - position.x) * max_step, 0.0),
        }
    }

    /// Death event from an attack
    pub fn die(&mut self, now: Duration) -> DeathOutcome {
        match self.stats.death {
            DeathMode::Immediate => {
                if self.life.remove() {
                    log::debug!("{} destroyed", self.entity);
                    DeathOutcome::RemoveNow
                } else {
                    DeathOutcome::Ignored
                }
            }
            DeathMode::Sequence { delay } => {
                if !self.life.begin_dying(now) {
                    return DeathOutcome::Ignored;
                }
                self.audio.play_one_shot(SoundCue::Death);
                self.animator.trigger(AnimParam::OnDeath);
                log::debug!("{} dying, removal in {:?}", self.entity, delay);
                DeathOutcome::ScheduleRemoval(delay)
            }
        }
    }

    /// Removal timer fired. Returns false if the enemy was already gone.
    pub fn finish_removal(&mut self) -> bool {
        self.life.remove()
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn life(&self) -> LifeState {
        self.life.state()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Velocity of the last chase step
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{presets, CollisionGroups, PhysicsWorld};
    use crate::game::actors::sinks::{RecordingSinks, SinkCall, SinkLog};
    use crate::game::actors::stats::DEATH_DELAY;
    use rapier2d::na as nalgebra;
    use approx::assert_relative_eq;

    const PLAYER: EntityId = EntityId(1);
    const ENEMY: EntityId = EntityId(2);
    const DT: f32 = 0.1;

    fn setup(stats: EnemyStats, enemy_x: f32) -> (EnemyController, PhysicsWorld, SinkLog) {
        let mut world = PhysicsWorld::with_gravity(rapier2d::prelude::vector![0.0, 0.0]);
        world.add_entity(
            PLAYER,
            presets::player_body(0.0, 1.0),
            presets::actor_collider(1.0, 2.0, CollisionGroups::Player),
        );
        world.add_entity(
            ENEMY,
            presets::enemy_body(enemy_x, 1.0, 0.0),
            presets::actor_collider(stats.width, stats.height, CollisionGroups::Enemy),
        );

        let log = SinkLog::new();
        let mut sinks = RecordingSinks::new(log.clone());
        let parts = ActorParts::from_factory(&mut sinks, ENEMY);
        let enemy = EnemyController::new(ENEMY, stats, parts, &world).expect("enemy should build");
        (enemy, world, log)
    }

    fn enemy_x(world: &PhysicsWorld) -> f32 {
        world.position(ENEMY).map(|p| p.x).unwrap_or(f32::NAN)
    }

    #[test]
    fn test_missing_animator_fails_fast() {
        let (_, world, _) = setup(EnemyStats::standard(), 3.0);
        let mut sinks = RecordingSinks::new(SinkLog::new()).without_animator();
        let parts = ActorParts::from_factory(&mut sinks, ENEMY);
        let err = EnemyController::new(ENEMY, EnemyStats::standard(), parts, &world)
            .err()
            .expect("no animator");
        assert!(matches!(
            err,
            GameError::MissingComponent {
                component: "animator",
                ..
            }
        ));
    }

    #[test]
    fn test_chases_target_to_the_right() {
        // Threshold 5, target 3 units to the right
        let (mut enemy, mut world, log) = setup(EnemyStats::standard(), -3.0);

        assert!(enemy.tick(DT, TargetRef::Player(PLAYER), &mut world));
        assert_relative_eq!(enemy_x(&world), -3.0 + 2.0 * DT, epsilon = 1e-5);

        assert!(enemy.tick(DT, TargetRef::Player(PLAYER), &mut world));
        assert_relative_eq!(enemy_x(&world), -3.0 + 4.0 * DT, epsilon = 1e-5);
        assert_eq!(enemy.facing(), Facing::Right);
        assert_eq!(
            log.calls_for(ENEMY),
            vec![
                SinkCall::SetBool(AnimParam::IsMoving, true),
                SinkCall::Sound(SoundCue::Walk),
            ]
        );
    }

    #[test]
    fn test_no_chase_beyond_threshold() {
        let (mut enemy, mut world, log) = setup(EnemyStats::standard(), 6.0);
        assert!(!enemy.tick(DT, TargetRef::Player(PLAYER), &mut world));
        assert_relative_eq!(enemy_x(&world), 6.0);
        assert!(log.calls_for(ENEMY).is_empty());
    }

    #[test]
    fn test_unregistered_target_disables_chase() {
        let (mut enemy, mut world, _) = setup(EnemyStats::standard(), 2.0);
        assert!(!enemy.tick(DT, TargetRef::Unregistered, &mut world));
        assert_relative_eq!(enemy_x(&world), 2.0);
    }

    #[test]
    fn test_move_towards_does_not_overshoot() {
        let mut stats = EnemyStats::standard();
        stats.velocity = 10.0;
        let (mut enemy, mut world, _) = setup(stats, 0.5);
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        assert_relative_eq!(enemy_x(&world), 0.0);

        // On top of the target: nothing left to do
        assert!(!enemy.tick(DT, TargetRef::Player(PLAYER), &mut world));
    }

    #[test]
    fn test_translate_mode_can_overshoot() {
        let mut stats = EnemyStats::standard();
        stats.velocity = 10.0;
        stats.chase = ChaseMode::Translate;
        let (mut enemy, mut world, _) = setup(stats, 0.5);
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        assert_relative_eq!(enemy_x(&world), -0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_horizontal_only_ignores_height() {
        let mut stats = EnemyStats::standard();
        stats.chase = ChaseMode::HorizontalOnly;
        let (mut enemy, mut world, _) = setup(stats, 2.0);
        world.translate(PLAYER, Vec2::new(0.0, 1.0));

        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        let position = world.position(ENEMY).unwrap_or(Vec2::NAN);
        assert_relative_eq!(position.x, 2.0 - 2.0 * DT, epsilon = 1e-5);
        assert_relative_eq!(position.y, 1.0);
    }

    #[test]
    fn test_facing_lags_one_tick() {
        let (mut enemy, mut world, _) = setup(EnemyStats::standard(), 3.0);
        assert_eq!(enemy.facing(), Facing::Right);

        // Moving left, but facing is taken from the previous (zero) velocity
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        assert_eq!(enemy.facing(), Facing::Right);
        assert!(enemy.velocity().x < 0.0);

        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        assert_eq!(enemy.facing(), Facing::Left);
    }

    #[test]
    fn test_is_moving_drops_when_out_of_range() {
        let (mut enemy, mut world, log) = setup(EnemyStats::standard(), 3.0);
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        world.translate(PLAYER, Vec2::new(-10.0, 0.0));
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);

        assert_eq!(
            log.calls_for(ENEMY),
            vec![
                SinkCall::SetBool(AnimParam::IsMoving, true),
                SinkCall::Sound(SoundCue::Walk),
                SinkCall::SetBool(AnimParam::IsMoving, false),
            ]
        );
        assert_eq!(enemy.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_walk_sound_when_starting_to_move() {
        let (mut enemy, mut world, log) = setup(EnemyStats::standard(), 3.0);
        for _ in 0..3 {
            enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        }
        assert_eq!(log.count(ENEMY, SinkCall::Sound(SoundCue::Walk)), 1);

        // Stop, then pick the chase up again
        enemy.tick(DT, TargetRef::Unregistered, &mut world);
        assert_eq!(log.count(ENEMY, SinkCall::Sound(SoundCue::Walk)), 1);
        enemy.tick(DT, TargetRef::Player(PLAYER), &mut world);
        assert_eq!(log.count(ENEMY, SinkCall::Sound(SoundCue::Walk)), 2);
    }

    #[test]
    fn test_death_sequence() {
        let (mut enemy, mut world, log) = setup(EnemyStats::standard(), 3.0);
        let now = Duration::from_millis(1200);

        assert_eq!(enemy.die(now), DeathOutcome::ScheduleRemoval(DEATH_DELAY));
        assert_eq!(enemy.life(), LifeState::Dying { since: now });
        assert_eq!(log.count(ENEMY, SinkCall::Sound(SoundCue::Death)), 1);
        assert_eq!(log.count(ENEMY, SinkCall::Trigger(AnimParam::OnDeath)), 1);

        // Dying enemies stop chasing and ignore further hits
        assert!(!enemy.tick(DT, TargetRef::Player(PLAYER), &mut world));
        assert_eq!(enemy.die(now), DeathOutcome::Ignored);
        assert_eq!(log.count(ENEMY, SinkCall::Sound(SoundCue::Death)), 1);

        assert!(enemy.finish_removal());
        assert!(!enemy.finish_removal());
        assert_eq!(enemy.life(), LifeState::Removed);
    }

    #[test]
    fn test_immediate_death() {
        let mut stats = EnemyStats::standard();
        stats.death = DeathMode::Immediate;
        let (mut enemy, _, log) = setup(stats, 3.0);

        assert_eq!(enemy.die(Duration::ZERO), DeathOutcome::RemoveNow);
        assert_eq!(enemy.life(), LifeState::Removed);
        assert_eq!(enemy.die(Duration::ZERO), DeathOutcome::Ignored);
        assert!(log.calls_for(ENEMY).is_empty());
    }
}
