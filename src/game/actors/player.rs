// Player motion/combat controller

use glam::Vec2;

use crate::engine::input::{Action, Axis, InputSource};
use crate::engine::physics::{ActorPhysics, CollisionGroups};
use crate::engine::EntityId;
use crate::game::GameError;

use super::animator::AnimatorDriver;
use super::sinks::{ActorParts, AnimParam, AudioSink, SoundCue};
use super::state::{ActionGates, Facing};
use super::stats::{GroundDetection, PlayerStats};

/// What a single player tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    /// Jump velocity was applied
    pub jumped: bool,
    /// Attack animation was triggered
    pub attack_triggered: bool,
    /// Jump/attack gates were re-armed by the ground probe
    pub landed: bool,
}

/// Reads input once per tick and turns it into velocity intent, jumps and
/// attack triggers for the player's body
#[derive(Debug)]
pub struct PlayerController {
    entity: EntityId,
    stats: PlayerStats,

    animator: AnimatorDriver,
    audio: Box<dyn AudioSink>,

    facing: Facing,
    /// Horizontal intent read this tick (-1 to 1)
    intent: f32,
    is_moving: bool,
    /// Raw jump button state as seen through edges
    is_jumping: bool,
    /// Raw attack button state as seen through edges
    is_attacking: bool,
    gates: ActionGates,
    /// Probe result from the previous tick (probe detection only)
    was_grounded: bool,
}

impl PlayerController {
    /// Build a controller for an entity that already has a body.
    /// Fails if the body, animator or audio source is missing.
    pub fn new(
        entity: EntityId,
        stats: PlayerStats,
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
            facing: Facing::Right,
            intent: 0.0,
            is_moving: false,
            is_jumping: false,
            is_attacking: false,
            gates: ActionGates::new(),
            was_grounded: false,
        })
    }

    /// Advance one fixed frame
    pub fn tick(
        &mut self,
        input: &dyn InputSource,
        physics: &mut dyn ActorPhysics,
    ) -> PlayerTick {
        let mut report = PlayerTick::default();

        self.update_movement(input, physics);

        // A tap inside one frame still counts as a press
        for &down in input.button_edge(Action::Jump).transitions() {
            self.is_jumping = down;
            if down {
                report.jumped |= self.try_jump(physics);
            }
        }

        for &down in input.button_edge(Action::Attack).transitions() {
            self.is_attacking = down;
            if down && self.gates.can_attack() {
                self.animator.trigger(AnimParam::Attack);
                report.attack_triggered = true;
            }
        }

        if let GroundDetection::Probe {
            offset,
            radius,
            mask,
        } = self.stats.ground
        {
            let grounded = physics
                .position(self.entity)
                .map(|pos| physics.probe(self.entity, pos + offset, radius, mask))
                .unwrap_or(false);
            // Only the transition counts, like a collision-enter
            if grounded && !self.was_grounded {
                self.land();
                report.landed = true;
            }
            self.was_grounded = grounded;
        }

        self.update_animation();
        report
    }

    fn update_movement(&mut self, input: &dyn InputSource, physics: &mut dyn ActorPhysics) {
        self.intent = input.axis(Axis::Horizontal);
        if let Some(facing) = Facing::from_horizontal(self.intent) {
            self.facing = facing;
        }
        self.is_moving = self.intent != 0.0;

        // Vertical velocity belongs to the physics integration
        let Some(velocity) = physics.velocity(self.entity) else {
            return;
        };
        physics.set_velocity(
            self.entity,
            Vec2::new(self.intent * self.stats.move_speed, velocity.y),
        );
    }

    fn try_jump(&mut self, physics: &mut dyn ActorPhysics) -> bool {
        if !self.gates.can_jump() {
            return false;
        }
        let Some(velocity) = physics.velocity(self.entity) else {
            return false;
        };

        physics.set_velocity(self.entity, Vec2::new(velocity.x, self.stats.jump_force));
        self.gates.close();
        self.audio.play_one_shot(SoundCue::Jump);
        log::debug!("{} jumped", self.entity);
        true
    }

    fn update_animation(&mut self) {
        self.animator.set_bool(AnimParam::IsMoving, self.is_moving);

        // isJumping goes up with the button but only comes down once the
        // button is released and the player is grounded again
        let shown = self.animator.emitted(AnimParam::IsJumping);
        if self.is_jumping && !shown {
            self.animator.set_bool(AnimParam::IsJumping, true);
        } else if shown && !self.is_jumping && self.gates.can_jump() {
            self.animator.set_bool(AnimParam::IsJumping, false);
        }
    }

    fn land(&mut self) {
        if !self.gates.can_jump() {
            log::trace!("{} grounded", self.entity);
        }
        self.gates.open();
    }

    /// Collision-start reported by the physics step.
    /// Ignored when the player detects ground with a probe.
    pub fn on_collision_enter(&mut self, other: CollisionGroups) {
        if self.stats.ground == GroundDetection::Contact && other.is_walkable() {
            self.land();
        }
    }

    /// Centre of the attack circle, mirrored with facing
    pub fn hit_point(&self, physics: &dyn ActorPhysics) -> Option<Vec2> {
        let origin = physics.position(self.entity)?;
        let offset = self.stats.hit_point;
        Some(origin + Vec2::new(offset.x * self.facing.sign(), offset.y))
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn intent(&self) -> f32 {
        self.intent
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn is_attacking(&self) -> bool {
        self.is_attacking
    }

    pub fn gates(&self) -> ActionGates {
        self.gates
    }

    /// Grounded since the last jump (same flag as `can_jump`)
    pub fn is_grounded(&self) -> bool {
        self.gates.can_jump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::ScriptedInput;
    use crate::engine::physics::{presets, PhysicsWorld};
    use crate::game::actors::sinks::{RecordingSinks, SinkCall, SinkLog};
    use approx::assert_relative_eq;

    const PLAYER: EntityId = EntityId(1);
    const FLOOR: EntityId = EntityId(2);

    fn setup(stats: PlayerStats) -> (PlayerController, PhysicsWorld, SinkLog) {
        let mut world = PhysicsWorld::new();
        world.add_entity(
            FLOOR,
            presets::surface_body(0.0, 0.0),
            presets::surface_collider(20.0, 1.0, CollisionGroups::Floor),
        );
        world.add_entity(
            PLAYER,
            presets::player_body(0.0, 1.5),
            presets::actor_collider(stats.width, stats.height, CollisionGroups::Player),
        );

        let log = SinkLog::new();
        let mut sinks = RecordingSinks::new(log.clone());
        let parts = ActorParts::from_factory(&mut sinks, PLAYER);
        let player = PlayerController::new(PLAYER, stats, parts, &world)
            .expect("player should build");
        (player, world, log)
    }

    fn grounded() -> (PlayerController, PhysicsWorld, SinkLog) {
        let (mut player, world, log) = setup(PlayerStats::standard());
        player.on_collision_enter(CollisionGroups::Floor);
        (player, world, log)
    }

    #[test]
    fn test_missing_components_fail_fast() {
        let world = PhysicsWorld::new();
        let mut sinks = RecordingSinks::new(SinkLog::new());
        let parts = ActorParts::from_factory(&mut sinks, PLAYER);
        let err = PlayerController::new(PLAYER, PlayerStats::standard(), parts, &world)
            .err()
            .expect("no body registered");
        assert!(matches!(
            err,
            GameError::MissingComponent {
                component: "body",
                ..
            }
        ));

        let (_, world, _) = setup(PlayerStats::standard());
        let mut sinks = RecordingSinks::new(SinkLog::new()).without_audio();
        let parts = ActorParts::from_factory(&mut sinks, PLAYER);
        let err = PlayerController::new(PLAYER, PlayerStats::standard(), parts, &world)
            .err()
            .expect("no audio source");
        assert!(matches!(
            err,
            GameError::MissingComponent {
                component: "audio",
                ..
            }
        ));
    }

    #[test]
    fn test_is_moving_tracks_intent() {
        let (mut player, mut world, _) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();

        for intent in [0.0, 1.0, 0.5, 0.0, -1.0, 0.0] {
            input.set_axis(Axis::Horizontal, intent);
            player.tick(&input, &mut world);
            assert_eq!(player.is_moving(), intent != 0.0, "intent {}", intent);
            input.end_frame();
        }
    }

    #[test]
    fn test_velocity_keeps_vertical_component() {
        let (mut player, mut world, _) = setup(PlayerStats::standard());
        world.set_velocity(PLAYER, Vec2::new(0.0, -3.0));

        let mut input = ScriptedInput::new();
        input.set_axis(Axis::Horizontal, -1.0);
        player.tick(&input, &mut world);

        let velocity = world.velocity(PLAYER).unwrap_or_default();
        assert_relative_eq!(velocity.x, -5.0);
        assert_relative_eq!(velocity.y, -3.0);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_zero_intent_keeps_facing() {
        let (mut player, mut world, _) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();
        input.set_axis(Axis::Horizontal, -1.0);
        player.tick(&input, &mut world);
        input.set_axis(Axis::Horizontal, 0.0);
        player.tick(&input, &mut world);
        assert_eq!(player.facing(), Facing::Left);
    }

    #[test]
    fn test_jump_requires_ground_contact() {
        let (mut player, mut world, log) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);

        let report = player.tick(&input, &mut world);
        assert!(!report.jumped);
        assert_relative_eq!(world.velocity(PLAYER).unwrap_or_default().y, 0.0);
        assert_eq!(log.count(PLAYER, SinkCall::Sound(SoundCue::Jump)), 0);
        // Raw input still shows on the animator
        assert!(player.is_jumping());
        assert_eq!(
            log.count(PLAYER, SinkCall::SetBool(AnimParam::IsJumping, true)),
            1
        );
    }

    #[test]
    fn test_jump_closes_both_gates() {
        let (mut player, mut world, log) = grounded();
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);

        let report = player.tick(&input, &mut world);
        assert!(report.jumped);
        assert_relative_eq!(world.velocity(PLAYER).unwrap_or_default().y, 7.0);
        assert!(!player.gates().can_jump());
        assert!(!player.gates().can_attack());
        assert_eq!(log.count(PLAYER, SinkCall::Sound(SoundCue::Jump)), 1);
    }

    #[test]
    fn test_held_jump_does_not_repeat() {
        let (mut player, mut world, log) = grounded();
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);
        player.tick(&input, &mut world);
        input.end_frame();

        // Land while the button is still held: no new press edge, no jump
        player.on_collision_enter(CollisionGroups::Floor);
        let report = player.tick(&input, &mut world);
        assert!(!report.jumped);
        assert_eq!(log.count(PLAYER, SinkCall::Sound(SoundCue::Jump)), 1);
    }

    #[test]
    fn test_jump_flag_clears_only_after_landing() {
        let (mut player, mut world, log) = grounded();
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);
        player.tick(&input, &mut world);
        input.end_frame();

        input.release(Action::Jump);
        player.tick(&input, &mut world);
        input.end_frame();
        // Released but still airborne
        assert!(!player.is_jumping());
        assert_eq!(
            log.count(PLAYER, SinkCall::SetBool(AnimParam::IsJumping, false)),
            0
        );

        player.on_collision_enter(CollisionGroups::Floor);
        player.tick(&input, &mut world);
        assert_eq!(
            log.count(PLAYER, SinkCall::SetBool(AnimParam::IsJumping, false)),
            1
        );
    }

    #[test]
    fn test_attack_trigger_needs_open_gate() {
        let (mut player, mut world, log) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();
        input.press(Action::Attack);
        let report = player.tick(&input, &mut world);
        assert!(!report.attack_triggered);
        assert!(player.is_attacking());
        input.end_frame();

        input.release(Action::Attack);
        player.tick(&input, &mut world);
        assert!(!player.is_attacking());
        input.end_frame();

        player.on_collision_enter(CollisionGroups::Floor);
        input.press(Action::Attack);
        let report = player.tick(&input, &mut world);
        assert!(report.attack_triggered);
        assert_eq!(log.count(PLAYER, SinkCall::Trigger(AnimParam::Attack)), 1);
        // Attacking does not disarm anything
        assert!(player.gates().can_attack());
        assert!(player.gates().can_jump());
    }

    #[test]
    fn test_tap_within_one_frame_still_jumps() {
        let (mut player, mut world, log) = grounded();
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);
        input.release(Action::Jump);

        let report = player.tick(&input, &mut world);
        assert!(report.jumped);
        assert_relative_eq!(world.velocity(PLAYER).unwrap_or_default().y, 7.0);
        assert!(!player.is_jumping());
        assert!(!player.gates().can_jump());
        assert_eq!(log.count(PLAYER, SinkCall::Sound(SoundCue::Jump)), 1);
    }

    #[test]
    fn test_tap_within_one_frame_still_attacks() {
        let (mut player, mut world, log) = grounded();
        let mut input = ScriptedInput::new();
        input.press(Action::Attack);
        input.release(Action::Attack);

        let report = player.tick(&input, &mut world);
        assert!(report.attack_triggered);
        assert!(!player.is_attacking());
        assert_eq!(log.count(PLAYER, SinkCall::Trigger(AnimParam::Attack)), 1);
    }

    #[test]
    fn test_release_and_press_within_one_frame_jumps() {
        let (mut player, mut world, log) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();
        input.press(Action::Jump);
        player.tick(&input, &mut world);
        input.end_frame();

        player.on_collision_enter(CollisionGroups::Floor);
        input.release(Action::Jump);
        input.press(Action::Jump);
        assert!(player.tick(&input, &mut world).jumped);
        assert!(player.is_jumping());
        assert_eq!(log.count(PLAYER, SinkCall::Sound(SoundCue::Jump)), 1);
    }

    #[test]
    fn test_non_walkable_contact_does_not_open_gates() {
        let (mut player, _, _) = setup(PlayerStats::standard());
        player.on_collision_enter(CollisionGroups::Enemy);
        assert!(!player.gates().can_jump());
        player.on_collision_enter(CollisionGroups::Environment);
        assert!(player.gates().can_jump() && player.gates().can_attack());
    }

    #[test]
    fn test_animator_calls_are_debounced() {
        let (mut player, mut world, log) = setup(PlayerStats::standard());
        let mut input = ScriptedInput::new();
        input.set_axis(Axis::Horizontal, 1.0);
        for _ in 0..10 {
            player.tick(&input, &mut world);
        }
        assert_eq!(
            log.calls_for(PLAYER),
            vec![SinkCall::SetBool(AnimParam::IsMoving, true)]
        );
    }

    #[test]
    fn test_probe_detection_opens_gates_on_touchdown() {
        let (mut player, mut world, _) = setup(PlayerStats::standard().with_ground_probe());
        let input = ScriptedInput::new();

        let report = player.tick(&input, &mut world);
        assert!(report.landed);
        assert!(player.gates().can_jump());

        // Still standing: no new touchdown
        let report = player.tick(&input, &mut world);
        assert!(!report.landed);
    }

    #[test]
    fn test_probe_detection_ignores_contacts() {
        let (mut player, mut world, _) = setup(PlayerStats::standard().with_ground_probe());
        world.translate(PLAYER, Vec2::new(0.0, 5.0));
        player.on_collision_enter(CollisionGroups::Floor);
        assert!(!player.gates().can_jump());

        player.tick(&ScriptedInput::new(), &mut world);
        assert!(!player.gates().can_jump());
    }

    #[test]
    fn test_probe_jump_does_not_rearm_while_touching_floor() {
        let (mut player, mut world, _) = setup(PlayerStats::standard().with_ground_probe());
        let mut input = ScriptedInput::new();
        player.tick(&input, &mut world);

        input.press(Action::Jump);
        assert!(player.tick(&input, &mut world).jumped);
        input.end_frame();

        // Body hasn't left the floor yet (no physics step)
        player.tick(&input, &mut world);
        assert!(!player.gates().can_jump());
    }

    #[test]
    fn test_hit_point_follows_facing() {
        let (mut player, mut world, _) = setup(PlayerStats::standard());
        assert_eq!(player.hit_point(&world), Some(Vec2::new(0.8, 1.5)));

        let mut input = ScriptedInput::new();
        input.set_axis(Axis::Horizontal, -1.0);
        player.tick(&input, &mut world);
        assert_eq!(player.hit_point(&world), Some(Vec2::new(-0.8, 1.5)));
    }
}
