use super::collision::CollisionGroups;
use rapier2d::prelude::*;

/// Rigid body settings for scene entities
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType, gravity_scale: Real, can_sleep: bool) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            gravity_scale,
            can_sleep,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Integrated body: gravity, contacts and velocity writes
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic, 1.0, true)
    }

    /// Body placed by gameplay code; ignores gravity and never sleeps
    pub fn new_kinematic_position_based() -> Self {
        Self::with_type(RigidBodyType::KinematicPositionBased, 0.0, false)
    }

    /// Level geometry
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed, 0.0, false)
    }

    /// Spawn position
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Spawn position and rotation (radians)
    pub fn position_rotation(mut self, x: Real, y: Real, angle: Real) -> Self {
        self.position = Isometry::new(vector![x, y], angle);
        self
    }

    /// Multiplier on world gravity
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (actors never tip over)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    pub fn build(self) -> RigidBody {
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build()
    }
}

/// Collider settings; the group decides both filtering and the entity's tag
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Axis-aligned box from half extents
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Vertical capsule, used for actors
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        let a = point![0.0, -half_height];
        let b = point![0.0, half_height];
        Self::with_shape(SharedShape::capsule(a, b, radius))
    }

    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Mass comes from density times shape area
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Group this collider will be registered under
    pub fn group(&self) -> CollisionGroups {
        self.collision_groups
    }

    /// Build the collider. Entity ownership is stamped on by the world.
    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build()
    }
}

/// Common body/collider configurations for scene entities
pub mod presets {
    use super::*;

    /// The player: dynamic, gravity-driven, rotation locked
    pub fn player_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .gravity_scale(1.0)
            .can_sleep(false) // Players should never sleep
            .build()
    }

    /// Capsule collider sized to an actor
    pub fn actor_collider(width: Real, height: Real, group: CollisionGroups) -> ColliderBuilder2D {
        let radius = width / 2.0;
        let half_height = ((height / 2.0) - radius).max(0.0);

        ColliderBuilder2D::capsule(half_height, radius)
            .collision_groups(group)
            .friction(0.0) // No friction for smooth movement
            .restitution(0.0)
            .density(1.0)
    }

    /// Enemies are positioned by their chase logic, not by forces
    pub fn enemy_body(x: Real, y: Real, angle: Real) -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .position_rotation(x, y, angle)
            .build()
    }

    /// Floor or level geometry (fixed)
    pub fn surface_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Box collider for floors and level geometry
    pub fn surface_collider(width: Real, height: Real, group: CollisionGroups) -> ColliderBuilder2D {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(group)
            .friction(0.3)
            .restitution(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_rotation() {
        let body = BodyBuilder::new_kinematic_position_based()
            .position_rotation(-6.0, 1.0, std::f32::consts::FRAC_PI_2)
            .build();

        assert_eq!(body.translation().x, -6.0);
        assert_eq!(body.translation().y, 1.0);
        assert!((body.rotation().angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(body.gravity_scale(), 0.0);
    }

    #[test]
    fn test_collider_builder_box() {
        let collider = ColliderBuilder2D::box_shape(1.0, 2.0).friction(0.3).build();

        assert!(!collider.is_sensor());
        assert_eq!(collider.friction(), 0.3);
    }

    #[test]
    fn test_player_preset() {
        let body = presets::player_body(0.0, 0.0);
        let collider = presets::actor_collider(1.0, 2.0, CollisionGroups::Player).build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.is_rotation_locked());
        assert!(!collider.is_sensor());
    }

    #[test]
    fn test_enemy_preset_is_kinematic() {
        let body = presets::enemy_body(3.0, 1.0, 0.0);
        assert_eq!(body.body_type(), RigidBodyType::KinematicPositionBased);
    }

    #[test]
    fn test_surface_collider_group() {
        let builder = presets::surface_collider(20.0, 1.0, CollisionGroups::Floor);
        assert_eq!(builder.group(), CollisionGroups::Floor);
    }
}
