use glam::Vec2;
use rapier2d::parry::query as parry_query;
use rapier2d::parry::shape::Ball;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::ColliderBuilder2D;
use super::collision::{CollisionEvent, CollisionEventQueue, CollisionGroups, LayerMask};
use super::query::ActorPhysics;
use crate::engine::EntityId;

/// Contact between two scene entities reported by a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Started(EntityId, EntityId),
    Stopped(EntityId, EntityId),
}

impl ContactEvent {
    /// If `entity` took part in a started contact, the other party
    pub fn started_with(&self, entity: EntityId) -> Option<EntityId> {
        match *self {
            Self::Started(a, b) if a == entity => Some(b),
            Self::Started(a, b) if b == entity => Some(a),
            _ => None,
        }
    }
}

/// Body registered for a scene entity
#[derive(Debug, Clone, Copy)]
struct EntityBody {
    handle: RigidBodyHandle,
    group: CollisionGroups,
}

/// Physics world that integrates bodies and answers actor queries
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,

    /// Scene entity to body mapping
    entities: HashMap<EntityId, EntityBody>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            entities: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.collision_event_queue.clear();

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a body and its collider for a scene entity.
    /// An existing body for the same entity is replaced.
    pub fn add_entity(
        &mut self,
        entity: EntityId,
        body: RigidBody,
        collider: ColliderBuilder2D,
    ) -> RigidBodyHandle {
        if self.entities.contains_key(&entity) {
            log::warn!("{} already has a body, replacing it", entity);
            self.remove_entity(entity);
        }

        let group = collider.group();
        let mut collider = collider.build();
        collider.user_data = entity.to_user_data();

        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.entities.insert(entity, EntityBody { handle, group });

        log::trace!("Added {} as {:?}", entity, group);
        handle
    }

    /// Remove an entity's body and all its attached colliders.
    /// Returns false if the entity had no body.
    pub fn remove_entity(&mut self, entity: EntityId) -> bool {
        let Some(entry) = self.entities.remove(&entity) else {
            return false;
        };

        self.rigid_body_set.remove(
            entry.handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        true
    }

    /// Number of entities with bodies
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Contacts between entities from the last step
    pub fn contact_events(&self) -> Vec<ContactEvent> {
        self.collision_event_queue
            .events()
            .into_iter()
            .filter_map(|event| match event {
                CollisionEvent::Started {
                    collider1,
                    collider2,
                } => Some(ContactEvent::Started(
                    self.collider_entity(collider1)?,
                    self.collider_entity(collider2)?,
                )),
                CollisionEvent::Stopped {
                    collider1,
                    collider2,
                } => Some(ContactEvent::Stopped(
                    self.collider_entity(collider1)?,
                    self.collider_entity(collider2)?,
                )),
            })
            .collect()
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    fn collider_entity(&self, handle: ColliderHandle) -> Option<EntityId> {
        // Removed colliders can still show up in Stopped events
        self.collider_set
            .get(handle)
            .map(|collider| EntityId::from_user_data(collider.user_data))
    }

    fn body(&self, entity: EntityId) -> Option<&RigidBody> {
        let entry = self.entities.get(&entity)?;
        self.rigid_body_set.get(entry.handle)
    }

    fn body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        let entry = self.entities.get(&entity)?;
        self.rigid_body_set.get_mut(entry.handle)
    }

    /// World pose of a collider, using the parent's current position so that
    /// queries see translations made since the last step
    fn collider_pose(&self, collider: &Collider) -> Isometry<Real> {
        match (collider.parent(), collider.position_wrt_parent()) {
            (Some(parent), Some(relative)) => self
                .rigid_body_set
                .get(parent)
                .map(|body| *body.position() * *relative)
                .unwrap_or(*collider.position()),
            _ => *collider.position(),
        }
    }

    /// Entities whose colliders overlap a ball, filtered by group.
    ///
    /// Scans the collider set instead of the query pipeline: the pipeline is
    /// only refreshed inside `step`, while actors are translated between steps.
    /// Each collider is tested at its parent body's current pose.
    fn ball_overlaps(
        &self,
        center: Vec2,
        radius: f32,
        mask: LayerMask,
        exclude: Option<EntityId>,
    ) -> Vec<EntityId> {
        let ball = Ball::new(radius);
        let ball_pos = Isometry::translation(center.x, center.y);
        let mut hits = Vec::new();

        for (_, collider) in self.collider_set.iter() {
            let entity = EntityId::from_user_data(collider.user_data);
            if Some(entity) == exclude || hits.contains(&entity) {
                continue;
            }
            let Some(group) = self.group_of(entity) else {
                continue;
            };
            if !mask.contains(group) {
                continue;
            }

            let pose = self.collider_pose(collider);
            let touching =
                parry_query::intersection_test(&ball_pos, &ball, &pose, collider.shape())
                    .unwrap_or(false);
            if touching {
                hits.push(entity);
            }
        }

        hits.sort();
        hits
    }
}

impl ActorPhysics for PhysicsWorld {
    fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    fn group_of(&self, entity: EntityId) -> Option<CollisionGroups> {
        self.entities.get(&entity).map(|entry| entry.group)
    }

    fn position(&self, entity: EntityId) -> Option<Vec2> {
        self.body(entity).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }

    fn velocity(&self, entity: EntityId) -> Option<Vec2> {
        self.body(entity).map(|body| {
            let vel = body.linvel();
            Vec2::new(vel.x, vel.y)
        })
    }

    fn set_velocity(&mut self, entity: EntityId, velocity: Vec2) {
        if let Some(body) = self.body_mut(entity) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    fn translate(&mut self, entity: EntityId, delta: Vec2) {
        if let Some(body) = self.body_mut(entity) {
            let next = body.translation() + vector![delta.x, delta.y];
            body.set_translation(next, true);
        }
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: LayerMask) -> Vec<EntityId> {
        self.ball_overlaps(center, radius, mask, None)
    }

    fn probe(&self, entity: EntityId, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        !self
            .ball_overlaps(center, radius, mask, Some(entity))
            .is_empty()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
