use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups, doubling as the tag/layer of every scene entity
///
/// Gameplay code filters on these: ground checks look for walkable groups,
/// attack resolution looks for `Enemy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// The player character
    Player = 0b0000_0010,

    /// Chasing enemies
    Enemy = 0b0000_0100,

    /// Walkable ground ("Floor" tag)
    Floor = 0b0000_1000,

    /// Walkable level geometry other than the floor ("Environment" tag)
    Environment = 0b0001_0000,

    /// Sensors (trigger zones, etc.) - don't cause physical collision
    Sensor = 0b0010_0000,
}

impl CollisionGroups {
    /// Whether standing on this group re-arms jump and attack
    pub fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Environment)
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Players stand on the level; enemies pass through them
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Floor as u32
                    | CollisionGroups::Environment as u32
                    | CollisionGroups::Sensor as u32,
            ),

            // Enemies are moved kinematically and only rest on the level
            CollisionGroups::Enemy => Group::from_bits_truncate(
                CollisionGroups::Floor as u32 | CollisionGroups::Environment as u32,
            ),

            // Level geometry blocks every actor
            CollisionGroups::Floor | CollisionGroups::Environment => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Enemy as u32
                    | CollisionGroups::Default as u32,
            ),

            CollisionGroups::Sensor => Group::ALL,
            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Set of collision groups used to filter world queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Mask matching nothing
    pub const NONE: Self = Self(0);

    /// Surfaces an actor can stand on
    pub const WALKABLE: Self =
        Self(CollisionGroups::Floor as u32 | CollisionGroups::Environment as u32);

    /// Things the player can hit
    pub const ENEMIES: Self = Self(CollisionGroups::Enemy as u32);

    /// Build a mask from a list of groups
    pub fn of(groups: &[CollisionGroups]) -> Self {
        Self(groups.iter().fold(0, |bits, group| bits | *group as u32))
    }

    /// Check if a group is part of this mask
    pub fn contains(self, group: CollisionGroups) -> bool {
        self.0 & group as u32 != 0
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// rapier calls this from inside `PhysicsPipeline::step`
impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
