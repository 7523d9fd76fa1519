// Entity identifiers shared by the physics adapter and gameplay code

use std::fmt;

/// Unique identifier for anything that lives in a scene
///
/// Ids are handed out by the scene and never reused, so a stale id simply
/// fails to resolve instead of aliasing a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Create an entity ID from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Encode into a collider's `user_data` slot
    pub(crate) fn to_user_data(self) -> u128 {
        self.0 as u128
    }

    /// Decode from a collider's `user_data` slot
    pub(crate) fn from_user_data(data: u128) -> Self {
        Self(data as u64)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}
