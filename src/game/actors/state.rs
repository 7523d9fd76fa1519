// Actor state: facing, action gating and enemy life cycle

use std::time::Duration;

/// Horizontal facing of an actor's sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, 1 for right
    pub fn sign(&self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Facing implied by a horizontal value; zero implies none
    pub fn from_horizontal(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Self::Right)
        } else if x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Jump and attack availability.
///
/// Both flags always open and close together: jumping disarms the attack as
/// well as the jump, and only ground contact re-arms them. Attacks are
/// therefore ground-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionGates {
    can_jump: bool,
    can_attack: bool,
}

impl ActionGates {
    /// Gates start closed until the first ground contact
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack
    }

    /// Ground contact: re-arm jump and attack
    pub fn open(&mut self) {
        self.can_jump = true;
        self.can_attack = true;
    }

    /// Jump taken: disarm jump and attack
    pub fn close(&mut self) {
        self.can_jump = false;
        self.can_attack = false;
    }
}

/// Where an enemy is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifeState {
    #[default]
    Alive,
    /// Death sequence playing, removal pending
    Dying { since: Duration },
    /// Gone from the world
    Removed,
}

impl LifeState {
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Whether the entity still occupies the world
    pub fn in_world(&self) -> bool {
        !matches!(self, Self::Removed)
    }
}

/// Enforces `Alive -> Dying -> Removed` (or `Alive -> Removed` for immediate
/// deaths). No edge leads back, and repeated requests are ignored.
#[derive(Debug, Default)]
pub struct LifeCycle {
    current: LifeState,
    previous: LifeState,
}

impl LifeCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifeState {
        self.current
    }

    pub fn previous_state(&self) -> LifeState {
        self.previous
    }

    fn transition(&mut self, next: LifeState) {
        self.previous = self.current;
        self.current = next;
    }

    /// Start the death sequence. Returns false unless the actor was alive.
    pub fn begin_dying(&mut self, now: Duration) -> bool {
        if !self.current.is_alive() {
            return false;
        }
        self.transition(LifeState::Dying { since: now });
        true
    }

    /// Leave the world, from `Alive` (immediate death) or `Dying`.
    /// Returns false if already removed.
    pub fn remove(&mut self) -> bool {
        if !self.current.in_world() {
            return false;
        }
        self.transition(LifeState::Removed);
        true
    }
}
