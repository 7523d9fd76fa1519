// Game action definitions and the input collaborator contract

/// Buttons an actor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Attack,
}

impl Action {
    /// Binding name used by input backends
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jump => "Jump",
            Self::Attack => "SimpleAttack",
        }
    }
}

/// Continuous axes an actor reads every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal movement intent, -1 (left) to 1 (right)
    Horizontal,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Horizontal => "Move",
        }
    }
}

/// Button transition observed within a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEdge {
    /// Released -> pressed
    Pressed,
    /// Pressed -> released
    Released,
    /// Pressed and released again within the tick
    Tapped,
    /// Released and pressed again within the tick
    Repressed,
    /// No transition this tick (held or idle)
    #[default]
    None,
}

impl ButtonEdge {
    /// Transitions in the order they happened: `true` for a press, `false`
    /// for a release
    pub fn transitions(self) -> &'static [bool] {
        match self {
            Self::Pressed => &[true],
            Self::Released => &[false],
            Self::Tapped => &[true, false],
            Self::Repressed => &[false, true],
            Self::None => &[],
        }
    }
}

/// Source of per-tick input for a controlled actor
pub trait InputSource {
    /// Current value of an axis
    fn axis(&self, axis: Axis) -> f32;

    /// Edge observed for a button during the current tick
    fn button_edge(&self, action: Action) -> ButtonEdge;
}

/// Input source that never reports anything (AI-driven actors, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn axis(&self, _axis: Axis) -> f32 {
        0.0
    }

    fn button_edge(&self, _action: Action) -> ButtonEdge {
        ButtonEdge::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Attack);
    }

    #[test]
    fn test_binding_names() {
        assert_eq!(Action::Jump.name(), "Jump");
        assert_eq!(Action::Attack.name(), "SimpleAttack");
        assert_eq!(Axis::Horizontal.name(), "Move");
    }

    #[test]
    fn test_no_input_is_neutral() {
        let input = NoInput;
        assert_eq!(input.axis(Axis::Horizontal), 0.0);
        assert_eq!(input.button_edge(Action::Jump), ButtonEdge::None);
        assert_eq!(input.button_edge(Action::Attack), ButtonEdge::None);
    }

    #[test]
    fn test_default_edge_is_none() {
        assert_eq!(ButtonEdge::default(), ButtonEdge::None);
    }

    #[test]
    fn test_edge_transitions_keep_order() {
        assert!(ButtonEdge::None.transitions().is_empty());
        assert_eq!(ButtonEdge::Pressed.transitions(), &[true]);
        assert_eq!(ButtonEdge::Tapped.transitions(), &[true, false]);
        assert_eq!(ButtonEdge::Repressed.transitions(), &[false, true]);
    }
}
