// Per-player input state fed by scripted or device events

use super::action::{Action, Axis, ButtonEdge, InputSource};
use std::collections::{HashMap, HashSet};

/// Input state for a single controlled actor
///
/// Events are pushed with `press`/`release`/`set_axis` and read back through
/// [`InputSource`]. Call `end_frame` once every tick has consumed the frame.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    /// Buttons currently held
    pressed: HashSet<Action>,

    /// Buttons that went down this frame
    just_pressed: HashSet<Action>,

    /// Buttons that came up this frame
    just_released: HashSet<Action>,

    /// Current axis values
    axes: HashMap<Axis, f32>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a button is currently held
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Register a button press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register a button release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Set an axis value, clamped to [-1, 1]
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.axes.insert(axis, value.clamp(-1.0, 1.0));
    }

    /// Clear per-frame edges. Held buttons and axes persist.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.axes.clear();
    }
}

impl InputSource for ScriptedInput {
    fn axis(&self, axis: Axis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn button_edge(&self, action: Action) -> ButtonEdge {
        let down = self.just_pressed.contains(&action);
        let up = self.just_released.contains(&action);
        match (down, up) {
            // Both in one frame: the held state tells which came last
            (true, true) if self.is_pressed(action) => ButtonEdge::Repressed,
            (true, true) => ButtonEdge::Tapped,
            (true, false) => ButtonEdge::Pressed,
            (false, true) => ButtonEdge::Released,
            (false, false) => ButtonEdge::None,
        }
    }
}
