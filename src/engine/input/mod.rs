// Input handling
//
// Actors never talk to devices. They read an `InputSource` once per tick:
// a continuous horizontal axis plus press/release edges for jump and attack.
//
// - `action`: actions, axes, edges and the `InputSource` contract
// - `player`: `ScriptedInput`, an edge-tracking state fed by events
//
// ```rust
// let mut input = ScriptedInput::new();
// input.set_axis(Axis::Horizontal, 1.0);
// input.press(Action::Jump);
// let summary = scene.tick(dt, &input);
// input.end_frame();
// ```

pub mod action;
pub mod player;

pub use action::{Action, Axis, ButtonEdge, InputSource, NoInput};
pub use player::ScriptedInput;
