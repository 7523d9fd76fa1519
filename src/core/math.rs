// Math utilities and helper functions

use glam::Vec2;

/// Move `current` toward `target` by at most `max_step`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_step || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_step
    }
}

/// Sign of a value, with zero mapping to zero (unlike `f32::signum`)
pub fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
