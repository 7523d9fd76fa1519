// Debounced animator writes

use std::collections::HashMap;

use super::sinks::{AnimParam, AnimatorSink};

/// Wraps an actor's animator and forwards bool parameters only when they flip
///
/// The last value written for each parameter is kept here instead of being
/// read back from the animator, so a tick that recomputes the same flags
/// produces no calls at all. Parameters start out `false`.
#[derive(Debug)]
pub struct AnimatorDriver {
    sink: Box<dyn AnimatorSink>,
    emitted: HashMap<AnimParam, bool>,
}

impl AnimatorDriver {
    pub fn new(sink: Box<dyn AnimatorSink>) -> Self {
        Self {
            sink,
            emitted: HashMap::new(),
        }
    }

    /// Last value written for a bool parameter
    pub fn emitted(&self, param: AnimParam) -> bool {
        self.emitted.get(&param).copied().unwrap_or(false)
    }

    /// Write a bool parameter if it differs from the last written value.
    /// Returns whether a call reached the animator.
    pub fn set_bool(&mut self, param: AnimParam, value: bool) -> bool {
        if self.emitted(param) == value {
            return false;
        }
        self.emitted.insert(param, value);
        self.sink.set_bool(param, value);
        true
    }

    /// Fire a trigger. Triggers are events, so they are never debounced.
    pub fn trigger(&mut self, param: AnimParam) {
        self.sink.set_trigger(param);
    }
}
