// Presentation collaborators: animator and audio
//
// Controllers only ever push discrete calls into these sinks. What the calls
// turn into (sprite state, sound playback) is outside the crate.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::engine::EntityId;

/// Animator parameters driven by the controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimParam {
    /// Bool: actor has horizontal motion
    IsMoving,
    /// Bool: jump held / airborne after a jump
    IsJumping,
    /// Trigger: melee swing
    Attack,
    /// Trigger: death animation
    OnDeath,
}

impl AnimParam {
    /// Parameter name as authored in the animator
    pub fn name(&self) -> &'static str {
        match self {
            Self::IsMoving => "isMoving",
            Self::IsJumping => "isJumping",
            Self::Attack => "attack",
            Self::OnDeath => "onDeath",
        }
    }
}

/// One-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    /// Enemy starts walking
    Walk,
    Death,
}

pub trait AnimatorSink: fmt::Debug {
    fn set_bool(&mut self, param: AnimParam, value: bool);
    fn set_trigger(&mut self, param: AnimParam);
}

pub trait AudioSink: fmt::Debug {
    fn play_one_shot(&mut self, cue: SoundCue);
}

/// Provides the per-entity presentation components for newly created actors.
/// Returning `None` means the entity lacks that component.
pub trait SinkFactory {
    fn animator(&mut self, entity: EntityId) -> Option<Box<dyn AnimatorSink>>;
    fn audio(&mut self, entity: EntityId) -> Option<Box<dyn AudioSink>>;
}

/// Components handed to an actor constructor
#[derive(Debug, Default)]
pub struct ActorParts {
    pub animator: Option<Box<dyn AnimatorSink>>,
    pub audio: Option<Box<dyn AudioSink>>,
}

impl ActorParts {
    pub fn from_factory(factory: &mut dyn SinkFactory, entity: EntityId) -> Self {
        Self {
            animator: factory.animator(entity),
            audio: factory.audio(entity),
        }
    }
}

/// Sink that writes every call to the log
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    entity: EntityId,
}

impl AnimatorSink for LogSink {
    fn set_bool(&mut self, param: AnimParam, value: bool) {
        log::debug!("{} animator {} = {}", self.entity, param.name(), value);
    }

    fn set_trigger(&mut self, param: AnimParam) {
        log::debug!("{} animator trigger {}", self.entity, param.name());
    }
}

impl AudioSink for LogSink {
    fn play_one_shot(&mut self, cue: SoundCue) {
        log::debug!("{} plays {:?}", self.entity, cue);
    }
}

/// Factory handing out [`LogSink`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSinks;

impl SinkFactory for LogSinks {
    fn animator(&mut self, entity: EntityId) -> Option<Box<dyn AnimatorSink>> {
        Some(Box::new(LogSink { entity }))
    }

    fn audio(&mut self, entity: EntityId) -> Option<Box<dyn AudioSink>> {
        Some(Box::new(LogSink { entity }))
    }
}

/// A recorded presentation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    SetBool(AnimParam, bool),
    Trigger(AnimParam),
    Sound(SoundCue),
}

/// Shared, append-only record of sink calls across entities
#[derive(Debug, Default, Clone)]
pub struct SinkLog(Rc<RefCell<Vec<(EntityId, SinkCall)>>>);

impl SinkLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entity: EntityId, call: SinkCall) {
        self.0.borrow_mut().push((entity, call));
    }

    /// Every call recorded so far, in order
    pub fn calls(&self) -> Vec<(EntityId, SinkCall)> {
        self.0.borrow().clone()
    }

    /// Calls recorded for one entity
    pub fn calls_for(&self, entity: EntityId) -> Vec<SinkCall> {
        self.0
            .borrow()
            .iter()
            .filter(|(e, _)| *e == entity)
            .map(|(_, call)| *call)
            .collect()
    }

    /// How many times a call was recorded for an entity
    pub fn count(&self, entity: EntityId, call: SinkCall) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|(e, c)| *e == entity && *c == call)
            .count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Sink appending to a [`SinkLog`]
#[derive(Debug, Clone)]
pub struct RecordingSink {
    entity: EntityId,
    log: SinkLog,
}

impl RecordingSink {
    pub fn new(entity: EntityId, log: SinkLog) -> Self {
        Self { entity, log }
    }
}

impl AnimatorSink for RecordingSink {
    fn set_bool(&mut self, param: AnimParam, value: bool) {
        self.log.push(self.entity, SinkCall::SetBool(param, value));
    }

    fn set_trigger(&mut self, param: AnimParam) {
        self.log.push(self.entity, SinkCall::Trigger(param));
    }
}

impl AudioSink for RecordingSink {
    fn play_one_shot(&mut self, cue: SoundCue) {
        self.log.push(self.entity, SinkCall::Sound(cue));
    }
}

/// Factory handing out [`RecordingSink`]s that share one log
#[derive(Debug, Clone)]
pub struct RecordingSinks {
    log: SinkLog,
    with_animator: bool,
    with_audio: bool,
    /// Most entities that get components, `None` for no limit
    budget: Option<usize>,
    served: Vec<EntityId>,
}

impl RecordingSinks {
    pub fn new(log: SinkLog) -> Self {
        Self {
            log,
            with_animator: true,
            with_audio: true,
            budget: None,
            served: Vec::new(),
        }
    }

    /// Only the first `entities` entities asking get components
    pub fn with_budget(mut self, entities: usize) -> Self {
        self.budget = Some(entities);
        self
    }

    fn serves(&mut self, entity: EntityId) -> bool {
        if self.served.contains(&entity) {
            return true;
        }
        if self.budget.is_some_and(|budget| self.served.len() >= budget) {
            return false;
        }
        self.served.push(entity);
        true
    }

    /// Stop handing out animators (entities created afterwards lack one)
    pub fn without_animator(mut self) -> Self {
        self.with_animator = false;
        self
    }

    /// Stop handing out audio sources
    pub fn without_audio(mut self) -> Self {
        self.with_audio = false;
        self
    }
}

impl SinkFactory for RecordingSinks {
    fn animator(&mut self, entity: EntityId) -> Option<Box<dyn AnimatorSink>> {
        (self.with_animator && self.serves(entity))
            .then(|| Box::new(RecordingSink::new(entity, self.log.clone())) as Box<dyn AnimatorSink>)
    }

    fn audio(&mut self, entity: EntityId) -> Option<Box<dyn AudioSink>> {
        (self.with_audio && self.serves(entity))
            .then(|| Box::new(RecordingSink::new(entity, self.log.clone())) as Box<dyn AudioSink>)
    }
}
