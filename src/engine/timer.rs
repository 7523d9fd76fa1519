// One-shot timer scheduling on a simulated clock

use std::time::Duration;

/// A scheduled one-shot task, fired exactly once when its deadline passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask<T> {
    due: Duration,
    /// Insertion order, used to keep firing order stable for equal deadlines
    seq: u64,
    task: T,
}

/// Fires tasks once the simulated clock reaches their deadline
///
/// There is no cancellation: a scheduled task always fires. Tasks are plain
/// data (`T`) rather than closures so the owner decides what firing means.
#[derive(Debug)]
pub struct TimerScheduler<T> {
    now: Duration,
    pending: Vec<ScheduledTask<T>>,
    next_seq: u64,
}

impl<T> TimerScheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire `delay` after the current time.
    /// Returns the absolute deadline.
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> Duration {
        let due = self.now + delay;
        self.pending.push(ScheduledTask {
            due,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
        due
    }

    /// Advance the clock and return every task whose deadline has been reached,
    /// ordered by deadline then by scheduling order
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        self.now += dt;
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|t| t.due <= now);
        self.pending = pending;

        due.sort_by_key(|t| (t.due, t.seq));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Number of tasks still waiting to fire
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending task. The clock keeps its time.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<T> Default for TimerScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
