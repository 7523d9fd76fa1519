/// Fixed timestep stepping
///
/// Converts elapsed frame time into a bounded number of fixed updates so
/// actor ticks always see the same `dt`. Frame time is passed in rather than
/// sampled, which keeps the loop deterministic for the headless scene and
/// for tests.
use std::time::Duration;

/// Target update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
pub const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of fixed steps per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

/// Fixed-step accumulator
#[derive(Debug)]
pub struct FixedStepLoop {
    /// Accumulated time not yet consumed by fixed updates
    accumulator: Duration,

    /// Simulated time consumed by fixed updates so far
    simulated: Duration,

    /// Whether the loop is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates handed out
    update_count: u64,
}

impl FixedStepLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            simulated: Duration::ZERO,
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Begin a new frame, returns the number of fixed updates to run
    pub fn begin_frame(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            self.simulated += FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Anything beyond the step cap is dropped rather than replayed later
        if updates == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Frame took {:?}, dropping {:?} of simulation time",
                frame_time,
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Fixed timestep as a duration
    pub fn step_duration(&self) -> Duration {
        FIXED_TIMESTEP_DURATION
    }

    /// Interpolation alpha between the last two fixed updates
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Simulated time consumed by fixed updates
    pub fn simulated(&self) -> Duration {
        self.simulated
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedStepLoop {
    fn default() -> Self {
        Self::new()
    }
}
