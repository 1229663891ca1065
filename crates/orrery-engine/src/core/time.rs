/// Maximum animation frames run for a single host callback.
pub const MAX_FRAMES_PER_TICK: u32 = 10;

/// Fixed inter-frame delay gate.
/// The host calls in at whatever rate it likes; animation frames run at a
/// consistent rate regardless.
#[derive(Debug, Clone)]
pub struct FrameGate {
    /// Seconds between animation frames.
    delay: f64,
    /// Accumulated time from variable host deltas.
    accumulator: f64,
}

impl FrameGate {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            accumulator: 0.0,
        }
    }

    /// Add elapsed host time. Returns the number of frames due.
    pub fn accumulate(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.max(0.0);
        // Cap to prevent spiral of death
        self.accumulator = self.accumulator.min(self.delay * MAX_FRAMES_PER_TICK as f64);
        let frames = (self.accumulator / self.delay) as u32;
        self.accumulator -= frames as f64 * self.delay;
        frames
    }

    /// Drop any banked time, e.g. when the loop restarts after a stop.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// The per-frame delta handed to animation frames.
    pub fn delay(&self) -> f64 {
        self.delay
    }
}
