/// Fixed timestep accumulator.
/// Ensures game logic runs at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Per-frame time as seen by the scene: `dt` of the current frame and
/// seconds elapsed since the scene started.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    dt: f32,
    time: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame lasting `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.dt = dt.max(0.0);
        self.time += self.dt;
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
