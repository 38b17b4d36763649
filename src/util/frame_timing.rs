use web_time::{Duration, Instant};

/// Wall-clock frame clock: measures the delta between frames and keeps a
/// smoothed FPS figure for the debug overlay.
///
/// The engine core only ever sees the `dt` this returns, so every ramp stays
/// replayable when driven from a fixed timestep instead.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Upper bound applied to a single delta (e.g. after a window drag)
    max_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames measured so far
    frames: u64,
}

impl FrameTiming {
    /// Create a frame clock starting now. `max_delta` caps a single step.
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last_frame: Instant::now(),
            max_delta,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Mark the start of a new frame and return the seconds elapsed since
    /// the previous one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).min(self.max_delta);
        self.last_frame = now;
        self.frames += 1;

        let dt = elapsed.as_secs_f32();
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Number of frames ticked.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}
