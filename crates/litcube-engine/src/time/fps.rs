use std::time::{Duration, Instant};

/// Frames-per-second counter.
///
/// Counts frames while running and yields a rate each time a full reporting
/// window has elapsed. Stopping discards the partial window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    report_every: Duration,
    window_start: Option<Instant>,
    frames: u32,
}

impl FpsCounter {
    /// Reports once per second of running time.
    pub fn new() -> Self {
        Self {
            report_every: Duration::from_secs(1),
            window_start: None,
            frames: 0,
        }
    }

    /// Starts (or restarts) counting from `now`.
    pub fn run(&mut self, now: Instant) {
        self.window_start = Some(now);
        self.frames = 0;
    }

    pub fn stop(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }

    /// Records one frame. Returns the rate when a reporting window closes.
    pub fn increment(&mut self, now: Instant) -> Option<f32> {
        let start = self.window_start?;
        self.frames += 1;

        let elapsed = now.saturating_duration_since(start);
        if elapsed < self.report_every {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = Some(now);
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
