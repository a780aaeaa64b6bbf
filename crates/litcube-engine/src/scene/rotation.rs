use std::time::Instant;

/// Accumulated rotation angle driven by wall-clock time.
///
/// The angle only grows. The first update records a baseline and leaves the
/// angle untouched; every later update adds `rate * elapsed`, so visual speed
/// does not depend on how regularly the frame timer fires.
#[derive(Debug, Clone)]
pub struct Rotation {
    degrees: f64,
    degrees_per_second: f64,
    last_update: Option<Instant>,
}

impl Rotation {
    pub fn new(degrees_per_second: f64) -> Self {
        Self {
            degrees: 0.0,
            degrees_per_second,
            last_update: None,
        }
    }

    /// Current angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// Advances the angle to `now` and returns the increment that was applied.
    pub fn advance(&mut self, now: Instant) -> f64 {
        let delta = match self.last_update {
            Some(last) => {
                let elapsed_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
                (self.degrees_per_second * elapsed_ms) / 1000.0
            }
            None => 0.0,
        };

        self.degrees += delta;
        self.last_update = Some(now);
        delta
    }
}
