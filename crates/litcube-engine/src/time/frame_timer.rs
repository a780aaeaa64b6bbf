use std::time::{Duration, Instant};

/// Periodic frame deadline.
///
/// At most one deadline is armed at a time. The runtime turns the deadline
/// into `ControlFlow::WaitUntil` and calls [`FrameTimer::poll`] when it wakes.
/// The interval is nominal: the event loop may wake late, and the animation
/// uses measured time rather than counting ticks.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl FrameTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Arms the timer so the first tick is due one interval after `now`.
    ///
    /// Re-arming replaces the previous deadline.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    /// Disarms the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Next wake-up time, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` if a tick is due at `now` and schedules the next one.
    ///
    /// Missed periods are not replayed: after a stall the next deadline is one
    /// interval from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        let mut next = deadline + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.deadline = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MS: Duration = Duration::from_millis(10);

    #[test]
    fn starts_disarmed() {
        let mut timer = FrameTimer::new(TEN_MS);
        assert_eq!(timer.deadline(), None);
        assert!(!timer.poll(Instant::now()));
    }

    #[test]
    fn fires_once_interval_has_elapsed() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(TEN_MS);
        timer.arm(t0);

        assert!(!timer.poll(t0 + Duration::from_millis(9)));
        assert!(timer.poll(t0 + TEN_MS));
        assert_eq!(timer.deadline(), Some(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn stall_does_not_replay_missed_ticks() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(TEN_MS);
        timer.arm(t0);

        let late = t0 + Duration::from_millis(95);
        assert!(timer.poll(late));
        assert_eq!(timer.deadline(), Some(late + TEN_MS));
        assert!(!timer.poll(late));
    }

    #[test]
    fn cancel_disarms() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(TEN_MS);
        timer.arm(t0);
        timer.cancel();

        assert_eq!(timer.deadline(), None);
        assert!(!timer.poll(t0 + Duration::from_secs(1)));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new(TEN_MS);
        timer.arm(t0);
        timer.arm(t0 + Duration::from_millis(50));
        assert_eq!(timer.deadline(), Some(t0 + Duration::from_millis(60)));
    }
}
