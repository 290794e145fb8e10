use std::time::{Duration, Instant};

/// One-shot countdown owned by a controller. The UI polls `fire` every frame
/// with the current instant, so controllers stay deterministic in tests where
/// the clock is injected. An armed countdown that is never polled past its
/// deadline simply never fires; `cancel` disarms it outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    pub fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the countdown, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the deadline has passed; disarms on fire.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, `None` when disarmed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
