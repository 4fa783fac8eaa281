use core::time::Duration;
use web_time::Instant;

/// Stopwatch driven by the caller: nothing advances unless [`Stopwatch::update`] is called with the current time.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    elapsed: Duration,
    running: bool,
}

impl Stopwatch {
    /// Sets the start point and clears elapsed time, leaving the watch stopped.
    pub fn init(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Recomputes `elapsed = now - start`, only while running.
    pub fn update(&mut self, now: Instant) {
        if let (true, Some(started_at)) = (self.running, self.started_at) {
            self.elapsed = now.saturating_duration_since(started_at);
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
