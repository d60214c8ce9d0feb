//! Leading-edge throttling of interaction-driven evaluations

use honeylens_core::DEFAULT_COOLDOWN_MS;
use tokio::time::{Duration, Instant};

/// At most one execution per cool-down window.
///
/// The first event fires immediately and opens a window; events inside the
/// window are dropped. The first event at or after the window's end fires
/// and opens the next one.
#[derive(Debug, Clone)]
pub struct Throttle {
    cooldown: Duration,
    window_start: Option<Instant>,
}

impl Throttle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            window_start: None,
        }
    }

    pub fn from_millis(cooldown_ms: u64) -> Self {
        Self::new(Duration::from_millis(cooldown_ms))
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether an event arriving at `now` should execute
    pub fn try_fire(&mut self, now: Instant) -> bool {
        match self.window_start {
            Some(start) if now.saturating_duration_since(start) < self.cooldown => false,
            _ => {
                self.window_start = Some(now);
                true
            }
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_millis(DEFAULT_COOLDOWN_MS)
    }
}
