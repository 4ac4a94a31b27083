use std::time::{Duration, Instant};

/// Coalesces a burst of continuous input (typing) into one history entry.
///
/// An edit is due once `delay` has passed since the last input, or
/// immediately when the caller flushes it (blur, or before another push).
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    last_input: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_input: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register an input at `now`, restarting the quiet window
    pub fn touch(&mut self, now: Instant) {
        self.last_input = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Whether the quiet window has elapsed for the pending input
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_input {
            Some(last) => now.saturating_duration_since(last) >= self.delay,
            None => false,
        }
    }

    /// Clear the pending input, returning whether there was one
    pub fn take(&mut self) -> bool {
        self.last_input.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_debouncer_is_never_due() {
        let d = Debouncer::new(Duration::from_millis(300));
        assert!(!d.is_pending());
        assert!(!d.is_due(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn test_due_after_quiet_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.touch(start);
        assert!(!d.is_due(start + Duration::from_millis(299)));
        assert!(d.is_due(start + Duration::from_millis(300)));
    }

    #[test]
    fn test_touch_restarts_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.touch(start);
        d.touch(start + Duration::from_millis(200));
        assert!(!d.is_due(start + Duration::from_millis(400)));
        assert!(d.is_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_take_clears() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        assert!(!d.take());
        d.touch(Instant::now());
        assert!(d.take());
        assert!(!d.is_pending());
    }
}
