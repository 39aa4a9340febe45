use std::time::{Duration, Instant};

/// Deadline-based debounce timer, polled from the UI tick.
///
/// Each `restart` pushes the deadline out by the full window, so only the
/// last keystroke in a burst fires.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(350);

    #[test]
    fn fires_once_after_window() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.restart(t0);

        assert!(!d.fire_if_due(t0 + Duration::from_millis(349)));
        assert!(d.fire_if_due(t0 + WINDOW));
        assert!(!d.fire_if_due(t0 + Duration::from_secs(5)));
        assert!(!d.is_pending());
    }

    #[test]
    fn restart_pushes_deadline_out() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.restart(t0);
        d.restart(t0 + Duration::from_millis(300));

        assert!(!d.fire_if_due(t0 + Duration::from_millis(400)));
        assert!(d.fire_if_due(t0 + Duration::from_millis(650)));
    }

    #[test]
    fn cancel_drops_pending_fire() {
        let t0 = Instant::now();
        let mut d = Debounce::new(WINDOW);
        d.restart(t0);
        d.cancel();
        assert!(!d.fire_if_due(t0 + Duration::from_secs(1)));
    }
}
