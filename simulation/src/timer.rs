use std::time::Duration;

/// A single-slot, cancellable delayed action driven by elapsed wall time.
///
/// Scheduling while something is pending replaces it: at most one action is
/// ever outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer<A> {
    pending: Option<(Duration, A)>,
}

impl<A> Default for Timer<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A: Copy> Timer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the timer. Returns the action that was displaced, if any.
    pub fn schedule(&mut self, delay: Duration, action: A) -> Option<A> {
        self.pending.replace((delay, action)).map(|(_, a)| a)
    }

    pub fn cancel(&mut self) -> Option<A> {
        self.pending.take().map(|(_, a)| a)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Counts down by `elapsed` and yields the action once its delay has run out.
    pub fn advance(&mut self, elapsed: Duration) -> Option<A> {
        let (remaining, action) = self.pending?;
        match remaining.checked_sub(elapsed) {
            Some(left) if !left.is_zero() => {
                self.pending = Some((left, action));
                None
            }
            _ => {
                self.pending = None;
                Some(action)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Ping,
        Pong,
    }

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = Timer::new();
        timer.schedule(Duration::from_millis(100), Action::Ping);
        assert_eq!(timer.advance(Duration::from_millis(60)), None);
        assert!(timer.is_pending());
        assert_eq!(timer.advance(Duration::from_millis(40)), Some(Action::Ping));
        assert!(!timer.is_pending());
        assert_eq!(timer.advance(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut timer = Timer::new();
        timer.schedule(Duration::from_millis(100), Action::Ping);
        timer.advance(Duration::from_millis(90));
        let displaced = timer.schedule(Duration::from_millis(100), Action::Pong);
        assert_eq!(displaced, Some(Action::Ping));
        assert_eq!(timer.advance(Duration::from_millis(20)), None);
        assert_eq!(timer.advance(Duration::from_millis(80)), Some(Action::Pong));
    }

    #[test]
    fn test_cancel() {
        let mut timer = Timer::new();
        timer.schedule(Duration::from_millis(10), Action::Ping);
        assert_eq!(timer.cancel(), Some(Action::Ping));
        assert_eq!(timer.advance(Duration::from_millis(50)), None);
        assert_eq!(timer.cancel(), None);
    }

    #[test]
    fn test_overshoot_still_fires() {
        let mut timer = Timer::new();
        timer.schedule(Duration::from_millis(10), Action::Pong);
        assert_eq!(timer.advance(Duration::from_secs(3)), Some(Action::Pong));
    }
}
