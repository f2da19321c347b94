use std::time::Duration;

/// Reference to a periodic timer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// A host service which delivers periodic tick callbacks. Ticks are expected to arrive roughly
/// one period apart and never overlap, but no hard real-time guarantee is assumed.
pub trait TickScheduler {
    fn register_periodic(&mut self, period: Duration) -> TimerHandle;
    fn unregister(&mut self, handle: TimerHandle);
}

/// A scheduler which only keeps track of registrations, leaving the delivery of ticks to the
/// caller. This is what a host loop (or a test) uses when it calls `Lidar::tick` itself.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    next_id: u64,
    registrations: usize,
    timers: Vec<(TimerHandle, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The timers which are currently registered, in registration order.
    pub fn active(&self) -> &[(TimerHandle, Duration)] {
        &self.timers
    }

    pub fn is_registered(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|(h, _)| *h == handle)
    }

    /// The period of a registered timer.
    pub fn period(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, p)| *p)
    }

    /// The total number of registrations ever made, including ones since removed.
    pub fn registrations(&self) -> usize {
        self.registrations
    }
}

impl TickScheduler for ManualScheduler {
    fn register_periodic(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.registrations += 1;
        self.timers.push((handle, period));
        handle
    }

    fn unregister(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_unregister() {
        let mut s = ManualScheduler::new();
        let a = s.register_periodic(Duration::from_millis(100));
        let b = s.register_periodic(Duration::from_millis(50));
        assert_ne!(a, b);
        assert_eq!(s.active().len(), 2);
        assert_eq!(s.period(b), Some(Duration::from_millis(50)));

        s.unregister(a);
        assert!(!s.is_registered(a));
        assert!(s.is_registered(b));
        assert_eq!(s.registrations(), 2);

        // Unregistering twice is harmless
        s.unregister(a);
        assert_eq!(s.active().len(), 1);
    }
}
