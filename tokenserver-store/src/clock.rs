//! Time sources.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokenserver_core::Clock;

/// Real time: `Instant::now()` and `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations.
///
/// [`ManualClock::advance`] moves both readings forward together.
/// [`ManualClock::set_wall`] moves only the wall clock, the way an NTP
/// correction or a user changing the system time would.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    state: Mutex<ManualState>,
}

#[derive(Debug)]
struct ManualState {
    elapsed: Duration,
    wall: DateTime<Utc>,
}

impl ManualClock {
    /// Creates a clock starting at the current instant and the given wall time.
    pub fn new(wall: DateTime<Utc>) -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(ManualState {
                elapsed: Duration::ZERO,
                wall,
            }),
        }
    }

    /// Advances both monotonic and wall time.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.elapsed += by;
        state.wall += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
    }

    /// Sets the wall clock without touching monotonic time.
    pub fn set_wall(&self, wall: DateTime<Utc>) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).wall = wall;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.state.lock().unwrap_or_else(PoisonError::into_inner).elapsed
    }

    fn wall_now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance() {
        let start = Utc.with_ymd_and_hms(2025, 3, 30, 0, 59, 0).unwrap();
        let clock = ManualClock::new(start);
        let t0 = clock.now();

        clock.advance(Duration::from_secs(90));

        assert_eq!(clock.now() - t0, Duration::from_secs(90));
        assert_eq!(clock.wall_now(), start + chrono::Duration::seconds(90));
    }

    #[test]
    fn test_manual_clock_wall_jump_keeps_monotonic() {
        let start = Utc.with_ymd_and_hms(2025, 3, 30, 0, 59, 0).unwrap();
        let clock = ManualClock::new(start);
        let t0 = clock.now();

        clock.set_wall(start - chrono::Duration::days(1));

        assert_eq!(clock.now(), t0);
        assert_eq!(clock.wall_now(), start - chrono::Duration::days(1));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
