//! Reference-counted activity timer.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::counter::Counter;

#[derive(Debug, Default)]
struct TimerState {
    active_users: u64,
    accumulated: Duration,
    segment_start: Option<Instant>,
}

impl TimerState {
    fn total_at(&self, now: Instant) -> Duration {
        match self.segment_start {
            Some(start) if self.active_users > 0 => {
                self.accumulated + now.saturating_duration_since(start)
            }
            _ => self.accumulated,
        }
    }
}

/// Accumulates the time during which at least one owner is active.
///
/// Owners call [`start`](Self::start) and [`stop`](Self::stop) independently
/// (one per mining worker, for example). Overlapping activity is counted
/// once: the timer accrues only between the first `start` and the `stop`
/// that brings the owner count back to zero. Unmatched stops are ignored.
#[derive(Debug, Default)]
pub struct IntervalTimer {
    state: Mutex<TimerState>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.start_at(Instant::now());
    }

    pub fn stop(&self) {
        self.stop_at(Instant::now());
    }

    pub fn running(&self) -> bool {
        self.lock().active_users > 0
    }

    pub fn active_user_count(&self) -> u64 {
        self.lock().active_users
    }

    /// Events per second of active time; zero if the timer never ran.
    pub fn rate(&self, counter: &Counter) -> f64 {
        self.rate_at(counter, Instant::now())
    }

    pub(crate) fn start_at(&self, now: Instant) {
        let mut state = self.lock();
        if state.active_users == 0 {
            state.segment_start = Some(now);
        }
        state.active_users += 1;
    }

    pub(crate) fn stop_at(&self, now: Instant) {
        let mut state = self.lock();
        if state.active_users == 0 {
            return;
        }
        state.active_users -= 1;
        if state.active_users == 0 {
            if let Some(start) = state.segment_start.take() {
                state.accumulated += now.saturating_duration_since(start);
            }
        }
    }

    pub(crate) fn rate_at(&self, counter: &Counter, now: Instant) -> f64 {
        let state = self.lock();
        let duration = state.total_at(now).as_secs_f64();
        if duration > 0.0 {
            counter.get() as f64 / duration
        } else {
            0.0
        }
    }

    #[cfg(test)]
    pub(crate) fn accumulated(&self) -> Duration {
        self.lock().accumulated
    }

    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
