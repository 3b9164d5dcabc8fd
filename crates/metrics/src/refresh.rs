//! Redraw scheduling shared by the screen thread and producers.

use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::trace;

use crate::shared::SharedScalar;

/// Longest the screen thread sleeps before re-checking cancellation.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);
/// How long `request_immediate_refresh` holds its caller.
pub const REFRESH_GRACE: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tick {
    Due,
    Cancelled,
}

#[derive(Debug)]
pub struct RefreshScheduler {
    next_refresh: SharedScalar<Instant>,
    interval: SharedScalar<Duration>,
    grace: Duration,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self::with_grace(interval, REFRESH_GRACE)
    }

    pub fn with_grace(interval: Duration, grace: Duration) -> Self {
        Self {
            next_refresh: SharedScalar::new(Instant::now()),
            interval: SharedScalar::new(interval),
            grace,
        }
    }

    pub fn set_interval(&self, interval: Duration) {
        self.interval.set(interval);
    }

    pub fn interval(&self) -> Duration {
        self.interval.get()
    }

    pub fn next_refresh(&self) -> Instant {
        self.next_refresh.get()
    }

    /// Pushes the next redraw one interval past now. Called by the screen
    /// thread as it starts a frame, so a request made while the frame is
    /// printed still wins.
    pub fn schedule_next(&self) {
        self.next_refresh.set(Instant::now() + self.interval.get());
    }

    /// Asks the screen thread to redraw now, then holds the caller for the
    /// grace period so the new frame has most likely started by the time
    /// it returns. Ordering is not guaranteed.
    pub fn request_immediate_refresh(&self) {
        trace!("immediate metrics refresh requested");
        self.next_refresh.set(Instant::now());
        if !self.grace.is_zero() {
            thread::sleep(self.grace);
        }
    }

    /// Blocks until the next refresh is due or `shutdown` reads `true`.
    /// Cancellation is observed within one [`POLL_INTERVAL`].
    pub fn wait_for_next_tick(&self, shutdown: &watch::Receiver<bool>) -> Tick {
        loop {
            if *shutdown.borrow() {
                return Tick::Cancelled;
            }
            let next = self.next_refresh.get();
            let now = Instant::now();
            if now >= next {
                return Tick::Due;
            }
            let step = (next - now).min(POLL_INTERVAL);
            self.next_refresh
                .wait_while(step, |next| Instant::now() < *next);
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}
