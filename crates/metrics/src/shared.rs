//! Lock-guarded values that wake waiters on change.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A single value behind a lock. Every `set` wakes threads parked in
/// [`SharedScalar::wait_while`].
#[derive(Debug, Default)]
pub struct SharedScalar<T> {
    value: Mutex<T>,
    changed: Condvar,
}

impl<T> SharedScalar<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            changed: Condvar::new(),
        }
    }

    pub fn set(&self, value: T) {
        *self.lock() = value;
        self.changed.notify_all();
    }

    /// Parks while `condition` holds, re-checking it on every `set`, for at
    /// most `timeout`. Returns `true` if the condition still held on return.
    pub fn wait_while(&self, timeout: Duration, mut condition: impl FnMut(&T) -> bool) -> bool {
        let guard = self.lock();
        let (_guard, result) = self
            .changed
            .wait_timeout_while(guard, timeout, |value| condition(value))
            .unwrap_or_else(PoisonError::into_inner);
        result.timed_out()
    }

    // Every writer stores a whole value, so a poisoned lock still guards a
    // consistent one.
    fn lock(&self) -> MutexGuard<'_, T> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> SharedScalar<T> {
    pub fn get(&self) -> T {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::SharedScalar;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn get_returns_last_set() {
        let scalar = SharedScalar::new(String::from("Loading block index..."));
        assert_eq!(scalar.get(), "Loading block index...");
        scalar.set(String::from("Done loading"));
        assert_eq!(scalar.get(), "Done loading");
    }

    #[test]
    fn set_wakes_a_waiter() {
        let scalar = Arc::new(SharedScalar::new(0u32));
        let waiter = {
            let scalar = Arc::clone(&scalar);
            thread::spawn(move || {
                let started = Instant::now();
                let still_zero = scalar.wait_while(Duration::from_secs(5), |value| *value == 0);
                (still_zero, started.elapsed())
            })
        };
        thread::sleep(Duration::from_millis(50));
        scalar.set(1);
        let (still_zero, waited) = waiter.join().expect("waiter thread");
        assert!(!still_zero);
        assert!(waited < Duration::from_secs(5));
    }
}
