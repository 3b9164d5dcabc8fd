//! Process-wide metrics state, shared by handle.

use std::time::{Duration, Instant};

use fluxd_consensus::Hash256;

use crate::counter::Counter;
use crate::ledger::TrackedBlockLedger;
use crate::messages::{MessageEntry, MessageKind, MessageQueue};
use crate::refresh::RefreshScheduler;
use crate::shared::SharedScalar;
use crate::timer::IntervalTimer;

/// Init message the node posts once startup has finished.
pub const DONE_LOADING: &str = "Done loading";

/// Everything the metrics screen reads, created once at startup and handed
/// to producers and the screen thread behind an `Arc`.
#[derive(Debug)]
pub struct MetricsRegistry {
    start_time: SharedScalar<Instant>,
    pub transactions_validated: Counter,
    pub solver_runs: Counter,
    pub solution_target_checks: Counter,
    pub mining_timer: IntervalTimer,
    pub ledger: TrackedBlockLedger,
    pub messages: MessageQueue,
    init_message: SharedScalar<String>,
    loaded: SharedScalar<bool>,
    pub refresh: RefreshScheduler,
}

impl MetricsRegistry {
    pub fn new(refresh: RefreshScheduler) -> Self {
        Self {
            start_time: SharedScalar::new(Instant::now()),
            transactions_validated: Counter::new(),
            solver_runs: Counter::new(),
            solution_target_checks: Counter::new(),
            mining_timer: IntervalTimer::new(),
            ledger: TrackedBlockLedger::new(),
            messages: MessageQueue::new(),
            init_message: SharedScalar::new(String::new()),
            loaded: SharedScalar::new(false),
            refresh,
        }
    }

    pub fn mark_start_time(&self) {
        self.start_time.set(Instant::now());
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.get().elapsed()
    }

    /// Local solutions per second of mining time.
    pub fn local_sol_ps(&self) -> f64 {
        self.mining_timer.rate(&self.solution_target_checks)
    }

    pub fn track_mined_block(&self, hash: Hash256) {
        self.ledger.record_mined(hash);
    }

    /// Queues a message for the screen and asks for an early redraw. Blocks
    /// the caller for the refresh grace period.
    pub fn post_message(&self, kind: MessageKind, caption: &str, body: impl Into<String>) {
        self.messages.post(MessageEntry::new(kind, caption, body));
        self.refresh.request_immediate_refresh();
    }

    pub fn set_init_message(&self, message: impl Into<String>) {
        self.init_message.set(message.into());
    }

    pub fn init_message(&self) -> String {
        self.init_message.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    pub fn mark_loaded(&self) {
        self.loaded.set(true);
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new(RefreshScheduler::default())
    }
}

#[cfg(test)]
mod tests {
    use super::MetricsRegistry;
    use crate::messages::MessageKind;
    use crate::refresh::RefreshScheduler;
    use std::time::{Duration, Instant};

    fn registry() -> MetricsRegistry {
        MetricsRegistry::new(RefreshScheduler::with_grace(
            Duration::from_secs(600),
            Duration::ZERO,
        ))
    }

    #[test]
    fn posting_a_message_pulls_the_refresh_forward() {
        let registry = registry();
        registry.refresh.schedule_next();
        let before = Instant::now();
        registry.post_message(MessageKind::Warning, "", "disk space is low");

        assert!(registry.refresh.next_refresh() <= Instant::now());
        assert!(registry.refresh.next_refresh() >= before);
        let messages = registry.messages.snapshot();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].caption, "Warning");
    }

    #[test]
    fn local_rate_is_zero_until_mining_starts() {
        let registry = registry();
        registry.solution_target_checks.increment();
        assert_eq!(registry.local_sol_ps(), 0.0);
    }

    #[test]
    fn tracks_mined_blocks() {
        let registry = registry();
        registry.track_mined_block([7; 32]);
        assert_eq!(registry.ledger.mined_count(), 1);
        assert_eq!(registry.ledger.tracked(), 1);
    }
}
