//! Routes node UI notifications onto the metrics screen.

use std::sync::Arc;

use crate::messages::MessageKind;
use crate::registry::MetricsRegistry;

/// Callbacks the node uses to surface messages to whatever front end is
/// attached.
pub trait UiInterface: Send + Sync {
    /// Shows a message. Returns the user's answer where one applies.
    fn message_box(&self, message: &str, caption: &str, kind: MessageKind) -> bool;

    fn question(&self, _interactive: &str, message: &str, caption: &str, kind: MessageKind) -> bool {
        self.message_box(message, caption, kind)
    }

    fn init_message(&self, message: &str);
}

/// Front end that sends everything to the metrics screen. The screen cannot
/// answer questions, so every prompt is treated as declined.
#[derive(Clone, Debug)]
pub struct MetricsScreenUi {
    registry: Arc<MetricsRegistry>,
}

impl MetricsScreenUi {
    pub fn new(registry: Arc<MetricsRegistry>) -> Self {
        Self { registry }
    }
}

impl UiInterface for MetricsScreenUi {
    fn message_box(&self, message: &str, caption: &str, kind: MessageKind) -> bool {
        self.registry.post_message(kind, caption, message);
        false
    }

    fn init_message(&self, message: &str) {
        self.registry.set_init_message(message);
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricsScreenUi, UiInterface};
    use crate::messages::MessageKind;
    use crate::refresh::RefreshScheduler;
    use crate::registry::MetricsRegistry;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn questions_land_in_the_message_box_and_are_declined() {
        let registry = Arc::new(MetricsRegistry::new(RefreshScheduler::with_grace(
            Duration::from_secs(1),
            Duration::ZERO,
        )));
        let ui = MetricsScreenUi::new(Arc::clone(&registry));

        let answer = ui.question("Reindex? [y/N]", "Corrupted block database", "", MessageKind::Error);
        assert!(!answer);
        let messages = registry.messages.snapshot();
        assert_eq!(messages[0].caption, "Error");
        assert_eq!(messages[0].body, "Corrupted block database");

        ui.init_message("Loading wallet...");
        assert_eq!(registry.init_message(), "Loading wallet...");
    }
}
