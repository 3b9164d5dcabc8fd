//! Operator-facing message box.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub const MESSAGE_CAPACITY: usize = 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageKind {
    Error,
    Warning,
    Information,
    /// Uses the caption supplied by the poster.
    Plain,
}

impl MessageKind {
    pub fn default_caption(self) -> Option<&'static str> {
        match self {
            MessageKind::Error => Some("Error"),
            MessageKind::Warning => Some("Warning"),
            MessageKind::Information => Some("Information"),
            MessageKind::Plain => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MessageEntry {
    pub kind: MessageKind,
    pub caption: String,
    pub body: String,
}

impl MessageEntry {
    /// Builds an entry, replacing the caption for predefined kinds.
    pub fn new(kind: MessageKind, caption: &str, body: impl Into<String>) -> Self {
        let caption = kind.default_caption().unwrap_or(caption).to_string();
        Self {
            kind,
            caption,
            body: body.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MessageQueue {
    entries: Mutex<Vec<MessageEntry>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message. Once the queue is over capacity the entry at the
    /// back is dropped, which is the one just appended: the oldest five
    /// messages stay on screen and later ones are discarded.
    pub fn post(&self, entry: MessageEntry) {
        let mut entries = self.lock();
        entries.push(entry);
        if entries.len() > MESSAGE_CAPACITY {
            entries.pop();
        }
    }

    pub fn snapshot(&self) -> Vec<MessageEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MessageEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageEntry, MessageKind, MessageQueue, MESSAGE_CAPACITY};
    use std::thread;

    fn entry(body: &str) -> MessageEntry {
        MessageEntry::new(MessageKind::Information, "", body)
    }

    #[test]
    fn predefined_kinds_override_caption() {
        assert_eq!(MessageEntry::new(MessageKind::Error, "ignored", "x").caption, "Error");
        assert_eq!(MessageEntry::new(MessageKind::Plain, "Peer", "x").caption, "Peer");
        assert_eq!(MessageEntry::new(MessageKind::Plain, "", "x").caption, "");
    }

    #[test]
    fn snapshot_preserves_post_order() {
        let queue = MessageQueue::new();
        queue.post(entry("first"));
        queue.post(entry("second"));
        let bodies: Vec<_> = queue.snapshot().into_iter().map(|e| e.body).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    // Overflow drops the newest entry, not the oldest. Kept as-is until a
    // retention policy is chosen deliberately.
    #[test]
    fn overflow_discards_newest_message() {
        let queue = MessageQueue::new();
        for i in 0..8 {
            queue.post(entry(&format!("msg {i}")));
        }
        let bodies: Vec<_> = queue.snapshot().into_iter().map(|e| e.body).collect();
        assert_eq!(bodies, vec!["msg 0", "msg 1", "msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn never_exceeds_capacity_under_concurrent_posts() {
        let queue = MessageQueue::new();
        thread::scope(|scope| {
            for t in 0..4 {
                let queue = &queue;
                scope.spawn(move || {
                    for i in 0..50 {
                        queue.post(entry(&format!("{t}-{i}")));
                        assert!(queue.len() <= MESSAGE_CAPACITY);
                    }
                });
            }
        });
        assert_eq!(queue.len(), MESSAGE_CAPACITY);
    }
}
