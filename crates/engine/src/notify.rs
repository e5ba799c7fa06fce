//! Notification sinks.

use std::sync::Mutex;

use crate::{Notification, NotificationSink, Outcome};

/// Emits notifications as `tracing` events under the `notification` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn report(&self, notification: Notification) {
        match notification.outcome {
            Outcome::Success => {
                tracing::info!(target: "notification", "{}", notification.message)
            }
            Outcome::Failure => {
                tracing::warn!(target: "notification", "{}", notification.message)
            }
        }
    }
}

/// Keeps every notification in memory, oldest first.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns and clears the collected notifications.
    pub fn drain(&self) -> Vec<Notification> {
        match self.entries.lock() {
            Ok(mut entries) => std::mem::take(&mut *entries),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn last(&self) -> Option<Notification> {
        match self.entries.lock() {
            Ok(entries) => entries.last().cloned(),
            Err(poisoned) => poisoned.into_inner().last().cloned(),
        }
    }
}

impl NotificationSink for MemorySink {
    fn report(&self, notification: Notification) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_drains_in_order() {
        let sink = MemorySink::new();
        sink.report(Notification::success("first"));
        sink.report(Notification::failure("second"));

        assert_eq!(sink.last().unwrap().message, "second");
        let drained = sink.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].outcome, Outcome::Success);
        assert!(sink.drain().is_empty());
    }
}
