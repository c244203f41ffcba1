//! Transient user notifications
//!
//! Persistence failures and mutation results surface as short-lived
//! notices; they never abort the session. The dispatcher pushes them
//! through a [`Notify`] sink and the UI drains and displays them.

use std::sync::Mutex;

use tokio::sync::mpsc;

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A transient, auto-dismissing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Sink for transient notices
pub trait Notify: Send + Sync {
    fn push(&self, notice: Notice);
}

/// Channel-backed notifier
///
/// The sending half lives in the session; the UI owns the receiver and
/// drains it after each action.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver to drain it from
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notify for ChannelNotifier {
    fn push(&self, notice: Notice) {
        // A closed receiver just means nobody is listening anymore
        let _ = self.tx.send(notice);
    }
}

/// Collecting notifier for inspection in tests and embedded callers
#[derive(Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices pushed so far, in order
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Count of notices with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl Notify for MemoryNotifier {
    fn push(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::pair();

        notifier.push(Notice::success("saved"));
        notifier.push(Notice::error("backend unavailable"));

        assert_eq!(rx.try_recv().unwrap(), Notice::success("saved"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notice::error("backend unavailable")
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::pair();
        drop(rx);
        notifier.push(Notice::success("nobody listening"));
    }

    #[test]
    fn test_memory_notifier_counts() {
        let notifier = MemoryNotifier::new();
        notifier.push(Notice::success("one"));
        notifier.push(Notice::error("two"));
        notifier.push(Notice::error("three"));

        assert_eq!(notifier.count(Severity::Success), 1);
        assert_eq!(notifier.count(Severity::Error), 2);
        assert_eq!(notifier.notices().len(), 3);
    }
}
