//! Notifications
//!
//! Transient, fire-and-forget messages surfaced to the shopper (toasts).

use std::fmt;

use mockall::automock;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The action succeeded.
    Success,

    /// The action was blocked or failed; state is unchanged.
    Error,
}

/// A message for the notification sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub kind: NotificationKind,

    /// Text shown to the shopper
    pub message: String,
}

impl Notification {
    /// Success notification.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// Whether this is a success notification.
    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Destination for notifications. No acknowledgement is expected.
#[automock]
pub trait NotificationSink: Send + Sync {
    /// Display a notification.
    fn notify(&self, notification: Notification);
}

/// Sink that forwards notifications to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => tracing::info!(text = %notification.message, "notification"),
            NotificationKind::Error => tracing::warn!(text = %notification.message, "notification"),
        }
    }
}
