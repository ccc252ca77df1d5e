//! User-facing notifications.
//!
//! The console surfaces the outcome of background actions as transient
//! notifications. Components depend on the [`NotificationChannel`] trait and
//! receive an implementation at construction.

/// Sink for transient user notifications.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationChannel: Send + Sync {
    /// Surface a success notification.
    fn notify_success(&self, message: &str, title: &str);

    /// Surface an error notification.
    fn notify_error(&self, message: &str, title: &str);
}

/// Notification channel backed by the tracing subscriber.
///
/// Stand-in for an interactive toast layer; emits notifications as
/// structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationChannel for TracingNotifier {
    fn notify_success(&self, message: &str, title: &str) {
        tracing::info!(title, message, "notification");
    }

    fn notify_error(&self, message: &str, title: &str) {
        tracing::error!(title, message, "notification");
    }
}
