//! System notifications.
//!
//! Warnings and errors from the tracing stream are forwarded as OS
//! notifications so hotkey and device failures are visible without a
//! console. Identical messages are suppressed for a cooldown window: a
//! flapping device would otherwise repeat the same warning every poll.

use std::time::{Duration, Instant};

use notify_rust::Notification;
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, error};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::{APP_NAME, APP_NAME_PRETTY};

const REPEAT_COOLDOWN: Duration = Duration::from_secs(30);

/// Send a system notification with a summary and body.
pub fn notify(summary: &str, body: &str) {
    Notification::new()
        .appname(APP_NAME)
        .summary(&format!("{} - {}", APP_NAME_PRETTY, summary))
        .body(body)
        .show()
        .map_err(|e| error!("Failed to send notification: {}", e))
        .ok();
}

/// Visitor to extract the message field from tracing events.
struct MessageVisitor {
    message: Option<String>,
}

impl MessageVisitor {
    fn new() -> Self {
        Self { message: None }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Tracing layer that sends notifications for warnings and errors.
#[derive(Debug, Default)]
pub struct NotificationLayer {
    last: Mutex<Option<(String, Instant)>>,
}

impl NotificationLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repeat suppression: the same message within the cooldown is dropped.
    fn should_send(&self, message: &str) -> bool {
        let mut last = self.last.lock();
        if let Some((previous, at)) = last.as_ref() {
            if previous == message && at.elapsed() < REPEAT_COOLDOWN {
                return false;
            }
        }
        *last = Some((message.to_string(), Instant::now()));
        true
    }
}

fn should_notify(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("error"),
        Level::WARN => Some("warning"),
        _ => None,
    }
}

impl<S: Subscriber> Layer<S> for NotificationLayer {
    fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
        let level = *event.metadata().level();

        if let Some(summary) = should_notify(level) {
            let mut visitor = MessageVisitor::new();
            event.record(&mut visitor);

            if let Some(message) = visitor.message {
                if self.should_send(&message) {
                    notify(summary, &message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_message_is_suppressed() {
        let layer = NotificationLayer::new();
        assert!(layer.should_send("volume command failed"));
        assert!(!layer.should_send("volume command failed"));
        assert!(layer.should_send("a different failure"));
    }

    #[test]
    fn only_warn_and_error_notify() {
        assert!(should_notify(Level::ERROR).is_some());
        assert!(should_notify(Level::WARN).is_some());
        assert!(should_notify(Level::INFO).is_none());
        assert!(should_notify(Level::DEBUG).is_none());
    }
}
