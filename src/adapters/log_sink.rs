//! Log-based notification sink adapter.
//!
//! Implements [`NotificationSink`] by writing every outbound notification to
//! the ESP-IDF logger (UART in production). The message bus adapter
//! implements the same trait and publishes instead.

use log::info;

use crate::app::events::Notification;
use crate::app::ports::NotificationSink;

/// Adapter that logs every [`Notification`] to the serial console.
#[derive(Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for LogNotificationSink {
    fn emit(&mut self, notification: &Notification) {
        info!("NOTIFY | {} = {}", notification.name(), notification.value());
    }
}
