//! Outbound notifications.
//!
//! The [`RelayService`](super::service::RelayService) emits these through
//! the [`NotificationSink`](super::ports::NotificationSink) port. Each one
//! is a `(name, value)` pair; the transport adapter decides which topic a
//! name lands on.

use core::fmt::Write;

use crate::control::relay::RelayState;

/// Property carrying the relay state (`"ON"` / `"OFF"`).
pub const RELAY_STATE: &str = "relayState";
/// Property carrying the power-on mode (`"1"` / `"0"`).
pub const RELAY_INIT_MODE: &str = "relayInitMode";
/// Property carrying the armed countdown in seconds (`"0"` once expired).
pub const RELAY_TIMER: &str = "relayTimer";
/// Property carrying the keepalive timeout in seconds (`"0"` = disabled).
pub const KEEPALIVE_VALUE: &str = "keepAliveValue";

/// Longest rendered value: a `u32` is at most 10 digits.
pub type NotificationValue = heapless::String<12>;

/// Structured notifications emitted by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The relay was driven to this state (emitted even when unchanged).
    RelayState(RelayState),
    /// Echo of the persisted power-on state.
    InitMode(RelayState),
    /// Countdown armed for this many seconds, or `0` on expiry.
    Countdown(u32),
    /// Effective keepalive timeout in seconds.
    KeepaliveValue(u32),
}

impl Notification {
    /// Property name this notification is published under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RelayState(_) => RELAY_STATE,
            Self::InitMode(_) => RELAY_INIT_MODE,
            Self::Countdown(_) => RELAY_TIMER,
            Self::KeepaliveValue(_) => KEEPALIVE_VALUE,
        }
    }

    /// Canonical string value.
    pub fn value(&self) -> NotificationValue {
        let mut out = NotificationValue::new();
        // Capacity covers every variant, so the writes cannot fail.
        let _ = match self {
            Self::RelayState(state) => out.write_str(state.as_str()),
            Self::InitMode(state) => write!(out, "{}", state.as_mode_digit()),
            Self::Countdown(secs) | Self::KeepaliveValue(secs) => write!(out, "{}", secs),
        };
        out
    }
}
