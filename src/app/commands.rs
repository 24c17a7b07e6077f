//! Inbound commands and lifecycle events.
//!
//! These represent actions requested by the outside world (the server via
//! the message bus, or the host platform itself) that the
//! [`RelayService`](super::service::RelayService) interprets and acts upon.

use crate::config::MAX_DURATION_SECS;
use crate::control::relay::RelayState;
use crate::error::CommandError;

/// Settable property: force the relay state.
pub const SET_RELAY_STATE: &str = "relayState";
/// Settable property: power-on mode.
pub const SET_RELAY_INIT_MODE: &str = "relayInitMode";
/// Settable property: start a countdown.
pub const SET_RELAY_TIMER: &str = "relayTimer";
/// Settable property: keepalive liveness tick.
pub const KEEPALIVE_TICK: &str = "tick";
/// Settable property: keepalive timeout.
pub const SET_KEEPALIVE_VALUE: &str = "keepAliveValue";

/// Commands that the transport adapter can send into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Drive the relay to this state immediately.
    SetRelay(RelayState),

    /// Persist the power-on state.
    SetInitMode(RelayState),

    /// Force ON, then OFF after this many seconds. Carried unvalidated so
    /// the countdown itself can refuse non-positive values.
    StartCountdown(i64),

    /// The server is alive.
    KeepaliveTick,

    /// Persist the keepalive timeout in seconds (`0` disables).
    SetKeepalive(u32),
}

impl AppCommand {
    /// Map a settable property and its string payload to a command.
    pub fn from_property(property: &str, value: &str) -> Result<Self, CommandError> {
        match property {
            SET_RELAY_STATE => RelayState::parse(value)
                .map(Self::SetRelay)
                .ok_or(CommandError::InvalidRelayState),
            SET_RELAY_INIT_MODE => {
                let on = parse_int_prefix(value) == 1 || value == "ON";
                Ok(Self::SetInitMode(RelayState::from_level(on)))
            }
            SET_RELAY_TIMER => Ok(Self::StartCountdown(parse_int_prefix(value))),
            KEEPALIVE_TICK => Ok(Self::KeepaliveTick),
            SET_KEEPALIVE_VALUE => {
                let secs = parse_int_prefix(value);
                if secs > 0 {
                    u32::try_from(secs)
                        .ok()
                        .filter(|s| *s <= MAX_DURATION_SECS)
                        .map(Self::SetKeepalive)
                        .ok_or(CommandError::InvalidKeepalive)
                } else if value == "0" {
                    Ok(Self::SetKeepalive(0))
                } else {
                    Err(CommandError::InvalidKeepalive)
                }
            }
            _ => Err(CommandError::UnknownProperty),
        }
    }
}

/// Platform lifecycle notifications delivered to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Device entered its configuration portal; the load is unsupervised.
    ProvisioningMode,
    NormalMode,
    /// Firmware update delivery began; the load is unsupervised.
    OtaStarted,
    AboutToReset,
    WifiConnected,
    WifiDisconnected,
    /// Message bus connected; the first one triggers the startup announcement.
    MqttReady,
    MqttDisconnected,
}

/// Lenient integer parse: optional leading whitespace, optional sign, then
/// as many decimal digits as are present. No digits yields `0`; overflow
/// saturates.
pub fn parse_int_prefix(value: &str) -> i64 {
    let s = value.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        acc = acc.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative { -acc } else { acc }
}
