//! System configuration parameters
//!
//! [`PersistedConfig`] is the part that survives power loss; it is stored
//! as a fixed 8-byte [`ConfigRecord`] at offset 0 of the config blob.
//! [`TimingConfig`] holds compile-time tunables for the control loop.

use serde::{Deserialize, Serialize};

use crate::control::relay::RelayState;

/// Largest countdown / keepalive, in seconds. Its millisecond value fits in
/// half the `u32` clock range, which keeps wrapping subtraction sound.
pub const MAX_DURATION_SECS: u32 = (i32::MAX as u32) / 1000;

/// Size of the encoded [`ConfigRecord`] in bytes.
pub const RECORD_LEN: usize = 8;

/// Settings that survive power loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// Relay state applied at power-on.
    pub initial_state: RelayState,
    /// Keepalive watchdog timeout in seconds; `0` disables it.
    pub keepalive_timeout_secs: u32,
}

/// On-storage layout: two little-endian `i32`s, no version field.
///
/// `initial_state` is `1` for ON and `0` for OFF; `keep_alive_value` is the
/// timeout in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    #[serde(with = "postcard::fixint::le")]
    pub initial_state: i32,
    #[serde(with = "postcard::fixint::le")]
    pub keep_alive_value: i32,
}

/// Why a stored record was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// Fewer than [`RECORD_LEN`] bytes, or undecodable.
    Truncated,
    /// `initial_state` outside `{0, 1}`, typical of erased flash.
    BadInitialState(i32),
    /// Negative or oversized keepalive.
    BadKeepalive(i32),
}

impl core::fmt::Display for RecordError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Truncated => write!(f, "record truncated"),
            Self::BadInitialState(v) => write!(f, "initial state {} not 0/1", v),
            Self::BadKeepalive(v) => write!(f, "keepalive {} out of range", v),
        }
    }
}

impl ConfigRecord {
    pub fn encode(config: &PersistedConfig) -> [u8; RECORD_LEN] {
        let record = Self {
            initial_state: i32::from(config.initial_state.as_mode_digit()),
            keep_alive_value: config.keepalive_timeout_secs as i32,
        };
        let mut buf = [0u8; RECORD_LEN];
        // Two fixint i32s always fill exactly eight bytes.
        let written = postcard::to_slice(&record, &mut buf).map(|out| out.len());
        debug_assert!(matches!(written, Ok(RECORD_LEN)));
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<PersistedConfig, RecordError> {
        if bytes.len() < RECORD_LEN {
            return Err(RecordError::Truncated);
        }
        let record: Self =
            postcard::from_bytes(&bytes[..RECORD_LEN]).map_err(|_| RecordError::Truncated)?;

        let initial_state = match record.initial_state {
            1 => RelayState::On,
            0 => RelayState::Off,
            other => return Err(RecordError::BadInitialState(other)),
        };
        let keepalive = record.keep_alive_value;
        if keepalive < 0 || keepalive as u32 > MAX_DURATION_SECS {
            return Err(RecordError::BadKeepalive(keepalive));
        }

        Ok(PersistedConfig {
            initial_state,
            keepalive_timeout_secs: keepalive as u32,
        })
    }
}

/// Control-loop tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Button level must hold this long before it counts.
    pub debounce_ms: u32,
    /// Holding the button pressed this long requests a factory reset.
    pub reset_hold_ms: u32,
    /// Host loop period.
    pub loop_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            reset_hold_ms: 10_000,
            loop_interval_ms: 10,
        }
    }
}
