//! Unified error types for the relay firmware.
//!
//! A single `Error` enum that every handler can convert into, keeping the
//! command dispatch path's error handling uniform. All variants are `Copy`
//! so they can be returned from the control loop without allocation.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound command carried a payload the core refuses.
    Command(CommandError),
    /// Durable storage could not be written or committed.
    Storage(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Rejected inbound payloads. The handler takes no corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Relay state payload was neither `"ON"` nor `"OFF"`.
    InvalidRelayState,
    /// Countdown duration was not a positive number of seconds (or too large).
    InvalidCountdown,
    /// Keepalive timeout was negative, non-numeric, or too large.
    InvalidKeepalive,
    /// The property name is not one the core handles.
    UnknownProperty,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRelayState => write!(f, "relay state must be ON or OFF"),
            Self::InvalidCountdown => write!(f, "countdown must be a positive number of seconds"),
            Self::InvalidKeepalive => write!(f, "keepalive must be a non-negative number of seconds"),
            Self::UnknownProperty => write!(f, "unknown property"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
