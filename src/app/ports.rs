//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RelayService (domain)
//! ```
//!
//! Driven adapters (relay/button GPIO, notification sinks, durable storage,
//! the restart primitive) implement these traits. The
//! [`RelayService`](super::service::RelayService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! The monotonic clock is not a port: callers pass `now_ms` into every
//! time-dependent operation, which keeps the timers deterministic in tests.

use super::events::Notification;

// ───────────────────────────────────────────────────────────────
// Relay port (driven adapter: domain → relay + indicator GPIO)
// ───────────────────────────────────────────────────────────────

/// Binary output contract for the relay and its paired indicator.
pub trait RelayPort {
    /// Drive the relay coil output (`true` = HIGH = energised).
    fn write_relay(&mut self, high: bool);

    /// Read back the level the relay output is actually driving.
    fn relay_level(&mut self) -> bool;

    /// Drive the indicator LED output (`true` = HIGH).
    fn write_indicator(&mut self, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: GPIO → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, undebounced push-button level.
pub trait ButtonPort {
    /// `true` = HIGH. The button is active-low, so HIGH means released.
    fn button_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Notification sink (driven adapter: domain → transport)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`Notification`]s through this port. Adapters decide
/// where they go (serial log, MQTT property publish, etc.).
pub trait NotificationSink {
    fn emit(&mut self, notification: &Notification);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ EEPROM / NVS)
// ───────────────────────────────────────────────────────────────

/// Durable byte-blob storage for the persisted config record.
///
/// `save` stages the bytes; nothing is durable until `commit` returns
/// `Ok`. Callers commit before the triggering handler returns.
pub trait StoragePort {
    /// Read the stored record into `buf`. Returns the number of bytes read.
    fn load(&self, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Stage a new record.
    fn save(&mut self, data: &[u8]) -> Result<(), StorageError>;

    /// Make the staged record durable.
    fn commit(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// System port (driven adapter: domain → platform lifecycle)
// ───────────────────────────────────────────────────────────────

/// Drastic platform-level actions the core may request.
pub trait SystemPort {
    /// Full device restart. On hardware this does not return.
    fn restart(&mut self);

    /// Ask the platform to wipe its settings and enter provisioning mode.
    fn request_factory_reset(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing has ever been stored.
    NotFound,
    /// Generic I/O error from the storage backend.
    IoError,
    /// The staged record could not be made durable.
    CommitFailed,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "record not found"),
            Self::IoError => write!(f, "I/O error"),
            Self::CommitFailed => write!(f, "commit failed"),
        }
    }
}
