//! Durable power-on settings with change-triggered write-back.
//!
//! The backing store has limited write endurance, so a setter only writes
//! (and commits) when the value actually changes. Writes are synchronous:
//! the record is committed before the setter returns.

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};
use crate::config::{ConfigRecord, PersistedConfig, RECORD_LEN};
use crate::control::relay::RelayState;

pub struct PersistentConfig {
    current: PersistedConfig,
    /// Last record known to be committed (defaults when nothing valid is
    /// stored). A failed write-back leaves this behind `current`.
    stored: PersistedConfig,
}

impl PersistentConfig {
    /// Load from storage. Missing, unreadable, or invalid records fall back
    /// to [`PersistedConfig::default`] without touching the store.
    pub fn load(store: &impl StoragePort) -> Self {
        let mut buf = [0u8; RECORD_LEN];
        let current = match store.load(&mut buf) {
            Ok(n) => match ConfigRecord::decode(&buf[..n]) {
                Ok(cfg) => {
                    info!(
                        "Config: loaded initial={:?} keepalive={}s",
                        cfg.initial_state, cfg.keepalive_timeout_secs
                    );
                    cfg
                }
                Err(e) => {
                    warn!("Config: stored record rejected ({}), using defaults", e);
                    PersistedConfig::default()
                }
            },
            Err(StorageError::NotFound) => {
                info!("Config: nothing stored, using defaults");
                PersistedConfig::default()
            }
            Err(e) => {
                warn!("Config: load failed ({}), using defaults", e);
                PersistedConfig::default()
            }
        };
        Self {
            current,
            stored: current,
        }
    }

    pub fn config(&self) -> PersistedConfig {
        self.current
    }

    /// Returns `Ok(true)` when the store was written.
    pub fn set_initial_state(
        &mut self,
        state: RelayState,
        store: &mut impl StoragePort,
    ) -> Result<bool, StorageError> {
        self.current.initial_state = state;
        self.sync(store)
    }

    /// Returns `Ok(true)` when the store was written.
    pub fn set_keepalive(
        &mut self,
        timeout_secs: u32,
        store: &mut impl StoragePort,
    ) -> Result<bool, StorageError> {
        self.current.keepalive_timeout_secs = timeout_secs;
        self.sync(store)
    }

    /// Restore defaults and write unconditionally.
    pub fn reset(&mut self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        self.current = PersistedConfig::default();
        self.write_back(store)
    }

    /// Write only if `current` differs from what was last committed, so a
    /// request that repeats a failed write tries again.
    fn sync(&mut self, store: &mut impl StoragePort) -> Result<bool, StorageError> {
        if self.current == self.stored {
            return Ok(false);
        }
        self.write_back(store).map(|()| true)
    }

    fn write_back(&mut self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        let bytes = ConfigRecord::encode(&self.current);
        let result = store.save(&bytes).and_then(|()| store.commit());
        match result {
            Ok(()) => {
                self.stored = self.current;
                info!(
                    "Config: saved initial={:?} keepalive={}s",
                    self.current.initial_state, self.current.keepalive_timeout_secs
                );
            }
            Err(e) => warn!("Config: write-back failed ({})", e),
        }
        result
    }
}
