//! System adapter: device restart and factory-reset requests.
//!
//! On ESP-IDF, `restart` calls `esp_restart()` and never returns. A factory
//! reset request is latched for the platform's provisioning layer to pick
//! up. On host the restart is only recorded, so tests and simulation keep
//! running.

use log::warn;

use crate::app::ports::SystemPort;

#[derive(Default)]
pub struct EspSystem {
    restarts: u32,
    factory_reset_pending: bool,
}

impl EspSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take (and clear) a pending factory-reset request.
    pub fn take_factory_reset(&mut self) -> bool {
        core::mem::take(&mut self.factory_reset_pending)
    }

    /// Restart requests seen (simulation only ever increments this).
    pub fn restart_count(&self) -> u32 {
        self.restarts
    }
}

impl SystemPort for EspSystem {
    fn restart(&mut self) {
        self.restarts = self.restarts.saturating_add(1);
        warn!("System: restart requested");

        #[cfg(target_os = "espidf")]
        unsafe {
            esp_idf_svc::sys::esp_restart();
        }
    }

    fn request_factory_reset(&mut self) {
        warn!("System: factory reset requested");
        self.factory_reset_pending = true;
    }
}
