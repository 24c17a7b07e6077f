//! Server keepalive watchdog.
//!
//! The controlling server sends a periodic liveness tick. If none arrives
//! within the configured timeout the control plane is assumed wedged and
//! the caller restarts the whole device. A timeout of `0` disables the
//! watchdog entirely.
//!
//! Persistence of the timeout lives in [`PersistentConfig`]; this type only
//! mirrors the value.
//!
//! [`PersistentConfig`]: crate::persist::PersistentConfig

pub struct KeepaliveWatchdog {
    timeout_secs: u32,
    last_signal_ms: u32,
}

impl KeepaliveWatchdog {
    /// Create an armed watchdog; `now_ms` counts as the first signal so a
    /// fresh boot does not look like a missed keepalive.
    pub fn new(timeout_secs: u32, now_ms: u32) -> Self {
        Self {
            timeout_secs,
            last_signal_ms: now_ms,
        }
    }

    /// Record a liveness tick.
    pub fn signal(&mut self, now_ms: u32) {
        self.last_signal_ms = now_ms;
    }

    /// Change the timeout and re-arm from `now_ms`.
    pub fn configure(&mut self, timeout_secs: u32, now_ms: u32) {
        self.timeout_secs = timeout_secs;
        self.last_signal_ms = now_ms;
    }

    /// `true` iff enabled and `timeout_secs` have elapsed since the last
    /// signal. Fires again only after another full timeout; the caller is
    /// expected to restart long before that.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        if self.timeout_secs == 0 {
            return false;
        }
        let timeout_ms = self.timeout_secs.saturating_mul(1000);
        if now_ms.wrapping_sub(self.last_signal_ms) >= timeout_ms {
            self.last_signal_ms = now_ms;
            return true;
        }
        false
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn is_enabled(&self) -> bool {
        self.timeout_secs > 0
    }
}
