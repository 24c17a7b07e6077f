//! Application service, the hexagonal core.
//!
//! [`RelayService`] owns the relay controller, countdown, keepalive
//! watchdog, button debouncer, and persisted config. It exposes a clean,
//! hardware-agnostic API. All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!    ButtonPort ──▶ ┌──────────────────────────────┐ ──▶ NotificationSink
//!                   │         RelayService          │
//!     RelayPort ◀──▶│ Relay · Countdown · Keepalive │ ──▶ SystemPort
//!                   │   Debounce · PersistentConfig │
//!   StoragePort ◀──▶└──────────────────────────────┘
//! ```
//!
//! The service never sleeps or blocks; [`tick`](RelayService::tick) is
//! called from the host loop, which also services the network.

use log::{info, warn};

use crate::config::{PersistedConfig, TimingConfig};
use crate::control::countdown::CountdownTimer;
use crate::control::keepalive::KeepaliveWatchdog;
use crate::control::relay::{RelayController, RelayState};
use crate::drivers::button::{DebouncedInput, Edge};
use crate::error::Result;
use crate::persist::PersistentConfig;

use super::commands::{AppCommand, LifecycleEvent};
use super::events::Notification;
use super::inbox::Inbound;
use super::ports::{ButtonPort, NotificationSink, RelayPort, StoragePort, SystemPort};

// ───────────────────────────────────────────────────────────────
// RelayService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct RelayService {
    relay: RelayController,
    button: DebouncedInput,
    countdown: CountdownTimer,
    keepalive: KeepaliveWatchdog,
    config: PersistentConfig,
    timing: TimingConfig,
    started: bool,
    /// A factory reset was already requested during the current press.
    reset_requested: bool,
    /// Swallow the release edge that ends a reset hold.
    suppress_release: bool,
}

impl RelayService {
    /// Load persisted config, drive the outputs to the power-on state, and
    /// arm the keepalive watchdog from `now_ms`.
    ///
    /// Nothing is announced yet. Call [`start`](Self::start) (or deliver
    /// [`LifecycleEvent::MqttReady`]) once the transport is up.
    pub fn boot(
        store: &impl StoragePort,
        hw: &mut (impl RelayPort + ButtonPort),
        timing: TimingConfig,
        now_ms: u32,
    ) -> Self {
        let config = PersistentConfig::load(store);
        Self::with_config(config, hw, timing, now_ms)
    }

    fn with_config(
        config: PersistentConfig,
        hw: &mut (impl RelayPort + ButtonPort),
        timing: TimingConfig,
        now_ms: u32,
    ) -> Self {
        let persisted = config.config();
        let relay = RelayController::new(persisted.initial_state);
        relay.apply_boot_state(hw);

        info!(
            "RelayService booted: relay={:?} keepalive={}s",
            persisted.initial_state, persisted.keepalive_timeout_secs
        );

        Self {
            relay,
            button: DebouncedInput::new(timing.debounce_ms, hw.button_level(), now_ms),
            countdown: CountdownTimer::new(),
            keepalive: KeepaliveWatchdog::new(persisted.keepalive_timeout_secs, now_ms),
            config,
            timing,
            started: false,
            reset_requested: false,
            suppress_release: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce current state and settings, and re-arm the keepalive so the
    /// time spent connecting does not count as a missed tick.
    pub fn start(&mut self, now_ms: u32, sink: &mut impl NotificationSink) {
        let persisted = self.config.config();
        sink.emit(&Notification::RelayState(self.relay.current_state()));
        sink.emit(&Notification::InitMode(persisted.initial_state));
        sink.emit(&Notification::KeepaliveValue(persisted.keepalive_timeout_secs));
        self.keepalive.signal(now_ms);
        self.started = true;
        info!("RelayService started in {:?}", self.relay.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: countdown → button → keepalive.
    ///
    /// The countdown runs first so an expiry OFF in this tick is ordered
    /// before any button toggle in the same tick.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl RelayPort + ButtonPort),
        sink: &mut impl NotificationSink,
        system: &mut impl SystemPort,
    ) {
        // 1. Countdown expiry
        if self.countdown.tick(now_ms).is_some() {
            info!("Countdown expired, relay OFF");
            self.relay.set_state(RelayState::Off, hw, sink);
            sink.emit(&Notification::Countdown(0));
        }

        // 2. Button
        self.poll_button(now_ms, hw, sink, system);

        // 3. Keepalive watchdog
        if self.keepalive.tick(now_ms) {
            warn!(
                "Keepalive: no tick for {}s, restarting device",
                self.keepalive.timeout_secs()
            );
            system.restart();
        }
    }

    fn poll_button(
        &mut self,
        now_ms: u32,
        hw: &mut (impl RelayPort + ButtonPort),
        sink: &mut impl NotificationSink,
        system: &mut impl SystemPort,
    ) {
        let raw = hw.button_level();
        match self.button.poll(raw, now_ms) {
            Some(Edge::Rising) if self.suppress_release => {
                self.suppress_release = false;
            }
            Some(Edge::Rising) => {
                let state = self.relay.toggle(hw, sink);
                info!("Button: toggle -> {:?}", state);
            }
            Some(Edge::Falling) => {
                self.reset_requested = false;
            }
            None => {}
        }

        // Active-low: a LOW stable level means the button is held down.
        if !self.button.stable_level()
            && !self.reset_requested
            && self.button.held_for(now_ms) >= self.timing.reset_hold_ms
        {
            warn!("Button: held {}ms, requesting factory reset", self.timing.reset_hold_ms);
            self.reset_requested = true;
            self.suppress_release = true;
            system.request_factory_reset();
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an inbound command. Rejected payloads change nothing.
    ///
    /// Every successful config write-back also counts as a keepalive.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl NotificationSink,
        store: &mut impl StoragePort,
    ) -> Result<()> {
        match cmd {
            AppCommand::SetRelay(target) => {
                self.relay.set_state(target, hw, sink);
            }
            AppCommand::SetInitMode(state) => {
                sink.emit(&Notification::InitMode(state));
                if self.config.set_initial_state(state, store)? {
                    self.keepalive.signal(now_ms);
                }
            }
            AppCommand::StartCountdown(secs) => {
                let secs = self.countdown.start(secs, now_ms).inspect_err(|e| {
                    warn!("Countdown rejected: {}", e);
                })?;
                info!("Countdown armed for {}s", secs);
                self.relay.set_state(RelayState::On, hw, sink);
                sink.emit(&Notification::Countdown(secs));
            }
            AppCommand::KeepaliveTick => {
                self.keepalive.signal(now_ms);
            }
            AppCommand::SetKeepalive(secs) => {
                let previous = self.config.config().keepalive_timeout_secs;
                let result = self.config.set_keepalive(secs, store);
                if secs != previous {
                    info!("Keepalive timeout {}s -> {}s", previous, secs);
                    self.keepalive.configure(secs, now_ms);
                }
                sink.emit(&Notification::KeepaliveValue(secs));
                if result? {
                    self.keepalive.signal(now_ms);
                }
            }
        }
        Ok(())
    }

    /// React to a platform lifecycle event.
    pub fn handle_lifecycle(
        &mut self,
        event: LifecycleEvent,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl NotificationSink,
        store: &mut impl StoragePort,
    ) -> Result<()> {
        match event {
            LifecycleEvent::ProvisioningMode => {
                warn!("Provisioning mode: relay OFF, config reset");
                self.countdown.cancel();
                self.relay.set_state(RelayState::Off, hw, sink);
                self.keepalive.configure(0, now_ms);
                self.config.reset(store)?;
            }
            LifecycleEvent::OtaStarted => {
                warn!("Firmware update started: relay OFF");
                self.countdown.cancel();
                self.relay.set_state(RelayState::Off, hw, sink);
            }
            LifecycleEvent::MqttReady if !self.started => {
                self.start(now_ms, sink);
            }
            other => info!("Lifecycle: {:?}", other),
        }
        Ok(())
    }

    /// Route one inbox message to the matching handler.
    pub fn dispatch(
        &mut self,
        msg: Inbound,
        now_ms: u32,
        hw: &mut impl RelayPort,
        sink: &mut impl NotificationSink,
        store: &mut impl StoragePort,
    ) -> Result<()> {
        match msg {
            Inbound::Command(cmd) => self.handle_command(cmd, now_ms, hw, sink, store),
            Inbound::Lifecycle(event) => self.handle_lifecycle(event, now_ms, hw, sink, store),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn relay_state(&self) -> RelayState {
        self.relay.current_state()
    }

    /// In-memory copy of the persisted settings.
    pub fn config(&self) -> PersistedConfig {
        self.config.config()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn countdown_armed(&self) -> bool {
        self.countdown.is_armed()
    }

    pub fn countdown_remaining_ms(&self, now_ms: u32) -> Option<u32> {
        self.countdown.remaining_ms(now_ms)
    }

    pub fn keepalive_enabled(&self) -> bool {
        self.keepalive.is_enabled()
    }
}
