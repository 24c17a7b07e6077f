//! Integration tests for the RelayService → ports pipeline.
//!
//! These run on the host and drive the full service through mock adapters,
//! stepping a simulated clock the way the control loop would.

use crate::mock_hw::{MockBoard, MockEeprom, MockSystem, RecordingSink};

use relaynode::app::commands::{AppCommand, LifecycleEvent};
use relaynode::app::inbox::Inbox;
use relaynode::app::ports::StorageError;
use relaynode::app::service::RelayService;
use relaynode::config::{ConfigRecord, PersistedConfig, TimingConfig};
use relaynode::control::relay::RelayState;
use relaynode::error::{CommandError, Error, Result};

const LOOP_MS: u32 = 10;

struct Rig {
    app: RelayService,
    hw: MockBoard,
    sink: RecordingSink,
    store: MockEeprom,
    system: MockSystem,
    now: u32,
}

impl Rig {
    fn boot(store: MockEeprom) -> Self {
        let mut hw = MockBoard::new();
        let app = RelayService::boot(&store, &mut hw, TimingConfig::default(), 0);
        Self {
            app,
            hw,
            sink: RecordingSink::new(),
            store,
            system: MockSystem::new(),
            now: 0,
        }
    }

    fn fresh() -> Self {
        Self::boot(MockEeprom::new())
    }

    fn with_config(initial_state: RelayState, keepalive_timeout_secs: u32) -> Self {
        let image = ConfigRecord::encode(&PersistedConfig {
            initial_state,
            keepalive_timeout_secs,
        });
        Self::boot(MockEeprom::with_image(&image))
    }

    /// Tick the service every loop period up to and including `until_ms`.
    fn run_until(&mut self, until_ms: u32) {
        while self.now < until_ms {
            self.now += LOOP_MS;
            self.tick_at(self.now);
        }
    }

    fn tick_at(&mut self, now_ms: u32) {
        self.now = now_ms;
        self.app
            .tick(now_ms, &mut self.hw, &mut self.sink, &mut self.system);
    }

    fn command(&mut self, cmd: AppCommand) -> Result<()> {
        self.app
            .handle_command(cmd, self.now, &mut self.hw, &mut self.sink, &mut self.store)
    }

    fn lifecycle(&mut self, event: LifecycleEvent) -> Result<()> {
        self.app
            .handle_lifecycle(event, self.now, &mut self.hw, &mut self.sink, &mut self.store)
    }
}

// ── Boot & announcement ───────────────────────────────────────

#[test]
fn boot_applies_persisted_state_silently() {
    let rig = Rig::with_config(RelayState::On, 0);

    assert_eq!(rig.app.relay_state(), RelayState::On);
    assert!(rig.hw.relay, "relay output should be HIGH");
    assert!(!rig.hw.indicator, "indicator is the inverse of the relay");
    assert!(rig.sink.sent.is_empty(), "nothing is announced before start");
    assert!(!rig.app.is_started());
}

#[test]
fn start_announces_state_and_settings() {
    let mut rig = Rig::with_config(RelayState::On, 0);
    rig.app.start(0, &mut rig.sink);

    assert!(rig.app.is_started());
    assert_eq!(
        rig.sink.pairs(),
        vec![
            ("relayState", "ON"),
            ("relayInitMode", "1"),
            ("keepAliveValue", "0"),
        ]
    );
}

#[test]
fn mqtt_ready_starts_only_once() {
    let mut rig = Rig::fresh();

    rig.lifecycle(LifecycleEvent::MqttReady).unwrap();
    assert!(rig.app.is_started());
    assert_eq!(rig.sink.sent.len(), 3);

    rig.lifecycle(LifecycleEvent::MqttDisconnected).unwrap();
    rig.lifecycle(LifecycleEvent::MqttReady).unwrap();
    assert_eq!(rig.sink.sent.len(), 3, "reconnect must not re-announce");
}

#[test]
fn erased_flash_boots_with_defaults() {
    let rig = Rig::boot(MockEeprom::with_image(&[0xFF; 8]));

    assert_eq!(rig.app.config(), PersistedConfig::default());
    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(!rig.app.keepalive_enabled());
    assert_eq!(rig.store.saves, 0, "a bad record is not rewritten at boot");
}

// ── Relay commands ────────────────────────────────────────────

#[test]
fn set_relay_is_idempotent_but_always_notifies() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::SetRelay(RelayState::On)).unwrap();
    rig.command(AppCommand::SetRelay(RelayState::On)).unwrap();

    assert_eq!(rig.app.relay_state(), RelayState::On);
    assert!(rig.hw.relay);
    assert_eq!(
        rig.sink.pairs(),
        vec![("relayState", "ON"), ("relayState", "ON")]
    );
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn debounced_press_and_release_toggles_once() {
    let mut rig = Rig::fresh();

    rig.hw.press();
    rig.run_until(100);
    assert_eq!(rig.app.relay_state(), RelayState::Off, "press alone does nothing");

    rig.hw.release();
    rig.run_until(200);
    assert_eq!(rig.app.relay_state(), RelayState::On);
    assert_eq!(rig.sink.pairs(), vec![("relayState", "ON")]);

    rig.hw.press();
    rig.run_until(300);
    rig.hw.release();
    rig.run_until(400);
    assert_eq!(rig.app.relay_state(), RelayState::Off);
}

#[test]
fn bounce_shorter_than_debounce_is_ignored() {
    let mut rig = Rig::fresh();

    rig.hw.press();
    rig.run_until(20);
    rig.hw.release();
    rig.run_until(500);

    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(rig.sink.sent.is_empty());
}

#[test]
fn long_hold_requests_factory_reset_once_and_skips_toggle() {
    let mut rig = Rig::fresh();

    rig.hw.press();
    rig.run_until(5_000);
    assert_eq!(rig.system.factory_resets, 0);

    rig.run_until(20_000);
    assert_eq!(rig.system.factory_resets, 1, "one request per hold");

    rig.hw.release();
    rig.run_until(20_200);
    assert_eq!(rig.app.relay_state(), RelayState::Off, "release after a hold must not toggle");
    assert!(rig.sink.sent.is_empty());

    // The next ordinary press toggles again.
    rig.hw.press();
    rig.run_until(20_400);
    rig.hw.release();
    rig.run_until(20_600);
    assert_eq!(rig.app.relay_state(), RelayState::On);
}

// ── Countdown ─────────────────────────────────────────────────

#[test]
fn countdown_turns_on_then_off_after_duration() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::StartCountdown(5)).unwrap();
    assert_eq!(rig.app.relay_state(), RelayState::On);
    assert!(rig.app.countdown_armed());
    assert_eq!(
        rig.sink.pairs(),
        vec![("relayState", "ON"), ("relayTimer", "5")]
    );
    rig.sink.clear();

    rig.run_until(2_000);
    assert_eq!(rig.app.countdown_remaining_ms(rig.now), Some(3_000));

    rig.run_until(4_990);
    assert_eq!(rig.app.relay_state(), RelayState::On);

    rig.run_until(5_000);
    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(!rig.app.countdown_armed());
    assert_eq!(rig.app.countdown_remaining_ms(rig.now), None);
    assert_eq!(
        rig.sink.pairs(),
        vec![("relayState", "OFF"), ("relayTimer", "0")]
    );
}

#[test]
fn non_positive_countdown_changes_nothing() {
    let mut rig = Rig::fresh();
    let boot_writes = rig.hw.writes.len();

    for secs in [0, -1] {
        assert_eq!(
            rig.command(AppCommand::StartCountdown(secs)),
            Err(Error::Command(CommandError::InvalidCountdown))
        );
    }
    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(!rig.app.countdown_armed());
    assert!(rig.sink.sent.is_empty());
    assert_eq!(rig.hw.writes.len(), boot_writes, "rejected command must not touch GPIO");
}

#[test]
fn manual_off_does_not_cancel_countdown() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::StartCountdown(2)).unwrap();
    rig.command(AppCommand::SetRelay(RelayState::Off)).unwrap();
    rig.command(AppCommand::SetRelay(RelayState::On)).unwrap();
    rig.sink.clear();

    rig.run_until(2_000);
    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert_eq!(
        rig.sink.pairs(),
        vec![("relayState", "OFF"), ("relayTimer", "0")]
    );
}

// ── Keepalive watchdog ────────────────────────────────────────

#[test]
fn keepalive_fires_exactly_at_timeout() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::SetKeepalive(30)).unwrap();
    assert_eq!(rig.sink.pairs(), vec![("keepAliveValue", "30")]);

    rig.run_until(29_990);
    rig.tick_at(29_999);
    assert_eq!(rig.system.restarts, 0);

    rig.tick_at(30_000);
    assert_eq!(rig.system.restarts, 1);
}

#[test]
fn keepalive_tick_postpones_restart() {
    let mut rig = Rig::with_config(RelayState::Off, 30);

    rig.run_until(20_000);
    rig.command(AppCommand::KeepaliveTick).unwrap();

    rig.run_until(49_990);
    assert_eq!(rig.system.restarts, 0);

    rig.run_until(50_000);
    assert_eq!(rig.system.restarts, 1);
}

#[test]
fn init_mode_write_back_rearms_keepalive() {
    let mut rig = Rig::with_config(RelayState::Off, 30);

    rig.run_until(20_000);
    rig.command(AppCommand::SetInitMode(RelayState::On)).unwrap();
    assert_eq!(rig.store.commits, 1);

    rig.run_until(49_990);
    assert_eq!(rig.system.restarts, 0);

    rig.run_until(50_000);
    assert_eq!(rig.system.restarts, 1);
}

#[test]
fn disabled_keepalive_never_restarts() {
    let mut rig = Rig::fresh();
    assert!(!rig.app.keepalive_enabled());

    rig.tick_at(1_000_000);
    rig.tick_at(u32::MAX);
    assert_eq!(rig.system.restarts, 0);
}

// ── Persistence ───────────────────────────────────────────────

#[test]
fn unchanged_settings_are_not_written() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::SetInitMode(RelayState::Off)).unwrap();
    rig.command(AppCommand::SetKeepalive(0)).unwrap();

    assert_eq!(rig.store.saves, 0);
    assert_eq!(rig.store.commits, 0);
    assert_eq!(
        rig.sink.pairs(),
        vec![("relayInitMode", "0"), ("keepAliveValue", "0")]
    );
}

#[test]
fn changed_setting_is_written_and_committed_once() {
    let mut rig = Rig::fresh();

    rig.command(AppCommand::SetInitMode(RelayState::On)).unwrap();

    assert_eq!(rig.store.saves, 1);
    assert_eq!(rig.store.commits, 1);
    assert_eq!(rig.store.image.as_deref(), Some(&[1, 0, 0, 0, 0, 0, 0, 0][..]));
    assert_eq!(rig.app.relay_state(), RelayState::Off, "init mode does not drive the relay");
}

#[test]
fn commit_failure_is_reported() {
    let mut rig = Rig::fresh();
    rig.store.fail_commit = true;

    assert_eq!(
        rig.command(AppCommand::SetKeepalive(60)),
        Err(Error::Storage(StorageError::CommitFailed))
    );
    assert!(rig.store.image.is_none());
    // The new timeout is still echoed and in effect for this session.
    assert_eq!(rig.sink.pairs(), vec![("keepAliveValue", "60")]);
    assert!(rig.app.keepalive_enabled());
}

#[test]
fn same_setting_is_retried_after_failed_commit() {
    let mut rig = Rig::fresh();
    rig.store.fail_commit = true;

    assert_eq!(
        rig.command(AppCommand::SetKeepalive(60)),
        Err(Error::Storage(StorageError::CommitFailed))
    );
    assert!(rig.store.image.is_none());

    rig.store.fail_commit = false;
    rig.command(AppCommand::SetKeepalive(60)).unwrap();

    assert_eq!(rig.store.saves, 2);
    assert_eq!(rig.store.commits, 2);
    assert_eq!(rig.store.image.as_deref(), Some(&[0, 0, 0, 0, 60, 0, 0, 0][..]));

    // Once durable, repeating it is a no-op again.
    rig.command(AppCommand::SetKeepalive(60)).unwrap();
    assert_eq!(rig.store.saves, 2);
}

// ── Lifecycle interlocks ──────────────────────────────────────

#[test]
fn provisioning_forces_off_and_resets_config() {
    let mut rig = Rig::with_config(RelayState::On, 30);
    rig.command(AppCommand::StartCountdown(60)).unwrap();

    rig.lifecycle(LifecycleEvent::ProvisioningMode).unwrap();

    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(!rig.hw.relay);
    assert!(!rig.app.countdown_armed());
    assert!(!rig.app.keepalive_enabled());
    assert_eq!(rig.app.config(), PersistedConfig::default());
    assert_eq!(rig.store.image.as_deref(), Some(&[0u8; 8][..]));
    assert_eq!(rig.store.saves, 1);
    assert_eq!(rig.store.commits, 1);

    rig.tick_at(120_000);
    assert_eq!(rig.system.restarts, 0, "watchdog is disabled after reset");
}

#[test]
fn ota_forces_off_without_touching_config() {
    let mut rig = Rig::with_config(RelayState::On, 0);
    rig.command(AppCommand::StartCountdown(60)).unwrap();

    rig.lifecycle(LifecycleEvent::OtaStarted).unwrap();

    assert_eq!(rig.app.relay_state(), RelayState::Off);
    assert!(!rig.app.countdown_armed());
    assert_eq!(rig.app.config().initial_state, RelayState::On);
    assert_eq!(rig.store.saves, 0);
}

// ── Inbox → dispatch ──────────────────────────────────────────

#[test]
fn inbox_messages_dispatch_in_order() {
    let mut rig = Rig::fresh();
    let mut inbox = Inbox::new();

    inbox.push(LifecycleEvent::MqttReady);
    inbox.push(AppCommand::from_property("relayTimer", "3").unwrap());
    inbox.push(AppCommand::from_property("relayTimer", "abc").unwrap());
    inbox.push(AppCommand::from_property("relayState", "OFF").unwrap());

    let mut errors = Vec::new();
    inbox.drain(|msg| {
        if let Err(e) = rig.app.dispatch(msg, 0, &mut rig.hw, &mut rig.sink, &mut rig.store) {
            errors.push(e);
        }
    });

    assert_eq!(errors, vec![Error::Command(CommandError::InvalidCountdown)]);
    assert_eq!(
        rig.sink.pairs()[3..],
        [("relayState", "ON"), ("relayTimer", "3"), ("relayState", "OFF")]
    );
    assert!(rig.app.countdown_armed(), "manual OFF leaves the countdown armed");
}
