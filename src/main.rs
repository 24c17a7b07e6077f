//! RelayNode Firmware: main entry point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  GpioBoard          LogNotificationSink   NvsStore           │
//! │  (Relay+Button)     (NotificationSink)    (StoragePort)      │
//! │  EspSystem          Esp32TimeAdapter      Inbox              │
//! │  (SystemPort)       (ms clock)            (transport → core) │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            RelayService (pure logic)                 │    │
//! │  │  Relay · Countdown · Keepalive · Debounce · Config   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The message bus client is a separate adapter: it pushes parsed
//! [`AppCommand`](relaynode::app::commands::AppCommand)s and lifecycle
//! events into the [`Inbox`] and forwards notifications to its topics.
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use log::{info, warn};

use relaynode::adapters::hardware::GpioBoard;
use relaynode::adapters::log_sink::LogNotificationSink;
use relaynode::adapters::nvs::NvsStore;
use relaynode::adapters::system::EspSystem;
use relaynode::adapters::time::Esp32TimeAdapter;
use relaynode::app::commands::LifecycleEvent;
use relaynode::app::inbox::Inbox;
use relaynode::app::service::RelayService;
use relaynode::config::TimingConfig;
use relaynode::{FIRMWARE_NAME, FIRMWARE_VERSION, pins};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("{} v{}", FIRMWARE_NAME, FIRMWARE_VERSION);

    // ── 2. GPIO ───────────────────────────────────────────────
    // SAFETY: each pin number is claimed exactly once, here, before any
    // other code touches the GPIO matrix.
    let relay = PinDriver::output(unsafe { AnyOutputPin::new(pins::RELAY_GPIO) })?;
    let indicator = PinDriver::output(unsafe { AnyOutputPin::new(pins::INDICATOR_GPIO) })?;
    // The pull-up needs an input-output capable pad.
    let mut button = PinDriver::input(unsafe { AnyIOPin::new(pins::BUTTON_GPIO) })?;
    button.set_pull(Pull::Up)?;
    let mut board = GpioBoard::new(relay, indicator, button);

    // ── 3. Persisted config ───────────────────────────────────
    let mut store = NvsStore::new().map_err(|e| anyhow!("NVS init failed: {}", e))?;

    // ── 4. Core ───────────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let timing = TimingConfig::default();
    let mut app = RelayService::boot(&store, &mut board, timing, clock.now_ms());

    let mut sink = LogNotificationSink::new();
    let mut system = EspSystem::new();
    let mut inbox = Inbox::new();

    // The serial log is always available, so announce right away; a bus
    // adapter would deliver MqttReady instead.
    app.start(clock.now_ms(), &mut sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();

        inbox.drain(|msg| {
            if let Err(e) = app.dispatch(msg, now_ms, &mut board, &mut sink, &mut store) {
                warn!("{:?} failed: {}", msg, e);
            }
        });

        app.tick(now_ms, &mut board, &mut sink, &mut system);

        // Without a provisioning portal the core's own reset interlock is
        // the whole factory reset.
        if system.take_factory_reset() {
            inbox.push(LifecycleEvent::ProvisioningMode);
        }

        FreeRtos::delay_ms(timing.loop_interval_ms);
    }
}
