//! Hardware adapter: bridges GPIO pins to domain port traits.
//!
//! Generic over the `embedded-hal` 1.0 digital traits, so the same adapter
//! drives ESP-IDF `PinDriver`s on the device and simulated pins on host.
//! Pin errors are logged and degraded to a safe reading; the ports are
//! infallible by contract.

use embedded_hal::digital::{InputPin, OutputPin, PinState, StatefulOutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, RelayPort};

/// Relay coil, indicator LED, and push-button behind port traits.
pub struct GpioBoard<R, L, B> {
    relay: R,
    indicator: L,
    button: B,
}

impl<R, L, B> GpioBoard<R, L, B>
where
    R: StatefulOutputPin,
    L: OutputPin,
    B: InputPin,
{
    pub fn new(relay: R, indicator: L, button: B) -> Self {
        Self {
            relay,
            indicator,
            button,
        }
    }

    /// Give the pins back (e.g. to reconfigure before restart).
    pub fn release(self) -> (R, L, B) {
        (self.relay, self.indicator, self.button)
    }
}

// ── RelayPort implementation ──────────────────────────────────

impl<R, L, B> RelayPort for GpioBoard<R, L, B>
where
    R: StatefulOutputPin,
    L: OutputPin,
    B: InputPin,
{
    fn write_relay(&mut self, high: bool) {
        if let Err(e) = self.relay.set_state(PinState::from(high)) {
            warn!("GPIO: relay write failed: {:?}", e);
        }
    }

    fn relay_level(&mut self) -> bool {
        self.relay.is_set_high().unwrap_or_else(|e| {
            warn!("GPIO: relay readback failed: {:?}", e);
            false
        })
    }

    fn write_indicator(&mut self, high: bool) {
        if let Err(e) = self.indicator.set_state(PinState::from(high)) {
            warn!("GPIO: indicator write failed: {:?}", e);
        }
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<R, L, B> ButtonPort for GpioBoard<R, L, B>
where
    R: StatefulOutputPin,
    L: OutputPin,
    B: InputPin,
{
    fn button_level(&mut self) -> bool {
        // Read failures look like "released" so they never toggle the relay.
        self.button.is_high().unwrap_or_else(|e| {
            warn!("GPIO: button read failed: {:?}", e);
            true
        })
    }
}
