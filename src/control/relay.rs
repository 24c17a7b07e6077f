//! Relay controller: sole writer of the relay and indicator outputs.
//!
//! ## Polarity contract
//!
//! | State | Relay GPIO | Indicator GPIO |
//! |-------|-----------|----------------|
//! | `On`  | HIGH      | LOW            |
//! | `Off` | LOW       | HIGH           |
//!
//! The indicator LED is wired active-low, so it lights while the load is
//! energised. Both pins are always a pure function of [`RelayState`];
//! nothing else in the firmware writes them.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app::events::Notification;
use crate::app::ports::{NotificationSink, RelayPort};

/// Logical relay output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RelayState {
    On,
    #[default]
    Off,
}

impl RelayState {
    /// Canonical wire string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// `1` for `On`, `0` for `Off`; the persisted and echoed form.
    pub const fn as_mode_digit(self) -> u8 {
        match self {
            Self::On => 1,
            Self::Off => 0,
        }
    }

    /// State implied by a relay output level.
    pub const fn from_level(high: bool) -> Self {
        if high { Self::On } else { Self::Off }
    }

    /// Relay output level for this state.
    pub const fn relay_level(self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    /// Parse an exact `"ON"` / `"OFF"` payload.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }
}

pub struct RelayController {
    state: RelayState,
}

impl RelayController {
    pub fn new(initial: RelayState) -> Self {
        Self { state: initial }
    }

    /// Drive the outputs to the boot state without notifying anyone.
    /// The announcement happens later, once a transport is up.
    pub fn apply_boot_state(&self, hw: &mut impl RelayPort) {
        Self::drive(self.state, hw);
    }

    /// Drive the relay to `target` and notify. Never rejected; setting the
    /// current state again still re-emits the notification.
    pub fn set_state(
        &mut self,
        target: RelayState,
        hw: &mut impl RelayPort,
        sink: &mut impl NotificationSink,
    ) -> bool {
        Self::drive(target, hw);
        if target != self.state {
            debug!("Relay: {:?} -> {:?}", self.state, target);
        }
        self.state = target;
        sink.emit(&Notification::RelayState(target));
        true
    }

    /// Invert the level the relay output is *actually* driving, which
    /// tolerates any drift between the pin and the cached state.
    pub fn toggle(
        &mut self,
        hw: &mut impl RelayPort,
        sink: &mut impl NotificationSink,
    ) -> RelayState {
        let target = RelayState::from_level(hw.relay_level()).toggled();
        self.set_state(target, hw, sink);
        target
    }

    pub fn current_state(&self) -> RelayState {
        self.state
    }

    fn drive(state: RelayState, hw: &mut impl RelayPort) {
        let high = state.relay_level();
        hw.write_relay(high);
        hw.write_indicator(!high);
    }
}
