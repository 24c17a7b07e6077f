//! GPIO pin assignments for the relay board.
//!
//! Single source of truth: the binary references this module rather than
//! hard-coding pin numbers.

/// Relay coil driver. HIGH = relay closed (load energised).
pub const RELAY_GPIO: i32 = 12;

/// Status LED, active-low. Driven to the complement of the relay pin.
pub const INDICATOR_GPIO: i32 = 13;

/// Momentary push-button, active-low with pull-up. Doubles as the boot
/// strapping pin, so it must read HIGH at reset.
pub const BUTTON_GPIO: i32 = 0;
