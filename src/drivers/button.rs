//! Sampled push-button debouncer.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: HIGH = released, LOW =
//! pressed. The main loop samples the raw level every tick and feeds it to
//! [`DebouncedInput::poll`].
//!
//! ## Debounce
//!
//! Any change of the raw level restarts the debounce window. The stable
//! level only follows once the raw level has held for `interval_ms`, and
//! each accepted transition is reported exactly once as an [`Edge`].

/// A debounced level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// LOW → HIGH (button released).
    Rising,
    /// HIGH → LOW (button pressed).
    Falling,
}

pub struct DebouncedInput {
    interval_ms: u32,
    raw_level: bool,
    stable_level: bool,
    /// When `raw_level` last changed.
    last_change_ms: u32,
    /// When `stable_level` last changed.
    stable_since_ms: u32,
}

impl DebouncedInput {
    /// `initial_level` is assumed stable since `now_ms`.
    pub fn new(interval_ms: u32, initial_level: bool, now_ms: u32) -> Self {
        Self {
            interval_ms,
            raw_level: initial_level,
            stable_level: initial_level,
            last_change_ms: now_ms,
            stable_since_ms: now_ms,
        }
    }

    /// Feed one raw sample. Call once per control-loop tick.
    pub fn poll(&mut self, raw_level: bool, now_ms: u32) -> Option<Edge> {
        if raw_level != self.raw_level {
            self.raw_level = raw_level;
            self.last_change_ms = now_ms;
            return None;
        }

        if raw_level == self.stable_level
            || now_ms.wrapping_sub(self.last_change_ms) < self.interval_ms
        {
            return None;
        }

        self.stable_level = raw_level;
        self.stable_since_ms = now_ms;
        Some(if raw_level { Edge::Rising } else { Edge::Falling })
    }

    pub fn stable_level(&self) -> bool {
        self.stable_level
    }

    /// How long the stable level has been held.
    pub fn held_for(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.stable_since_ms)
    }
}
