//! One-shot countdown timer.
//!
//! Arming the timer means "keep the relay on for N seconds, then turn it
//! off"; the service forces the relay ON when it arms, and this module only
//! tracks the deadline. A new `start` overwrites any pending countdown.
//!
//! All arithmetic uses wrapping `u32` millisecond subtraction, so a
//! countdown survives the ~49.7-day rollover of the monotonic clock.

use crate::config::MAX_DURATION_SECS;
use crate::error::CommandError;

/// Emitted once when an armed countdown reaches its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Armed { armed_at_ms: u32, duration_ms: u32 },
}

pub struct CountdownTimer {
    state: TimerState,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    /// Arm for `duration_secs`. Non-positive or oversized durations are
    /// rejected and leave any pending countdown untouched.
    pub fn start(&mut self, duration_secs: i64, now_ms: u32) -> Result<u32, CommandError> {
        if duration_secs <= 0 || duration_secs > i64::from(MAX_DURATION_SECS) {
            return Err(CommandError::InvalidCountdown);
        }
        let secs = duration_secs as u32;
        self.state = TimerState::Armed {
            armed_at_ms: now_ms,
            duration_ms: secs * 1000,
        };
        Ok(secs)
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Fires at most once per `start`; the timer is idle afterwards.
    pub fn tick(&mut self, now_ms: u32) -> Option<Expired> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Armed {
                armed_at_ms,
                duration_ms,
            } => {
                if now_ms.wrapping_sub(armed_at_ms) >= duration_ms {
                    self.state = TimerState::Idle;
                    Some(Expired)
                } else {
                    None
                }
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    /// Milliseconds left before expiry, `None` when idle.
    pub fn remaining_ms(&self, now_ms: u32) -> Option<u32> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Armed {
                armed_at_ms,
                duration_ms,
            } => Some(duration_ms.saturating_sub(now_ms.wrapping_sub(armed_at_ms))),
        }
    }
}
