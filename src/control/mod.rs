//! Relay state and timing engine.

pub mod countdown;
pub mod keepalive;
pub mod relay;
