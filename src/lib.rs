//! RelayNode firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod persist;
pub mod pins;

/// Firmware name reported to the platform.
pub const FIRMWARE_NAME: &str = "homie-sonoff";

/// Firmware version reported to the platform.
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
