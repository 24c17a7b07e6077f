//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the relay switch: command
//! interpretation, the per-tick control cycle, lifecycle interlocks, and
//! outbound notifications. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod inbox;
pub mod ports;
pub mod service;
