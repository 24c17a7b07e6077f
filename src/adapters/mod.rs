//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                 |
//! |------------|-----------------------|-----------------------------|
//! | `hardware` | RelayPort, ButtonPort | embedded-hal GPIO pins      |
//! | `log_sink` | NotificationSink      | Serial log output           |
//! | `nvs`      | StoragePort           | NVS / in-memory flash image |
//! | `system`   | SystemPort            | esp_restart / reset latch   |
//! | `time`     | (clock source)        | ESP32 system timer          |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod system;
pub mod time;
