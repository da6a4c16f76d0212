//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements                     | Connects to            |
//! |------------|--------------------------------|------------------------|
//! | `gpio`     | `embedded_hal` InputPin        | ESP32 GPIO matrix      |
//! | `log_sink` | DiagnosticSink                 | `log` → serial output  |
//! | `time`     | Clock                          | ESP32 system timer     |
//!
//! The scheduling port is implemented in
//! [`drivers::task`](crate::drivers::task), next to the thread spawning it
//! builds on.

pub mod gpio;
pub mod log_sink;
pub mod time;
