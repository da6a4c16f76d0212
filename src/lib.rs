//! Button gesture firmware library.
//!
//! Classifies presses of a momentary push-button into single, double and
//! long presses.  The pure-logic modules (`fsm`, `app`, `config`) build and
//! test on the host; all ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;

pub use app::classifier::{GestureClassifier, Handler};
pub use app::events::Gesture;
pub use config::{Polarity, SamplingConfig};
pub use error::{Error, Result};
