//! Log-based diagnostic sink adapter.
//!
//! Implements [`DiagnosticSink`] by forwarding classifier diagnostics to
//! the `log` facade (which goes to UART / USB-CDC in production via
//! `esp_idf_logger`).  Each button can log under its own target so a
//! noisy button can be filtered out on its own.

use core::fmt;

use log::Level;

use crate::app::ports::DiagnosticSink;

/// Adapter that writes every diagnostic to the serial console.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    target: &'static str,
}

impl LogSink {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new("button")
    }
}

impl DiagnosticSink for LogSink {
    fn record(&self, level: Level, message: fmt::Arguments<'_>) {
        log::log!(target: self.target, level, "{}", message);
    }
}
