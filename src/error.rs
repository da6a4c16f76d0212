//! Unified error types for the button firmware.
//!
//! The classifier itself never fails; these errors come from the adapters
//! around it (GPIO configuration, sampling-task creation).  All variants are
//! `Copy` so they can be logged and handed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible adapter operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A GPIO could not be configured.
    Gpio(GpioError),
    /// The sampling task could not be created.
    Task(TaskError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Task(e) => write!(f, "task: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// `gpio_config` rejected the pin (ESP-IDF return code).
    ConfigFailed(i32),
    /// Pin number outside the range the SoC exposes.
    InvalidPin(i32),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::InvalidPin(pin) => write!(f, "invalid GPIO {pin}"),
        }
    }
}

impl std::error::Error for GpioError {}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Task errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskError {
    /// `esp_pthread_set_cfg` refused the core / priority / stack request.
    ConfigRejected(i32),
    /// The runtime could not spawn the thread (out of memory, etc.).
    SpawnFailed,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigRejected(rc) => write!(f, "pthread config rejected (rc={rc})"),
            Self::SpawnFailed => write!(f, "thread spawn failed"),
        }
    }
}

impl std::error::Error for TaskError {}

impl From<TaskError> for Error {
    fn from(e: TaskError) -> Self {
        Self::Task(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
