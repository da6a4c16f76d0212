//! Per-tick inputs to the gesture machine.
//!
//! Everything the machine needs from the outside world is gathered into
//! these plain-data structs before `step()` runs, so the machine itself
//! stays free of I/O and can be driven from tests with synthetic samples.

use crate::config::SamplingConfig;

/// What the sampling step observed on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Debounce-free instantaneous read, polarity already applied.
    pub pressed: bool,
    /// Clock reading taken on this tick (milliseconds).
    pub now_ms: u64,
    /// Gestures that currently have a handler registered.
    pub armed: Armed,
}

/// Which gestures have a handler registered at the moment of the tick.
///
/// The machine only reports gestures somebody is listening for, and the
/// presence of a double-press handler changes when a single press may
/// resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Armed {
    pub single: bool,
    pub double: bool,
    pub long: bool,
}

impl Armed {
    pub const ALL: Armed = Armed {
        single: true,
        double: true,
        long: true,
    };
}

/// Timing thresholds, widened to the clock's `u64` domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub debounce_ms: u64,
    pub long_press_ms: u64,
    pub double_press_gap_ms: u64,
}

impl From<&SamplingConfig> for Thresholds {
    fn from(c: &SamplingConfig) -> Self {
        Self {
            debounce_ms: c.debounce_ms as u64,
            long_press_ms: c.long_press_ms as u64,
            double_press_gap_ms: c.double_press_gap_ms as u64,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&SamplingConfig::default())
    }
}
