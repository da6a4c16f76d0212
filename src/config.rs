//! Sampling configuration
//!
//! Timing thresholds and task parameters for one button's sampling task.
//! Applied on every `start_sampling` call; never mutated while a task runs.

use serde::{Deserialize, Serialize};

/// Which raw input level means "pressed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// Pressed reads HIGH (switch to VCC, pull-down).
    ActiveHigh,
    /// Pressed reads LOW (switch to GND, pull-up).
    ActiveLow,
}

impl Polarity {
    pub const fn from_active_high(active_high: bool) -> Self {
        if active_high {
            Self::ActiveHigh
        } else {
            Self::ActiveLow
        }
    }

    /// Raw level that counts as pressed.
    pub const fn active_level(self) -> bool {
        matches!(self, Self::ActiveHigh)
    }

    /// `pressed ⇔ level == active level`.
    pub const fn is_pressed(self, level: bool) -> bool {
        level == self.active_level()
    }
}

/// Sampling-task configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    // --- Timing ---
    /// Period between two input samples (milliseconds)
    pub check_interval_ms: u32,
    /// Presses held this long or shorter are contact bounce (milliseconds)
    pub debounce_ms: u32,
    /// Continuous hold that counts as a long press (milliseconds)
    pub long_press_ms: u32,
    /// Maximum release gap between the two halves of a double press (milliseconds)
    pub double_press_gap_ms: u32,

    // --- Task ---
    /// Stack size requested for the sampling task (bytes)
    pub stack_budget: usize,
    /// Name given to the sampling task
    pub task_name: heapless::String<16>,
}

pub const DEFAULT_TASK_NAME: &str = "button-sampler";

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            // Timing
            check_interval_ms: 30,
            debounce_ms: 90,
            long_press_ms: 1000,
            double_press_gap_ms: 500,

            // Task
            stack_budget: 4096,
            task_name: truncated_name(DEFAULT_TASK_NAME),
        }
    }
}

impl SamplingConfig {
    /// Same config with the four timing thresholds replaced.
    pub fn with_timing(
        mut self,
        check_interval_ms: u32,
        debounce_ms: u32,
        long_press_ms: u32,
        double_press_gap_ms: u32,
    ) -> Self {
        self.check_interval_ms = check_interval_ms;
        self.debounce_ms = debounce_ms;
        self.long_press_ms = long_press_ms;
        self.double_press_gap_ms = double_press_gap_ms;
        self
    }

    /// Same config with a different task name.  Names longer than 16 bytes
    /// are truncated on a character boundary.
    pub fn with_task_name(mut self, name: &str) -> Self {
        self.task_name = truncated_name(name);
        self
    }
}

/// Copy `name` into a task-name buffer, dropping whatever does not fit.
pub(crate) fn truncated_name(name: &str) -> heapless::String<16> {
    let mut out = heapless::String::new();
    for c in name.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
