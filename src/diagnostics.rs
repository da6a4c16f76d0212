//! Runtime diagnostics for the sampling tasks.
//!
//! [`TaskTracker`] keeps a fixed-capacity table of the sampling tasks that
//! are currently running (one per button) so the firmware can log a summary
//! of what it has spawned.  [`stack_high_water_mark`] reports how close the
//! calling task has come to exhausting its stack.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::app::ports::TaskRegistry;
use crate::config::truncated_name;

/// Below this many free stack bytes the sampling task logs a warning.
pub const STACK_HEADROOM_WARN_BYTES: u32 = 512;

/// Sampling tasks the tracker can hold at once.
pub const MAX_TRACKED_TASKS: usize = 8;

/// One live sampling task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub name: heapless::String<16>,
    pub stack_budget: usize,
}

/// Registry of live sampling tasks.
#[derive(Debug, Default)]
pub struct TaskTracker {
    tasks: Mutex<heapless::Vec<TaskRecord, MAX_TRACKED_TASKS>>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.records().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = truncated_name(name);
        self.records().iter().any(|t| t.name == name)
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> heapless::Vec<TaskRecord, MAX_TRACKED_TASKS> {
        self.records().clone()
    }

    /// Log one line per live task at info level.
    pub fn log_summary(&self) {
        let tasks = self.records();
        log::info!("diag: {} sampling task(s) live", tasks.len());
        for t in tasks.iter() {
            log::info!("diag:   {} (stack {} B)", t.name, t.stack_budget);
        }
    }

    fn records(&self) -> std::sync::MutexGuard<'_, heapless::Vec<TaskRecord, MAX_TRACKED_TASKS>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskRegistry for TaskTracker {
    fn register(&self, name: &str, stack_budget: usize) {
        let record = TaskRecord {
            name: truncated_name(name),
            stack_budget,
        };
        match self.records().push(record) {
            Ok(()) => log::info!("diag: task '{}' started ({} B stack)", name, stack_budget),
            Err(_) => log::warn!(
                "diag: task table full ({} entries), '{}' not tracked",
                MAX_TRACKED_TASKS,
                name
            ),
        }
    }

    fn unregister(&self, name: &str) {
        let key = truncated_name(name);
        let mut tasks = self.records();
        if let Some(idx) = tasks.iter().position(|t| t.name == key) {
            tasks.swap_remove(idx);
            log::info!("diag: task '{}' stopped", name);
        }
    }
}

/// Minimum free stack (bytes) the calling task has ever had, or `None` when
/// the platform cannot tell.
#[cfg(target_os = "espidf")]
pub fn stack_high_water_mark() -> Option<u32> {
    // SAFETY: a null handle queries the calling task; the call only reads
    // the task's stack canary region.
    // ESP-IDF reports bytes, not words.
    let free = unsafe { esp_idf_svc::sys::uxTaskGetStackHighWaterMark(core::ptr::null_mut()) };
    Some(free)
}

#[cfg(not(target_os = "espidf"))]
pub fn stack_high_water_mark() -> Option<u32> {
    None
}
